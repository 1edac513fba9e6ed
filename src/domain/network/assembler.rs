//! Tree assembly — expands child references into a complete [`NetworkTree`].
//!
//! Assembly runs an explicit work queue instead of recursing: every resolved
//! node pushes its child references onto the queue, and up to
//! [`AssemblerConfig::max_concurrency`] lookups are outstanding at any time.
//! Both children of a node are therefore in flight together, and the run only
//! returns once every branch has settled.
//!
//! Failure handling:
//! - the root lookup failing aborts with [`NetworkError::MemberNotFound`];
//! - any other lookup failing drops just that branch and records a
//!   [`Truncation`];
//! - a username referenced twice in one run fails with
//!   [`NetworkError::CycleDetected`];
//! - a cancelled [`AssemblyToken`] ends the run with [`NetworkError::Cancelled`]
//!   as soon as it is cancelled, even while lookups are still outstanding.

use super::fetcher::NetworkFetcher;
use super::{MemberRecord, NetworkTree, NodeId, Side, Truncation, TruncationReason};
use crate::error::{HttpError, NetworkError};
use crate::shared::Username;

use futures_util::future::{select, Either};
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::collections::{HashSet, VecDeque};
use std::future::Future;
use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Poll, Waker};

/// Default number of simultaneously outstanding lookups.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Assembly limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// Upper bound on lookups in flight at once. Values below 1 are treated as 1.
    pub max_concurrency: usize,
    /// Deepest level fetched, counting the root as level 0. `None` = unbounded.
    pub max_depth: Option<usize>,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_depth: None,
        }
    }
}

// ─── Cancellation ────────────────────────────────────────────────────────────

/// Cancellation handle for one assembly run.
///
/// Clones share the same flag. Cancelling wakes the run right away; lookups
/// still in flight are dropped and their results never reach the tree.
#[derive(Debug, Clone, Default)]
pub struct AssemblyToken {
    cancelled: Arc<AtomicBool>,
    wakers: Arc<Mutex<Vec<Waker>>>,
}

impl AssemblyToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let waiting = match self.wakers.lock() {
            Ok(mut wakers) => std::mem::take(&mut *wakers),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        for waker in waiting {
            waker.wake();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called on this token
    /// or any of its clones.
    pub async fn cancelled(&self) {
        std::future::poll_fn(|cx| {
            if self.is_cancelled() {
                return Poll::Ready(());
            }
            self.register(cx.waker());
            // cancel() may have run between the check and the registration.
            if self.is_cancelled() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await
    }

    fn register(&self, waker: &Waker) {
        let mut wakers = match self.wakers.lock() {
            Ok(wakers) => wakers,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !wakers.iter().any(|w| w.will_wake(waker)) {
            wakers.push(waker.clone());
        }
    }
}

/// Run `fut` until it completes or `token` is cancelled, whichever is first.
async fn unless_cancelled<T>(token: &AssemblyToken, fut: impl Future<Output = T>) -> Option<T> {
    let fut = pin!(fut);
    let cancel = pin!(token.cancelled());
    match select(fut, cancel).await {
        Either::Left((value, _)) => Some(value),
        Either::Right(((), _)) => None,
    }
}

// ─── Assembler ───────────────────────────────────────────────────────────────

/// A child reference waiting to be looked up.
#[derive(Debug, Clone)]
struct Slot {
    parent: NodeId,
    side: Side,
    username: Username,
}

/// Builds placement trees from single-node lookups.
#[derive(Debug, Clone)]
pub struct TreeAssembler<F> {
    fetcher: F,
    config: AssemblerConfig,
}

impl<F: NetworkFetcher> TreeAssembler<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_config(fetcher, AssemblerConfig::default())
    }

    pub fn with_config(fetcher: F, config: AssemblerConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Assemble the tree rooted at `username`.
    pub async fn assemble(&self, username: &Username) -> Result<NetworkTree, NetworkError> {
        self.assemble_with_token(username, &AssemblyToken::new())
            .await
    }

    /// Assemble the tree rooted at `username`, giving up once `token` is cancelled.
    pub async fn assemble_with_token(
        &self,
        username: &Username,
        token: &AssemblyToken,
    ) -> Result<NetworkTree, NetworkError> {
        if username.is_blank() {
            return Err(NetworkError::EmptyUsername);
        }
        let cancelled = || NetworkError::Cancelled {
            username: username.clone(),
        };
        if token.is_cancelled() {
            return Err(cancelled());
        }

        let root = unless_cancelled(token, self.fetcher.fetch_member(username))
            .await
            .ok_or_else(cancelled)?
            .map_err(|e| {
                tracing::warn!(username = %username, error = %e, "Root member lookup failed");
                NetworkError::MemberNotFound {
                    username: username.clone(),
                    reason: e.to_string(),
                }
            })?;

        let mut visited: HashSet<Username> = HashSet::new();
        visited.insert(username.clone());
        visited.insert(root.member.username.clone());

        let mut tree = NetworkTree::with_root(root.member.clone());
        let mut pending: VecDeque<Slot> = VecDeque::new();
        let root_id = tree.root();
        self.enqueue_children(&mut tree, &mut pending, &mut visited, root_id, &root)?;

        let cap = self.config.max_concurrency.max(1);
        let mut in_flight = FuturesUnordered::new();

        loop {
            while in_flight.len() < cap {
                match pending.pop_front() {
                    Some(slot) => in_flight.push(self.lookup(slot)),
                    None => break,
                }
            }

            let settled = unless_cancelled(token, in_flight.next()).await;
            let Some(next) = settled else {
                tracing::debug!(
                    root = %username,
                    outstanding = in_flight.len(),
                    "Assembly cancelled, dropping lookups"
                );
                return Err(cancelled());
            };
            // A lookup that settled together with the cancel is discarded too.
            if token.is_cancelled() {
                return Err(cancelled());
            }
            let Some((slot, result)) = next else {
                break;
            };

            match result {
                Ok(record) => {
                    if record.member.username != slot.username
                        && !visited.insert(record.member.username.clone())
                    {
                        return Err(NetworkError::CycleDetected {
                            username: record.member.username,
                        });
                    }
                    match tree.attach(slot.parent, slot.side, record.member.clone()) {
                        Some(id) => {
                            self.enqueue_children(
                                &mut tree,
                                &mut pending,
                                &mut visited,
                                id,
                                &record,
                            )?;
                        }
                        None => {
                            tracing::warn!(
                                username = %slot.username,
                                side = %slot.side,
                                "Placement slot already occupied, dropping branch"
                            );
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        username = %slot.username,
                        side = %slot.side,
                        error = %e,
                        "Branch lookup failed, truncating"
                    );
                    tree.record_truncation(Truncation {
                        parent: slot.parent,
                        side: slot.side,
                        username: slot.username,
                        reason: TruncationReason::FetchFailed(e.to_string()),
                    });
                }
            }
        }

        tracing::info!(
            root = %username,
            members = tree.len(),
            truncated = tree.truncations().len(),
            "Assembled placement tree"
        );
        Ok(tree)
    }

    fn lookup(
        &self,
        slot: Slot,
    ) -> impl Future<Output = (Slot, Result<MemberRecord, HttpError>)> + '_ {
        async move {
            tracing::debug!(username = %slot.username, side = %slot.side, "Fetching member");
            let result = self.fetcher.fetch_member(&slot.username).await;
            (slot, result)
        }
    }

    /// Queue the child references of `record`, which now lives at `parent`.
    fn enqueue_children(
        &self,
        tree: &mut NetworkTree,
        pending: &mut VecDeque<Slot>,
        visited: &mut HashSet<Username>,
        parent: NodeId,
        record: &MemberRecord,
    ) -> Result<(), NetworkError> {
        let child_level = tree.node(parent).map(|n| n.level + 1).unwrap_or(1);

        for side in [Side::Left, Side::Right] {
            let Some(child) = record.child(side) else {
                continue;
            };
            if !visited.insert(child.clone()) {
                tracing::warn!(username = %child, "Username referenced twice in placement tree");
                return Err(NetworkError::CycleDetected {
                    username: child.clone(),
                });
            }
            if self.config.max_depth.is_some_and(|max| child_level > max) {
                tree.record_truncation(Truncation {
                    parent,
                    side,
                    username: child.clone(),
                    reason: TruncationReason::DepthLimit,
                });
                continue;
            }
            pending.push_back(Slot {
                parent,
                side,
                username: child.clone(),
            });
        }
        Ok(())
    }
}
