//! Single-node lookup by username.

use super::{Member, MemberRecord};
use crate::error::HttpError;
use crate::shared::Username;

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::task::{Context, Poll};

/// Looks up one member of the placement network.
///
/// Implementations perform exactly one lookup per call and keep no cache;
/// assembling the same tree twice fetches every node twice.
#[allow(async_fn_in_trait)]
pub trait NetworkFetcher {
    /// Fetch the member named `username` together with its child references.
    async fn fetch_member(&self, username: &Username) -> Result<MemberRecord, HttpError>;
}

impl<T: NetworkFetcher + ?Sized> NetworkFetcher for &T {
    async fn fetch_member(&self, username: &Username) -> Result<MemberRecord, HttpError> {
        (**self).fetch_member(username).await
    }
}

#[cfg(feature = "http")]
impl NetworkFetcher for crate::http::StorefrontHttp {
    async fn fetch_member(&self, username: &Username) -> Result<MemberRecord, HttpError> {
        let resp = self.get_tree_node(username.as_str()).await?;
        Ok(resp.into())
    }
}

// ─── In-memory network ───────────────────────────────────────────────────────

/// A fixed placement topology held in memory.
///
/// Used for offline previews and tests. Each lookup yields to the executor once
/// before answering, so concurrently issued lookups really are outstanding at
/// the same time. Call and concurrency counters are kept for inspection.
#[derive(Debug, Default)]
pub struct InMemoryNetwork {
    records: HashMap<Username, MemberRecord>,
    failing: HashSet<Username>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    log: Mutex<Vec<Username>>,
}

impl InMemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member with optional child usernames.
    pub fn insert(
        &mut self,
        member: Member,
        left: Option<&str>,
        right: Option<&str>,
    ) -> &mut Self {
        let record = MemberRecord {
            left: left.map(Username::from),
            right: right.map(Username::from),
            member,
        };
        self.records.insert(record.member.username.clone(), record);
        self
    }

    /// Make lookups of `username` fail with a server error.
    pub fn fail(&mut self, username: &str) -> &mut Self {
        self.failing.insert(Username::from(username));
        self
    }

    /// Total lookups served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of lookups that were outstanding at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Usernames in the order their lookups were issued.
    pub fn requested(&self) -> Vec<Username> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl NetworkFetcher for InMemoryNetwork {
    async fn fetch_member(&self, username: &Username) -> Result<MemberRecord, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut log) = self.log.lock() {
            log.push(username.clone());
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        YieldOnce::default().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.failing.contains(username) {
            return Err(HttpError::ServerError {
                status: 500,
                body: format!("lookup of {} failed", username),
            });
        }
        self.records
            .get(username)
            .cloned()
            .ok_or_else(|| HttpError::NotFound(format!("No member named {}", username)))
    }
}

/// Returns `Pending` once, then `Ready`.
#[derive(Default)]
struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
