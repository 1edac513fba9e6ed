//! Tree view state — current root, assembled tree, metrics, zoom, hover.
//!
//! The app owns a `TreeView` (one per tree screen). Loading is split into
//! [`TreeView::begin`] / [`TreeAssembler::assemble_with_token`] /
//! [`TreeView::finish`] so a load can be superseded while in flight: beginning
//! a new load cancels the previous ticket, and a result that arrives for a
//! superseded ticket is discarded instead of overwriting newer state.

use super::assembler::{AssemblyToken, TreeAssembler};
use super::fetcher::NetworkFetcher;
use super::metrics::TreeMetrics;
use super::render::{self, HoverState, Point, RenderScene, Zoom};
use super::{NetworkTree, NodeId};
use crate::error::NetworkError;
use crate::shared::Username;

/// Handle for one in-flight load.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    pub username: Username,
    generation: u64,
    token: AssemblyToken,
}

impl LoadTicket {
    pub fn token(&self) -> &AssemblyToken {
        &self.token
    }
}

/// What happened to a finished load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The tree was replaced.
    Loaded(TreeMetrics),
    /// The load failed; the view shows the error message and no tree.
    Failed(NetworkError),
    /// A newer load (or unmount) superseded this one; nothing changed.
    Stale,
}

#[derive(Debug, Default)]
pub struct TreeView {
    root: Option<Username>,
    tree: Option<NetworkTree>,
    metrics: TreeMetrics,
    zoom: Zoom,
    hover: HoverState,
    error: Option<String>,
    generation: u64,
    active: Option<AssemblyToken>,
}

impl TreeView {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Loading ──────────────────────────────────────────────────────────

    /// Start loading the tree rooted at `username`, superseding any load in flight.
    pub fn begin(&mut self, username: impl Into<Username>) -> LoadTicket {
        if let Some(prev) = self.active.take() {
            prev.cancel();
        }
        self.generation += 1;
        let token = AssemblyToken::new();
        self.active = Some(token.clone());
        LoadTicket {
            username: username.into(),
            generation: self.generation,
            token,
        }
    }

    /// Apply the result of a load started with [`begin`](Self::begin).
    pub fn finish(
        &mut self,
        ticket: LoadTicket,
        result: Result<NetworkTree, NetworkError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation || ticket.token.is_cancelled() {
            tracing::debug!(username = %ticket.username, "Discarding stale tree load");
            return LoadOutcome::Stale;
        }
        self.active = None;

        match result {
            Ok(tree) => {
                let metrics = TreeMetrics::of(&tree);
                self.hover = HoverState::for_tree(&tree);
                self.root = Some(ticket.username);
                self.tree = Some(tree);
                self.metrics = metrics;
                self.error = None;
                LoadOutcome::Loaded(metrics)
            }
            Err(NetworkError::Cancelled { .. }) => LoadOutcome::Stale,
            Err(e) => {
                self.tree = None;
                self.metrics = TreeMetrics::default();
                self.hover = HoverState::new();
                self.error = Some(e.user_message().to_string());
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Load the tree rooted at `username` and replace the current one.
    pub async fn load<F: NetworkFetcher>(
        &mut self,
        assembler: &TreeAssembler<F>,
        username: impl Into<Username>,
    ) -> LoadOutcome {
        let ticket = self.begin(username);
        let result = assembler
            .assemble_with_token(&ticket.username, ticket.token())
            .await;
        self.finish(ticket, result)
    }

    /// Navigate to a member: re-assemble with `username` as the new root.
    pub async fn reroot<F: NetworkFetcher>(
        &mut self,
        assembler: &TreeAssembler<F>,
        username: &Username,
    ) -> LoadOutcome {
        self.load(assembler, username.clone()).await
    }

    /// Re-assemble the current root from scratch.
    pub async fn refresh<F: NetworkFetcher>(&mut self, assembler: &TreeAssembler<F>) -> LoadOutcome {
        match self.root.clone() {
            Some(root) => self.load(assembler, root).await,
            None => {
                self.error = Some(NetworkError::EmptyUsername.user_message().to_string());
                LoadOutcome::Failed(NetworkError::EmptyUsername)
            }
        }
    }

    /// Re-root on the member under `point`, if any.
    pub async fn click<F: NetworkFetcher>(
        &mut self,
        assembler: &TreeAssembler<F>,
        point: Point,
    ) -> Option<LoadOutcome> {
        let target = self.member_at(point)?;
        Some(self.reroot(assembler, &target).await)
    }

    /// Cancel whatever is in flight; later results are discarded.
    pub fn unmount(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
        }
        self.generation += 1;
    }

    pub fn is_loading(&self) -> bool {
        self.active.is_some()
    }

    // ── Zoom & hover ─────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) -> Zoom {
        self.zoom = self.zoom.zoom_in();
        self.zoom
    }

    pub fn zoom_out(&mut self) -> Zoom {
        self.zoom = self.zoom.zoom_out();
        self.zoom
    }

    pub fn reset_zoom(&mut self) -> Zoom {
        self.zoom = self.zoom.reset();
        self.zoom
    }

    /// Returns `false` when no tree is loaded or `node` is not in it.
    pub fn hover_enter(&mut self, node: NodeId) -> bool {
        self.tree.is_some() && self.hover.enter(node)
    }

    pub fn hover_leave(&mut self, node: NodeId) {
        self.hover.leave(node);
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn root(&self) -> Option<&Username> {
        self.root.as_ref()
    }

    pub fn tree(&self) -> Option<&NetworkTree> {
        self.tree.as_ref()
    }

    pub fn metrics(&self) -> TreeMetrics {
        self.metrics
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    /// User-facing message of the last failed load.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Scene for the current tree at the current zoom and hover state.
    pub fn scene(&self) -> Option<RenderScene> {
        self.tree
            .as_ref()
            .map(|tree| render::render(tree, self.zoom, &self.hover))
    }

    /// Username of the member drawn under `point`.
    pub fn member_at(&self, point: Point) -> Option<Username> {
        let scene = self.scene()?;
        scene.hit_test(point).map(|m| m.username.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::network::fetcher::InMemoryNetwork;
    use crate::domain::network::test_support::member;
    use crate::shared::MembershipStatus::{Active, Inactive};

    fn assembler() -> TreeAssembler<InMemoryNetwork> {
        let mut net = InMemoryNetwork::new();
        net.insert(member("root", Active), Some("a"), Some("b"))
            .insert(member("a", Active), Some("c"), None)
            .insert(member("b", Inactive), None, None)
            .insert(member("c", Inactive), None, None);
        TreeAssembler::new(net)
    }

    #[tokio::test]
    async fn test_load_sets_tree_and_metrics() {
        let asm = assembler();
        let mut view = TreeView::new();
        let outcome = view.load(&asm, "root").await;
        assert_eq!(
            outcome,
            LoadOutcome::Loaded(TreeMetrics {
                member_count: 4,
                depth_estimate: 3
            })
        );
        assert_eq!(view.root().unwrap().as_str(), "root");
        assert!(view.error().is_none());
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn test_failed_root_clears_tree() {
        let asm = assembler();
        let mut view = TreeView::new();
        view.load(&asm, "root").await;
        let outcome = view.load(&asm, "nobody").await;
        assert!(matches!(outcome, LoadOutcome::Failed(NetworkError::MemberNotFound { .. })));
        assert!(view.tree().is_none());
        assert_eq!(view.metrics().member_count, 0);
        assert_eq!(view.error(), Some("User not found!"));
    }

    #[tokio::test]
    async fn test_blank_search_reports_message() {
        let asm = assembler();
        let mut view = TreeView::new();
        let outcome = view.load(&asm, "").await;
        assert_eq!(outcome, LoadOutcome::Failed(NetworkError::EmptyUsername));
        assert_eq!(view.error(), Some("Please enter a username."));
    }

    #[tokio::test]
    async fn test_reroot_replaces_tree() {
        let asm = assembler();
        let mut view = TreeView::new();
        view.load(&asm, "root").await;
        let outcome = view.reroot(&asm, &Username::from("a")).await;
        assert!(matches!(outcome, LoadOutcome::Loaded(m) if m.member_count == 2));
        assert_eq!(view.tree().unwrap().root_member().username.as_str(), "a");
    }

    #[tokio::test]
    async fn test_click_reroots_on_hit() {
        let asm = assembler();
        let mut view = TreeView::new();
        view.load(&asm, "root").await;
        let scene = view.scene().unwrap();
        let a = view.tree().unwrap().find(&Username::from("a")).unwrap();
        let at = scene.marker(a).unwrap().center;

        let outcome = view.click(&asm, at).await.unwrap();
        assert!(matches!(outcome, LoadOutcome::Loaded(_)));
        assert_eq!(view.root().unwrap().as_str(), "a");

        assert!(view.click(&asm, Point::new(-1000.0, -1000.0)).await.is_none());
    }

    #[tokio::test]
    async fn test_superseded_load_is_discarded() {
        let asm = assembler();
        let mut view = TreeView::new();

        let first = view.begin("root");
        let second = view.begin("a");
        assert!(first.token().is_cancelled());

        // The first run was already resolved before being superseded.
        let stale = asm.assemble(&first.username).await;
        assert_eq!(view.finish(first, stale), LoadOutcome::Stale);
        assert!(view.tree().is_none());

        let fresh = asm
            .assemble_with_token(&second.username, second.token())
            .await;
        assert!(matches!(view.finish(second, fresh), LoadOutcome::Loaded(_)));
        assert_eq!(view.root().unwrap().as_str(), "a");
    }

    #[tokio::test]
    async fn test_unmount_discards_in_flight() {
        let asm = assembler();
        let mut view = TreeView::new();
        let ticket = view.begin("root");
        view.unmount();
        let result = asm
            .assemble_with_token(&ticket.username, ticket.token())
            .await;
        assert!(matches!(result, Err(NetworkError::Cancelled { .. })));
        assert_eq!(view.finish(ticket, result), LoadOutcome::Stale);
    }

    #[tokio::test]
    async fn test_refresh_refetches_current_root() {
        let asm = assembler();
        let mut view = TreeView::new();
        assert!(matches!(view.refresh(&asm).await, LoadOutcome::Failed(_)));
        view.load(&asm, "root").await;
        let before = asm.fetcher().calls();
        view.refresh(&asm).await;
        assert_eq!(asm.fetcher().calls(), before + 4);
    }

    #[tokio::test]
    async fn test_zoom_and_hover_flow_into_scene() {
        let asm = assembler();
        let mut view = TreeView::new();
        view.load(&asm, "root").await;
        assert_eq!(view.zoom_out().percent(), 90);
        assert_eq!(view.zoom_in().percent(), 100);
        view.zoom_in();
        assert_eq!(view.reset_zoom().percent(), 100);

        view.hover_enter(0);
        view.hover_enter(2);
        let scene = view.scene().unwrap();
        assert_eq!(scene.tooltips.len(), 2);

        view.hover_leave(0);
        assert_eq!(view.scene().unwrap().tooltips.len(), 1);

        view.reroot(&asm, &Username::from("a")).await;
        assert!(view.scene().unwrap().tooltips.is_empty());
    }

    #[tokio::test]
    async fn test_hover_requires_loaded_tree() {
        let mut view = TreeView::new();
        assert!(!view.hover_enter(0));
        assert!(view.hover().hovered().next().is_none());

        let asm = assembler();
        view.load(&asm, "root").await;
        assert!(view.hover_enter(3));
        assert!(!view.hover_enter(4));
        assert!(!view.hover_enter(usize::MAX));

        view.load(&asm, "nobody").await;
        assert!(!view.hover_enter(0));
    }
}
