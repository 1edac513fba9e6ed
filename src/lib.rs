//! # NetShop SDK
//!
//! Client SDK for the NetShop storefront: a product catalog with
//! membership-tier pricing, a persisted cart, and the binary placement
//! network that members build by referring others.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Shared newtypes and domain slices (network tree, pricing,
//!    catalog, cart). Always available, no I/O besides cart storage.
//! 2. **Auth** — Caller-supplied credentials and the member profile
//! 3. **HTTP API** — `StorefrontHttp`, one method per endpoint
//! 4. **High-Level Client** — `StorefrontClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use netshop_sdk::prelude::*;
//!
//! let client = StorefrontClient::builder()
//!     .base_url("http://127.0.0.1:8000/api")
//!     .auth(AuthCredentials::bearer(token))
//!     .build()?;
//!
//! let me = client.auth().check_session().await?;
//! let mut view = TreeView::new();
//! view.load(&client.network().assembler(), me.username.clone()).await;
//! let svg = view.scene().map(|scene| scene.to_svg().to_string());
//!
//! let pricing = client.auth().pricing_context().await;
//! let mut cart = CartStore::load(FileStorage::new("./storage"), pricing)?;
//! cart.add(&client.catalog().product(ProductId(7)).await?)?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants and storage keys.
pub mod network;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Authentication: credentials, session validation, member profile.
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `StorefrontClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{format_taka, pv_badge, MembershipStatus, ProductId, Username};

    // Domain types — network
    pub use crate::domain::network::render::Point;
    pub use crate::domain::network::{
        AssemblerConfig, AssemblyToken, HoverState, LoadOutcome, Member, MemberRecord,
        NetworkFetcher, NetworkTree, NodeId, RenderScene, Side, TreeAssembler, TreeMetrics,
        TreeNode, TreeView, Truncation, TruncationReason, Zoom,
    };

    // Domain types — pricing, catalog, cart
    pub use crate::domain::cart::{
        CartLine, CartStorage, CartStore, CheckoutSummary, FileStorage, MemoryStorage, OrderItem,
    };
    pub use crate::domain::catalog::{CatalogFilter, Category, Product};
    pub use crate::domain::pricing::{compute_pricing, PricingContext, PricingResult};

    // Errors
    pub use crate::error::{HttpError, NetworkError, SdkError, StorageError};

    // Network
    pub use crate::network::{CART_STORAGE_KEY, DEFAULT_API_URL};

    // Auth + profile types
    pub use crate::auth::{AuthCredentials, Profile, Role};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        AuthClient, CatalogClient, NetworkClient, StorefrontClient, StorefrontClientBuilder,
    };
    #[cfg(feature = "http")]
    pub use crate::http::StorefrontHttp;
}
