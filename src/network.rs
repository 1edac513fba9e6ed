//! Network URL constants and storage keys for the NetShop SDK.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

/// Environment variable overriding the API base URL in
/// [`StorefrontClientBuilder::from_env`](crate::client::StorefrontClientBuilder::from_env).
pub const API_URL_ENV: &str = "NETSHOP_API_URL";

/// Environment variable carrying a pre-issued access token.
pub const ACCESS_TOKEN_ENV: &str = "NETSHOP_ACCESS_TOKEN";

/// Durable storage key holding the JSON-encoded cart.
pub const CART_STORAGE_KEY: &str = "cart";
