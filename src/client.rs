//! High-level client — `StorefrontClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, shared session state, and accessor methods.

use crate::auth::{AuthCredentials, Profile};
use crate::domain::network::AssemblerConfig;
use crate::error::SdkError;
use crate::http::StorefrontHttp;
use crate::network::{ACCESS_TOKEN_ENV, API_URL_ENV, DEFAULT_API_URL};

use async_lock::RwLock;
use std::sync::Arc;

// Re-export sub-client types for convenience.
pub use crate::auth::client::Auth as AuthClient;
pub use crate::domain::catalog::client::Catalog as CatalogClient;
pub use crate::domain::network::client::Network as NetworkClient;

/// The primary entry point for the storefront SDK.
///
/// Provides nested sub-client accessors for each domain:
/// `client.network()`, `client.catalog()`, `client.auth()`.
pub struct StorefrontClient {
    pub(crate) http: StorefrontHttp,
    /// Profile of the signed-in member, filled by `auth().check_session()`.
    pub(crate) profile: Arc<RwLock<Option<Profile>>>,
    pub(crate) assembler_config: AssemblerConfig,
}

impl StorefrontClient {
    pub fn builder() -> StorefrontClientBuilder {
        StorefrontClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn network(&self) -> NetworkClient<'_> {
        NetworkClient { client: self }
    }

    pub fn catalog(&self) -> CatalogClient<'_> {
        CatalogClient { client: self }
    }

    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient { client: self }
    }

    /// The low-level HTTP client, e.g. to drive a [`TreeAssembler`](crate::domain::network::TreeAssembler) directly.
    pub fn http(&self) -> &StorefrontHttp {
        &self.http
    }

    pub fn assembler_config(&self) -> &AssemblerConfig {
        &self.assembler_config
    }
}

impl Clone for StorefrontClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            profile: self.profile.clone(),
            assembler_config: self.assembler_config.clone(),
        }
    }
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("http", &self.http)
            .field("assembler_config", &self.assembler_config)
            .finish_non_exhaustive()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct StorefrontClientBuilder {
    base_url: String,
    auth_credentials: Option<AuthCredentials>,
    assembler_config: AssemblerConfig,
}

impl Default for StorefrontClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            auth_credentials: None,
            assembler_config: AssemblerConfig::default(),
        }
    }
}

impl StorefrontClientBuilder {
    /// Defaults overridden by `NETSHOP_API_URL` and `NETSHOP_ACCESS_TOKEN`
    /// when they are set and non-empty.
    pub fn from_env() -> Self {
        let mut builder = Self::default();
        if let Some(url) = env_var(API_URL_ENV) {
            builder = builder.base_url(&url);
        }
        if let Some(token) = env_var(ACCESS_TOKEN_ENV) {
            builder = builder.auth(AuthCredentials::bearer(token));
        }
        builder
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Pre-set authentication credentials on construction.
    pub fn auth(mut self, credentials: AuthCredentials) -> Self {
        self.auth_credentials = Some(credentials);
        self
    }

    /// Maximum tree lookups in flight at once.
    pub fn max_concurrency(mut self, n: usize) -> Self {
        self.assembler_config.max_concurrency = n;
        self
    }

    /// Deepest tree level fetched (root = 0).
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.assembler_config.max_depth = Some(depth);
        self
    }

    pub fn build(self) -> Result<StorefrontClient, SdkError> {
        if self.base_url.trim().is_empty() {
            return Err(SdkError::Validation("base_url must not be empty".to_string()));
        }
        let token = self
            .auth_credentials
            .filter(|c| !c.is_blank())
            .map(AuthCredentials::into_token);
        Ok(StorefrontClient {
            http: StorefrontHttp::new(&self.base_url)?.with_auth_token(token),
            profile: Arc::new(RwLock::new(None)),
            assembler_config: self.assembler_config,
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = StorefrontClient::builder().build().unwrap();
        assert_eq!(client.http().base_url(), "http://127.0.0.1:8000/api");
        assert_eq!(client.assembler_config(), &AssemblerConfig::default());
    }

    #[test]
    fn test_builder_overrides() {
        let client = StorefrontClient::builder()
            .base_url("https://shop.example.com/api/")
            .max_concurrency(2)
            .max_depth(5)
            .auth(AuthCredentials::bearer("token"))
            .build()
            .unwrap();
        assert_eq!(client.http().base_url(), "https://shop.example.com/api");
        assert_eq!(client.assembler_config().max_concurrency, 2);
        assert_eq!(client.assembler_config().max_depth, Some(5));
        assert!(tokio_test::block_on(client.auth().is_authenticated()));
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let client = StorefrontClient::builder()
            .auth(AuthCredentials::bearer(""))
            .build()
            .unwrap();
        assert!(!tokio_test::block_on(client.auth().is_authenticated()));
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let err = StorefrontClient::builder().base_url(" ").build().unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
    }

    #[test]
    fn test_debug_hides_session() {
        let client = StorefrontClient::builder()
            .auth(AuthCredentials::bearer("secret-token"))
            .build()
            .unwrap();
        let printed = format!("{:?}", client);
        assert!(printed.starts_with("StorefrontClient"));
        assert!(printed.contains("127.0.0.1:8000"));
        assert!(!printed.contains("secret-token"));
    }
}
