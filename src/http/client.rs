//! Low-level HTTP client — `StorefrontHttp`.
//!
//! One method per API endpoint. Returns wire types (conversion to domain types
//! happens in the sub-clients). Every call is a single request: no retries and
//! no caching, so a tree assembled twice is fetched twice.

use crate::auth::wire::ProfileResponse;
use crate::domain::catalog::wire::{CategoryResponse, ListResponse, ProductResponse};
use crate::domain::network::wire::TreeNodeResponse;
use crate::error::HttpError;
use crate::shared::ProductId;

use async_lock::RwLock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Transport timeout applied to every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Low-level HTTP client for the storefront REST API.
pub struct StorefrontHttp {
    base_url: String,
    client: Client,
    /// Bearer token. NEVER exposed publicly.
    auth_token: Arc<RwLock<Option<String>>>,
}

impl StorefrontHttp {
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            auth_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Start with `token` already installed.
    pub(crate) fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = Arc::new(RwLock::new(token));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn set_auth_token(&self, token: Option<String>) {
        *self.auth_token.write().await = token;
    }

    pub(crate) async fn clear_auth_token(&self) {
        *self.auth_token.write().await = None;
    }

    pub(crate) async fn has_auth_token(&self) -> bool {
        self.auth_token.read().await.is_some()
    }

    // ── Accounts ─────────────────────────────────────────────────────────

    /// One node of the placement tree plus its child references.
    pub async fn get_tree_node(&self, username: &str) -> Result<TreeNodeResponse, HttpError> {
        let url = format!(
            "{}/accounts/tree/{}/",
            self.base_url,
            urlencoding::encode(username)
        );
        tracing::debug!(username, "Fetching tree node");
        self.get(&url).await
    }

    /// Profile of the member owning the current token.
    pub async fn get_profile(&self) -> Result<ProfileResponse, HttpError> {
        let url = format!("{}/accounts/profile/", self.base_url);
        self.get(&url).await
    }

    // ── Products ─────────────────────────────────────────────────────────

    /// Accepts both the bare-array and the paginated list shape.
    pub async fn get_products(&self) -> Result<ListResponse<ProductResponse>, HttpError> {
        let url = format!("{}/products/", self.base_url);
        self.get(&url).await
    }

    pub async fn get_product(&self, id: ProductId) -> Result<ProductResponse, HttpError> {
        let url = format!("{}/products/{}/", self.base_url, id);
        self.get(&url).await
    }

    pub async fn get_categories(&self) -> Result<ListResponse<CategoryResponse>, HttpError> {
        let url = format!("{}/products/categories/", self.base_url);
        self.get(&url).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        self.do_request(reqwest::Method::GET, url).await
    }

    async fn do_request<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        url: &str,
    ) -> Result<T, HttpError> {
        let mut req = self.client.request(method, url);

        if let Some(token) = self.auth_token.read().await.as_ref() {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Reqwest(e)
            }
        })?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<T>().await?;
            return Ok(parsed);
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            401 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(body_text)),
            429 => Err(HttpError::RateLimited),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

impl Clone for StorefrontHttp {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            auth_token: self.auth_token.clone(),
        }
    }
}

impl std::fmt::Debug for StorefrontHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontHttp")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
