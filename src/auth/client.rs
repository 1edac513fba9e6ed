//! Auth sub-client — token management, session validation, member profile.

use crate::auth::wire::ProfileResponse;
use crate::auth::{AuthCredentials, Profile};
use crate::client::StorefrontClient;
use crate::domain::pricing::PricingContext;
use crate::error::SdkError;
use crate::shared::MembershipStatus;

/// Sub-client for authentication state.
pub struct Auth<'a> {
    pub(crate) client: &'a StorefrontClient,
}

impl<'a> Auth<'a> {
    /// Install a token obtained from the login flow. Drops any cached profile.
    pub async fn set_credentials(&self, credentials: AuthCredentials) {
        let token = Some(credentials)
            .filter(|c| !c.is_blank())
            .map(AuthCredentials::into_token);
        self.client.http.set_auth_token(token).await;
        *self.client.profile.write().await = None;
    }

    /// Validate the current token and return the member profile.
    ///
    /// Calls `GET accounts/profile/`. On success the profile is cached; on
    /// failure (401, expired, no token) the cached profile is cleared and the
    /// error returned.
    pub async fn check_session(&self) -> Result<Profile, SdkError> {
        let resp: ProfileResponse = match self.client.http.get_profile().await {
            Ok(resp) => resp,
            Err(e) => {
                *self.client.profile.write().await = None;
                return Err(e.into());
            }
        };
        let profile = Profile::from(resp);
        tracing::debug!(username = %profile.username, status = %profile.status, "Session validated");
        *self.client.profile.write().await = Some(profile.clone());
        Ok(profile)
    }

    /// Cached profile, or [`check_session`](Self::check_session) when none is cached.
    pub async fn me(&self) -> Result<Profile, SdkError> {
        if let Some(profile) = self.profile().await {
            return Ok(profile);
        }
        self.check_session().await
    }

    /// Cached profile, if a session was validated.
    pub async fn profile(&self) -> Option<Profile> {
        self.client.profile.read().await.clone()
    }

    /// Forget the token and the cached profile. There is no server-side
    /// session to end.
    pub async fn logout(&self) {
        self.client.http.clear_auth_token().await;
        *self.client.profile.write().await = None;
    }

    /// Whether a token is installed. For a server-validated check, use
    /// `check_session()` instead.
    pub async fn is_authenticated(&self) -> bool {
        self.client.http.has_auth_token().await
    }

    /// Membership status of the cached profile; `inactive` without one.
    pub async fn membership(&self) -> MembershipStatus {
        self.client
            .profile
            .read()
            .await
            .as_ref()
            .map(|p| p.status)
            .unwrap_or_default()
    }

    pub async fn pricing_context(&self) -> PricingContext {
        PricingContext::new(self.membership().await)
    }
}
