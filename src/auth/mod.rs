//! Authentication state — credentials and the member profile.
//!
//! ## Security Model
//!
//! Login itself happens outside the SDK. The caller hands over the access
//! token it obtained; the SDK keeps it in a private field and injects it as an
//! `Authorization: Bearer <token>` header. The token is NEVER exposed via the
//! public API, and `Debug` output redacts it.
//!
//! ## Session Hydration
//!
//! Use `client.auth().check_session()` to validate the token and retrieve the
//! member [`Profile`]. The profile's membership status drives pricing through
//! `client.auth().pricing_context()`.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::shared::{MembershipStatus, Username};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Profile types
// ============================================================================

/// Account role. Anything the backend sends besides `admin` is a regular member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(other)]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The signed-in member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: Username,
    pub name: Option<String>,
    pub email: Option<String>,
    /// Code other members enter when registering under this member.
    pub referral_code: Option<String>,
    pub placement_code: Option<String>,
    pub status: MembershipStatus,
    pub role: Role,
    pub balance: Decimal,
    pub points: Decimal,
    pub left_count: u64,
    pub right_count: u64,
    pub star_level: Option<String>,
    pub profile_picture: Option<String>,
}

impl Profile {
    /// Name to greet the member with: the display name, else the username.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.username.as_str(),
        }
    }

    /// Members placed on both sides of this member.
    pub fn downline_count(&self) -> u64 {
        self.left_count + self.right_count
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Access token supplied by the caller. Never printed, never handed back.
#[derive(Clone)]
pub struct AuthCredentials {
    token: String,
}

impl AuthCredentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Blank tokens are treated as "no token".
    pub fn is_blank(&self) -> bool {
        self.token.trim().is_empty()
    }

    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    pub(crate) fn into_token(self) -> String {
        self.token
    }
}

impl std::fmt::Debug for AuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthCredentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        let admin: Role = serde_json::from_str(r#""admin""#).unwrap();
        assert!(admin.is_admin());
        let other: Role = serde_json::from_str(r#""member""#).unwrap();
        assert_eq!(other, Role::User);
    }

    #[test]
    fn test_credentials_debug_redacts_token() {
        let creds = AuthCredentials::bearer("eyJ.secret");
        assert!(!format!("{:?}", creds).contains("secret"));
        assert!(!creds.is_blank());
        assert!(AuthCredentials::bearer("  ").is_blank());
    }
}
