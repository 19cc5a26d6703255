//! # Auth Session
//!
//! Who is signed in, with which role and tokens.
//!
//! ## Persistence Envelope
//! The session is stored under [`crate::AUTH_STORAGE_KEY`] as:
//! ```json
//! {
//!   "state": {
//!     "user": { "id": "u-1", "name": "Ana", "email": "...", "role": "master" },
//!     "accessToken": "...",
//!     "refreshToken": "...",
//!     "isAuthenticated": true
//!   },
//!   "version": 0
//! }
//! ```
//!
//! ## Rehydration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  startup ──► raw snapshot? ──no──────────────────────► anonymous        │
//! │                   │ yes                                                 │
//! │                   ▼                                                     │
//! │              parse JSON ──fail──────────────────────► anonymous         │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │              version known? ──no────────────────────► anonymous         │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │              authenticated ⇒ user + token present? ──no──► anonymous    │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │              restored session                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Role, User};
use crate::AUTH_SNAPSHOT_VERSION;

/// Access/refresh token pair issued by sign-in and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// The auth store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl AuthSession {
    /// The signed-out session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session for a freshly signed-in user.
    pub fn signed_in(user: User, tokens: AuthTokens) -> Self {
        AuthSession {
            user: Some(user),
            access_token: Some(tokens.access_token),
            refresh_token: Some(tokens.refresh_token),
            is_authenticated: true,
        }
    }

    /// Replaces both tokens after a refresh. The user is unchanged.
    pub fn set_tokens(&mut self, tokens: AuthTokens) {
        self.access_token = Some(tokens.access_token);
        self.refresh_token = Some(tokens.refresh_token);
    }

    /// Clears every field. Makes no server call.
    pub fn logout(&mut self) {
        *self = AuthSession::anonymous();
    }

    // =========================================================================
    // Predicates
    // =========================================================================

    /// Role of the signed-in user.
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Whether the signed-in user is a platform operator.
    pub fn is_master(&self) -> bool {
        self.is_authenticated && self.role() == Some(Role::Master)
    }

    /// Whether the signed-in user may manage the given establishment.
    ///
    /// Masters manage every establishment; an establishment admin manages
    /// only its own; plain users manage none.
    pub fn can_manage_establishment(&self, establishment_id: &str) -> bool {
        if !self.is_authenticated {
            return false;
        }
        match &self.user {
            Some(user) => match user.role {
                Role::Master => true,
                Role::EstablishmentAdmin => {
                    user.establishment_id.as_deref() == Some(establishment_id)
                }
                Role::User => false,
            },
            None => false,
        }
    }

    /// The bearer token to send, if signed in.
    pub fn bearer_token(&self) -> Option<&str> {
        if !self.is_authenticated {
            return None;
        }
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    /// Serializes the session into its persisted envelope.
    pub fn to_snapshot(&self) -> CoreResult<String> {
        let envelope = PersistedAuth {
            state: self.clone(),
            version: AUTH_SNAPSHOT_VERSION,
        };
        serde_json::to_string(&envelope).map_err(|e| CoreError::InvalidSnapshot(e.to_string()))
    }

    /// Parses and validates a persisted envelope.
    pub fn from_snapshot(raw: &str) -> CoreResult<Self> {
        let envelope: PersistedAuth =
            serde_json::from_str(raw).map_err(|e| CoreError::InvalidSnapshot(e.to_string()))?;

        if envelope.version != AUTH_SNAPSHOT_VERSION {
            return Err(CoreError::UnsupportedSnapshotVersion(envelope.version));
        }

        let session = envelope.state;
        if session.is_authenticated {
            if session.user.is_none() {
                return Err(CoreError::InconsistentSnapshot {
                    reason: "authenticated without a user".to_string(),
                });
            }
            if session.bearer_token().is_none() {
                return Err(CoreError::InconsistentSnapshot {
                    reason: "authenticated without an access token".to_string(),
                });
            }
        }

        Ok(session)
    }

    /// Load snapshot, validate, else default.
    ///
    /// Runs once at startup. Returns the reason a snapshot was rejected so
    /// the caller can log it; the session is anonymous in that case.
    pub fn rehydrate(raw: Option<&str>) -> (Self, Option<CoreError>) {
        match raw {
            None => (AuthSession::anonymous(), None),
            Some(raw) => match AuthSession::from_snapshot(raw) {
                Ok(session) => (session, None),
                Err(e) => (AuthSession::anonymous(), Some(e)),
            },
        }
    }
}

/// The persisted envelope around an [`AuthSession`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PersistedAuth {
    pub state: AuthSession,
    #[serde(default)]
    pub version: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, establishment_id: Option<&str>) -> User {
        User {
            id: "u-1".into(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            role,
            establishment_id: establishment_id.map(str::to_string),
        }
    }

    fn tokens() -> AuthTokens {
        AuthTokens {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
        }
    }

    #[test]
    fn test_role_predicates() {
        let master = AuthSession::signed_in(user(Role::Master, None), tokens());
        assert!(master.is_master());
        assert!(master.can_manage_establishment("any"));

        let admin = AuthSession::signed_in(user(Role::EstablishmentAdmin, Some("e-1")), tokens());
        assert!(!admin.is_master());
        assert!(admin.can_manage_establishment("e-1"));
        assert!(!admin.can_manage_establishment("e-2"));

        let customer = AuthSession::signed_in(user(Role::User, None), tokens());
        assert!(!customer.can_manage_establishment("e-1"));

        assert!(!AuthSession::anonymous().can_manage_establishment("e-1"));
    }

    #[test]
    fn test_logout_clears_everything() {
        let mut session = AuthSession::signed_in(user(Role::Master, None), tokens());
        session.logout();

        assert_eq!(session, AuthSession::anonymous());
        assert!(session.bearer_token().is_none());
        assert!(!session.is_master());
    }

    #[test]
    fn test_snapshot_roundtrip_uses_wire_names() {
        let session = AuthSession::signed_in(user(Role::EstablishmentAdmin, Some("e-9")), tokens());
        let raw = session.to_snapshot().unwrap();

        assert!(raw.contains("\"accessToken\":\"access\""));
        assert!(raw.contains("\"isAuthenticated\":true"));
        assert!(raw.contains("\"version\":0"));

        let (restored, err) = AuthSession::rehydrate(Some(&raw));
        assert!(err.is_none());
        assert_eq!(restored, session);
    }

    #[test]
    fn test_rehydrate_falls_back_to_anonymous() {
        let (s, err) = AuthSession::rehydrate(None);
        assert_eq!(s, AuthSession::anonymous());
        assert!(err.is_none());

        let (s, err) = AuthSession::rehydrate(Some("{not json"));
        assert_eq!(s, AuthSession::anonymous());
        assert!(matches!(err, Some(CoreError::InvalidSnapshot(_))));

        let future = r#"{"state":{"isAuthenticated":false},"version":7}"#;
        let (_, err) = AuthSession::rehydrate(Some(future));
        assert!(matches!(err, Some(CoreError::UnsupportedSnapshotVersion(7))));

        let tokenless = r#"{"state":{"user":{"id":"u","name":"n","email":"e","role":"user"},"isAuthenticated":true},"version":0}"#;
        let (s, err) = AuthSession::rehydrate(Some(tokenless));
        assert!(!s.is_authenticated);
        assert!(matches!(err, Some(CoreError::InconsistentSnapshot { .. })));
    }

    #[test]
    fn test_set_tokens_keeps_user() {
        let mut session = AuthSession::signed_in(user(Role::User, None), tokens());
        session.set_tokens(AuthTokens {
            access_token: "new-access".into(),
            refresh_token: "new-refresh".into(),
        });

        assert_eq!(session.bearer_token(), Some("new-access"));
        assert_eq!(session.user.as_ref().map(|u| u.id.as_str()), Some("u-1"));
    }
}
