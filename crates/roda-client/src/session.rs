//! # Session Handle
//!
//! The live auth session shared by commands and the HTTP transport.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          SessionHandle                                  │
//! │                                                                         │
//! │   commands ──sign_in/logout──┐        ┌──401──── ApiClient              │
//! │                              ▼        ▼                                 │
//! │                  Arc<RwLock<AuthSession>>  ──every mutation──►  storage │
//! │                              │                  "auth-storage"          │
//! │                              └──bearer_token──► ApiClient               │
//! │                                  (falls back to storage when empty)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use roda_core::{AuthSession, AuthTokens, User, AUTH_STORAGE_KEY};

use crate::error::{ClientError, ClientResult};
use crate::storage::LocalStorage;

/// Cloneable handle to the one auth session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<RwLock<AuthSession>>,
    storage: Option<LocalStorage>,
    persist_order: Arc<Mutex<()>>,
}

impl SessionHandle {
    /// A session that is never persisted.
    pub fn in_memory(session: AuthSession) -> Self {
        SessionHandle {
            inner: Arc::new(RwLock::new(session)),
            storage: None,
            persist_order: Arc::new(Mutex::new(())),
        }
    }

    /// Restores the session from storage, once, at startup.
    ///
    /// A missing, unreadable or invalid snapshot yields the anonymous
    /// session; the reason is logged, never returned.
    pub fn rehydrate(storage: LocalStorage) -> Self {
        let raw = match storage.get(AUTH_STORAGE_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Could not read persisted session");
                None
            }
        };

        let (session, rejected) = AuthSession::rehydrate(raw.as_deref());
        if let Some(reason) = rejected {
            warn!(error = %reason, "Discarding persisted session");
        }

        SessionHandle {
            inner: Arc::new(RwLock::new(session)),
            storage: Some(storage),
            persist_order: Arc::new(Mutex::new(())),
        }
    }

    /// A copy of the current session.
    pub async fn current(&self) -> AuthSession {
        self.inner.read().await.clone()
    }

    /// Stores a freshly signed-in user and persists it.
    pub async fn sign_in(&self, user: User, tokens: AuthTokens) -> ClientResult<()> {
        info!(user_id = %user.id, role = ?user.role, "Signed in");
        self.update(|session| *session = AuthSession::signed_in(user, tokens))
            .await
    }

    /// Replaces the tokens after a refresh and persists them.
    pub async fn set_tokens(&self, tokens: AuthTokens) -> ClientResult<()> {
        self.update(|session| session.set_tokens(tokens)).await
    }

    /// Clears the session and persists the cleared state.
    pub async fn logout(&self) -> ClientResult<()> {
        self.update(|session| {
            if session.is_authenticated {
                info!("Signed out");
            }
            session.logout();
        })
        .await
    }

    /// Token for the `Authorization` header.
    ///
    /// In-memory first; when that is empty, whatever valid snapshot is in
    /// storage (another process may have signed in since startup).
    pub async fn bearer_token(&self) -> Option<String> {
        if let Some(token) = self.inner.read().await.bearer_token() {
            return Some(token.to_string());
        }

        let storage = self.storage.as_ref()?;
        let raw = storage.get(AUTH_STORAGE_KEY).ok().flatten()?;
        AuthSession::from_snapshot(&raw)
            .ok()
            .and_then(|s| s.bearer_token().map(str::to_string))
    }

    /// Applies a mutation, then writes the snapshot with the session lock
    /// released. `persist_order` keeps writes in mutation order.
    async fn update<F>(&self, mutate: F) -> ClientResult<()>
    where
        F: FnOnce(&mut AuthSession),
    {
        let _order = self.persist_order.lock().await;

        let snapshot = {
            let mut guard = self.inner.write().await;
            mutate(&mut guard);
            guard.to_snapshot()?
        };

        let Some(storage) = self.storage.clone() else {
            return Ok(());
        };
        tokio::task::spawn_blocking(move || storage.set(AUTH_STORAGE_KEY, &snapshot))
            .await
            .map_err(|e| ClientError::Storage(format!("Session write task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roda_core::Role;

    fn user() -> User {
        User {
            id: "u-1".into(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            role: Role::EstablishmentAdmin,
            establishment_id: Some("e-1".into()),
        }
    }

    fn tokens(access: &str) -> AuthTokens {
        AuthTokens {
            access_token: access.into(),
            refresh_token: "refresh".into(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_persists_and_rehydrates() {
        let dir = tempfile::tempdir().unwrap();
        let handle = SessionHandle::rehydrate(LocalStorage::new(dir.path()));
        assert!(!handle.current().await.is_authenticated);

        handle.sign_in(user(), tokens("abc")).await.unwrap();

        let restored = SessionHandle::rehydrate(LocalStorage::new(dir.path()));
        let session = restored.current().await;
        assert!(session.is_authenticated);
        assert!(session.can_manage_establishment("e-1"));
        assert_eq!(restored.bearer_token().await.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_logout_persists_cleared_state() {
        let dir = tempfile::tempdir().unwrap();
        let handle = SessionHandle::rehydrate(LocalStorage::new(dir.path()));
        handle.sign_in(user(), tokens("abc")).await.unwrap();
        handle.logout().await.unwrap();

        assert!(handle.bearer_token().await.is_none());

        let restored = SessionHandle::rehydrate(LocalStorage::new(dir.path()));
        assert_eq!(restored.current().await, AuthSession::anonymous());
    }

    #[tokio::test]
    async fn test_bearer_token_falls_back_to_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let handle = SessionHandle::rehydrate(storage.clone());

        // Written by someone else after this handle started.
        let other = AuthSession::signed_in(user(), tokens("from-disk"));
        storage
            .set(AUTH_STORAGE_KEY, &other.to_snapshot().unwrap())
            .unwrap();

        assert!(!handle.current().await.is_authenticated);
        assert_eq!(handle.bearer_token().await.as_deref(), Some("from-disk"));
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        storage.set(AUTH_STORAGE_KEY, "{garbage").unwrap();

        let handle = SessionHandle::rehydrate(storage);
        assert_eq!(handle.current().await, AuthSession::anonymous());
        assert!(handle.bearer_token().await.is_none());
    }

    #[tokio::test]
    async fn test_set_tokens() {
        let handle = SessionHandle::in_memory(AuthSession::anonymous());
        handle.sign_in(user(), tokens("old")).await.unwrap();
        handle.set_tokens(tokens("new")).await.unwrap();
        assert_eq!(handle.bearer_token().await.as_deref(), Some("new"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_persist_the_final_state() {
        let dir = tempfile::tempdir().unwrap();
        let handle = SessionHandle::rehydrate(LocalStorage::new(dir.path()));
        handle.sign_in(user(), tokens("t-0")).await.unwrap();

        let tasks: Vec<_> = (1..=16)
            .map(|n| {
                let handle = handle.clone();
                tokio::spawn(async move {
                    handle.set_tokens(tokens(&format!("t-{n}"))).await.unwrap();
                    handle.current().await
                })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap().is_authenticated);
        }

        let in_memory = handle.current().await;
        let restored = SessionHandle::rehydrate(LocalStorage::new(dir.path()));
        assert_eq!(restored.current().await, in_memory);
    }
}
