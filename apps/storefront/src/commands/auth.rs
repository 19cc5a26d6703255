//! # Auth Commands

use serde::Serialize;
use tracing::debug;

use roda_client::{ApiClient, SignUpRequest};
use roda_core::{AuthSession, Role, User};

use crate::error::Notice;

/// What the header shows about the current session. Tokens stay out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub role: Option<Role>,
    pub is_master: bool,
}

impl From<&AuthSession> for SessionView {
    fn from(session: &AuthSession) -> Self {
        SessionView {
            is_authenticated: session.is_authenticated,
            user: session.user.clone(),
            role: session.role(),
            is_master: session.is_master(),
        }
    }
}

pub async fn whoami(client: &ApiClient) -> SessionView {
    debug!("whoami command");
    SessionView::from(&client.session().current().await)
}

pub async fn sign_in(client: &ApiClient, email: &str, password: &str) -> Result<SessionView, Notice> {
    debug!(email, "sign_in command");
    client.auth().sign_in(email, password).await?;
    Ok(whoami(client).await)
}

pub async fn sign_up(client: &ApiClient, request: &SignUpRequest) -> Result<SessionView, Notice> {
    debug!(email = %request.email, "sign_up command");
    client.auth().sign_up(request).await?;
    Ok(whoami(client).await)
}

/// Local sign-out. Never contacts the server.
pub async fn sign_out(client: &ApiClient) -> Result<Notice, Notice> {
    debug!("sign_out command");
    client.auth().sign_out().await?;
    Ok(Notice::success("Signed out."))
}

pub async fn refresh_session(client: &ApiClient) -> Result<SessionView, Notice> {
    debug!("refresh_session command");
    client.auth().refresh_token().await?;
    Ok(whoami(client).await)
}

pub async fn forgot_password(client: &ApiClient, email: &str) -> Result<Notice, Notice> {
    client.auth().forgot_password(email).await?;
    Ok(Notice::success(
        "If the e-mail is registered, a reset link is on its way.",
    ))
}

pub async fn reset_password(client: &ApiClient, token: &str, password: &str) -> Result<Notice, Notice> {
    client.auth().reset_password(token, password).await?;
    Ok(Notice::success("Password changed. You can sign in now."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use roda_core::AuthTokens;

    #[test]
    fn test_session_view_hides_tokens() {
        let session = AuthSession::signed_in(
            User {
                id: "u-1".into(),
                name: "Ana".into(),
                email: "ana@example.com".into(),
                role: Role::Master,
                establishment_id: None,
            },
            AuthTokens {
                access_token: "secret-token".into(),
                refresh_token: "secret-refresh".into(),
            },
        );

        let view = SessionView::from(&session);
        assert!(view.is_master);

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"isAuthenticated\":true"));
    }
}
