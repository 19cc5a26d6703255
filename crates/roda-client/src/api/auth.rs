//! # Auth Endpoints
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /establishment/sign-up          → AuthResponse → session          │
//! │  POST /establishment/sign-in          → AuthResponse → session          │
//! │  POST /establishment/forgot-password  → (body ignored)                  │
//! │  POST /establishment/reset-password   → (body ignored)                  │
//! │  POST /establishment/refresh-token    → AuthTokens   → session          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sign-out is local only: it clears and persists the session.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use roda_core::validation::{require, validate_email, validate_password};
use roda_core::{AuthTokens, User};

use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    /// Establishment name.
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshTokenRequest<'a> {
    refresh_token: &'a str,
}

/// Body returned by sign-in and sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthResponse {
    fn tokens(&self) -> AuthTokens {
        AuthTokens {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        AuthApi { client }
    }

    /// Registers an establishment and signs its admin in.
    pub async fn sign_up(&self, request: &SignUpRequest) -> ClientResult<User> {
        require("name", &request.name)?;
        validate_email(&request.email)?;
        require("phone", &request.phone)?;
        validate_password(&request.password)?;

        debug!(email = %request.email, "Signing up");
        let response: AuthResponse = self
            .client
            .post(&["establishment", "sign-up"], request)
            .await?;
        self.store(response).await
    }

    /// Signs in and stores the session.
    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<User> {
        validate_email(email)?;
        require("password", password)?;

        debug!(email, "Signing in");
        let request = SignInRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self
            .client
            .post(&["establishment", "sign-in"], &request)
            .await?;
        self.store(response).await
    }

    /// Asks the backend to mail a reset link.
    pub async fn forgot_password(&self, email: &str) -> ClientResult<()> {
        validate_email(email)?;
        let email = email.trim();
        self.client
            .post_discard(&["establishment", "forgot-password"], &ForgotPasswordRequest { email })
            .await?;
        info!(email, "Password reset requested");
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> ClientResult<()> {
        let token = require("token", token)?;
        validate_password(password)?;

        let request = ResetPasswordRequest {
            token: token.to_string(),
            password: password.to_string(),
        };
        self.client
            .post_discard(&["establishment", "reset-password"], &request)
            .await?;
        info!("Password reset");
        Ok(())
    }

    /// Exchanges the refresh token for a new pair and stores it.
    pub async fn refresh_token(&self) -> ClientResult<AuthTokens> {
        let session = self.client.session().current().await;
        let refresh_token = session
            .refresh_token
            .filter(|t| !t.is_empty() && session.is_authenticated)
            .ok_or(ClientError::NotSignedIn)?;

        let tokens: AuthTokens = self
            .client
            .post(
                &["establishment", "refresh-token"],
                &RefreshTokenRequest {
                    refresh_token: &refresh_token,
                },
            )
            .await?;

        self.client.session().set_tokens(tokens.clone()).await?;
        debug!("Tokens refreshed");
        Ok(tokens)
    }

    /// Clears the local session. No server call.
    pub async fn sign_out(&self) -> ClientResult<()> {
        self.client.session().logout().await
    }

    async fn store(&self, response: AuthResponse) -> ClientResult<User> {
        let tokens = response.tokens();
        self.client
            .session()
            .sign_in(response.user.clone(), tokens)
            .await?;
        Ok(response.user)
    }
}
