//! # HTTP Transport
//!
//! One place that talks to the backend.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Request Lifecycle                              │
//! │                                                                         │
//! │  build URL ──► X-Request-Id (uuid v4) ──► Authorization: Bearer <tok>   │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                                            send + read body             │
//! │                                                │                        │
//! │        ┌──────────────┬───────────────┬────────┴────────┐               │
//! │        ▼              ▼               ▼                 ▼               │
//! │      2xx            401             403              other              │
//! │   decode bare     logout +       Forbidden        Api { status,        │
//! │   or {"data"}    persist, then                      message }           │
//! │                  Unauthorized                                           │
//! │                                                                         │
//! │  GET only: Network / Timeout / Api errors are retried with             │
//! │  exponential backoff up to `read_retries` times. Writes never retry.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info_span, warn, Instrument};
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::SessionHandle;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

// =============================================================================
// Retry Policy
// =============================================================================

/// How failed reads are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ClientConfig) -> Self {
        RetryPolicy {
            max_retries: config.api.read_retries,
            initial_backoff: config.api.initial_backoff(),
            max_backoff: config.api.max_backoff(),
        }
    }

    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_backoff,
            max_interval: self.max_backoff,
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

// =============================================================================
// Response Bodies
// =============================================================================

/// Success bodies arrive either bare or as `{"data": ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<ErrorMessage>,
}

/// Validation failures come back as a list of messages.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

fn decode_body<T: DeserializeOwned>(text: &str) -> ClientResult<T> {
    let envelope: Envelope<T> = serde_json::from_str(text)?;
    Ok(envelope.into_inner())
}

fn error_message(text: &str) -> Option<String> {
    let body: ErrorBody = serde_json::from_str(text).ok()?;
    let message = match body.message? {
        ErrorMessage::One(message) => message,
        ErrorMessage::Many(messages) => messages.join("; "),
    };
    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}

// =============================================================================
// API Client
// =============================================================================

/// HTTP client for the Roda Já backend.
///
/// Cheap to clone; clones share the connection pool and the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionHandle,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: SessionHandle) -> ClientResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.api.timeout())
            .build()?;

        Ok(ApiClient {
            http,
            base_url: Url::parse(&config.api.base_url)?,
            session,
            retry: RetryPolicy::from_config(config),
        })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// GET with read retries.
    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        let mut backoff = self.retry.create_backoff();
        let mut attempt = 0u32;

        let text = loop {
            match self.send::<()>(Method::GET, segments, None).await {
                Ok(text) => break text,
                Err(e) if e.is_retryable_read() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = backoff.next_backoff().unwrap_or(self.retry.max_backoff);
                    warn!(
                        path = %segments.join("/"),
                        attempt,
                        ?delay,
                        error = %e,
                        "Read failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        };

        decode_body(&text)
    }

    pub(crate) async fn post<B, T>(&self, segments: &[&str], body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.send(Method::POST, segments, Some(body)).await?;
        decode_body(&text)
    }

    /// POST whose response body is not needed.
    pub(crate) async fn post_discard<B>(&self, segments: &[&str], body: &B) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, segments, Some(body)).await?;
        Ok(())
    }

    pub(crate) async fn patch<B, T>(&self, segments: &[&str], body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.send(Method::PATCH, segments, Some(body)).await?;
        decode_body(&text)
    }

    pub(crate) async fn delete(&self, segments: &[&str]) -> ClientResult<()> {
        self.send::<()>(Method::DELETE, segments, None).await?;
        Ok(())
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidUrl(format!("{} cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends one request and returns the raw success body.
    async fn send<B>(&self, method: Method, segments: &[&str], body: Option<&B>) -> ClientResult<String>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "api_request",
            method = %method,
            path = %url.path(),
            request_id = %request_id
        );

        async move {
            let mut request = self
                .http
                .request(method, url)
                .header(REQUEST_ID_HEADER, request_id.to_string());

            if let Some(token) = self.session.bearer_token().await {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;

            if status.is_success() {
                debug!(status = status.as_u16(), "Request succeeded");
                return Ok(text);
            }

            let message = error_message(&text);
            debug!(status = status.as_u16(), ?message, "Request failed");

            match status {
                StatusCode::UNAUTHORIZED => {
                    warn!("Received 401, clearing session");
                    if let Err(e) = self.session.logout().await {
                        error!(error = %e, "Failed to persist cleared session");
                    }
                    Err(ClientError::Unauthorized { message })
                }
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden { message }),
                _ => Err(ClientError::Api {
                    status: status.as_u16(),
                    message,
                }),
            }
        }
        .instrument(span)
        .await
    }
}
