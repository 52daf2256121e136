//! Auth gateway - login and identity check

use async_trait::async_trait;
use reqwest::Client;
use shared::client::{AuthErrorBody, LoginRequest, LoginResponse, MeResponse};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Fallback when the server rejects a login without a message body.
const LOGIN_FALLBACK_MESSAGE: &str = "Authorization failed";

/// Any non-success identity check means the session is no longer valid.
const SESSION_INVALID_MESSAGE: &str = "Session is invalid";

/// Auth endpoint collaborator consumed by the session controller.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Authenticate and obtain tokens.
    ///
    /// On a non-success status the server's `message` is surfaced
    /// verbatim; a generic fallback is used when the body has none.
    async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse>;

    /// Check that `token` still identifies a user.
    async fn me(&self, token: &str) -> ClientResult<MeResponse>;
}

/// HTTP implementation of [`AuthApi`].
#[derive(Debug, Clone)]
pub struct HttpAuthGateway {
    client: Client,
    base_url: String,
}

impl HttpAuthGateway {
    /// Create a new auth gateway from configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AuthApi for HttpAuthGateway {
    async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        let url = format!("{}/auth/login", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body: AuthErrorBody = response.json().await.unwrap_or_default();
            let message = body
                .message
                .unwrap_or_else(|| LOGIN_FALLBACK_MESSAGE.to_string());
            tracing::debug!(status = %status, "Login rejected");
            return Err(ClientError::Rejected(message));
        }

        response.json().await.map_err(Into::into)
    }

    async fn me(&self, token: &str) -> ClientResult<MeResponse> {
        let url = format!("{}/auth/me", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Rejected(SESSION_INVALID_MESSAGE.to_string()));
        }

        response.json().await.map_err(Into::into)
    }
}
