use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::PortalConfig;
use shared_models::{AuthSession, PortalError};

/// REST gateway to the portal backend. Owns the HTTP client and the session
/// context; every request carries the session's bearer token.
///
/// The backend is the sole authority on schedule and booking state. Anything
/// this client fetches is a snapshot that can go stale the moment another
/// user books; consumers re-fetch after state-changing operations instead of
/// patching local copies.
pub struct PortalClient {
    client: Client,
    base_url: String,
    auth_header: HeaderValue,
    session: AuthSession,
}

impl PortalClient {
    pub fn new(config: &PortalConfig, session: AuthSession) -> Result<Self, PortalError> {
        let auth_header = HeaderValue::from_str(&format!("Bearer {}", session.bearer_token))
            .map_err(|_| {
                PortalError::ValidationError("bearer token contains invalid characters".to_string())
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| PortalError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_header,
            session,
        })
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, self.auth_header.clone());
        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, PortalError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut req = self.client.request(method, &url).headers(self.headers());

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, message);

            return Err(match status {
                StatusCode::UNAUTHORIZED => PortalError::AuthExpired,
                StatusCode::FORBIDDEN => PortalError::Forbidden,
                StatusCode::NOT_FOUND => PortalError::NotFound(message),
                _ => PortalError::Backend {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PortalError::Decode(e.to_string()))
    }
}
