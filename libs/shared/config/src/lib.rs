use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl PortalConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("PORTAL_API_URL")
                .unwrap_or_else(|_| {
                    warn!("PORTAL_API_URL not set, using empty value");
                    String::new()
                }),
            request_timeout_secs: env::var("PORTAL_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(10),
        };

        if !config.is_configured() {
            warn!("Portal client not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
    }
}
