use thiserror::Error;

/// Every failure the portal client can surface. Nothing here is fatal to the
/// process: each variant is local to one user action and recoverable by
/// retrying after a re-fetch.
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Your session has expired, please sign in again")]
    AuthExpired,

    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("The server reported an error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("The request timed out, please try again")]
    Timeout,

    #[error("Could not reach the server, check your connection")]
    Offline,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response from the server: {0}")]
    Decode(String),

    #[error("No patient identity is associated with this session")]
    IdentityUnresolved,

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<reqwest::Error> for PortalError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PortalError::Timeout
        } else if err.is_connect() {
            PortalError::Offline
        } else if err.is_decode() {
            PortalError::Decode(err.to_string())
        } else {
            PortalError::Network(err.to_string())
        }
    }
}
