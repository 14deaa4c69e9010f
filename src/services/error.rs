//! Error types for the remote services

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Transport failure or timeout
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("API returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// Body parsed but lacked what we need
    #[error("response missing {0}")]
    MissingField(&'static str),
}
