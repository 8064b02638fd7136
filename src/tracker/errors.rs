use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Tracker base URL is invalid: {url}")]
    InvalidBaseUrl { url: String },
    #[error("Invalid rate limit configuration: {message}")]
    InvalidRateLimit { message: String },
    #[error("Tracker request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },
    #[error("Tracker authentication failed (HTTP {status})")]
    AuthenticationFailed { status: u16 },
    #[error("Tracker rejected query (HTTP {status}): {body}")]
    Status { status: u16, body: String },
    #[error("Invalid response from tracker: {message}")]
    InvalidResponse { message: String },
}

impl TrackerError {
    /// Classify a non-success HTTP response, keeping a short body excerpt
    pub fn from_status(status: u16, body: &str) -> Self {
        const EXCERPT_LEN: usize = 300;

        match status {
            401 | 403 => TrackerError::AuthenticationFailed { status },
            _ => TrackerError::Status {
                status,
                body: body.chars().take(EXCERPT_LEN).collect(),
            },
        }
    }
}
