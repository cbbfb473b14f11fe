#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Page not found (404): {0}")]
    NotFound(String),
    #[error("Server error ({status}) for {url}")]
    ServerError { status: u16, url: String },
    #[error("Unexpected HTTP status {status} for {url}")]
    Status { status: u16, url: String },
}
