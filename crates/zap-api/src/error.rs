use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {0}")]
    Status(reqwest::StatusCode),
}

pub type Result<T> = std::result::Result<T, ApiError>;
