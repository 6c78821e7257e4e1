use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request failed with {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("invalid json payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AppError {
    pub fn transport(err: impl std::error::Error) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err)
    }
}
