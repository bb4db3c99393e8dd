pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("unexpected response shape: {0}")]
    UnexpectedResponse(&'static str),
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn selection(message: impl Into<String>) -> Self {
        Self::InvalidSelection(message.into())
    }
}
