use thiserror::Error;

pub type Result<T> = std::result::Result<T, DocumntrError>;

#[derive(Debug, Error)]
pub enum DocumntrError {
    #[error("no code provided")]
    EmptyCode,

    #[error("completion failed: {0}")]
    Completion(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DocumntrError {
    /// The message surfaced to API callers. Validation keeps its fixed text;
    /// everything else is reported with only the underlying cause.
    pub fn client_message(&self) -> String {
        match self {
            DocumntrError::EmptyCode => "Please enter some code to analyze.".to_string(),
            DocumntrError::Completion(cause) => format!("An error occurred: {cause}"),
            other => format!("An error occurred: {other}"),
        }
    }
}
