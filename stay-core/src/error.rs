use thiserror::Error;

#[derive(Error, Debug)]
pub enum StayError {
    /// Malformed feedback or query input; the write is rejected.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate feedback: {0}")]
    DuplicateFeedback(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Listing provider error: {0}")]
    Provider(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StayError {
    pub fn validation(msg: impl Into<String>) -> Self {
        StayError::Validation(msg.into())
    }

    /// True for errors caused by the caller's input rather than the backing store.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            StayError::Validation(_) | StayError::DuplicateFeedback(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StayError>;
