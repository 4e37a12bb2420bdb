use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskboardError {
    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TaskboardError {
    /// Message shown in the shared error slot.
    ///
    /// Remote failures carry the backend's own wording, so the variant prefix
    /// is dropped for them.
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
