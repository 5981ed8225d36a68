use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Resource `{name}` unavailable: {reason}")]
    ResourceUnavailable { name: String, reason: String },

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OpenCV Error: {0}")]
    OpenCv(#[from] opencv::Error),
}

impl Error {
    pub(crate) fn invalid<S: ToString>(msg: S) -> Self {
        Error::InvalidInput(msg.to_string())
    }
}
