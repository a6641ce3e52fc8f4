use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog not found: {0}")]
    CatalogNotFound(String),

    #[error("Catalog already exists: {0}")]
    CatalogExists(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Invalid candidate {id}: {reason}")]
    InvalidCandidate { id: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn invalid_candidate(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidCandidate {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
