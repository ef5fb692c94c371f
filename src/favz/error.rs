use thiserror::Error;

#[derive(Error, Debug)]
pub enum FavzError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage quota exceeded: need {needed} bytes, limit is {limit}")]
    QuotaExceeded { needed: u64, limit: u64 },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl FavzError {
    pub fn is_quota_exceeded(&self) -> bool {
        match self {
            FavzError::QuotaExceeded { .. } => true,
            FavzError::Io(e) => e.kind() == std::io::ErrorKind::StorageFull,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, FavzError>;
