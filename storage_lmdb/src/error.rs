use meridian_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LmdbError> for StoreError {
    fn from(err: LmdbError) -> Self {
        match err {
            LmdbError::NotFound(what) => StoreError::NotFound(what),
            LmdbError::Encoding(msg) => StoreError::Encoding(msg),
            other => StoreError::Backend(other.to_string()),
        }
    }
}
