use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Host error: {0}")]
    Host(#[from] BridgeError),

    #[error("Upload {id} basename mismatch even after update: {actual} does not match {requested}")]
    BasenameMismatch {
        id: String,
        requested: String,
        actual: String,
    },

    #[error("Upload {0} is not part of this gallery")]
    UnknownUpload(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
