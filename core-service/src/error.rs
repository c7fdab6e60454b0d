use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("No naming template configured for this field")]
    TemplateMissing,

    #[error("Configuration error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Naming error: {0}")]
    Naming(#[from] core_naming::NamingError),

    #[error("Sync error: {0}")]
    Sync(#[from] core_sync::SyncError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
