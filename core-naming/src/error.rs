use thiserror::Error;

/// Failures of template evaluation.
///
/// Missing fields, unmatched locales and malformed tokens are not errors;
/// they resolve to an empty string. Only a failed record lookup surfaces.
#[derive(Error, Debug)]
pub enum NamingError {
    #[error("Record lookup failed for {record_id}: {source}")]
    Lookup {
        record_id: String,
        #[source]
        source: bridge_traits::error::BridgeError,
    },

    #[error("Failed to list sample records for model {model_id}: {source}")]
    SampleRecord {
        model_id: String,
        #[source]
        source: bridge_traits::error::BridgeError,
    },
}

pub type Result<T> = std::result::Result<T, NamingError>;
