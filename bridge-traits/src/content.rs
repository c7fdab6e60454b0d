//! Content API Abstractions
//!
//! Records and uploads as the CMS exposes them, plus the narrow capability
//! traits the naming core and the rename orchestrator consume. Each trait is
//! injected on its own so a caller only depends on what it uses.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// A content record with its raw field values keyed by field API key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    /// ID of the model (item type) this record belongs to, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model_id: None,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, api_key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(api_key.into(), value);
        self
    }

    pub fn field(&self, api_key: &str) -> Option<&Value> {
        self.fields.get(api_key)
    }
}

/// Sort order accepted by [`RecordLookup::list_records_by_model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrder {
    UpdatedAtDesc,
    UpdatedAtAsc,
    CreatedAtDesc,
}

impl RecordOrder {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            RecordOrder::UpdatedAtDesc => "_updated_at_DESC",
            RecordOrder::UpdatedAtAsc => "_updated_at_ASC",
            RecordOrder::CreatedAtDesc => "_created_at_DESC",
        }
    }
}

/// Metadata of a stored asset.
///
/// Created by the host storage layer. This workspace only ever rewrites
/// `basename`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadDescriptor {
    pub id: String,
    /// Filename without extension
    pub basename: String,
    /// Full filename as stored, extension included
    pub filename: String,
    /// File format as reported by the host (e.g. `jpg`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// MD5 hex digest of the binary content
    pub md5: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl UploadDescriptor {
    /// Extension without the dot: the declared format, else the one parsed
    /// from `filename`, else empty.
    pub fn extension(&self) -> String {
        if let Some(format) = self.format.as_deref().filter(|f| !f.is_empty()) {
            return format.to_string();
        }
        extension_from_filename(&self.filename)
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// Filename this upload would carry under `basename`.
    pub fn filename_with(&self, basename: &str) -> String {
        let ext = self.extension();
        if ext.is_empty() {
            basename.to_string()
        } else {
            format!("{}.{}", basename, ext)
        }
    }

    pub fn is_video(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("video"))
    }
}

/// First `.ext` run that ends the name or is followed by a query/fragment.
fn extension_from_filename(filename: &str) -> Option<&str> {
    for (dot, _) in filename.match_indices('.') {
        let rest = &filename[dot + 1..];
        let len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        if len == 0 {
            continue;
        }
        match rest[len..].chars().next() {
            None | Some('?') | Some('#') => return Some(&rest[..len]),
            _ => continue,
        }
    }
    None
}

/// Read access to content records.
///
/// Used by the naming core for linked tokens and by the template preview.
#[async_trait]
pub trait RecordLookup: Send + Sync {
    /// Fetch a record by ID. A record that does not exist is `Ok(None)`.
    async fn find_record(&self, id: &str) -> Result<Option<Record>>;

    /// Fetch up to `limit` records of a model in the given order.
    async fn list_records_by_model(
        &self,
        model_id: &str,
        limit: u32,
        order: RecordOrder,
    ) -> Result<Vec<Record>>;
}

/// Read access to upload metadata.
#[async_trait]
pub trait UploadCatalog: Send + Sync {
    /// Fetch metadata for the given uploads.
    ///
    /// The result order is not guaranteed to match `ids`.
    async fn list_uploads_by_ids(&self, ids: &[String]) -> Result<Vec<UploadDescriptor>>;
}

/// Write access to upload basenames.
#[async_trait]
pub trait UploadRenamer: Send + Sync {
    /// Rename a single upload and return its post-update metadata.
    async fn update_upload_basename(
        &self,
        id: &str,
        new_basename: &str,
    ) -> Result<UploadDescriptor>;
}
