//! Content Management API payload types
//!
//! JSON:API documents as the CMA sends and accepts them with
//! `X-Api-Version: 3`.

use bridge_traits::content::{Record, UploadDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level JSON:API document
#[derive(Debug, Deserialize, Serialize)]
pub struct Document<T> {
    pub data: T,
}

/// Resource identifier (`{"id": "...", "type": "..."}`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResourceRef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Relationship {
    pub data: Option<ResourceRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemRelationships {
    #[serde(default)]
    pub item_type: Relationship,
}

/// Item (record) resource
///
/// `attributes` holds the field values keyed by field api key.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemResource {
    pub id: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: ItemRelationships,
}

impl From<ItemResource> for Record {
    fn from(item: ItemResource) -> Self {
        Record {
            id: item.id,
            model_id: item.relationships.item_type.data.map(|r| r.id),
            fields: item.attributes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadAttributes {
    pub basename: String,
    pub filename: String,
    #[serde(default)]
    pub format: Option<String>,
    pub md5: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Upload resource
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResource {
    pub id: String,
    pub attributes: UploadAttributes,
}

impl From<UploadResource> for UploadDescriptor {
    fn from(upload: UploadResource) -> Self {
        let UploadAttributes {
            basename,
            filename,
            format,
            md5,
            mime_type,
            url,
        } = upload.attributes;

        UploadDescriptor {
            id: upload.id,
            basename,
            filename,
            format,
            md5,
            mime_type,
            url,
        }
    }
}

/// Response to an upload update: the upload itself, or a job to poll when
/// the update runs asynchronously.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum UpdateResponse {
    #[serde(rename = "upload")]
    Upload(UploadResource),
    #[serde(rename = "job")]
    Job { id: String },
}

#[derive(Debug, Deserialize)]
pub struct JobResultAttributes {
    /// HTTP status the job's underlying request finished with
    pub status: u16,
    /// Response document the request would have returned synchronously
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Deserialize)]
pub struct JobResultResource {
    pub id: String,
    pub attributes: JobResultAttributes,
}

#[derive(Debug, Serialize)]
pub struct UploadBasenameAttributes<'a> {
    pub basename: &'a str,
}

/// Body of `PUT /uploads/{id}` touching only the basename
#[derive(Debug, Serialize)]
pub struct UploadUpdate<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributes: UploadBasenameAttributes<'a>,
}

impl<'a> UploadUpdate<'a> {
    pub fn basename(id: &'a str, basename: &'a str) -> Document<Self> {
        Document {
            data: Self {
                id,
                kind: "upload",
                attributes: UploadBasenameAttributes { basename },
            },
        }
    }
}

/// Error document of a failed request
#[derive(Debug, Deserialize)]
pub struct ApiErrorDocument {
    pub data: Vec<ApiErrorResource>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorResource {
    pub attributes: ApiErrorAttributes,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorAttributes {
    pub code: String,
    #[serde(default)]
    pub details: Value,
}

impl ApiErrorDocument {
    /// `CODE` or `CODE (details)` for each error, joined with `; `.
    pub fn summary(&self) -> String {
        self.data
            .iter()
            .map(|e| match &e.attributes.details {
                Value::Null => e.attributes.code.clone(),
                Value::Object(map) if map.is_empty() => e.attributes.code.clone(),
                details => format!("{} ({})", e.attributes.code, details),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
