//! Rename Planning
//!
//! Compares every upload's current basename with the one the template
//! produces. Planning is pure; nothing is sent to the host here.

use bridge_traits::content::UploadDescriptor;
use core_naming::{compose_for_upload, ResolvedTokens};
use serde::Serialize;

/// Query string the image CDN uses for a 50x50 cropped thumbnail
const THUMBNAIL_PARAMS: &str = "auto=compress&w=50&h=50&fit=crop";

/// Current and computed basename of one upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameDecision {
    pub upload_id: String,
    pub current_basename: String,
    pub target_basename: String,
    /// Extension kept across the rename, without the dot
    pub extension: String,
    /// Small preview for images, `None` for videos and other media
    pub thumbnail_url: Option<String>,
}

impl RenameDecision {
    fn for_upload(upload: &UploadDescriptor, target_basename: String) -> Self {
        let thumbnail_url = match (upload.mime_type.as_deref(), upload.url.as_deref()) {
            (Some(mime), Some(url)) if mime.starts_with("image") => {
                Some(format!("{}?{}", url, THUMBNAIL_PARAMS))
            }
            _ => None,
        };

        Self {
            upload_id: upload.id.clone(),
            current_basename: upload.basename.clone(),
            target_basename,
            extension: upload.extension(),
            thumbnail_url,
        }
    }

    /// Exact string comparison; case or whitespace differences count.
    pub fn needs_update(&self) -> bool {
        self.current_basename != self.target_basename
    }

    pub fn current_filename(&self) -> String {
        join_extension(&self.current_basename, &self.extension)
    }

    pub fn target_filename(&self) -> String {
        join_extension(&self.target_basename, &self.extension)
    }
}

fn join_extension(basename: &str, extension: &str) -> String {
    if extension.is_empty() {
        basename.to_string()
    } else {
        format!("{}.{}", basename, extension)
    }
}

/// Decisions for a whole gallery, in gallery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenamePlan {
    decisions: Vec<RenameDecision>,
}

impl RenamePlan {
    pub fn build(uploads: &[UploadDescriptor], template: &str, resolved: &ResolvedTokens) -> Self {
        let decisions = uploads
            .iter()
            .map(|upload| {
                RenameDecision::for_upload(upload, compose_for_upload(template, resolved, upload))
            })
            .collect();
        Self { decisions }
    }

    pub fn decisions(&self) -> &[RenameDecision] {
        &self.decisions
    }

    pub fn needs_update(&self) -> impl Iterator<Item = &RenameDecision> {
        self.decisions.iter().filter(|d| d.needs_update())
    }

    pub fn up_to_date(&self) -> impl Iterator<Item = &RenameDecision> {
        self.decisions.iter().filter(|d| !d.needs_update())
    }

    pub fn pending_count(&self) -> usize {
        self.needs_update().count()
    }

    pub fn is_settled(&self) -> bool {
        self.pending_count() == 0
    }

    pub fn find(&self, upload_id: &str) -> Option<&RenameDecision> {
        self.decisions.iter().find(|d| d.upload_id == upload_id)
    }
}
