//! Live template preview against a sample record.

use bridge_traits::content::{RecordLookup, RecordOrder};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::composer::slugify;
use crate::error::{NamingError, Result};
use crate::resolver::resolve_tokens;
use crate::template::render;

/// A template rendered against the model's most recently updated record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplatePreview {
    pub record_id: String,
    /// Template text with tokens replaced
    pub rendered: String,
    /// `rendered` after slugification, without media kind or hash
    pub slug: String,
}

/// Render `template` against a sample record of `model_id`.
///
/// Returns `Ok(None)` when the model has no records yet.
///
/// # Errors
///
/// [`NamingError::SampleRecord`] when listing the model's records fails.
/// Token lookups degrade to empty values as in [`resolve_tokens`].
#[instrument(skip(template, lookup))]
pub async fn preview_template(
    template: &str,
    model_id: &str,
    lookup: &dyn RecordLookup,
    locale: &str,
) -> Result<Option<TemplatePreview>> {
    let records = lookup
        .list_records_by_model(model_id, 1, RecordOrder::UpdatedAtDesc)
        .await
        .map_err(|source| NamingError::SampleRecord {
            model_id: model_id.to_string(),
            source,
        })?;

    let Some(sample) = records.into_iter().next() else {
        debug!("Model has no records to preview against");
        return Ok(None);
    };

    let resolved = resolve_tokens(template, &sample, lookup, locale).await;
    let rendered = render(template, |token| resolved.get(token).unwrap_or(""));
    let slug = slugify(&rendered);

    Ok(Some(TemplatePreview {
        record_id: sample.id,
        rendered,
        slug,
    }))
}
