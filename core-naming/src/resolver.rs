//! Field Reference Resolution
//!
//! Turns each token of a template into a display string, reading the
//! current record directly and following link fields through a
//! [`RecordLookup`] for `local.alias.remote` tokens.
//!
//! ## Failure policy
//!
//! Missing data resolves to `""`. [`resolve`] returns `Err` only when the
//! related-record fetch itself fails; [`resolve_tokens`] logs that failure
//! and stores `""` for the token so the rest of the template still renders.

use bridge_traits::content::{Record, RecordLookup};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use crate::error::{NamingError, Result};
use crate::localized::extract_json;
use crate::template::{parse_tokens, TokenRef};

/// Token text mapped to its resolved display string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTokens {
    values: HashMap<String, String>,
}

impl ResolvedTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) {
        self.values.insert(token.into(), value.into());
    }

    /// Resolved value, `None` for a token that was never resolved.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.values.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for ResolvedTokens
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A link field value usable as a record ID.
fn linked_record_id(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

/// Resolve a single token against `record`.
///
/// # Errors
///
/// [`NamingError::Lookup`] when fetching the linked record fails. A linked
/// record that does not exist is not an error.
pub async fn resolve(
    token: &str,
    record: &Record,
    lookup: &dyn RecordLookup,
    locale: &str,
) -> Result<String> {
    match TokenRef::parse(token) {
        TokenRef::Simple(field) => Ok(extract_json(record.field(field), locale)),
        TokenRef::Linked {
            local_field,
            model_alias,
            remote_field,
        } => {
            let Some(related_id) = linked_record_id(record.field(local_field)) else {
                debug!(token, local_field, "Link field empty or not a record reference");
                return Ok(String::new());
            };

            let related = lookup
                .find_record(related_id)
                .await
                .map_err(|source| NamingError::Lookup {
                    record_id: related_id.to_string(),
                    source,
                })?;

            match related {
                Some(related) => Ok(extract_json(related.field(remote_field), locale)),
                None => {
                    debug!(token, related_id, model_alias, "Linked record not found");
                    Ok(String::new())
                }
            }
        }
        TokenRef::Malformed => {
            debug!(token, "Malformed token resolves to empty string");
            Ok(String::new())
        }
    }
}

/// Resolve every distinct token of `template` against `record`.
///
/// Never fails: lookup errors are logged and the token resolves to `""`.
#[instrument(skip(record, lookup), fields(record_id = %record.id))]
pub async fn resolve_tokens(
    template: &str,
    record: &Record,
    lookup: &dyn RecordLookup,
    locale: &str,
) -> ResolvedTokens {
    let mut resolved = ResolvedTokens::new();

    for token in parse_tokens(template) {
        if resolved.contains(token) {
            continue;
        }

        let value = match resolve(token, record, lookup, locale).await {
            Ok(value) => value,
            Err(e) => {
                warn!(token, error = %e, "Token lookup failed, using empty value");
                String::new()
            }
        };
        resolved.insert(token, value);
    }

    debug!(tokens = resolved.len(), "Resolved template tokens");
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::content::RecordOrder;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use mockall::mock;
    use mockall::predicate::eq;
    use serde_json::json;

    mock! {
        Lookup {}

        #[async_trait]
        impl RecordLookup for Lookup {
            async fn find_record(&self, id: &str) -> BridgeResult<Option<Record>>;
            async fn list_records_by_model(
                &self,
                model_id: &str,
                limit: u32,
                order: RecordOrder,
            ) -> BridgeResult<Vec<Record>>;
        }
    }

    fn product() -> Record {
        Record::new("prod_1")
            .with_field("handle", json!("blue-shirt"))
            .with_field("title", json!({"en-US": "Blue Shirt", "it": "Camicia blu"}))
            .with_field("category", json!("rec_1"))
            .with_field("price", json!(19.99))
            .with_field("empty_link", json!(null))
    }

    fn category() -> Record {
        Record::new("rec_1").with_field("title", json!({"en-US": "Outerwear"}))
    }

    #[tokio::test]
    async fn test_simple_token() {
        let lookup = MockLookup::new();
        let value = resolve("handle", &product(), &lookup, "en").await.unwrap();
        assert_eq!(value, "blue-shirt");
    }

    #[tokio::test]
    async fn test_simple_token_localized() {
        let lookup = MockLookup::new();
        assert_eq!(resolve("title", &product(), &lookup, "it").await.unwrap(), "Camicia blu");
        assert_eq!(resolve("title", &product(), &lookup, "en").await.unwrap(), "Blue Shirt");
    }

    #[tokio::test]
    async fn test_missing_and_unsupported_fields_are_empty() {
        let lookup = MockLookup::new();
        assert_eq!(resolve("missing", &product(), &lookup, "en").await.unwrap(), "");
        assert_eq!(resolve("price", &product(), &lookup, "en").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_linked_token_follows_link() {
        let mut lookup = MockLookup::new();
        lookup
            .expect_find_record()
            .with(eq("rec_1"))
            .times(1)
            .returning(|_| Ok(Some(category())));

        let value = resolve("category.info.title", &product(), &lookup, "en-US")
            .await
            .unwrap();
        assert_eq!(value, "Outerwear");
    }

    #[tokio::test]
    async fn test_linked_token_without_reference_skips_lookup() {
        let mut lookup = MockLookup::new();
        lookup.expect_find_record().never();

        for token in ["empty_link.info.title", "handle_missing.info.title", "price.info.title"] {
            assert_eq!(resolve(token, &product(), &lookup, "en").await.unwrap(), "");
        }
    }

    #[tokio::test]
    async fn test_linked_record_not_found_is_empty() {
        let mut lookup = MockLookup::new();
        lookup.expect_find_record().returning(|_| Ok(None));

        let value = resolve("category.info.title", &product(), &lookup, "en")
            .await
            .unwrap();
        assert_eq!(value, "");
    }

    #[tokio::test]
    async fn test_linked_lookup_failure_is_error() {
        let mut lookup = MockLookup::new();
        lookup
            .expect_find_record()
            .returning(|_| Err(BridgeError::OperationFailed("503".to_string())));

        let err = resolve("category.info.title", &product(), &lookup, "en")
            .await
            .unwrap_err();
        assert!(matches!(err, NamingError::Lookup { ref record_id, .. } if record_id == "rec_1"));
    }

    #[tokio::test]
    async fn test_malformed_tokens_are_empty() {
        let mut lookup = MockLookup::new();
        lookup.expect_find_record().never();

        assert_eq!(resolve("category.title", &product(), &lookup, "en").await.unwrap(), "");
        assert_eq!(resolve("a.b.c.d", &product(), &lookup, "en").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_resolve_tokens_degrades_failed_lookup() {
        let mut lookup = MockLookup::new();
        lookup
            .expect_find_record()
            .times(1)
            .returning(|_| Err(BridgeError::OperationFailed("timeout".to_string())));

        let resolved = resolve_tokens(
            "{category.info.title} {handle} {category.info.title}",
            &product(),
            &lookup,
            "en",
        )
        .await;

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved.get("category.info.title"), Some(""));
        assert_eq!(resolved.get("handle"), Some("blue-shirt"));
    }

    #[tokio::test]
    async fn test_resolve_tokens_empty_template() {
        let lookup = MockLookup::new();
        let resolved = resolve_tokens("static name", &product(), &lookup, "en").await;
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_resolved_tokens_from_iter() {
        let resolved: ResolvedTokens = [("handle", "blue-shirt")].into_iter().collect();
        assert_eq!(resolved.get("handle"), Some("blue-shirt"));
        assert_eq!(resolved.get("other"), None);
        assert_eq!(resolved.iter().count(), 1);
    }
}
