//! End-to-end naming scenarios
//!
//! Runs templates through resolution and composition against an in-memory
//! record store:
//! - Plain and localized field extraction
//! - Token parsing order
//! - Linked-record tokens
//! - Deterministic, idempotent basenames

use async_trait::async_trait;
use bridge_traits::content::{Record, RecordLookup, RecordOrder, UploadDescriptor};
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use core_naming::{
    compose, compose_for_upload, extract, parse_tokens, resolve_tokens, slugify, FieldValue,
    MediaKind,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// In-memory record store
// ============================================================================

#[derive(Default)]
struct InMemoryRecords {
    records: HashMap<String, Record>,
    failing_ids: Vec<String>,
    lookups: AtomicUsize,
}

impl InMemoryRecords {
    fn with(mut self, record: Record) -> Self {
        self.records.insert(record.id.clone(), record);
        self
    }

    fn failing(mut self, id: &str) -> Self {
        self.failing_ids.push(id.to_string());
        self
    }

    fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordLookup for InMemoryRecords {
    async fn find_record(&self, id: &str) -> BridgeResult<Option<Record>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing_ids.iter().any(|f| f == id) {
            return Err(BridgeError::OperationFailed(format!("lookup of {id} refused")));
        }
        Ok(self.records.get(id).cloned())
    }

    async fn list_records_by_model(
        &self,
        model_id: &str,
        limit: u32,
        _order: RecordOrder,
    ) -> BridgeResult<Vec<Record>> {
        Ok(self
            .records
            .values()
            .filter(|r| r.model_id.as_deref() == Some(model_id))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

fn image_upload(basename: &str, md5: &str) -> UploadDescriptor {
    UploadDescriptor {
        id: "up_1".to_string(),
        basename: basename.to_string(),
        filename: format!("{basename}.png"),
        format: Some("png".to_string()),
        md5: md5.to_string(),
        mime_type: Some("image/png".to_string()),
        url: None,
    }
}

// ============================================================================
// Extraction and parsing
// ============================================================================

#[test]
fn plain_strings_ignore_locale() {
    for text in ["blue-shirt", "", "Crème", "{not a token}"] {
        let value = FieldValue::classify(&json!(text));
        for locale in ["en", "en-US", "fr-CA", ""] {
            assert_eq!(extract(&value, locale), text);
        }
    }
}

#[test]
fn locale_map_lookup() {
    let value = FieldValue::classify(&json!({"en-US": "a", "en-GB": "b"}));
    assert_eq!(extract(&value, "en-US"), "a");
    assert_eq!(extract(&value, "en"), "a");
    assert_eq!(extract(&value, "fr-CA"), "");
}

#[test]
fn tokens_in_template_order() {
    assert_eq!(
        parse_tokens("{a} and {b.c.d}").collect::<Vec<_>>(),
        vec!["a", "b.c.d"]
    );
    assert_eq!(parse_tokens("no tokens here").count(), 0);
}

// ============================================================================
// Composition
// ============================================================================

#[tokio::test]
async fn simple_handle_scenario() {
    let store = InMemoryRecords::default();
    let product = Record::new("prod_1").with_field("handle", json!("blue-shirt"));

    let resolved = resolve_tokens("{handle}", &product, &store, "en").await;
    assert_eq!(resolved.get("handle"), Some("blue-shirt"));
    assert_eq!(resolved.len(), 1);

    let upload = image_upload("img001", "abcdef123456");
    assert_eq!(
        compose_for_upload("{handle}", &resolved, &upload),
        "blue-shirt-image-abcde"
    );
}

#[tokio::test]
async fn linked_token_scenario() {
    let store = InMemoryRecords::default()
        .with(Record::new("rec_1").with_field("title", json!({"en-US": "Outerwear"})));
    let product = Record::new("prod_1").with_field("category", json!("rec_1"));

    let resolved = resolve_tokens("{category.info.title}", &product, &store, "en-US").await;
    assert_eq!(resolved.get("category.info.title"), Some("Outerwear"));

    let basename = compose(
        "{category.info.title}",
        &resolved,
        MediaKind::Image,
        "abcdef123456",
    );
    assert!(basename.contains("outerwear"));
    assert_eq!(basename, "outerwear-image-abcde");
}

#[tokio::test]
async fn repeated_linked_token_is_fetched_once() {
    let store = InMemoryRecords::default()
        .with(Record::new("rec_1").with_field("title", json!("Outerwear")));
    let product = Record::new("prod_1").with_field("category", json!("rec_1"));

    let resolved = resolve_tokens(
        "{category.info.title} by {category.info.title}",
        &product,
        &store,
        "en",
    )
    .await;

    assert_eq!(store.lookup_count(), 1);
    assert_eq!(
        compose("{category.info.title} by {category.info.title}", &resolved, MediaKind::Image, "ffff0"),
        "outerwear-by-outerwear-image-ffff0"
    );
}

#[tokio::test]
async fn failed_lookup_still_composes() {
    let store = InMemoryRecords::default().failing("rec_1");
    let product = Record::new("prod_1")
        .with_field("handle", json!("blue-shirt"))
        .with_field("category", json!("rec_1"));

    let resolved = resolve_tokens("{category.info.title} {handle}", &product, &store, "en").await;
    assert_eq!(
        compose("{category.info.title} {handle}", &resolved, MediaKind::Video, "12345678"),
        "blue-shirt-video-12345"
    );
}

#[tokio::test]
async fn composition_is_deterministic_and_slug_stable() {
    let store = InMemoryRecords::default();
    let product = Record::new("prod_1")
        .with_field("title", json!({"fr": "Crème Brûlée", "en": "Cream"}))
        .with_field("handle", json!("creme-brulee"));
    let template = "{title} ~ {handle} ~ {unknown}";

    let first = resolve_tokens(template, &product, &store, "fr-CA").await;
    let second = resolve_tokens(template, &product, &store, "fr-CA").await;
    assert_eq!(first, second);

    let a = compose(template, &first, MediaKind::Image, "0a1b2c3d");
    let b = compose(template, &second, MediaKind::Image, "0a1b2c3d");
    assert_eq!(a, b);
    assert_eq!(a, "creme-brulee-creme-brulee-image-0a1b2");
    assert_eq!(slugify(&a), a);
}
