//! Localized Value Extraction
//!
//! Field values arrive from the content API as loosely typed JSON. They are
//! classified once into [`FieldValue`] and every later step matches on the
//! variant instead of re-inspecting the JSON.

use serde_json::Value;

/// A raw field value after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A plain string, used as-is for every locale
    Plain(String),
    /// A locale-keyed mapping (`en`, `en-US`, ...)
    Localized(LocalizedValue),
    /// Numbers, booleans, null, arrays: nothing to render
    Unsupported,
}

impl FieldValue {
    /// Classify a raw JSON field value.
    ///
    /// Objects are read as locale maps one level deep; an entry whose value
    /// is not a string is kept but can never be rendered.
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::String(text) => FieldValue::Plain(text.clone()),
            Value::Object(map) => FieldValue::Localized(LocalizedValue {
                entries: map
                    .iter()
                    .map(|(locale, value)| (locale.clone(), value.as_str().map(str::to_string)))
                    .collect(),
            }),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::Array(_) => {
                FieldValue::Unsupported
            }
        }
    }

    /// Classify an optional value; absence is [`FieldValue::Unsupported`].
    pub fn classify_opt(value: Option<&Value>) -> Self {
        value.map(Self::classify).unwrap_or(FieldValue::Unsupported)
    }
}

/// Locale entries in the order the host sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedValue {
    entries: Vec<(String, Option<String>)>,
}

impl LocalizedValue {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose key starts with `prefix`.
    fn find_prefix(&self, prefix: &str) -> Option<&Option<String>> {
        self.entries
            .iter()
            .find(|(locale, _)| locale.starts_with(prefix))
            .map(|(_, value)| value)
    }

    /// The entry for `locale`, falling back to its base language when the
    /// locale carries a region (`fr-CA` -> `fr`).
    pub fn closest(&self, locale: &str) -> Option<&Option<String>> {
        self.find_prefix(locale).or_else(|| {
            let (language, _region) = locale.split_once('-')?;
            self.find_prefix(language)
        })
    }
}

/// Resolve a field value to a display string for `locale`.
///
/// Total: absent or unusable data is `""`.
pub fn extract(value: &FieldValue, locale: &str) -> String {
    match value {
        FieldValue::Plain(text) => text.clone(),
        FieldValue::Localized(localized) => match localized.closest(locale) {
            Some(Some(text)) if !text.is_empty() => text.clone(),
            _ => String::new(),
        },
        FieldValue::Unsupported => String::new(),
    }
}

/// [`extract`] straight from raw JSON.
pub fn extract_json(value: Option<&Value>, locale: &str) -> String {
    extract(&FieldValue::classify_opt(value), locale)
}
