//! # Naming Core
//!
//! Derives SEO-friendly basenames for gallery assets from a user template.
//!
//! ## Overview
//!
//! A template such as `{title} {category.info.title}` is evaluated against
//! the record that owns the gallery:
//! - **Template** (`template`): finds `{token}` placeholders
//! - **Localized values** (`localized`): picks the display string for a locale
//! - **Resolver** (`resolver`): reads record fields and follows link fields
//! - **Composer** (`composer`): renders, tags media kind and hash, slugifies
//! - **Schema** (`schema`): placeholder suggestions for the config screen
//! - **Preview** (`preview`): renders a template against a sample record
//!
//! The only host capability needed is
//! [`RecordLookup`](bridge_traits::content::RecordLookup).

pub mod composer;
pub mod error;
pub mod localized;
pub mod preview;
pub mod resolver;
pub mod schema;
pub mod template;

pub use composer::{compose, compose_for_upload, slugify, MediaKind};
pub use error::{NamingError, Result};
pub use localized::{extract, FieldValue, LocalizedValue};
pub use preview::{preview_template, TemplatePreview};
pub use resolver::{resolve, resolve_tokens, ResolvedTokens};
pub use schema::{
    FieldDefinition, FieldType, ModelDefinition, SchemaCatalog, TemplateIssue, TokenSuggestion,
};
pub use template::{parse_tokens, render, TokenRef};
