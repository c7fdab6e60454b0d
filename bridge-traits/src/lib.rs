//! # Host Bridge Traits
//!
//! Capabilities the naming core and the rename orchestrator need from their
//! host, expressed as narrow traits so each consumer can be handed exactly
//! what it uses and tests can hand it a fake.
//!
//! ## Traits
//!
//! ### Content API
//! - [`RecordLookup`](content::RecordLookup) - Fetch records by ID or sample a model
//! - [`UploadCatalog`](content::UploadCatalog) - Read upload metadata
//! - [`UploadRenamer`](content::UploadRenamer) - Rewrite an upload's basename
//!
//! ### Transport
//! - [`HttpClient`](http::HttpClient) - Async HTTP used by API connectors
//!
//! ### Host UI
//! - [`ConfirmationPrompt`](host::ConfirmationPrompt) - Confirm dialogs
//! - [`Notifier`](host::Notifier) - Notice/alert toasts
//!
//! ### Utilities
//! - [`LoggerSink`](log::LoggerSink) - Forward structured logs to the host
//!
//! ## Error Handling
//!
//! Every trait returns [`BridgeError`](error::BridgeError). Implementations
//! convert their own failures into it and keep the message actionable.
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` so trait objects can be shared behind
//! `Arc` across concurrently awaited futures.

pub mod content;
pub mod error;
pub mod host;
pub mod http;
pub mod log;

pub use error::BridgeError;

// Re-export commonly used types
pub use content::{
    Record, RecordLookup, RecordOrder, UploadCatalog, UploadDescriptor, UploadRenamer,
};
pub use host::{ConfirmRequest, ConfirmationPrompt, Notifier};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use log::{LogEntry, LogLevel, LoggerSink};
