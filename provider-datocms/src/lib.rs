//! # DatoCMS Provider
//!
//! Implements the content capabilities against the DatoCMS Content
//! Management API.
//!
//! ## Overview
//!
//! This module provides:
//! - Record lookup by ID and by model (`RecordLookup`)
//! - Upload metadata listing by ID (`UploadCatalog`)
//! - Upload basename updates, following asynchronous jobs (`UploadRenamer`)
//! - Bearer token, API version and environment headers on every request
//! - Retries for throttled and failed requests through the injected
//!   `HttpClient`

pub mod connector;
pub mod error;
pub mod types;

pub use connector::DatoCmsConnector;
pub use error::{DatoCmsError, Result};
