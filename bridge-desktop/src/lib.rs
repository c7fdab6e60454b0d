//! # Desktop Bridge Implementations
//!
//! Native implementations of the bridge traits for running the naming core
//! outside the admin panel (CLI tools, integration tests against a sandbox
//! environment):
//! - `HttpClient` using `reqwest` with retry and exponential backoff
//!
//! Record, upload and dialog capabilities come from the CMA connector and the
//! host respectively, so only the transport lives here.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! let connector = provider_datocms::DatoCmsConnector::new(http_client, config);
//! ```

mod http;

pub use http::ReqwestHttpClient;
