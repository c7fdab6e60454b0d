//! # Core Runtime Module
//!
//! Ambient infrastructure shared by the workspace crates:
//! - Logging and tracing setup (`logging`)
//! - CMA connection settings and persisted plugin parameters (`config`)
//!
//! Nothing here knows about templates or uploads; the naming core and the
//! rename orchestrator only depend on it for configuration values and the
//! log conventions.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{CmaConfig, CmaConfigBuilder, PluginParams};
pub use error::{Error, Result};
