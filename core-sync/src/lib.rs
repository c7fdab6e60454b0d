//! # Gallery Rename Module
//!
//! Brings a gallery's upload basenames in line with the naming template.
//!
//! ## Overview
//!
//! This module manages the rename lifecycle of one gallery field:
//! - Fetching upload metadata via `UploadCatalog` and restoring gallery order
//! - Comparing current basenames with the composed ones
//! - Renaming single uploads or all pending uploads concurrently
//! - Verifying the host applied each rename
//! - Confirming with the user and reporting through host notifications
//!
//! ## Components
//!
//! - **Rename Plan** (`plan`): Per-upload current/target basenames
//! - **Gallery Renamer** (`orchestrator`): Refresh, rename, reconcile

pub mod error;
pub mod orchestrator;
pub mod plan;

pub use error::{Result, SyncError};
pub use orchestrator::{BulkRenameReport, GalleryRenamer, RenameOutcome};
pub use plan::{RenameDecision, RenamePlan};
