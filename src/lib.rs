//! Workspace facade crate.
//!
//! Re-exports the service façade, the naming core, the rename orchestrator
//! and the bridge contracts so a host integration can depend on
//! `gallery-namer` alone. The `desktop-shims` feature adds the reqwest HTTP
//! bridge and the CMA connector.

pub use bridge_traits;
pub use core_naming;
pub use core_runtime;
pub use core_service;
pub use core_sync;

pub use core_service::{CoreDependencies, CoreError, CoreService, GalleryReview};

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop;
#[cfg(feature = "desktop-shims")]
pub use core_service::bootstrap_desktop;
#[cfg(feature = "desktop-shims")]
pub use provider_datocms;
