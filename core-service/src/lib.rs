//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided capabilities (content lookups, upload
//! metadata, dialogs, toasts) into the naming core and the rename
//! orchestrator. Desktop tools typically enable the `desktop-shims` feature,
//! which talks to the CMA through `provider-datocms` over `bridge-desktop`'s
//! reqwest client; an embedding admin panel supplies its own bridges.

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::{
    content::{Record, RecordLookup, UploadCatalog, UploadRenamer},
    host::{ConfirmationPrompt, Notifier},
};
use core_naming::{preview_template, SchemaCatalog, TemplatePreview, TokenSuggestion};
use core_runtime::config::PluginParams;
use core_sync::{GalleryRenamer, RenamePlan};
use tracing::{debug, info, instrument};

#[cfg(feature = "desktop-shims")]
use core_runtime::config::CmaConfig;

/// Aggregated handle to all host capabilities the core requires.
pub struct CoreDependencies {
    pub record_lookup: Arc<dyn RecordLookup>,
    pub upload_catalog: Arc<dyn UploadCatalog>,
    pub upload_renamer: Arc<dyn UploadRenamer>,
    pub prompt: Arc<dyn ConfirmationPrompt>,
    pub notifier: Arc<dyn Notifier>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(
        record_lookup: Arc<dyn RecordLookup>,
        upload_catalog: Arc<dyn UploadCatalog>,
        upload_renamer: Arc<dyn UploadRenamer>,
        prompt: Arc<dyn ConfirmationPrompt>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            record_lookup,
            upload_catalog,
            upload_renamer,
            prompt,
            notifier,
        }
    }

    /// Use one content API client for records and uploads alike.
    pub fn from_content_api<C>(
        content: Arc<C>,
        prompt: Arc<dyn ConfirmationPrompt>,
        notifier: Arc<dyn Notifier>,
    ) -> Self
    where
        C: RecordLookup + UploadCatalog + UploadRenamer + 'static,
    {
        Self {
            record_lookup: content.clone(),
            upload_catalog: content.clone(),
            upload_renamer: content,
            prompt,
            notifier,
        }
    }
}

/// A gallery with fresh upload metadata and the renames it needs.
pub struct GalleryReview {
    pub renamer: GalleryRenamer,
    pub plan: RenamePlan,
}

impl GalleryReview {
    /// Confirm with the user and rename everything pending.
    pub async fn apply_all(
        &mut self,
        deps: &CoreDependencies,
    ) -> Result<Option<core_sync::BulkRenameReport>> {
        Ok(self
            .renamer
            .confirm_and_rename_all(&self.plan, deps.prompt.as_ref(), deps.notifier.as_ref())
            .await?)
    }
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    deps: Arc<CoreDependencies>,
}

impl CoreService {
    /// Create a new service from the provided dependencies.
    pub fn new(deps: CoreDependencies) -> Self {
        Self {
            deps: Arc::new(deps),
        }
    }

    /// Access the bridge dependencies being used by the service.
    pub fn dependencies(&self) -> Arc<CoreDependencies> {
        Arc::clone(&self.deps)
    }

    /// Placeholders the config screen offers for a model.
    pub fn suggestions(&self, schema: &SchemaCatalog, model_id: &str) -> Vec<TokenSuggestion> {
        schema.template_suggestions(model_id)
    }

    /// Render the configured template against the model's latest record.
    #[instrument(skip(self, params))]
    pub async fn preview(
        &self,
        params: &PluginParams,
        model_id: &str,
        locale: &str,
    ) -> Result<Option<TemplatePreview>> {
        let template = params.template().ok_or(CoreError::TemplateMissing)?;
        Ok(preview_template(template, model_id, self.deps.record_lookup.as_ref(), locale).await?)
    }

    /// Renamer for a gallery, without fetching anything yet.
    pub fn gallery(&self, gallery_ids: Vec<String>) -> GalleryRenamer {
        GalleryRenamer::new(
            gallery_ids,
            Arc::clone(&self.deps.upload_catalog),
            Arc::clone(&self.deps.upload_renamer),
        )
    }

    /// Fetch the gallery's uploads and plan renames for `record`.
    #[instrument(skip(self, params, record, gallery_ids), fields(record_id = %record.id))]
    pub async fn review_gallery(
        &self,
        params: &PluginParams,
        record: &Record,
        gallery_ids: Vec<String>,
        locale: &str,
    ) -> Result<GalleryReview> {
        let template = params.template().ok_or(CoreError::TemplateMissing)?;

        let mut renamer = self.gallery(gallery_ids);
        renamer.refresh().await?;

        let plan = renamer
            .evaluate(template, record, self.deps.record_lookup.as_ref(), locale)
            .await;
        info!(
            uploads = plan.decisions().len(),
            pending = plan.pending_count(),
            "Gallery reviewed"
        );

        Ok(GalleryReview { renamer, plan })
    }
}

/// Convenience bootstrapper for desktop hosts.
///
/// Reads connection settings from the environment and talks to the CMA
/// directly. Dialogs and toasts still come from the caller.
///
/// ```no_run
/// # #[cfg(feature = "desktop-shims")]
/// # fn example(
/// #     prompt: std::sync::Arc<dyn bridge_traits::host::ConfirmationPrompt>,
/// #     notifier: std::sync::Arc<dyn bridge_traits::host::Notifier>,
/// # ) -> core_service::Result<()> {
/// use core_runtime::config::CmaConfig;
///
/// let core = core_service::bootstrap_desktop(CmaConfig::from_env()?, prompt, notifier)?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(
    config: CmaConfig,
    prompt: Arc<dyn ConfirmationPrompt>,
    notifier: Arc<dyn Notifier>,
) -> Result<CoreService> {
    config.validate()?;

    let http = bridge_desktop::ReqwestHttpClient::with_timeout(config.request_timeout)
        .map_err(|err| CoreError::InitializationFailed(err.to_string()))?;
    debug!(environment = %config.environment, "Bootstrapping CMA connector");

    let connector = Arc::new(provider_datocms::DatoCmsConnector::new(Arc::new(http), config));
    Ok(CoreService::new(CoreDependencies::from_content_api(
        connector, prompt, notifier,
    )))
}
