//! Gallery Rename Orchestration
//!
//! Keeps a local copy of the gallery's upload metadata and applies rename
//! plans to the host.
//!
//! ## Workflow
//!
//! 1. **Refresh**: fetch upload metadata and restore gallery order
//! 2. **Plan**: resolve the template against the owning record and compare
//!    basenames (see [`RenamePlan`])
//! 3. **Rename**: one upload at a time, or every pending upload at once
//! 4. **Reconcile**: replace local metadata with what the host returned
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut renamer = GalleryRenamer::new(gallery_ids, catalog, uploads_api);
//! renamer.refresh().await?;
//!
//! let plan = renamer.evaluate(&template, &record, lookup.as_ref(), "en").await;
//! let report = renamer.rename_all(&plan).await;
//! ```

use crate::{plan::RenameDecision, plan::RenamePlan, Result, SyncError};
use bridge_traits::content::{Record, RecordLookup, UploadCatalog, UploadDescriptor, UploadRenamer};
use bridge_traits::host::{ConfirmRequest, ConfirmationPrompt, Notifier};
use core_naming::{resolve_tokens, ResolvedTokens};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Result of one rename inside a bulk operation
#[derive(Debug)]
pub struct RenameOutcome {
    pub upload_id: String,
    pub target_basename: String,
    pub result: Result<UploadDescriptor>,
}

impl RenameOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-item results of [`GalleryRenamer::rename_all`], in plan order
#[derive(Debug, Default)]
pub struct BulkRenameReport {
    outcomes: Vec<RenameOutcome>,
}

impl BulkRenameReport {
    pub fn outcomes(&self) -> &[RenameOutcome] {
        &self.outcomes
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &RenameOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &RenameOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// True when every requested rename went through, including the
    /// trivial case of nothing to rename.
    pub fn is_complete_success(&self) -> bool {
        self.outcomes.iter().all(RenameOutcome::is_success)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Renames the uploads of one gallery field.
pub struct GalleryRenamer {
    /// Upload IDs in the order the gallery shows them
    gallery_ids: Vec<String>,
    catalog: Arc<dyn UploadCatalog>,
    renamer: Arc<dyn UploadRenamer>,
    uploads: Vec<UploadDescriptor>,
}

impl GalleryRenamer {
    /// Create a renamer for a gallery. Local state stays empty until
    /// [`refresh`](Self::refresh) runs.
    pub fn new(
        gallery_ids: Vec<String>,
        catalog: Arc<dyn UploadCatalog>,
        renamer: Arc<dyn UploadRenamer>,
    ) -> Self {
        Self {
            gallery_ids,
            catalog,
            renamer,
            uploads: Vec::new(),
        }
    }

    pub fn gallery_ids(&self) -> &[String] {
        &self.gallery_ids
    }

    /// Upload metadata as of the last refresh or rename, in gallery order.
    pub fn uploads(&self) -> &[UploadDescriptor] {
        &self.uploads
    }

    /// Reload upload metadata from the host.
    ///
    /// The host may answer in any order; the result is re-sorted into gallery
    /// order. IDs the host did not return are dropped.
    #[instrument(skip(self), fields(gallery_len = self.gallery_ids.len()))]
    pub async fn refresh(&mut self) -> Result<&[UploadDescriptor]> {
        if self.gallery_ids.is_empty() {
            self.uploads.clear();
            return Ok(&self.uploads);
        }

        let fetched = self.catalog.list_uploads_by_ids(&self.gallery_ids).await?;
        let mut by_id: HashMap<String, UploadDescriptor> =
            fetched.into_iter().map(|u| (u.id.clone(), u)).collect();

        let mut ordered = Vec::with_capacity(self.gallery_ids.len());
        for id in &self.gallery_ids {
            match by_id.remove(id) {
                Some(upload) => ordered.push(upload),
                None => warn!(upload_id = %id, "Host returned no metadata for gallery upload"),
            }
        }
        if !by_id.is_empty() {
            debug!(extra = by_id.len(), "Ignoring uploads outside the gallery");
        }

        self.uploads = ordered;
        info!(uploads = self.uploads.len(), "Gallery metadata refreshed");
        Ok(&self.uploads)
    }

    /// Plan renames for the current local state.
    pub fn plan(&self, template: &str, resolved: &ResolvedTokens) -> RenamePlan {
        RenamePlan::build(&self.uploads, template, resolved)
    }

    /// Resolve `template` against the record owning the gallery and plan
    /// renames for the current local state.
    pub async fn evaluate(
        &self,
        template: &str,
        record: &Record,
        lookup: &dyn RecordLookup,
        locale: &str,
    ) -> RenamePlan {
        let resolved = resolve_tokens(template, record, lookup, locale).await;
        self.plan(template, &resolved)
    }

    fn ensure_in_gallery(&self, id: &str) -> Result<()> {
        if self.gallery_ids.iter().any(|g| g == id) {
            Ok(())
        } else {
            Err(SyncError::UnknownUpload(id.to_string()))
        }
    }

    /// Replace the local descriptor with the host's post-update metadata.
    fn reconcile(&mut self, updated: &UploadDescriptor) {
        if let Some(local) = self.uploads.iter_mut().find(|u| u.id == updated.id) {
            *local = updated.clone();
        }
    }

    /// Rename one upload.
    ///
    /// Succeeds only if the host reports the requested basename afterwards.
    /// Local state is left untouched on failure.
    #[instrument(skip(self))]
    pub async fn rename_one(&mut self, id: &str, target: &str) -> Result<UploadDescriptor> {
        self.ensure_in_gallery(id)?;

        let updated = request_rename(self.renamer.as_ref(), id, target).await?;
        self.reconcile(&updated);
        info!(upload_id = id, basename = target, "Upload renamed");
        Ok(updated)
    }

    /// Issue every pending rename of `plan` concurrently.
    ///
    /// Each item succeeds or fails on its own; failures are neither retried
    /// nor rolled back.
    #[instrument(skip(self, plan), fields(pending = plan.pending_count()))]
    pub async fn rename_all(&mut self, plan: &RenamePlan) -> BulkRenameReport {
        let pending: Vec<&RenameDecision> = plan.needs_update().collect();
        let renamer = Arc::clone(&self.renamer);

        let requests = pending.iter().map(|decision| {
            let known = self.ensure_in_gallery(&decision.upload_id);
            let renamer = Arc::clone(&renamer);
            async move {
                match known {
                    Ok(()) => {
                        request_rename(
                            renamer.as_ref(),
                            &decision.upload_id,
                            &decision.target_basename,
                        )
                        .await
                    }
                    Err(e) => Err(e),
                }
            }
        });
        let results = join_all(requests).await;

        let mut outcomes = Vec::with_capacity(results.len());
        for (decision, result) in pending.into_iter().zip(results) {
            match &result {
                Ok(updated) => self.reconcile(updated),
                Err(e) => warn!(upload_id = %decision.upload_id, error = %e, "Rename failed"),
            }
            outcomes.push(RenameOutcome {
                upload_id: decision.upload_id.clone(),
                target_basename: decision.target_basename.clone(),
                result,
            });
        }

        let report = BulkRenameReport { outcomes };
        info!(
            succeeded = report.succeeded().count(),
            failed = report.failed().count(),
            "Bulk rename finished"
        );
        report
    }

    /// Ask the user, rename one upload, and tell them how it went.
    ///
    /// Returns `Ok(None)` when the user declined.
    pub async fn confirm_and_rename_one(
        &mut self,
        decision: &RenameDecision,
        prompt: &dyn ConfirmationPrompt,
        notifier: &dyn Notifier,
    ) -> Result<Option<UploadDescriptor>> {
        let request = ConfirmRequest::new(
            format!("Rename {}?", decision.current_basename),
            format!("New name: {}?", decision.target_basename),
        )
        .confirm_label("Rename this file");

        if !prompt.confirm(request).await? {
            debug!(upload_id = %decision.upload_id, "Rename declined");
            return Ok(None);
        }

        match self
            .rename_one(&decision.upload_id, &decision.target_basename)
            .await
        {
            Ok(updated) => {
                let message = format!("Updated to {}", decision.target_basename);
                notify(notifier, Toast::Notice, &message).await;
                Ok(Some(updated))
            }
            Err(e) => {
                let message = format!("Failed to update {}: {}", decision.current_basename, e);
                notify(notifier, Toast::Alert, &message).await;
                Err(e)
            }
        }
    }

    /// Ask the user, rename every pending upload, and report once.
    ///
    /// Returns `Ok(None)` when nothing is pending or the user declined.
    pub async fn confirm_and_rename_all(
        &mut self,
        plan: &RenamePlan,
        prompt: &dyn ConfirmationPrompt,
        notifier: &dyn Notifier,
    ) -> Result<Option<BulkRenameReport>> {
        let pending = plan.pending_count();
        if pending == 0 {
            return Ok(None);
        }

        let request = ConfirmRequest::new(
            format!("Rename {} files?", pending),
            "The update will happen in the background and might take a few seconds.",
        )
        .confirm_label(format!("Rename all {} files", pending));

        if !prompt.confirm(request).await? {
            debug!(pending, "Bulk rename declined");
            return Ok(None);
        }

        let report = self.rename_all(plan).await;
        if report.is_complete_success() {
            let message = format!("Successfully updated {} files", report.len());
            notify(notifier, Toast::Notice, &message).await;
        } else {
            let failed: Vec<&str> = report.failed().map(|o| o.upload_id.as_str()).collect();
            let message = format!(
                "Bulk update failed for {} of {} files: {}",
                failed.len(),
                report.len(),
                failed.join(", ")
            );
            notify(notifier, Toast::Alert, &message).await;
        }

        Ok(Some(report))
    }
}

/// Send one rename and verify the host applied it.
async fn request_rename(
    renamer: &dyn UploadRenamer,
    id: &str,
    target: &str,
) -> Result<UploadDescriptor> {
    let updated = renamer.update_upload_basename(id, target).await?;
    if updated.basename != target {
        return Err(SyncError::BasenameMismatch {
            id: id.to_string(),
            requested: target.to_string(),
            actual: updated.basename,
        });
    }
    Ok(updated)
}

#[derive(Clone, Copy)]
enum Toast {
    Notice,
    Alert,
}

/// A toast that fails to show does not change the rename result.
async fn notify(notifier: &dyn Notifier, toast: Toast, message: &str) {
    let shown = match toast {
        Toast::Notice => notifier.notice(message).await,
        Toast::Alert => notifier.alert(message).await,
    };
    if let Err(e) = shown {
        warn!(error = %e, message, "Failed to show notification");
    }
}
