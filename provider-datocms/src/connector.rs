//! DatoCMS Content Management API connector
//!
//! Implements `RecordLookup`, `UploadCatalog` and `UploadRenamer` on top of
//! an injected `HttpClient`.

use async_trait::async_trait;
use bridge_traits::content::{
    Record, RecordLookup, RecordOrder, UploadCatalog, UploadDescriptor, UploadRenamer,
};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
use core_runtime::config::CmaConfig;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{DatoCmsError, Result};
use crate::types::{
    ApiErrorDocument, Document, ItemResource, JobResultResource, UpdateResponse, UploadResource,
    UploadUpdate,
};

/// API version header value
const API_VERSION: &str = "3";

/// Upload IDs sent per `GET /uploads` request
const MAX_IDS_PER_REQUEST: usize = 100;

/// DatoCMS CMA connector
///
/// # Example
///
/// ```ignore
/// use provider_datocms::DatoCmsConnector;
/// use bridge_traits::content::RecordLookup;
///
/// let connector = DatoCmsConnector::new(http_client, CmaConfig::from_env()?);
/// let record = connector.find_record("rec_1").await?;
/// ```
pub struct DatoCmsConnector {
    http_client: Arc<dyn HttpClient>,
    config: CmaConfig,
}

impl DatoCmsConnector {
    pub fn new(http_client: Arc<dyn HttpClient>, config: CmaConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn config(&self) -> &CmaConfig {
        &self.config
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.config.max_attempts,
            ..RetryPolicy::default()
        }
    }

    /// Request with auth, version and environment headers set
    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}{}", self.config.base_url, path))
            .bearer_token(&self.config.api_token)
            .header("Accept", "application/json")
            .header("X-Api-Version", API_VERSION)
            .header("X-Environment", &self.config.environment)
            .timeout(self.config.request_timeout)
    }

    /// Send with the configured retry policy. Any final status is returned.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let response = self
            .http_client
            .execute_with_retry(request, self.retry_policy())
            .await?;
        debug!(status = response.status, "CMA response");
        Ok(response)
    }

    /// Turn a non-2xx response into [`DatoCmsError::ApiError`].
    fn ensure_success(response: HttpResponse) -> Result<HttpResponse> {
        if response.is_success() {
            return Ok(response);
        }

        let message = match serde_json::from_slice::<ApiErrorDocument>(&response.body) {
            Ok(doc) if !doc.data.is_empty() => doc.summary(),
            _ => String::from_utf8_lossy(&response.body).to_string(),
        };
        warn!(status = response.status, %message, "CMA request failed");
        Err(DatoCmsError::ApiError {
            status: response.status,
            message,
        })
    }

    fn parse<T: DeserializeOwned>(response: &HttpResponse, what: &str) -> Result<T> {
        serde_json::from_slice(&response.body)
            .map_err(|e| DatoCmsError::ParseError(format!("Failed to parse {}: {}", what, e)))
    }

    async fn fetch_record(&self, id: &str) -> Result<Option<Record>> {
        let path = format!("/items/{}", urlencoding::encode(id));
        let response = self.send(self.request(HttpMethod::Get, &path)).await?;

        if response.status == 404 {
            debug!(record_id = id, "Record not found");
            return Ok(None);
        }

        let response = Self::ensure_success(response)?;
        let doc: Document<ItemResource> = Self::parse(&response, "item")?;
        Ok(Some(doc.data.into()))
    }

    async fn fetch_records_by_model(
        &self,
        model_id: &str,
        limit: u32,
        order: RecordOrder,
    ) -> Result<Vec<Record>> {
        let path = format!(
            "/items?filter[type]={}&page[limit]={}&order_by={}",
            urlencoding::encode(model_id),
            limit,
            order.as_query_value()
        );
        let response = Self::ensure_success(self.send(self.request(HttpMethod::Get, &path)).await?)?;
        let doc: Document<Vec<ItemResource>> = Self::parse(&response, "item list")?;
        Ok(doc.data.into_iter().map(Record::from).collect())
    }

    async fn fetch_uploads(&self, ids: &[String]) -> Result<Vec<UploadDescriptor>> {
        let mut uploads = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_IDS_PER_REQUEST) {
            let path = format!(
                "/uploads?filter[ids]={}&page[limit]={}",
                urlencoding::encode(&chunk.join(",")),
                chunk.len()
            );
            let response =
                Self::ensure_success(self.send(self.request(HttpMethod::Get, &path)).await?)?;
            let doc: Document<Vec<UploadResource>> = Self::parse(&response, "upload list")?;
            uploads.extend(doc.data.into_iter().map(UploadDescriptor::from));
        }

        Ok(uploads)
    }

    async fn update_basename(&self, id: &str, new_basename: &str) -> Result<UploadDescriptor> {
        let path = format!("/uploads/{}", urlencoding::encode(id));
        let request = self
            .request(HttpMethod::Put, &path)
            .json(&UploadUpdate::basename(id, new_basename))?;

        let response = Self::ensure_success(self.send(request).await?)?;
        let doc: Document<UpdateResponse> = Self::parse(&response, "upload update")?;

        match doc.data {
            UpdateResponse::Upload(upload) => Ok(upload.into()),
            UpdateResponse::Job { id: job_id } => {
                debug!(upload_id = id, %job_id, "Update queued as job");
                let upload = self.await_job(&job_id).await?;
                Ok(upload.into())
            }
        }
    }

    /// Poll `GET /job-results/{id}` until the job finishes.
    ///
    /// A 404 means the result is not ready yet.
    #[instrument(skip(self))]
    async fn await_job(&self, job_id: &str) -> Result<UploadResource> {
        let path = format!("/job-results/{}", urlencoding::encode(job_id));
        let attempts = self.config.job_poll_attempts;

        for attempt in 1..=attempts {
            tokio::time::sleep(self.config.job_poll_interval).await;

            let response = self.send(self.request(HttpMethod::Get, &path)).await?;
            if response.status == 404 {
                debug!(attempt, "Job result not ready");
                continue;
            }

            let response = Self::ensure_success(response)?;
            let doc: Document<JobResultResource> = Self::parse(&response, "job result")?;
            let result = doc.data.attributes;

            if !(200..300).contains(&result.status) {
                return Err(DatoCmsError::JobFailed {
                    job_id: job_id.to_string(),
                    message: format!("status {}: {}", result.status, result.payload),
                });
            }

            let payload: Document<UploadResource> = serde_json::from_value(result.payload)
                .map_err(|e| {
                    DatoCmsError::ParseError(format!("Failed to parse job payload: {}", e))
                })?;
            return Ok(payload.data);
        }

        Err(DatoCmsError::JobTimeout {
            job_id: job_id.to_string(),
            attempts,
        })
    }
}

#[async_trait]
impl RecordLookup for DatoCmsConnector {
    #[instrument(skip(self))]
    async fn find_record(&self, id: &str) -> bridge_traits::error::Result<Option<Record>> {
        Ok(self.fetch_record(id).await?)
    }

    #[instrument(skip(self))]
    async fn list_records_by_model(
        &self,
        model_id: &str,
        limit: u32,
        order: RecordOrder,
    ) -> bridge_traits::error::Result<Vec<Record>> {
        Ok(self.fetch_records_by_model(model_id, limit, order).await?)
    }
}

#[async_trait]
impl UploadCatalog for DatoCmsConnector {
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn list_uploads_by_ids(
        &self,
        ids: &[String],
    ) -> bridge_traits::error::Result<Vec<UploadDescriptor>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uploads = self.fetch_uploads(ids).await?;
        info!("Fetched {} of {} uploads", uploads.len(), ids.len());
        Ok(uploads)
    }
}

#[async_trait]
impl UploadRenamer for DatoCmsConnector {
    #[instrument(skip(self))]
    async fn update_upload_basename(
        &self,
        id: &str,
        new_basename: &str,
    ) -> bridge_traits::error::Result<UploadDescriptor> {
        Ok(self.update_basename(id, new_basename).await?)
    }
}
