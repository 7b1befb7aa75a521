use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::applications::{
    Application, ApplicationDirectory, ApplicationId, ApplicationStatus, JobId, StatusUpdate,
};
use crate::config::ApiConfig;
use crate::error::ServiceError;
use crate::saved_jobs::{SavedJob, SavedJobsDirectory};

/// Envelope used by the saved-jobs and jobs endpoints.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// REST client for the job portal backend.
#[derive(Debug, Clone)]
pub struct HttpJobPortalClient {
    client: Client,
    base_url: String,
}

impl HttpJobPortalClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ServiceError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = config.token.as_deref() {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                ServiceError::Transport("API token contains invalid header characters".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .user_agent(format!("job-portal/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ServiceError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn recruiter_request(&self, status: Option<ApplicationStatus>) -> RequestBuilder {
        let request = self.client.get(self.url("/applications/recruiter/applications"));
        match status {
            Some(status) => request.query(&[("status", status.code())]),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, resource: &str) -> Result<String, ServiceError> {
        let started = Instant::now();
        let response = request.send().await.map_err(|err| {
            debug!(
                resource,
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %err,
                "backend request failed"
            );
            ServiceError::Transport(err.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ServiceError::Transport(err.to_string()))?;
        debug!(
            resource,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "backend request completed"
        );

        if status.is_success() {
            Ok(body)
        } else {
            Err(error_from_status(status, &body, resource))
        }
    }

    async fn send_json<T>(&self, request: RequestBuilder, resource: &str) -> Result<T, ServiceError>
    where
        T: DeserializeOwned,
    {
        let body = self.send(request, resource).await?;
        serde_json::from_str(&body).map_err(|err| ServiceError::Decode(err.to_string()))
    }

    async fn send_envelope<T>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> Result<Option<T>, ServiceError>
    where
        T: DeserializeOwned,
    {
        let envelope: ApiEnvelope<T> = self.send_json(request, resource).await?;
        if !envelope.success {
            return Err(ServiceError::Rejected {
                status: StatusCode::OK.as_u16(),
                reason: envelope
                    .message
                    .unwrap_or_else(|| format!("{resource} request was not successful")),
            });
        }
        Ok(envelope.data)
    }
}

/// Map a non-success response onto a [`ServiceError`], preferring the body's own message.
pub(crate) fn error_from_status(status: StatusCode, body: &str, resource: &str) -> ServiceError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let reason = parsed
        .error
        .or(parsed.message)
        .map(|reason| reason.trim().to_string())
        .filter(|reason| !reason.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::Unauthorized(reason),
        StatusCode::NOT_FOUND => ServiceError::NotFound {
            resource: resource.to_string(),
        },
        _ => ServiceError::Rejected {
            status: status.as_u16(),
            reason,
        },
    }
}

#[async_trait]
impl ApplicationDirectory for HttpJobPortalClient {
    async fn fetch_my_applications(&self) -> Result<Vec<Application>, ServiceError> {
        let request = self.client.get(self.url("/applications/my-applications"));
        self.send_json(request, "my applications").await
    }

    async fn fetch_recruiter_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, ServiceError> {
        let request = self.recruiter_request(status);
        self.send_json(request, "recruiter applications").await
    }

    async fn fetch_application(&self, id: ApplicationId) -> Result<Application, ServiceError> {
        let request = self.client.get(self.url(&format!("/applications/{id}")));
        self.send_json(request, &format!("application {id}")).await
    }

    async fn update_status(
        &self,
        id: ApplicationId,
        update: &StatusUpdate,
    ) -> Result<Application, ServiceError> {
        let request = self
            .client
            .put(self.url(&format!("/applications/{id}/status")))
            .json(update);
        self.send_json(request, &format!("application {id}")).await
    }

    async fn withdraw(&self, id: ApplicationId) -> Result<Application, ServiceError> {
        let request = self
            .client
            .put(self.url(&format!("/applications/{id}/withdraw")));
        self.send_json(request, &format!("application {id}")).await
    }
}

#[async_trait]
impl SavedJobsDirectory for HttpJobPortalClient {
    async fn list_saved_jobs(&self) -> Result<Vec<SavedJob>, ServiceError> {
        let request = self.client.get(self.url("/saved-jobs"));
        let jobs = self.send_envelope(request, "saved jobs").await?;
        Ok(jobs.unwrap_or_default())
    }

    async fn saved_jobs_count(&self) -> Result<u64, ServiceError> {
        let request = self.client.get(self.url("/saved-jobs/count"));
        let count = self.send_envelope(request, "saved jobs count").await?;
        Ok(count.unwrap_or(0))
    }

    async fn save_job(&self, job_id: JobId) -> Result<(), ServiceError> {
        let request = self.client.post(self.url(&format!("/jobs/{job_id}/save")));
        self.send_envelope::<serde_json::Value>(request, &format!("job {job_id}"))
            .await
            .map(|_| ())
    }

    async fn unsave_job(&self, job_id: JobId) -> Result<(), ServiceError> {
        let request = self
            .client
            .delete(self.url(&format!("/jobs/{job_id}/unsave")));
        self.send_envelope::<serde_json::Value>(request, &format!("saved job {job_id}"))
            .await
            .map(|_| ())
    }

    async fn apply_to_job(&self, job_id: JobId) -> Result<(), ServiceError> {
        let request = self.client.post(self.url(&format!("/jobs/{job_id}/apply")));
        self.send_envelope::<serde_json::Value>(request, &format!("job {job_id}"))
            .await
            .map(|_| ())
    }
}
