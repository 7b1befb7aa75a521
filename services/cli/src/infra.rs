use std::sync::Arc;
use std::time::Duration;

use job_portal::applications::{ApplicationStatus, ApplicationStatusService};
use job_portal::config::{validate_base_url, AppConfig};
use job_portal::error::AppError;
use job_portal::saved_jobs::SavedJobsService;
use job_portal::{telemetry, HttpJobPortalClient};
use tracing::info;

/// Loaded configuration plus the shared backend client.
pub(crate) struct Context {
    pub(crate) config: AppConfig,
    client: Arc<HttpJobPortalClient>,
}

impl Context {
    pub(crate) fn load(base_url: Option<String>) -> Result<Self, AppError> {
        let mut config = AppConfig::load()?;
        if let Some(base_url) = base_url {
            config.api.base_url = validate_base_url(base_url)?;
        }

        telemetry::init(&config.telemetry)?;

        let client = HttpJobPortalClient::new(&config.api)?;
        info!(
            environment = ?config.environment,
            base_url = %config.api.base_url,
            authenticated = config.api.token.is_some(),
            "job portal client ready"
        );

        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    pub(crate) fn applications(&self) -> ApplicationStatusService<HttpJobPortalClient> {
        ApplicationStatusService::new(Arc::clone(&self.client))
    }

    pub(crate) fn saved_jobs(&self) -> SavedJobsService<HttpJobPortalClient> {
        SavedJobsService::new(Arc::clone(&self.client))
    }
}

/// Command-line status argument. Unlike wire codes, case and surrounding whitespace are
/// forgiven here.
pub(crate) fn parse_status(raw: &str) -> Result<ApplicationStatus, String> {
    ApplicationStatus::parse(&raw.trim().to_ascii_uppercase()).ok_or_else(|| {
        let known: Vec<&str> = ApplicationStatus::ALL.iter().map(|s| s.code()).collect();
        format!(
            "unknown application status '{raw}'; expected one of {}",
            known.join(", ")
        )
    })
}

pub(crate) fn parse_interval(raw: &str) -> Result<Duration, String> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err("interval must be greater than zero".to_string()),
        Ok(millis) => Ok(Duration::from_millis(millis)),
        Err(err) => Err(format!("invalid interval '{raw}': {err}")),
    }
}

/// Report a failed mutation without aborting the command.
pub(crate) fn notice(action: &str, err: &dyn std::error::Error) {
    tracing::warn!(action, error = %err, "operation failed");
    eprintln!("notice: {action} failed: {err}");
}
