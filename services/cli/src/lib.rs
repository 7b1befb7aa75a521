mod applications;
mod cli;
mod infra;
mod saved;

use job_portal::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
