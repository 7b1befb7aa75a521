use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use clap::Args;
use job_portal::applications::{
    Application, ApplicationId, ApplicationStatus, StatusChangeError, StatusCounts,
};
use job_portal::error::AppError;
use tracing::{info, warn};

use crate::infra::{notice, parse_interval, parse_status, Context};

#[derive(Args, Debug, Default)]
pub(crate) struct MineArgs {
    /// Print the raw applications as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct WatchArgs {
    /// Polling interval in milliseconds (defaults to JOB_PORTAL_POLL_INTERVAL_MS)
    #[arg(long, value_parser = parse_interval)]
    pub(crate) interval_ms: Option<Duration>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RecruiterArgs {
    /// Only list applications in this status
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<ApplicationStatus>,
    /// Print per-status totals instead of the application list
    #[arg(long)]
    pub(crate) stats: bool,
    /// Print JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct UpdateArgs {
    /// Application id
    pub(crate) id: u64,
    /// Target status code, e.g. UNDER_REVIEW
    #[arg(value_parser = parse_status)]
    pub(crate) status: ApplicationStatus,
    /// Recruiter notes stored with the change
    #[arg(long)]
    pub(crate) notes: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct WithdrawArgs {
    /// Application id
    pub(crate) id: u64,
}

pub(crate) fn print_statuses() {
    println!(
        "{:<20} {:<20} {:<22} {:<8} {:<9} {:<9} NEXT",
        "CODE", "NAME", "ICON", "COLOR", "EDITABLE", "WITHDRAW"
    );
    for status in ApplicationStatus::ALL {
        let presentation = status.presentation();
        println!(
            "{:<20} {:<20} {:<22} {:<8} {:<9} {:<9} {}",
            status.code(),
            status.display_name(),
            presentation.icon,
            presentation.color,
            yes_no(status.is_editable()),
            yes_no(status.can_withdraw()),
            describe_next(status)
        );
    }
}

pub(crate) async fn list_mine(context: &Context, args: MineArgs) -> Result<(), AppError> {
    let applications = context.applications().refresh_my_applications().await?;
    if args.json {
        return write_json(&applications);
    }
    print_applications(&applications);
    Ok(())
}

pub(crate) async fn list_recruiter(context: &Context, args: RecruiterArgs) -> Result<(), AppError> {
    let service = context.applications();
    let applications = service.recruiter_applications(args.status).await?;

    if args.stats {
        let counts = service.statistics();
        if args.json {
            return write_json(&counts);
        }
        print_counts(&counts);
    } else if args.json {
        write_json(&applications)?;
    } else {
        print_applications(&applications);
    }
    Ok(())
}

pub(crate) async fn update_status(context: &Context, args: UpdateArgs) -> Result<(), AppError> {
    let id = ApplicationId(args.id);
    let result = context
        .applications()
        .propose_status_change(id, args.status, args.notes.as_deref())
        .await;

    match result {
        Ok(application) => println!(
            "Application {} is now {}",
            application.id,
            application.status.display_name()
        ),
        Err(StatusChangeError::InvalidTransition(rejection)) => {
            notice("status update", &rejection);
            eprintln!("allowed next statuses: {}", describe_next(rejection.from));
        }
        Err(err) => notice("status update", &err),
    }
    Ok(())
}

pub(crate) async fn withdraw(context: &Context, args: WithdrawArgs) -> Result<(), AppError> {
    match context.applications().withdraw(ApplicationId(args.id)).await {
        Ok(application) => println!("Application {} withdrawn", application.id),
        Err(err) => notice("withdrawal", &err),
    }
    Ok(())
}

pub(crate) async fn watch(context: &Context, args: WatchArgs) -> Result<(), AppError> {
    let interval = args.interval_ms.unwrap_or(context.config.polling.interval);
    let service = context.applications();

    let mut known = match service.refresh_my_applications().await {
        Ok(applications) => {
            print_applications(&applications);
            status_index(&applications)
        }
        Err(err) => {
            warn!(error = %err, "initial load failed; waiting for the first poll");
            BTreeMap::new()
        }
    };

    let handle = service.start_polling(interval, move |applications| {
        let now = Local::now().format("%H:%M:%S");
        for application in &applications {
            match known.get(&application.id) {
                Some(previous) if *previous == application.status => {}
                Some(previous) => println!(
                    "[{now}] {}: {} -> {}",
                    application.headline(),
                    previous.display_name(),
                    application.status.display_name()
                ),
                None => println!(
                    "[{now}] {}: {}",
                    application.headline(),
                    application.status.display_name()
                ),
            }
        }
        known = status_index(&applications);
    })?;

    info!(
        poll = %handle.id(),
        interval_ms = interval.as_millis() as u64,
        "watching applications; press ctrl-c to stop"
    );
    tokio::signal::ctrl_c().await?;
    handle.stop();
    info!(poll = %handle.id(), "stopped watching");
    Ok(())
}

fn status_index(applications: &[Application]) -> BTreeMap<ApplicationId, ApplicationStatus> {
    applications
        .iter()
        .map(|application| (application.id, application.status))
        .collect()
}

fn print_applications(applications: &[Application]) {
    if applications.is_empty() {
        println!("No applications found.");
        return;
    }
    println!(
        "{:<6} {:<40} {:<20} {:<12} NEXT",
        "ID", "POSITION", "STATUS", "APPLIED"
    );
    for application in applications {
        println!(
            "{:<6} {:<40} {:<20} {:<12} {}",
            application.id,
            truncate(&application.headline(), 40),
            application.status.display_name(),
            format_date(application.apply_date),
            describe_next(application.status)
        );
    }
}

fn print_counts(counts: &StatusCounts) {
    for (status, count) in counts.iter() {
        println!("{:<20} {count}", status.display_name());
    }
    println!("{:<20} {}", "Total", counts.total());
}

fn describe_next(status: ApplicationStatus) -> String {
    let next = status.allowed_next();
    if next.is_empty() {
        "(final)".to_string()
    } else {
        next.iter()
            .map(|status| status.code())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn format_date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|date| date.with_timezone(&Local).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let kept: String = value.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub(crate) fn write_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(std::io::Error::from)?;
    writeln!(stdout)?;
    Ok(())
}
