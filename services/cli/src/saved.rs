use clap::{Args, Subcommand};
use job_portal::error::AppError;
use job_portal::saved_jobs::{BulkOutcome, SavedJobsPage, SavedJobsQuery};
use job_portal::JobId;

use crate::applications::write_json;
use crate::infra::{notice, Context};

#[derive(Subcommand, Debug)]
pub(crate) enum SavedCommand {
    /// List saved jobs with client-side filters and paging
    List(ListArgs),
    /// Print how many jobs are saved
    Count,
    /// Save a job posting
    Save(JobArgs),
    /// Remove one or more saved jobs
    Remove(BulkArgs),
    /// Apply to one or more saved jobs
    Apply(BulkArgs),
    /// Remove every saved job
    Clear,
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub(crate) page: usize,
    /// Jobs per page
    #[arg(long, default_value_t = 10)]
    pub(crate) limit: usize,
    /// Match against title, company, or location
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Keep remote-friendly postings (true) or on-site ones (false)
    #[arg(long)]
    pub(crate) remote: Option<bool>,
    /// Keep postings you already applied to (true) or not yet (false)
    #[arg(long)]
    pub(crate) applied: Option<bool>,
    /// Only show postings of this job type, e.g. FULL_TIME
    #[arg(long)]
    pub(crate) job_type: Option<String>,
    /// Print the page as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl ListArgs {
    fn query(&self) -> SavedJobsQuery {
        SavedJobsQuery {
            page: self.page,
            limit: self.limit,
            search: self.search.clone(),
            remote: self.remote,
            applied: self.applied,
            job_type: self.job_type.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct JobArgs {
    /// Job posting id
    pub(crate) id: u64,
}

#[derive(Args, Debug)]
pub(crate) struct BulkArgs {
    /// Job posting ids
    #[arg(required = true, num_args = 1..)]
    pub(crate) ids: Vec<u64>,
}

impl BulkArgs {
    fn job_ids(&self) -> Vec<JobId> {
        self.ids.iter().copied().map(JobId).collect()
    }
}

pub(crate) async fn run_saved(context: &Context, command: SavedCommand) -> Result<(), AppError> {
    let service = context.saved_jobs();
    match command {
        SavedCommand::List(args) => {
            let page = service.page(&args.query()).await?;
            if args.json {
                write_json(&page)?;
            } else {
                print_page(&page);
            }
        }
        SavedCommand::Count => {
            let count = service.count().await?;
            println!("{count} saved jobs");
        }
        SavedCommand::Save(args) => match service.save(JobId(args.id)).await {
            Ok(()) => println!("Saved job {}", args.id),
            Err(err) => notice("save job", &err),
        },
        SavedCommand::Remove(args) => {
            let outcome = service.bulk_remove(&args.job_ids()).await;
            print_outcome(&outcome);
        }
        SavedCommand::Apply(args) => {
            let outcome = service.bulk_apply(&args.job_ids()).await;
            print_outcome(&outcome);
        }
        SavedCommand::Clear => match service.clear_all().await {
            Ok(outcome) => print_outcome(&outcome),
            Err(err) => notice("clear saved jobs", &err),
        },
    }
    Ok(())
}

fn print_page(page: &SavedJobsPage) {
    if page.jobs.is_empty() {
        println!("No saved jobs match.");
    }
    for job in &page.jobs {
        let title = job.job_title.as_deref().unwrap_or("Untitled position");
        let company = job.company_name.as_deref().unwrap_or("-");
        let location = job.job_location.as_deref().unwrap_or("-");
        let applied = if job.is_applied { " [applied]" } else { "" };
        println!(
            "{:<6} {title} @ {company} ({location}){applied}",
            job.job_post_id
        );
    }
    println!(
        "Page {} of {} ({} jobs)",
        page.current_page,
        page.total_pages.max(1),
        page.total_jobs
    );
}

fn print_outcome(outcome: &BulkOutcome) {
    println!("{}", outcome.summary());
    for failure in &outcome.failed {
        eprintln!("notice: job {} failed: {}", failure.job_id, failure.error);
    }
}
