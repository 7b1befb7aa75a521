use crate::applications::{
    list_mine, list_recruiter, print_statuses, update_status, watch, withdraw, MineArgs,
    RecruiterArgs, UpdateArgs, WatchArgs, WithdrawArgs,
};
use crate::infra::Context;
use crate::saved::{run_saved, SavedCommand};
use clap::{Parser, Subcommand};
use job_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "job-portal",
    about = "Track job applications and saved jobs against the job portal API",
    version
)]
struct Cli {
    /// Override JOB_PORTAL_API_BASE_URL for this invocation
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the application status lifecycle
    Statuses,
    /// List your own applications
    Mine(MineArgs),
    /// Poll your applications and report status changes until interrupted
    Watch(WatchArgs),
    /// List applications received for your job postings
    Recruiter(RecruiterArgs),
    /// Move an application to a new status
    Update(UpdateArgs),
    /// Withdraw one of your applications
    Withdraw(WithdrawArgs),
    /// Browse and manage saved jobs
    Saved {
        #[command(subcommand)]
        command: SavedCommand,
    },
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    if let Command::Statuses = cli.command {
        print_statuses();
        return Ok(());
    }

    let context = Context::load(cli.base_url)?;
    match cli.command {
        Command::Statuses => Ok(()),
        Command::Mine(args) => list_mine(&context, args).await,
        Command::Watch(args) => watch(&context, args).await,
        Command::Recruiter(args) => list_recruiter(&context, args).await,
        Command::Update(args) => update_status(&context, args).await,
        Command::Withdraw(args) => withdraw(&context, args).await,
        Command::Saved { command } => run_saved(&context, command).await,
    }
}
