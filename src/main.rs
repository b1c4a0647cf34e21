use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use twig::areas::repository::Repository;
use twig::artifacts::branch::branch_name::BranchName;
use twig::artifacts::branch::revision::Revision;
use twig::artifacts::checkout::CheckoutTarget;
use twig::artifacts::core::{PagerWriter, should_page, stdout_is_terminal};
use twig::errors::{TwigError, as_twig_error};

/// Environment variable holding the tracing filter; logging is off without it
const LOG_ENV: &str = "TWIG_LOG";

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A minimal version-control system",
    long_about = "twig tracks a flat directory of files with content-addressed commits, \
    branches and three-way merges.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Create a new repository in the current directory"
    )]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add { file: String },
    #[command(name = "commit", about = "Record the staged changes")]
    Commit {
        #[arg(allow_hyphen_values = true)]
        message: String,
    },
    #[command(
        name = "rm",
        about = "Unstage a file, or stage its removal and delete it"
    )]
    Rm { file: String },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(allow_hyphen_values = true)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged files and working changes")]
    Status,
    #[command(
        name = "checkout",
        about = "Restore a file or switch branches",
        long_about = "checkout -- <file> restores a file from the head commit, \
        checkout <commit> -- <file> restores it from any commit, \
        checkout <branch> switches to a branch."
    )]
    Checkout {
        target: Option<String>,
        #[arg(last = true)]
        file: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the head commit")]
    Branch { name: String },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch { name: String },
    #[command(name = "reset", about = "Move the current branch to a commit")]
    Reset { commit: String },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge { branch: String },
}

impl Commands {
    fn is_paged(&self) -> bool {
        matches!(self, Commands::Log | Commands::GlobalLog)
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return report_usage_error(error),
    };

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => match as_twig_error(&error) {
            Some(twig_error) => {
                println!("{twig_error}");
                ExitCode::FAILURE
            }
            None => {
                eprintln!("error: {error:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn init_tracing() {
    let Ok(filter) = std::env::var(LOG_ENV) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report_usage_error(error: clap::Error) -> ExitCode {
    let usage_error = match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            return ExitCode::SUCCESS;
        }
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            TwigError::MissingCommand
        }
        ErrorKind::InvalidSubcommand => TwigError::UnknownCommand,
        _ => TwigError::IncorrectOperands,
    };
    tracing::debug!(kind = ?error.kind(), "rejected command line");

    println!("{usage_error}");
    ExitCode::FAILURE
}

fn run(command: Commands) -> anyhow::Result<()> {
    let pwd = std::env::current_dir()?;
    colored::control::set_override(stdout_is_terminal());

    if let Commands::Init = command {
        let mut repository = Repository::new(&pwd, Box::new(std::io::stdout()))?;
        return repository.init();
    }

    if command.is_paged() && should_page() {
        let pager = minus::Pager::new();
        let repository = Repository::open(&pwd, Box::new(PagerWriter::new(pager.clone())))?;
        dispatch(repository, command)?;
        minus::page_all(pager)?;
        return Ok(());
    }

    let repository = Repository::open(&pwd, Box::new(std::io::stdout()))?;
    dispatch(repository, command)
}

fn dispatch(mut repository: Repository, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Init => repository.init(),
        Commands::Add { file } => repository.add(&file),
        Commands::Commit { message } => repository.commit(&message).map(|_| ()),
        Commands::Rm { file } => repository.rm(&file),
        Commands::Log => repository.log(),
        Commands::GlobalLog => repository.global_log(),
        Commands::Find { message } => repository.find(&message),
        Commands::Status => repository.status(),
        Commands::Checkout { target, file } => {
            repository.checkout(parse_checkout_target(target, file)?)
        }
        Commands::Branch { name } => repository.branch(&name),
        Commands::RmBranch { name } => repository.rm_branch(&name),
        Commands::Reset { commit } => repository.reset(&commit),
        Commands::Merge { branch } => repository.merge(&branch).map(|_| ()),
    }
}

fn parse_checkout_target(
    target: Option<String>,
    file: Option<String>,
) -> anyhow::Result<CheckoutTarget> {
    match (target, file) {
        (None, Some(file)) => Ok(CheckoutTarget::File(file)),
        (Some(commit), Some(file)) => Ok(CheckoutTarget::CommitFile(
            Revision::try_parse(&commit)?,
            file,
        )),
        (Some(branch), None) => {
            let branch_name =
                BranchName::try_parse(branch).map_err(|_| TwigError::NoSuchBranch)?;
            Ok(CheckoutTarget::Branch(branch_name))
        }
        (None, None) => Err(TwigError::IncorrectOperands.into()),
    }
}
