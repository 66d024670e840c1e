//! Command-line shell over `socialnet_core`.
//!
//! # Responsibility
//! - Open the record store, start logging, dispatch one command.
//! - Map success flags to the process exit code.

use clap::{Parser, Subcommand};
use socialnet_core::{
    default_log_level, init_logging, LoadOptions, LoadReport, OwnerPolicy, SqliteStatusRepository,
    StatusCollection,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "socialnet", version, about = "Manage users and status updates")]
struct Cli {
    /// Store file; created and migrated on first use.
    #[arg(long, env = "SOCIALNET_DB", default_value = "socialnet.db")]
    db: PathBuf,

    /// trace|debug|info|warn|error (defaults by build mode).
    #[arg(long, env = "SOCIALNET_LOG_LEVEL")]
    log_level: Option<String>,

    #[arg(long, env = "SOCIALNET_LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bulk-load users from `user_id,user_name,user_last_name,email` CSV.
    LoadUsers {
        file: PathBuf,
        /// Skip malformed rows instead of stopping at the first one.
        #[arg(long)]
        skip_malformed: bool,
    },
    /// Bulk-load statuses from `status_id,user_id,status_text` CSV.
    LoadStatuses {
        file: PathBuf,
        #[arg(long)]
        skip_malformed: bool,
        /// Reject statuses whose owner is not a known user.
        #[arg(long)]
        require_owner: bool,
    },
    AddUser {
        user_id: String,
        user_name: String,
        user_last_name: String,
        email: String,
    },
    UpdateUser {
        user_id: String,
        email: String,
        user_name: String,
        user_last_name: String,
    },
    DeleteUser {
        user_id: String,
    },
    SearchUser {
        user_id: String,
    },
    AddStatus {
        status_id: String,
        user_id: String,
        status_text: String,
        #[arg(long)]
        require_owner: bool,
    },
    UpdateStatus {
        status_id: String,
        user_id: String,
        status_text: String,
    },
    DeleteStatus {
        status_id: String,
    },
    SearchStatus {
        status_id: String,
    },
    /// List every status owned by a user.
    ListStatuses {
        user_id: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, &cli.log_dir) {
        eprintln!("socialnet: logging disabled: {err}");
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("socialnet: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let conn = socialnet_core::db::open_db(&cli.db)?;
    let users = socialnet_core::init_user_collection(&conn)?;
    let statuses = StatusCollection::with_owner_policy(
        SqliteStatusRepository::try_new(&conn)?,
        owner_policy(&cli.command),
    );

    let succeeded = match &cli.command {
        Command::LoadUsers {
            file,
            skip_malformed,
        } => {
            let options = load_options(*skip_malformed);
            print_report(&socialnet_core::load_users_with(file, &users, &options))
        }
        Command::LoadStatuses {
            file,
            skip_malformed,
            ..
        } => {
            let options = load_options(*skip_malformed);
            print_report(&socialnet_core::load_status_updates_with(
                file, &statuses, &users, &options,
            ))
        }
        Command::AddUser {
            user_id,
            user_name,
            user_last_name,
            email,
        } => socialnet_core::add_user(user_id, user_name, user_last_name, email, &users),
        Command::UpdateUser {
            user_id,
            email,
            user_name,
            user_last_name,
        } => socialnet_core::update_user(user_id, email, user_name, user_last_name, &users),
        Command::DeleteUser { user_id } => socialnet_core::delete_user(user_id, &users),
        Command::SearchUser { user_id } => match socialnet_core::search_user(user_id, &users) {
            Some(user) => {
                println!(
                    "{} {} {} <{}> statuses={}",
                    user.user_id, user.user_name, user.user_last_name, user.email, user.status_count
                );
                true
            }
            None => {
                println!("user not found: {user_id}");
                false
            }
        },
        Command::AddStatus {
            status_id,
            user_id,
            status_text,
            ..
        } => socialnet_core::add_status(status_id, user_id, status_text, &statuses, &users),
        Command::UpdateStatus {
            status_id,
            user_id,
            status_text,
        } => socialnet_core::update_status(status_id, user_id, status_text, &statuses),
        Command::DeleteStatus { status_id } => socialnet_core::delete_status(status_id, &statuses),
        Command::SearchStatus { status_id } => {
            match socialnet_core::search_status(status_id, &statuses) {
                Some(status) => {
                    println!("{} {}: {}", status.status_id, status.user_id, status.status_text);
                    true
                }
                None => {
                    println!("status not found: {status_id}");
                    false
                }
            }
        }
        Command::ListStatuses { user_id } => {
            for status in socialnet_core::search_all_status_updates(user_id, &statuses) {
                println!("{}: {}", status.status_id, status.status_text);
            }
            true
        }
    };

    Ok(succeeded)
}

fn load_options(skip_malformed: bool) -> LoadOptions {
    if skip_malformed {
        LoadOptions::skip_malformed()
    } else {
        LoadOptions::default()
    }
}

fn owner_policy(command: &Command) -> OwnerPolicy {
    match command {
        Command::LoadStatuses {
            require_owner: true,
            ..
        }
        | Command::AddStatus {
            require_owner: true,
            ..
        } => OwnerPolicy::RequireExisting,
        _ => OwnerPolicy::Unchecked,
    }
}

fn print_report(report: &LoadReport) -> bool {
    println!(
        "read={} inserted={} duplicates={} malformed={}",
        report.rows_read, report.inserted, report.duplicates, report.malformed
    );
    if let Some(reason) = &report.aborted {
        println!("aborted: {reason}");
    }
    report.is_success()
}
