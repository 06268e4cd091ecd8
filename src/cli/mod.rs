//! CLI module for loginwatch.
//!
//! ```ignore
//! use loginwatch::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! let code = run_cli_command(command, &config).await?;
//! std::process::exit(code);
//! ```

pub mod args;
pub mod status;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use status::{format_status, status_report};
pub use version::{version_line, VERSION};

use color_eyre::Result;

use crate::config::WatchConfig;
use crate::job::{
    ensure_scheduled, run_daemon, run_with_config, FileScheduleRegistry, PeriodicJob, PeriodicWorkRequest, Scheduler,
    JOB_NAME,
};

/// Exit code when a run ends in `Failed`.
pub const EXIT_FAILED: i32 = 1;
/// Exit code for unrecognised arguments.
pub const EXIT_USAGE: i32 = 2;

/// Execute `command` and return the process exit code.
pub async fn run_cli_command(command: CliCommand, config: &WatchConfig) -> Result<i32> {
    match command {
        CliCommand::Run => {
            let report = run_with_config(config).await?;
            match &report.error {
                None => {
                    println!(
                        "{} logins checked, {} pending",
                        report.logins,
                        report.verdict.len()
                    );
                    Ok(0)
                }
                Some(err) => {
                    eprintln!("Error: {}", err);
                    Ok(EXIT_FAILED)
                }
            }
        }
        CliCommand::Schedule => {
            let registry = FileScheduleRegistry::new(config.schedule_file()?);
            let outcome = ensure_scheduled(&registry)?;
            println!("{}: {:?}", JOB_NAME, outcome);
            Ok(0)
        }
        CliCommand::Daemon => {
            let registry = FileScheduleRegistry::new(config.schedule_file()?);
            ensure_scheduled(&registry)?;
            let request = registry
                .registration(JOB_NAME)?
                .map(|r| r.request)
                .unwrap_or_else(PeriodicWorkRequest::pending_logins);

            let job = PeriodicJob::from_config(config)?;
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!("cannot listen for ctrl-c: {}", e);
                    std::future::pending::<()>().await;
                }
            };
            run_daemon(&job, &request, &config.auth_server_url, shutdown).await;
            Ok(0)
        }
        CliCommand::Status => {
            print!("{}", status_report(config).await?);
            Ok(0)
        }
        CliCommand::Version => {
            println!("{}", version_line());
            Ok(0)
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(0)
        }
        CliCommand::Unknown(arg) => {
            eprintln!("unknown argument: {}\n\n{}", arg, USAGE);
            Ok(EXIT_USAGE)
        }
    }
}
