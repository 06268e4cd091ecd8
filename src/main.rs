use loginwatch::cli::{parse_args, run_cli_command, version_line, CliCommand, USAGE};
use loginwatch::config::WatchConfig;
use loginwatch::logging;

use color_eyre::Result;

fn main() -> Result<()> {
    let command = parse_args(std::env::args());

    // Handle flags that need no configuration before any initialization
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        _ => {}
    }

    color_eyre::install()?;

    let config = WatchConfig::from_env()?;
    logging::init(&config.log_filter, config.log_format);
    tracing::debug!(?command, "starting");

    let runtime = tokio::runtime::Runtime::new()?;
    let code = runtime.block_on(run_cli_command(command, &config))?;

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
