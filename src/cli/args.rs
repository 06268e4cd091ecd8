//! Command-line argument parsing for loginwatch.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Run the job once (default)
    Run,
    /// Register the periodic schedule
    Schedule,
    /// Run on the registered cadence in the foreground
    Daemon,
    /// Print the alert currently shown
    Status,
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Unrecognised argument
    Unknown(String),
}

/// Parse command-line arguments and return the command to execute.
///
/// The first recognised argument wins.
///
/// # Examples
///
/// ```
/// use loginwatch::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["loginwatch".to_string(), "schedule".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Schedule);
/// ```
pub fn parse_args<I>(mut args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    if let Some(arg) = args.nth(1) {
        return match arg.as_str() {
            "run" => CliCommand::Run,
            "schedule" => CliCommand::Schedule,
            "daemon" => CliCommand::Daemon,
            "status" => CliCommand::Status,
            "--version" | "-V" | "version" => CliCommand::Version,
            "--help" | "-h" | "help" => CliCommand::Help,
            _ => CliCommand::Unknown(arg),
        };
    }
    CliCommand::Run
}

/// Usage text for `--help`.
pub const USAGE: &str = "\
loginwatch - watch for pending logins from other devices

USAGE:
    loginwatch [COMMAND]

COMMANDS:
    run         Check once and update the alert (default)
    schedule    Register the 12 hour periodic check
    daemon      Run checks on the registered cadence until interrupted
    status      Print the alert currently shown
    version     Print the version

Configuration is read from LOGINWATCH_* environment variables.";

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_no_args_runs() {
        assert_eq!(parse(&["loginwatch"]), CliCommand::Run);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse(&["loginwatch", "run"]), CliCommand::Run);
        assert_eq!(parse(&["loginwatch", "schedule"]), CliCommand::Schedule);
        assert_eq!(parse(&["loginwatch", "daemon"]), CliCommand::Daemon);
        assert_eq!(parse(&["loginwatch", "status"]), CliCommand::Status);
    }

    #[test]
    fn test_parse_version_and_help() {
        assert_eq!(parse(&["loginwatch", "--version"]), CliCommand::Version);
        assert_eq!(parse(&["loginwatch", "-V"]), CliCommand::Version);
        assert_eq!(parse(&["loginwatch", "-h"]), CliCommand::Help);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse(&["loginwatch", "--bogus"]),
            CliCommand::Unknown("--bogus".to_string())
        );
    }
}
