use clap::Parser;

use crate::format::DEFAULT_FORMATTER;

/// The verb is a free positional, not a clap subcommand: it is resolved
/// against the command and provider registries at runtime.
#[derive(Debug, Parser)]
#[command(name = "skycast")]
#[command(about = "Console weather aggregator scraping AccuWeather and rp5.ua")]
#[command(version)]
pub struct Cli {
    /// Provider id or command name; runs every provider when omitted
    pub verb: Option<String>,

    /// Extra arguments for the selected command
    pub args: Vec<String>,

    /// Bypass the page cache for this invocation
    #[arg(long)]
    pub refresh: bool,

    /// Output format
    #[arg(short, long, default_value = DEFAULT_FORMATTER)]
    pub formatter: String,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Show full diagnostics for developers
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["skycast"]).unwrap();

        assert!(cli.verb.is_none());
        assert!(cli.args.is_empty());
        assert!(!cli.refresh);
        assert!(!cli.debug);
        assert_eq!(cli.formatter, "table");
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_verb_with_flags() {
        let cli = Cli::try_parse_from(["skycast", "accu", "--refresh", "--debug", "-v"]).unwrap();

        assert_eq!(cli.verb.as_deref(), Some("accu"));
        assert!(cli.refresh);
        assert!(cli.debug);
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_command_arguments_collected() {
        let cli = Cli::try_parse_from(["skycast", "configurate", "rp5"]).unwrap();

        assert_eq!(cli.verb.as_deref(), Some("configurate"));
        assert_eq!(cli.args, vec!["rp5".to_string()]);
    }

    #[test]
    fn test_formatter_selection() {
        let cli = Cli::try_parse_from(["skycast", "accu", "-f", "plain"]).unwrap();
        assert_eq!(cli.formatter, "plain");
    }
}
