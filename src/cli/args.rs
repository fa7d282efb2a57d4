use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::config::StoreBackend;

#[derive(Parser, Debug)]
#[command(name = "studyfocus")]
#[command(about = "A Pomodoro-style focus timer with session history")]
#[command(long_about = "studyfocus - A focus timer for the terminal

Alternates work and break phases, records every completed phase, and
reports focus statistics and streaks.

QUICK START:
  studyfocus run                     Start the interactive timer
  studyfocus run --work 50m --break 10m
  studyfocus run --plain --cycles 4  Line-mode timer for scripts
  studyfocus stats                   Focus totals, weekly goal, streak
  studyfocus history --since 7d      Recent intervals

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  studyfocus <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output,
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to the `general.default_output` config value.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Data directory (defaults to ~/.studyfocus)
    #[arg(long, env = "STUDYFOCUS_HOME", global = true)]
    pub home: Option<PathBuf>,

    /// Session store backend, overriding the config file
    #[arg(long, value_enum, global = true)]
    pub store: Option<StoreBackend>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the focus timer
    ///
    /// Opens the interactive timer. With --plain, prints one status line
    /// per second instead and stops after --cycles work phases.
    ///
    /// Examples:
    ///   studyfocus run
    ///   studyfocus run --work 50m --break 10m
    ///   studyfocus run --plain --cycles 2
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Show focus statistics
    ///
    /// Totals, averages, the last seven days, weekly goal progress and
    /// the current streak.
    #[command(visible_alias = "s")]
    Stats {
        /// Weekly goal in minutes (defaults to the config value)
        #[arg(long, short = 'g')]
        goal: Option<u32>,

        /// Time period (today, week, month, all)
        #[arg(long, short = 'p', default_value = "all")]
        period: String,
    },

    /// List recorded intervals
    ///
    /// DATE accepts today, yesterday, Nd (N days ago) or YYYY-MM-DD.
    ///
    /// Examples:
    ///   studyfocus history
    ///   studyfocus history --since 7d
    ///   studyfocus history --since 2024-06-01 --until 2024-06-08
    #[command(visible_alias = "h")]
    History {
        /// First day to include
        #[arg(long)]
        since: Option<String>,

        /// Last day to include
        #[arg(long)]
        until: Option<String>,

        /// Show at most this many intervals (most recent)
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Delete every recorded interval in this scope
    Clear {
        /// Required; there is no undo
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// View or change configuration
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// Example: studyfocus completions zsh > ~/.zsh/completions/_studyfocus
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,

        /// Show installation instructions
        #[arg(long, short = 'i')]
        install: bool,
    },
}

/// Arguments for the run command.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Work phase length (e.g., 25m, 1h, 90s, 50)
    #[arg(long, short = 'w')]
    pub work: Option<String>,

    /// Break phase length (e.g., 5m, 300s)
    #[arg(long = "break", short = 'b')]
    pub break_duration: Option<String>,

    /// Print status lines instead of the interactive view
    #[arg(long)]
    pub plain: bool,

    /// Stop after this many completed work phases
    #[arg(long, short = 'c')]
    pub cycles: Option<u32>,

    /// Wait for a keypress (or stop, in plain mode) after each phase
    #[arg(long)]
    pub no_auto_continue: bool,
}

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Change configuration values
    ///
    /// Example: studyfocus config set --work 50m --break 10m --goal 900
    Set {
        /// Work phase length
        #[arg(long)]
        work: Option<String>,

        /// Break phase length
        #[arg(long = "break")]
        break_duration: Option<String>,

        /// Start the next phase automatically
        #[arg(long)]
        auto_continue: Option<bool>,

        /// Weekly goal in minutes
        #[arg(long)]
        goal: Option<u32>,

        /// Default session store backend
        #[arg(long, value_enum)]
        backend: Option<StoreBackend>,

        /// Scope key for this device
        #[arg(long)]
        scope: Option<String>,
    },

    /// Print the config file location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_output_format_default() {
        let cli = Cli::try_parse_from(["studyfocus", "stats"]).unwrap();
        assert!(cli.output.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_output_format_short() {
        let cli = Cli::try_parse_from(["studyfocus", "-o", "json", "stats"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_stats_period() {
        let cli = Cli::try_parse_from(["studyfocus", "stats"]).unwrap();
        let Commands::Stats { period, goal } = cli.command else {
            panic!("expected stats");
        };
        assert_eq!(period, "all");
        assert_eq!(goal, None);

        let cli = Cli::try_parse_from(["studyfocus", "stats", "-p", "week"]).unwrap();
        assert!(matches!(cli.command, Commands::Stats { period, .. } if period == "week"));
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "studyfocus",
            "history",
            "-vv",
            "--store",
            "memory",
            "--home",
            "/tmp/sf",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.store, Some(StoreBackend::Memory));
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/sf")));
    }

    #[test]
    fn test_cli_run_args() {
        let cli = Cli::try_parse_from([
            "studyfocus",
            "run",
            "--work",
            "50m",
            "--break",
            "10m",
            "--plain",
            "--cycles",
            "2",
            "--no-auto-continue",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.work.as_deref(), Some("50m"));
        assert_eq!(args.break_duration.as_deref(), Some("10m"));
        assert!(args.plain);
        assert_eq!(args.cycles, Some(2));
        assert!(args.no_auto_continue);
    }

    #[test]
    fn test_cli_run_alias() {
        let cli = Cli::try_parse_from(["studyfocus", "r"]).unwrap();
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_history_args() {
        let cli = Cli::try_parse_from(["studyfocus", "history", "--since", "7d", "-n", "5"]).unwrap();
        let Commands::History { since, until, limit } = cli.command else {
            panic!("expected history command");
        };
        assert_eq!(since.as_deref(), Some("7d"));
        assert!(until.is_none());
        assert_eq!(limit, Some(5));
    }

    #[test]
    fn test_cli_config_set() {
        let cli = Cli::try_parse_from([
            "studyfocus",
            "config",
            "set",
            "--auto-continue",
            "false",
            "--goal",
            "900",
        ])
        .unwrap();
        let Commands::Config(args) = cli.command else {
            panic!("expected config command");
        };
        assert!(matches!(
            args.command,
            ConfigCommands::Set {
                auto_continue: Some(false),
                goal: Some(900),
                ..
            }
        ));
    }

    #[test]
    fn test_cli_completions_shell() {
        let cli = Cli::try_parse_from(["studyfocus", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions {
                shell: Shell::Zsh,
                install: false
            }
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_store() {
        assert!(Cli::try_parse_from(["studyfocus", "--store", "redis", "stats"]).is_err());
    }
}
