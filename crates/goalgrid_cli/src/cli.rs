use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// goalgrid - monthly goals, daily completions, and moods
#[derive(Parser, Debug)]
#[command(name = "goalgrid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, env = "GOALGRID_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// Absolute directory for rolling log files (logging is off when unset)
    #[arg(long, env = "GOALGRID_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, env = "GOALGRID_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print goals, week grids, and moods for one month as JSON
    Month {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        year: i32,

        /// Month, 0-indexed (0 = January)
        #[arg(short, long)]
        month: u32,
    },

    /// Apply a save-goals request read from a JSON file
    SaveGoals {
        /// Request file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        file: PathBuf,
    },

    /// Record the mood of one day
    SaveMood {
        #[arg(short, long)]
        username: String,

        /// ISO date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        #[arg(short, long)]
        emoji: String,
    },

    /// Print per-day completion statistics for one month as JSON
    Stats {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        year: i32,

        /// Month, 0-indexed (0 = January)
        #[arg(short, long)]
        month: u32,
    },

    /// Print month insights (average, best/worst day, streak, trend) as JSON
    Insights {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        year: i32,

        /// Month, 0-indexed (0 = January)
        #[arg(short, long)]
        month: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn month_command_parses_zero_based_month() {
        let cli = Cli::try_parse_from([
            "goalgrid", "month", "--username", "alice", "--year", "2026", "--month", "0",
        ])
        .unwrap();
        match cli.command {
            Commands::Month {
                username,
                year,
                month,
            } => {
                assert_eq!(username, "alice");
                assert_eq!(year, 2026);
                assert_eq!(month, 0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn save_goals_defaults_to_stdin() {
        let cli = Cli::try_parse_from(["goalgrid", "save-goals"]).unwrap();
        match cli.command {
            Commands::SaveGoals { file } => assert_eq!(file, PathBuf::from("-")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_options_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "goalgrid",
            "save-mood",
            "-u",
            "alice",
            "-d",
            "2026-01-05",
            "-e",
            "🙂",
            "--db-path",
            "/tmp/goalgrid-test.db",
        ])
        .unwrap();
        assert_eq!(cli.db_path, Some(PathBuf::from("/tmp/goalgrid-test.db")));
        assert!(matches!(cli.command, Commands::SaveMood { .. }));
    }

    #[test]
    fn negative_month_is_rejected() {
        assert!(Cli::try_parse_from([
            "goalgrid", "stats", "-u", "alice", "-y", "2026", "-m", "-1",
        ])
        .is_err());
    }

    #[test]
    fn insights_command_takes_month_selector() {
        let cli = Cli::try_parse_from([
            "goalgrid", "insights", "-u", "alice", "-y", "2026", "-m", "11",
        ])
        .unwrap();
        match cli.command {
            Commands::Insights {
                username,
                year,
                month,
            } => assert_eq!((username.as_str(), year, month), ("alice", 2026, 11)),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
