//! Command-line interface definitions.
//!
//! With no arguments the binary runs the full tagging sweep from the
//! configured start date to today, using the built-in configuration and the
//! `data` cache directory.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Fill the cache up to yesterday and refresh data/today.json
/// bestreply_trends fetch
///
/// # Tag 2014 only and also write JSON per day
/// bestreply_trends --start-date 2014-01-01 tag --end-date 2014-12-31 -j ./tags
///
/// # Use a custom entity list
/// bestreply_trends --config ./keywords.yaml tag
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a YAML configuration file (defaults to the built-in one)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Cache directory holding one JSON document per day
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// First day of history, YYYY-MM-DD
    #[arg(short, long, global = true)]
    pub start_date: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Download every missing day up to yesterday, then refresh the `today` alias
    Fetch {
        /// Number of articles requested per day (at least 1)
        #[arg(short, long)]
        limit: Option<NonZeroUsize>,
    },
    /// Tag each article of each day with trending keywords
    Tag {
        /// Last day to tag, YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        end_date: Option<NaiveDate>,

        /// Also write one JSON file per day into this directory
        #[arg(short, long)]
        json_output_dir: Option<PathBuf>,

        /// Do not print tagged articles to stdout
        #[arg(short, long)]
        quiet: bool,
    },
}

impl Cli {
    /// The subcommand to run; tagging when none was given.
    pub fn action(&self) -> Command {
        self.command.clone().unwrap_or(Command::Tag {
            end_date: None,
            json_output_dir: None,
            quiet: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_means_tag() {
        let cli = Cli::parse_from(["bestreply_trends"]);
        assert!(cli.config.is_none());
        assert!(cli.data_dir.is_none());
        assert_eq!(
            cli.action(),
            Command::Tag {
                end_date: None,
                json_output_dir: None,
                quiet: false
            }
        );
    }

    #[test]
    fn test_fetch_with_limit() {
        let cli = Cli::parse_from(["bestreply_trends", "fetch", "--limit", "50"]);
        assert_eq!(
            cli.action(),
            Command::Fetch {
                limit: NonZeroUsize::new(50)
            }
        );
    }

    #[test]
    fn test_fetch_zero_limit_rejected() {
        assert!(Cli::try_parse_from(["bestreply_trends", "fetch", "--limit", "0"]).is_err());
        assert!(Cli::try_parse_from(["bestreply_trends", "fetch", "-l", "-5"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "bestreply_trends",
            "tag",
            "-d",
            "/tmp/cache",
            "--start-date",
            "2014-01-01",
            "--end-date",
            "2014-12-31",
            "-j",
            "/tmp/tags",
            "-q",
        ]);

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/cache")));
        assert_eq!(cli.start_date, NaiveDate::from_ymd_opt(2014, 1, 1));
        assert_eq!(
            cli.action(),
            Command::Tag {
                end_date: NaiveDate::from_ymd_opt(2014, 12, 31),
                json_output_dir: Some(PathBuf::from("/tmp/tags")),
                quiet: true,
            }
        );
    }

    #[test]
    fn test_bad_date_rejected() {
        assert!(Cli::try_parse_from(["bestreply_trends", "--start-date", "2014-13-01"]).is_err());
    }
}
