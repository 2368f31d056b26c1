use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};

#[derive(Debug, Clone)]
pub struct Settings {
    pub platform_url: String,
    pub customer_uuid: String,
    pub api_token: String,
    pub universe_uuid: String,
    /// Locks the form to one table of the universe.
    pub table_uuid: Option<String>,
    pub is_scheduled: bool,
    pub dry_run: bool,
    pub log_file: PathBuf,
    pub log_level: String,
}

pub fn command() -> Command {
    Command::new("YugabyteDB Backup")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interactive backup form for YugabyteDB Anywhere universes")
        .arg(
            Arg::new("universe")
                .long("universe")
                .short('u')
                .required(true)
                .help("UUID of the universe to back up"),
        )
        .arg(
            Arg::new("table")
                .long("table")
                .short('t')
                .help("Back up only this table UUID"),
        )
        .arg(
            Arg::new("scheduled")
                .long("scheduled")
                .help("Create a scheduled backup (frequency or cron expression)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Run in dry-run mode (log backup requests without sending them)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("platform-url")
                .long("platform-url")
                .env("YB_PLATFORM_URL")
                .default_value("http://localhost:9000")
                .help("Base URL of the YugabyteDB Anywhere platform"),
        )
        .arg(
            Arg::new("customer")
                .long("customer")
                .env("YB_CUSTOMER_UUID")
                .required(true)
                .help("Customer UUID on the platform"),
        )
        .arg(
            Arg::new("api-token")
                .long("api-token")
                .env("YB_API_TOKEN")
                .hide_env_values(true)
                .required(true)
                .help("Platform API token"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .default_value("yb-backup-tui.log")
                .value_parser(clap::value_parser!(PathBuf))
                .help("File the log is written to"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .default_value("info")
                .help("Log level or filter directive, RUST_LOG takes precedence"),
        )
}

impl Settings {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let string = |name: &str| -> Result<String> {
            matches
                .get_one::<String>(name)
                .cloned()
                .ok_or_else(|| anyhow!("Missing required argument --{}", name))
        };

        Ok(Self {
            platform_url: string("platform-url")?,
            customer_uuid: string("customer")?,
            api_token: string("api-token")?,
            universe_uuid: string("universe")?,
            table_uuid: matches.get_one::<String>("table").cloned(),
            is_scheduled: matches.get_flag("scheduled"),
            dry_run: matches.get_flag("dry-run"),
            log_file: matches
                .get_one::<PathBuf>("log-file")
                .cloned()
                .ok_or_else(|| anyhow!("Missing required argument --log-file"))?,
            log_level: string("log-level")?,
        })
    }

    pub fn parse() -> Result<Self> {
        Self::from_matches(&command().get_matches())
    }
}
