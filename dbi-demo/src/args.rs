use clap::Parser;
use serde::Serialize;
use sql_dbi::{ConnectOptions, DatabaseType};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Walk through the sql-dbi access styles against a scratch table")]
pub(crate) struct Args {
    /// Driver identifier, e.g. sqlite3
    #[arg(long, value_enum, default_value = "sqlite3")]
    pub(crate) driver: DatabaseType,
    #[arg(long, default_value = "test.sqlite3")]
    pub(crate) dbname: String,
    #[arg(long, default_value = ".")]
    pub(crate) dbdir: PathBuf,
    /// Busy timeout in milliseconds
    #[arg(long)]
    pub(crate) timeout_ms: Option<u64>,
    /// Also write log output to this file
    #[arg(long)]
    pub(crate) log: Option<PathBuf>,
    /// Pretty-print rows read through the cursor
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct DemoConfig {
    pub(crate) driver: String,
    pub(crate) dbname: String,
    pub(crate) dbdir: PathBuf,
    pub(crate) timeout_ms: Option<u64>,
    pub(crate) log: Option<PathBuf>,
    pub(crate) pretty: bool,
    #[serde(skip)]
    pub(crate) driver_type: DatabaseType,
}

impl DemoConfig {
    pub(crate) fn from_args(args: Args) -> Self {
        DemoConfig {
            driver: format!("{:?}", args.driver).to_lowercase(),
            dbname: args.dbname,
            dbdir: args.dbdir,
            timeout_ms: args.timeout_ms,
            log: args.log,
            pretty: args.pretty,
            driver_type: args.driver,
        }
    }

    pub(crate) fn connect_options(&self) -> ConnectOptions {
        let mut opts = ConnectOptions::new()
            .with("dbname", &self.dbname)
            .with("sqlite3_dbdir", self.dbdir.display());
        if let Some(ms) = self.timeout_ms {
            opts.set("sqlite3_timeout", ms);
        }
        opts
    }
}
