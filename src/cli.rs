use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ecommerce-dashboard")]
#[command(version, about = "Summarize an e-commerce transaction export for a dashboard")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Date window shared by the subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// First purchase date to include (YYYY-MM-DD), defaults to the earliest in the data
    #[arg(short, long)]
    pub start: Option<NaiveDate>,

    /// Last purchase date to include (YYYY-MM-DD), defaults to the latest in the data
    #[arg(short = 'e', long)]
    pub end: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the summary tables for a date range
    Summary {
        /// Joined transaction CSV (e.g. main_data.csv)
        input: PathBuf,

        #[command(flatten)]
        range: RangeArgs,

        /// Emit all tables as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write the summary tables to a SQLite database
    Export {
        /// Joined transaction CSV (e.g. main_data.csv)
        input: PathBuf,

        /// Output SQLite database path
        output_db: PathBuf,

        #[command(flatten)]
        range: RangeArgs,

        /// Only include these tables (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        include: Option<Vec<String>>,

        /// Exclude these tables (comma-separated)
        #[arg(short = 'x', long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,
    },

    /// List all exportable table names
    ListTables,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Log filter directive for the verbosity count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
