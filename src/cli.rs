use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::solver::SearchLimits;

/// Weekly timetable assignment for instructors and their courses.
#[derive(Debug, Parser)]
#[command(name = "timetable", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the solver over HTTP.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "TIMETABLE_BIND", default_value = "127.0.0.1:8080")]
        bind: SocketAddr,

        #[command(flatten)]
        limits: LimitArgs,
    },
    /// Solve one JSON input file and print the result.
    Solve {
        /// Path to the input JSON.
        input: PathBuf,

        /// Pretty-print the output.
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        limits: LimitArgs,
    },
}

#[derive(Debug, Clone, Copy, Args)]
pub struct LimitArgs {
    /// Give up after examining this many candidate slots.
    #[arg(long, env = "TIMETABLE_MAX_STEPS")]
    pub max_steps: Option<u64>,

    /// Give up after this many milliseconds.
    #[arg(long, env = "TIMETABLE_TIME_LIMIT_MS")]
    pub time_limit_ms: Option<u64>,
}

impl From<LimitArgs> for SearchLimits {
    fn from(args: LimitArgs) -> Self {
        SearchLimits {
            max_steps: args.max_steps,
            time_limit: args.time_limit_ms.map(Duration::from_millis),
        }
    }
}
