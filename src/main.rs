use std::fs;

use anyhow::Context;
use clap::Parser;
use log::info;

use timetable_solver::cli::{Cli, Command};
use timetable_solver::data::SchedulingInput;
use timetable_solver::server::{self, ServerConfig};
use timetable_solver::solver;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Serve { bind, limits } => {
            server::run_server(ServerConfig {
                bind,
                limits: limits.into(),
            })
            .await
            .with_context(|| format!("server on {bind} failed"))?;
        }
        Command::Solve {
            input,
            pretty,
            limits,
        } => {
            let raw = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let scheduling_input: SchedulingInput = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", input.display()))?;
            info!(
                "Loaded {} instructors from {}",
                scheduling_input.instructors.len(),
                input.display()
            );

            let output = solver::solve(&scheduling_input, &limits.into())?;
            let rendered = if pretty {
                serde_json::to_string_pretty(&output)?
            } else {
                serde_json::to_string(&output)?
            };
            println!("{rendered}");
        }
    }

    Ok(())
}
