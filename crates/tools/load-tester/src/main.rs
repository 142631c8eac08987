//! HTTP load generator for the storefront API.

mod scenario;
mod stats;

use std::time::Duration;

use clap::Parser;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::scenario::{Pacing, Scenario, VirtualUser};
use crate::stats::Report;

#[derive(Parser, Debug)]
#[command(name = "load-tester")]
#[command(about = "Drive the storefront API with weighted virtual users")]
struct Cli {
    /// Endpoints to exercise
    #[arg(value_enum, default_value = "all")]
    scenario: Scenario,
    /// Base URL of the API
    #[arg(long, env = "LOAD_TEST_HOST", default_value = "http://127.0.0.1:8000")]
    host: String,
    /// Concurrent virtual users
    #[arg(long, default_value_t = 10)]
    users: usize,
    /// Length of the run
    #[arg(long, default_value_t = 60)]
    duration_secs: u64,
    /// Shortest pause between two tasks of one user
    #[arg(long, default_value_t = 1000)]
    min_wait_ms: u64,
    /// Longest pause between two tasks of one user
    #[arg(long, default_value_t = 5000)]
    max_wait_ms: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let pacing = Pacing {
        min_wait: Duration::from_millis(cli.min_wait_ms),
        max_wait: Duration::from_millis(cli.max_wait_ms.max(cli.min_wait_ms)),
    };
    let deadline = Instant::now() + Duration::from_secs(cli.duration_secs);

    info!(
        host = %cli.host,
        users = cli.users,
        duration_secs = cli.duration_secs,
        scenario = ?cli.scenario,
        "Starting load test"
    );

    let mut workers = JoinSet::new();
    for index in 0..cli.users {
        let user = VirtualUser::new(client.clone(), cli.host.clone(), cli.scenario.for_user(index));
        workers.spawn(user.run(deadline, pacing));
    }

    let mut report = Report::default();
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(user_report) => report.merge(user_report),
            Err(e) => error!(error = %e, "Virtual user aborted"),
        }
    }

    println!("{}", report.render());
    info!(
        requests = report.total_requests(),
        failures = report.total_failures(),
        "Load test finished"
    );
    Ok(())
}
