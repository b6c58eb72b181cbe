use std::process::ExitCode;

use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[tokio::main]
async fn main() -> ExitCode {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting portal client");

    let args: Vec<String> = std::env::args().skip(1).collect();

    match commands::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Every failure here is local to one user action; print it and
            // let the user retry.
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
