// server/src/main.rs

// Entry point for the SYNAPSS store CLI.

use anyhow::Result;
use env_logger::Env;
use synapss_server::cli::start_cli;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    // Logs go to stderr so stdout stays pure JSON.
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    start_cli().await
}
