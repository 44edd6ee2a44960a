use anyhow::Result;
use pitch_sim::{ args::parse_cli, engine };
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{:?}", e.context("fatal error"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = parse_cli();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    engine::run(cli).await
}
