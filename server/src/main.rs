use anyhow::Result;
use axum::Router;
use clap::Parser;
use phrasebook_core::{Dataset, SearchEngine};
use phrasebook_server::build_app;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "phrasebook-server")]
#[command(about = "HTTP front-end for the phrasebook search engine", long_about = None)]
struct Args {
    /// Dataset JSON path; the builtin dataset is used when omitted
    #[arg(long)]
    dataset: Option<PathBuf>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let dataset = match args.dataset {
        Some(path) => Dataset::load(path)?,
        None => Dataset::builtin(),
    };
    let phrases = dataset.phrasebook();
    let engine = SearchEngine::new(dataset.records);
    let app: Router = build_app(engine, phrases);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
