use anyhow::Result;
use axum::Router;
use clap::Parser;
use search_core::IndexKind;
use server::{build_app, AppConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Index file path
    #[arg(long, default_value = "./index.jsonl")]
    index: PathBuf,
    /// Index implementation: tfidf or naive
    #[arg(long, default_value_t = IndexKind::TfIdf)]
    kind: IndexKind,
    /// Corpus (JSON/JSONL file or directory) used for titles and snippets
    #[arg(long)]
    corpus: Option<PathBuf>,
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
    let config = AppConfig {
        index: args.index,
        kind: args.kind,
        corpus: args.corpus,
        admin_token: std::env::var("ADMIN_TOKEN").ok(),
    };
    let app: Router = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
