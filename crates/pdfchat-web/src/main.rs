use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// pdfchat upload server: accepts PDF uploads on `POST /upload_pdf/`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Maximum upload size in megabytes (overrides config)
    #[arg(long)]
    max_upload_mb: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // Resolve config from CLI flags > env vars > config files > defaults
    let mut config = pdfchat_core::config_file::resolve_config();
    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }
    if let Some(mb) = args.max_upload_mb {
        config.max_upload_mb = mb;
    }

    let app = pdfchat_web::router(config.max_upload_mb * 1024 * 1024);

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!(%addr, max_upload_mb = config.max_upload_mb, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
