use clap::Parser;
use plasma::adapters::AppState;
use plasma::cli::Cli;
use plasma::config::Settings;
use plasma::persistence::RequestLog;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;
    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!("Starting Plasma synthetic data server on {}:{}", host, port);

    // The request log is an optional collaborator; a broken sink downgrades
    // to a warning instead of refusing to start.
    let request_log = match &settings.database {
        Some(database) => {
            match RequestLog::connect(&database.url, database.max_connections).await {
                Ok(log) => Some(log),
                Err(e) => {
                    warn!("request log disabled: {}", e);
                    None
                }
            }
        }
        None => None,
    };

    let state = AppState::new(Arc::new(settings), request_log);
    let app = plasma::create_app(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
