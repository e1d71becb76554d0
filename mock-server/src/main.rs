use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let credentials = mock_server::credentials_from(
        std::env::var("NETPROBES_USERNAME").ok(),
        std::env::var("NETPROBES_PASSWORD").ok(),
    )
    .map_err(|msg| {
        error!("refusing to start: {msg}");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, msg)
    })?;

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, auth = credentials.is_some(), "listening");
    mock_server::run(listener, credentials).await
}
