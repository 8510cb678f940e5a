use anyhow::{anyhow, Result};
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use clap::Parser;
use dotenv::dotenv;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eth_dashboard::config::{validate_settings, ApplicationSettings, Settings};
use eth_dashboard::dashboard::{PollInterval, Poller};
use eth_dashboard::eth_rpc::{Address, EthRpcClient};
use eth_dashboard::frontend::{self, templates};
use eth_dashboard::metrics::{self, Metrics};
use eth_dashboard::api;

#[derive(Parser)]
#[command(about = "Live Ethereum account and chain dashboard")]
struct Args {
    /// JSON-RPC endpoint, overrides rpc.url
    #[arg(long)]
    rpc_url: Option<String>,

    /// Account to watch, overrides account.address
    #[arg(long)]
    address: Option<String>,

    /// Fetch once, print the panel and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let mut settings = Settings::new().unwrap_or_else(|e| {
        error!("Failed to load configuration: {:?}", e);
        std::process::exit(1);
    });
    if let Some(url) = args.rpc_url {
        settings.rpc.url = url;
    }
    if let Some(address) = args.address {
        settings.account.address = address;
    }
    if let Err(e) = validate_settings(&settings) {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("Loaded settings: {:?}", settings);

    let address: Address = settings
        .account
        .address
        .parse()
        .map_err(|e| anyhow!("Invalid account address: {}", e))?;
    let client = EthRpcClient::new(settings.rpc.url.clone(), settings.rpc.timeout())?;

    if args.once {
        return run_once(client, address, &settings).await;
    }

    // Set up metrics
    let prometheus_handle = metrics::setup_metrics_recorder()?;
    let app_metrics = Metrics::new(prometheus_handle);

    info!("Prometheus metrics initialized");

    let poller = Poller::new(client, address, settings.poller.interval());
    let dashboard = poller.dashboard();
    let poller_handle = poller.spawn();

    let app = Router::new()
        .merge(frontend::create_frontend_router(
            dashboard.clone(),
            &settings.application.title,
        ))
        .merge(api::create_router(dashboard))
        .merge(metrics::create_metrics_router(app_metrics))
        .layer(cors_layer(&settings.application));

    info!("Successfully initialized router");

    // Start the HTTP server
    let addr = SocketAddr::from((
        settings
            .application
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or(std::net::IpAddr::from([0, 0, 0, 0])),
        settings.application.port,
    ));

    let listener = TcpListener::bind(addr).await?;
    info!("Dashboard listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    poller_handle.stop().await;
    info!("Dashboard shut down");

    Ok(())
}

async fn run_once(client: EthRpcClient, address: Address, settings: &Settings) -> Result<()> {
    let poller = Poller::new(client, address, PollInterval::default());
    let ok = poller.refresh().await;

    let snapshot = poller.dashboard().read().await.snapshot(Instant::now());
    print!("{}", templates::render_text(&settings.application.title, &snapshot));

    if ok {
        Ok(())
    } else {
        Err(anyhow!("Failed to fetch data from {}", settings.rpc.url))
    }
}

fn cors_layer(application: &ApplicationSettings) -> CorsLayer {
    let origin: AllowOrigin = match application.cors_allow_origin.trim() {
        "*" => Any.into(),
        origin => origin
            .parse::<HeaderValue>()
            .map(AllowOrigin::exact)
            .unwrap_or_else(|_| Any.into()),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(
            application
                .cors_allow_methods
                .split(',')
                .map(|s| s.trim().parse::<Method>().unwrap_or(Method::GET))
                .collect::<Vec<Method>>(),
        )
        .allow_headers(
            application
                .cors_allow_headers
                .split(',')
                .map(|s| match s.trim().to_lowercase().as_str() {
                    "content-type" => header::CONTENT_TYPE,
                    "authorization" => header::AUTHORIZATION,
                    other => header::HeaderName::from_lowercase(other.as_bytes())
                        .unwrap_or(header::CONTENT_TYPE),
                })
                .collect::<Vec<_>>(),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
