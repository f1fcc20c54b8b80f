use linkguard_engine::{
    routes::{self, AppContext},
    LinkAnalyzer, ServiceConfig,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkguard_engine=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = ServiceConfig::load()?;
    info!(
        "Loaded configuration: bind={} brands_file={:?} threshold={} redirect_timeout={:?}",
        config.bind_addr,
        config.brands_file,
        config.engine.typosquat_threshold,
        config.engine.redirect_timeout
    );

    // Initialize link analyzer
    let analyzer = LinkAnalyzer::with_http_resolver(config.engine.clone(), &config.user_agent)?;
    let app_state = Arc::new(AppContext {
        analyzer,
        max_batch_size: config.max_batch_size,
    });

    // Initialize metrics exporter
    metrics_exporter_prometheus::PrometheusBuilder::new().install()?;

    let app = routes::router(app_state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    info!("Starting link analysis engine on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Shutdown signal received, starting graceful shutdown");
}
