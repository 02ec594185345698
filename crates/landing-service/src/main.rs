//! Landing service entry point.

use landing_service::auth::{AccessTokenValidator, JwksClient, TrustDomain};
use landing_service::config::Config;
use landing_service::middleware::AuthState;
use landing_service::routes;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "landing_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting landing service");

    // Missing trust domain or audience aborts startup here
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address,
        trust_domain = %config.trust_domain,
        audience = %config.audience,
        jwks_cache_ttl_seconds = config.jwks_cache_ttl_seconds,
        auth_leeway_seconds = config.auth_leeway_seconds,
        "Configuration loaded successfully"
    );

    let trust_domain = TrustDomain::new(&config.trust_domain);
    let jwks_client = Arc::new(JwksClient::with_ttl(
        &trust_domain,
        Duration::from_secs(config.jwks_cache_ttl_seconds),
    ));
    let validator = AccessTokenValidator::new(
        jwks_client,
        &trust_domain,
        &config.audience,
        config.auth_leeway_seconds,
    );

    let auth_state = Arc::new(AuthState {
        authorizer: Arc::new(validator),
    });

    let app = routes::build_routes(auth_state);

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Landing service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Landing service shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
