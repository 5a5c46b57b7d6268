use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use axum::serve;
use regdesk::core::config::Config;
use regdesk::core::state::AppState;
use regdesk::core::{routes, tracing_init};
use regdesk::mailer::dispatcher::Dispatcher;
use regdesk::mailer::transport::SmtpMailer;
use regdesk::store::allocator::PassIdAllocator;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("config.toml")
    };

    // Load and validate configuration
    let config = Config::from_file(&config_path).context(format!(
        "Failed to load configuration from '{}'. \
        If this is your first time running the service, copy config.example.toml to config.toml and adjust the values.",
        config_path.display()
    ))?;

    // Initialize tracing/logging
    tracing_init::init_tracing(&config.logging);

    // Build Tokio runtime with configured number of threads
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.num_threads)
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    // Run the async main function
    runtime.block_on(async_main(config, config_path))
}

async fn async_main(config: Config, config_path: PathBuf) -> Result<()> {
    info!(
        config_path = %config_path.display(),
        port = config.server.port,
        deployment = %config.server.deployment,
        counter_file = %config.registration.counter_file.display(),
        num_threads = config.server.num_threads,
        log_level = %config.logging.level,
        log_format = %config.logging.format,
        "Registration service starting"
    );

    // Open the durable Pass ID counter
    let allocator = PassIdAllocator::open(config.registration.counter_file.clone())
        .context("Failed to open Pass ID counter")?;

    info!(
        last_issued = allocator.last_issued().await,
        "Pass ID counter loaded"
    );

    // Build the SMTP transport and the sequential dispatcher
    let mailer = SmtpMailer::new(&config.smtp, config.registration.from_address.clone())
        .context("Failed to build SMTP transport")?;

    let dispatcher = Dispatcher::new(
        Arc::new(mailer),
        Duration::from_millis(config.registration.send_pause_ms),
    );

    info!(
        smtp_host = %config.smtp.host,
        smtp_port = config.smtp.port,
        admin_email = %config.registration.admin_email,
        notify_registrant = config.registration.notify_registrant,
        "Mail dispatcher ready"
    );

    let cors = cors_layer(&config)?;

    let state = AppState::new(config, allocator, dispatcher);
    let addr = format!("0.0.0.0:{}", state.config.server.port);

    // Build the router with middleware
    let app = routes::build_router(Arc::new(state)).layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                    .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
            )
            .layer(cors),
    );

    info!(address = %addr, "Starting TCP listener");

    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind TCP listener to {}", addr))?;

    info!(address = %addr, "TCP listener bound successfully");

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Shutting down gracefully");

    Ok(())
}

/// Permissive CORS in development; origin-restricted in production.
fn cors_layer(config: &Config) -> Result<CorsLayer> {
    if config.server.deployment == "production" {
        let origin = config
            .server
            .allowed_origin
            .as_deref()
            .context("allowed_origin is required when deployment = \"production\"")?;

        let origin = origin
            .parse::<HeaderValue>()
            .context(format!("Invalid allowed_origin: {}", origin))?;

        Ok(CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any))
    } else {
        Ok(CorsLayer::permissive())
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
