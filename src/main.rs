//! QR Drop - upload a file, get a QR code that links to it.
//!
//! This binary starts the HTTP server and configures all components.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qr_drop::{create_router, AppState, Config, QrPipeline, RouterConfig, StorageLayout};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; settings can come from the real environment
    let dotenv = dotenvy::dotenv();

    let config = Config::parse();
    init_logging(config.verbose);

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    run_serve(config).await
}

async fn run_serve(config: Config) -> ExitCode {
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("QR Drop v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Upload dir: {}", config.upload_dir);
    info!("  QR dir: {}", config.qr_dir);
    info!("  Public dir: {}", config.public_dir);
    info!(
        "  QR: {}x{} px, error correction {}",
        config.qr_size, config.qr_size, config.qr_ec_level
    );
    info!("  Auth user: {}", config.auth_user);
    info!(
        "  Limits: {} bytes per upload, {}s timeout",
        config.max_upload_size, config.request_timeout
    );

    let layout = StorageLayout::new(&config.upload_dir, &config.qr_dir);
    if let Err(e) = layout.init().await {
        error!("Failed to create storage directories: {}", e);
        return ExitCode::FAILURE;
    }

    let public_dir = std::path::Path::new(&config.public_dir);
    if !public_dir.is_dir() {
        warn!(
            "  Public dir {} does not exist, unmatched paths will return 404",
            public_dir.display()
        );
    }

    let pipeline = QrPipeline::new(config.qr_ec_level, config.qr_size);
    let state = AppState::new(layout, pipeline);
    let router = create_router(state, build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Upload form:");
    info!("    open http://{}/", addr);
    info!("  Upload from the command line:");
    info!(
        "    curl -u {}:<password> -F file=@photo.jpg http://{}/upload",
        config.auth_user, addr
    );
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "qr_drop=debug,tower_http=debug"
    } else {
        "qr_drop=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new(&config.auth_user, &config.auth_pass)
        .with_public_dir(&config.public_dir)
        .with_max_upload_size(config.max_upload_size)
        .with_request_timeout(config.request_timeout())
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}
