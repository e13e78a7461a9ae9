//! Albums API - a REST service for album records.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use albums_api::{
    album::{AlbumService, Validator, DEFAULT_REQUEST_TIMEOUT},
    config::{CheckConfig, Cli, Command, ServeConfig, StoreBackend},
    auth::TokenAuth,
    server::{create_router, RouterConfig},
    store::{create_s3_client, AlbumStore, MemoryStore, S3AlbumStore},
};

#[tokio::main]
async fn main() -> ExitCode {
    // Values from .env never override the real environment
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => {
            init_logging(config.verbose);
            if let Ok(path) = &dotenv {
                debug!("Loaded environment from {}", path.display());
            }
            run_serve(config).await
        }
        Command::Check(config) => run_check(config).await,
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Albums API v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Create timeout: {}s", config.create_timeout_secs);
    info!("  Request timeout: {}s", config.request_timeout_secs);

    let auth = TokenAuth::new(config.auth_secret_or_empty());
    let router_config = build_router_config(&config);

    let router = match config.store {
        StoreBackend::S3 => {
            let bucket = config.s3.bucket_or_empty();
            info!("  Store: s3://{}/{}", bucket, config.s3.prefix);
            if let Some(ref endpoint) = config.s3.endpoint {
                info!("  S3 endpoint: {}", endpoint);
            }
            info!("  S3 region: {}", config.s3.region);

            let client = create_s3_client(
                config.s3.endpoint.as_deref(),
                &config.s3.region,
                config.store_operation_timeout(),
            )
            .await;
            let store = S3AlbumStore::new(client, bucket, config.s3.prefix.clone());

            info!("Connecting to S3...");
            if let Err(e) = store.ping().await {
                error!("  Failed to reach the album store: {}", e);
                error!("  Please check:");
                error!("    - Your AWS credentials are configured correctly");
                error!("    - The bucket '{}' exists and is accessible", bucket);
                error!("    - The S3 endpoint is correct (if using MinIO/custom S3)");
                return ExitCode::FAILURE;
            }
            info!("  Connected successfully");

            let service = AlbumService::new(store, Validator::new(), auth)
                .with_create_timeout(config.create_timeout())
                .with_request_timeout(config.request_timeout());
            create_router(service, router_config)
        }
        StoreBackend::Memory => {
            warn!("  Store: in-memory - albums are lost when the server stops");
            let service = AlbumService::new(MemoryStore::new(), Validator::new(), auth)
                .with_create_timeout(config.create_timeout())
                .with_request_timeout(config.request_timeout());
            create_router(service, router_config)
        }
    };

    let addr = config.bind_address();

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on: http://{}", addr);
    info!("  curl http://{}/albums", addr);

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Server stopped");
    ExitCode::SUCCESS
}

/// Resolve when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "albums_api=debug,tower_http=debug"
    } else {
        "albums_api=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::default().with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}

// =============================================================================
// Check Command
// =============================================================================

async fn run_check(config: CheckConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    println!("Albums API Store Check");
    println!("══════════════════════");
    println!();

    if let Err(e) = config.s3.validate() {
        println!("✗ {}", e);
        return ExitCode::FAILURE;
    }

    let bucket = config.s3.bucket_or_empty();
    println!("✓ Bucket: {}", bucket);
    println!("✓ Prefix: {}", config.s3.prefix);
    if let Some(ref endpoint) = config.s3.endpoint {
        println!("✓ Endpoint: {}", endpoint);
    }
    println!("✓ Region: {}", config.s3.region);
    println!();

    print!("Testing S3 connection... ");

    let client = create_s3_client(
        config.s3.endpoint.as_deref(),
        &config.s3.region,
        DEFAULT_REQUEST_TIMEOUT,
    )
    .await;
    let store = S3AlbumStore::new(client, bucket, config.s3.prefix.clone());

    if let Err(e) = store.ping().await {
        println!("✗ failed");
        println!();
        println!("Error: {}", e);
        println!();
        println!("Please check:");
        println!("  - Your AWS credentials are configured correctly");
        println!("  - The bucket '{}' exists and is accessible", bucket);
        if config.s3.endpoint.is_some() {
            println!("  - The S3 endpoint is correct and reachable");
        }
        return ExitCode::FAILURE;
    }
    println!("✓ success");

    if config.list_albums {
        println!();
        println!("Albums in collection:");
        println!("─────────────────────");

        match store.list_ids().await {
            Ok(ids) if ids.is_empty() => println!("  (no albums found)"),
            Ok(ids) => {
                for id in &ids {
                    println!("  {}", id);
                }
                println!();
                println!("Total: {} album(s)", ids.len());
            }
            Err(e) => println!("  Error listing albums: {}", e),
        }
    }

    println!();
    println!("══════════════════════");
    println!("✓ All checks passed!");

    ExitCode::SUCCESS
}
