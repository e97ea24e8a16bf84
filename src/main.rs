//! zip-link - signed download links for archives in object storage.
//!
//! This binary parses the CLI, connects to storage and runs the selected
//! subcommand.

use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zip_link::{
    config::{CheckConfig, Cli, Command, ServeConfig, SignConfig, SignOutputFormat, StoreArgs},
    create_router, create_s3_client, resolve, LinkOutcome, LinkService, ObjectStore,
    RouterConfig, S3ObjectStore, StoreError,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Check(config) => run_check(config).await,
        Command::Sign(config) => run_sign(config).await,
    }
}

/// Build the S3-backed store from validated arguments.
async fn build_store(args: &StoreArgs) -> S3ObjectStore {
    let client = create_s3_client(
        args.s3_endpoint.as_deref(),
        &args.s3_region,
        args.credentials(),
    )
    .await;
    S3ObjectStore::new(client, args.s3_bucket.clone())
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("zip-link v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  S3 bucket: {}", config.store.s3_bucket);
    if let Some(ref endpoint) = config.store.s3_endpoint {
        info!("  S3 endpoint: {}", endpoint);
    }
    info!("  S3 region: {}", config.store.s3_region);
    if config.store.credentials().is_some() {
        info!("  Credentials: static key pair");
    } else {
        info!("  Credentials: default provider chain");
    }
    info!("  Store call timeout: {}s", config.store.store_timeout_secs);

    match config.frontend_origin() {
        Some(origin) => info!("  CORS origin: {}", origin),
        None => {
            warn!("  CORS origin: ANY - every site may request signed links");
            warn!("        Restrict for production: --frontend-url=https://your.app");
        }
    }

    let store = build_store(&config.store).await;

    info!("Connecting to S3...");
    if let Err(e) = store.check_bucket().await {
        error!("  Failed to connect to S3: {}", e);
        error!("  Please check:");
        error!("    - Your credentials are configured correctly");
        error!("    - The bucket '{}' exists and is accessible", store.bucket());
        error!("    - The S3 endpoint is correct (if using MinIO/custom S3)");
        return ExitCode::FAILURE;
    }
    info!("  Connected successfully");

    let link_service = LinkService::with_call_timeout(store, config.store.store_timeout());

    let mut router_config = RouterConfig::new().with_tracing(!config.no_tracing);
    if let Some(origin) = config.frontend_origin() {
        router_config = router_config.with_frontend_url(origin);
    }

    let router = create_router(link_service, router_config);

    let addr = config.bind_address();
    info!("Server listening on: http://{}", addr);
    info!("  curl http://{}/get-signed-url/<identifier>", addr);

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
        "zip_link=debug,tower_http=debug"
    } else {
        "zip_link=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// =============================================================================
// Check Command
// =============================================================================

async fn run_check(config: CheckConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    println!("zip-link Configuration Check");
    println!("════════════════════════════");
    println!();

    if let Err(e) = config.validate() {
        println!("✗ Configuration: {}", e);
        return ExitCode::FAILURE;
    }

    println!("✓ Bucket: {}", config.store.s3_bucket);
    if let Some(ref endpoint) = config.store.s3_endpoint {
        println!("✓ Endpoint: {}", endpoint);
    }
    println!("✓ Region: {}", config.store.s3_region);
    println!();

    print!("Testing S3 connection... ");
    flush_stdout();
    let store = build_store(&config.store).await;
    let timeout = config.store.store_timeout();

    let reachable = match tokio::time::timeout(timeout, store.check_bucket()).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout {
            operation: "HeadBucket",
            after: timeout,
        }),
    };

    if let Err(e) = reachable {
        println!("✗ failed");
        println!();
        println!("Error: {}", e);
        println!();
        println!("Please check:");
        println!("  - Your credentials are configured correctly");
        println!("  - The bucket '{}' exists and is accessible", store.bucket());
        if config.store.s3_endpoint.is_some() {
            println!("  - The S3 endpoint is correct and reachable");
        }
        return ExitCode::FAILURE;
    }
    println!("✓ success");

    if let Some(ref identifier) = config.identifier {
        println!();
        print!("Looking up archive for '{}'... ", identifier);
        flush_stdout();

        let key = match resolve(identifier) {
            Ok(key) => key,
            Err(e) => {
                println!("✗ {}", e);
                return ExitCode::FAILURE;
            }
        };

        let service = LinkService::with_call_timeout(store, timeout);
        match service.locate(&key).await {
            Ok(()) => println!("✓ found ({})", key),
            Err(e) if e.is_not_found() => {
                println!("✗ not found");
                println!();
                println!("  The object '{}' does not exist in the bucket.", key);
                return ExitCode::FAILURE;
            }
            Err(e) => {
                println!("✗ failed");
                println!("  Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    println!();
    println!("════════════════════════════");
    println!("✓ All checks passed!");

    ExitCode::SUCCESS
}

/// Push partial `print!` output to the terminal before a slow store call.
fn flush_stdout() {
    let _ = std::io::stdout().flush();
}

// =============================================================================
// Sign Command
// =============================================================================

async fn run_sign(config: SignConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let store = build_store(&config.store).await;
    let service = LinkService::with_call_timeout(store, config.store.store_timeout());

    let link = match service.issue_for(&config.identifier).await {
        Ok(LinkOutcome::Found(link)) => link,
        Ok(LinkOutcome::NotFound) => {
            eprintln!(
                "Error: no archive for identifier '{}' in bucket '{}'",
                config.identifier,
                service.store().bucket()
            );
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match config.format {
        SignOutputFormat::Url => println!("{}", link.url),
        SignOutputFormat::Json => {
            let json = serde_json::json!({
                "signedUrl": link.url,
                "key": link.key.as_str(),
                "ttl": link.ttl.as_secs(),
                "expiresAt": link.expires_at,
            });
            match serde_json::to_string_pretty(&json) {
                Ok(out) => println!("{}", out),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}
