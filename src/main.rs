use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use lookalike_api::RestApi;
use lookalike_storage::{StorageManager, StorageOptions};

/// Visual product search over a catalog
#[derive(Parser, Debug)]
#[command(name = "lookalike")]
#[command(about = "Find catalog products that look like an image", long_about = None)]
struct Args {
    /// Path to the data directory
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// HTTP bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP API port
    #[arg(long, default_value_t = 3000)]
    http_port: u16,

    /// Log level, used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Background save period in seconds (0 disables)
    #[arg(long, default_value_t = 300)]
    save_interval: u64,

    /// Replace the product catalog with the sample products at startup
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    info!("Starting Lookalike v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);

    let options = StorageOptions {
        save_interval: (args.save_interval > 0).then(|| Duration::from_secs(args.save_interval)),
    };
    let storage = Arc::new(StorageManager::with_options(&args.data_dir, options)?);
    info!("Storage initialized: {} products", storage.products().count());

    if args.seed {
        let count = storage.seed()?;
        info!("Seeded {} sample products", count);
    } else if storage.products().is_empty() {
        info!("Product catalog is empty; start with --seed or POST /seed to load sample products");
    }

    let storage_http = storage.clone();
    let host = args.host.clone();
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on {}:{}", host, http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(storage_http, &host, http_port).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("HTTP API: http://localhost:{}/", args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    storage.shutdown()?;
    info!("Catalog saved");
    Ok(())
}
