//! Gateway main entry point
//!
//! HTTP gateway that receives external requests and routes them to the
//! shipment service via InProcess calls.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_lib::GatewayConfig;

const DEFAULT_LOG_FILTER: &str =
    "envio_gateway=info,gateway_lib=info,envio_service=info,db=info,tower_http=info";

async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!("Starting Envío Gateway v{}", config.version);

    gateway_lib::server::run(config).await
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("run") => {}
        Some("--help") | Some("-h") => {
            print_help();
            return Ok(());
        }
        Some(other) => {
            eprintln!("Unknown argument: {}", other);
            eprintln!();
            print_help();
            std::process::exit(2);
        }
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_server())
}

fn print_help() {
    println!("Envío Gateway - HTTP API for shipment management");
    println!();
    println!("Usage:");
    println!("  envio-gateway            Run the HTTP server");
    println!("  envio-gateway run        Run the HTTP server");
    println!("  envio-gateway --help     Show this message");
    println!();
    println!("Environment Variables (a .env file is read if present):");
    println!("  HTTP_ADDR                HTTP listen address (default: 127.0.0.1:8000)");
    println!("  DB_HOST                  Database host (required)");
    println!("  DB_PORT                  Database port (required)");
    println!("  DB_USER                  Database user (required)");
    println!("  DB_PASSWORD              Database password (required, may be empty)");
    println!("  DB_NAME                  Database name (required)");
    println!("  DB_MAX_CONNECTIONS       Pool ceiling (default: 10)");
    println!("  DB_MIN_CONNECTIONS       Pool floor (default: 1)");
    println!("  DB_CONNECT_TIMEOUT_SECS  Connection acquire timeout (default: 30)");
    println!("  RUST_LOG                 Log filter");
}
