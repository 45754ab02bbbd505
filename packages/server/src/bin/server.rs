//! Room-scoped WebSocket chat relay.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --utc-offset-hours 9
//! ```

use std::sync::Arc;

use clap::Parser;
use hiroba_server::{
    bootstrap::build_server,
    config::{
        DEFAULT_HOST, DEFAULT_IDLE_TIMEOUT_MINS, DEFAULT_MIN_MESSAGE_INTERVAL_MS, DEFAULT_PORT,
        DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_UTC_OFFSET_HOURS, ServerConfig,
    },
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Room-scoped WebSocket chat relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HIROBA_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Minutes without activity before a session is swept
    #[arg(long, env = "HIROBA_IDLE_TIMEOUT_MINS", default_value_t = DEFAULT_IDLE_TIMEOUT_MINS)]
    idle_timeout_mins: u64,

    /// Seconds between two idle sweeps
    #[arg(long, env = "HIROBA_SWEEP_INTERVAL_SECS", default_value_t = DEFAULT_SWEEP_INTERVAL_SECS)]
    sweep_interval_secs: u64,

    /// Minimum milliseconds between two chat messages of one connection
    #[arg(
        long,
        env = "HIROBA_MIN_MESSAGE_INTERVAL_MS",
        default_value_t = DEFAULT_MIN_MESSAGE_INTERVAL_MS
    )]
    min_message_interval_ms: u64,

    /// Fixed UTC offset (hours) for message times
    #[arg(
        long,
        env = "HIROBA_UTC_OFFSET_HOURS",
        default_value_t = DEFAULT_UTC_OFFSET_HOURS,
        allow_hyphen_values = true
    )]
    utc_offset_hours: i32,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "HIROBA_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = match ServerConfig::from_raw(
        args.host,
        args.port,
        args.idle_timeout_mins,
        args.sweep_interval_secs,
        args.min_message_interval_ms,
        args.utc_offset_hours,
    ) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!("Starting with {:?}", config);

    let server = build_server(&config, Arc::new(SystemClock));
    if let Err(e) = server.run(&config.bind_addr()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
