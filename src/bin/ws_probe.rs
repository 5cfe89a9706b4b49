// ABOUTME: CLI probe for the voice WebSocket endpoint
// ABOUTME: Connects, sends a voice_start test message, exits 0 on PASSED and 1 on FAILED

use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use voiceprobe::endpoint::DEFAULT_WEBSOCKET_URL;
use voiceprobe::{Endpoint, ProbeConfig, TransportKind};

/// Voice WebSocket liveness probe
#[derive(Parser, Debug)]
#[command(name = "ws-probe")]
#[command(about = "Connect to the voice WebSocket and exchange a test message", long_about = None)]
struct Args {
    /// WebSocket URL of the voice endpoint
    #[arg(default_value = DEFAULT_WEBSOCKET_URL)]
    url: String,

    /// Upper bound in seconds for the whole run
    #[arg(short, long, default_value_t = 10)]
    wait: u64,

    /// Seconds to listen for replies after sending voice_start
    #[arg(short, long, default_value_t = 2)]
    linger: u64,

    /// Seconds allowed for the WebSocket handshake
    #[arg(long, default_value_t = 5)]
    connect_timeout: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let endpoint = match Endpoint::parse(&args.url, TransportKind::WebSocket) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = ProbeConfig {
        max_wait: Duration::from_secs(args.wait),
        linger: Duration::from_secs(args.linger),
        connect_timeout: Duration::from_secs(args.connect_timeout),
        ..ProbeConfig::for_transport(TransportKind::WebSocket)
    };
    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let result = voiceprobe::run(&endpoint, &config).await;
    log::info!(
        "{} probe finished in {:?}: {:?}",
        endpoint.kind(),
        result.elapsed,
        result.verdict
    );

    ExitCode::from(result.exit_code() as u8)
}
