// ABOUTME: CLI probe for the voice stream endpoint
// ABOUTME: Dials a pair0 socket, waits for tagged Opus frames, exits 0 on PASSED and 1 on FAILED

use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use voiceprobe::endpoint::DEFAULT_STREAM_URL;
use voiceprobe::{Endpoint, ProbeConfig, TransportKind};

/// Voice stream liveness probe
#[derive(Parser, Debug)]
#[command(name = "stream-probe")]
#[command(about = "Connect to a voice stream endpoint and wait for audio frames", long_about = None)]
struct Args {
    /// Stream endpoint URL
    #[arg(default_value = DEFAULT_STREAM_URL)]
    url: String,

    /// Seconds to wait for frames once connected
    #[arg(short, long, default_value_t = 30)]
    wait: u64,

    /// Seconds per receive attempt
    #[arg(long, default_value_t = 5)]
    recv_timeout: u64,

    /// Seconds allowed for dialing and the SP handshake
    #[arg(long, default_value_t = 5)]
    connect_timeout: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let endpoint = match Endpoint::parse(&args.url, TransportKind::Stream) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = ProbeConfig {
        max_wait: Duration::from_secs(args.wait),
        recv_timeout: Duration::from_secs(args.recv_timeout),
        connect_timeout: Duration::from_secs(args.connect_timeout),
        ..ProbeConfig::for_transport(TransportKind::Stream)
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
