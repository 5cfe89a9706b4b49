// ABOUTME: Voice stream probe over an SP pair0 socket
// ABOUTME: Dials, then polls for tagged Opus frames until the wait budget runs out

use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::probe::{ProbeConfig, ProbeResult, ProbeState, ProbeTracker};
use crate::protocol::frame::ReceivedMessage;
use crate::report;
use crate::transport::PairSocket;
use tokio::time::Instant;

/// Run the stream probe against `endpoint`
pub async fn run(endpoint: &Endpoint, config: &ProbeConfig) -> ProbeResult {
    let mut tracker = ProbeTracker::new();

    report::connecting(endpoint);
    tracker.transition(ProbeState::Connecting);

    let mut socket =
        match PairSocket::dial(&endpoint.socket_addr(), config.effective_connect_timeout()).await
        {
            Ok(socket) => socket,
            Err(e) => {
                log::warn!("dial {} failed: {}", endpoint, e);
                tracker.transition(ProbeState::Failed);
                let result = tracker.finish(endpoint, e.to_string());
                report::stream_summary(&result, config.max_wait);
                return result;
            }
        };

    tracker.transition(ProbeState::Connected);
    println!("Connected! Waiting for Opus audio frames...");
    println!("(Note: No frames will arrive unless someone is transmitting on module A)");

    let deadline = Instant::now() + config.max_wait;
    tracker.transition(ProbeState::Listening);

    let end_state = loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break ProbeState::TimedOut;
        }

        match socket.recv(config.recv_timeout.min(remaining)).await {
            Ok(data) => {
                let msg = ReceivedMessage::from_stream(data);
                println!(
                    "{}",
                    report::stream_message_line(tracker.message_count() + 1, &msg)
                );
                tracker.record(msg);
            }
            // Expected whenever nobody is transmitting
            Err(Error::Timeout) => continue,
            Err(e) => {
                println!("Receive error: {}", e);
                break ProbeState::Closed;
            }
        }
    };
    tracker.transition(end_state);

    if let Err(e) = socket.close().await {
        log::debug!("shutdown after probe: {}", e);
    }

    let reason = if tracker.message_count() == 0 {
        "connected successfully, no transmission"
    } else {
        "received audio"
    };
    let result = tracker.finish(endpoint, reason.to_string());
    report::stream_summary(&result, config.max_wait);
    result
}
