// ABOUTME: Human-readable progress and summary lines printed by the probes
// ABOUTME: Keeps wording in one place so both binaries read the same way

use crate::endpoint::Endpoint;
use crate::probe::{ProbeResult, Verdict};
use crate::protocol::frame::{Classification, ReceivedMessage};
use std::time::Duration;

pub(crate) fn connecting(endpoint: &Endpoint) {
    println!("Connecting to {}...", endpoint);
}

/// Line printed for the `n`th message received on the voice stream
pub fn stream_message_line(n: usize, msg: &ReceivedMessage) -> String {
    match msg.classification {
        Classification::Short { len } => format!("Received short message: {} bytes", len),
        _ => format!("Received frame #{}: {}", n, msg),
    }
}

pub(crate) fn stream_summary(result: &ProbeResult, max_wait: Duration) {
    match result.verdict {
        Verdict::Passed if result.frame_count() == 0 => {
            println!("\nNo frames received in {} seconds.", max_wait.as_secs());
            println!("This is expected if no one is transmitting audio on module A.");
            println!("Connection test: PASSED ({})", result.reason);
        }
        Verdict::Passed => {
            println!("\nReceived {} frames successfully!", result.frame_count());
            println!("Connection test: PASSED ({})", result.reason);
        }
        Verdict::Failed => {
            println!("Connection error: {}", result.reason);
            println!("Connection test: FAILED");
        }
    }
}

pub(crate) fn ws_message(msg: &ReceivedMessage) {
    println!("Received: {}", msg);
    if let Classification::Json {
        message_type: Some(ref t),
    } = msg.classification
    {
        println!("Message type: {}", t);
    }
}

/// Line printed when the WebSocket closes
pub fn ws_closed_line(code: Option<u16>, reason: &str) -> String {
    let code = code.map_or_else(|| "None".to_string(), |c| c.to_string());
    let reason = if reason.is_empty() { "None" } else { reason };
    format!("Connection closed: {} - {}", code, reason)
}

pub(crate) fn ws_summary(result: &ProbeResult) {
    match result.verdict {
        Verdict::Passed => println!("\nTest PASSED: {}", result.reason),
        Verdict::Failed => println!("\nTest FAILED: {}", result.reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_lines() {
        let frame = ReceivedMessage::from_stream(b"Bxyz".to_vec());
        assert_eq!(
            stream_message_line(3, &frame),
            "Received frame #3: module=B, opus_bytes=3"
        );
        let short = ReceivedMessage::from_stream(b"A".to_vec());
        assert_eq!(
            stream_message_line(1, &short),
            "Received short message: 1 bytes"
        );
    }

    #[test]
    fn closed_line_without_frame() {
        assert_eq!(ws_closed_line(None, ""), "Connection closed: None - None");
        assert_eq!(
            ws_closed_line(Some(1000), "bye"),
            "Connection closed: 1000 - bye"
        );
    }
}
