// ABOUTME: Voice WebSocket probe
// ABOUTME: Connects, sends one voice_start, listens briefly over an event channel, then closes

use crate::endpoint::Endpoint;
use crate::probe::{ProbeConfig, ProbeResult, ProbeState, ProbeTracker};
use crate::protocol::messages::ClientMessage;
use crate::report;
use crate::transport::websocket::{WsConnection, WsEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{timeout, Instant};

/// How long to wait for the peer to answer our close frame
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Run the WebSocket probe against `endpoint`
pub async fn run(endpoint: &Endpoint, config: &ProbeConfig) -> ProbeResult {
    let mut tracker = ProbeTracker::new();
    let deadline = Instant::now() + config.max_wait;

    report::connecting(endpoint);
    tracker.transition(ProbeState::Connecting);

    let mut conn =
        match WsConnection::connect(endpoint.url().as_str(), config.effective_connect_timeout())
            .await
        {
            Ok(conn) => conn,
            Err(e) => {
                println!("Error: {}", e);
                tracker.transition(ProbeState::Failed);
                let result = tracker.finish(endpoint, e.to_string());
                report::ws_summary(&result);
                return result;
            }
        };

    tracker.transition(ProbeState::Connected);
    println!("Connection opened successfully!");
    println!("Sending voice_start test message...");

    // Sent before the reader task exists, so nothing inbound is consumed first
    match conn.send_json(&ClientMessage::probe_voice_start()).await {
        Ok(json) => log::debug!("sent {}", json),
        Err(e) => println!("Error: {}", e),
    }

    let (mut sender, mut events, reader) = conn.spawn_events();
    tracker.transition(ProbeState::Listening);

    let listen_until = (Instant::now() + config.linger).min(deadline);
    let peer_ended = listen(&mut tracker, &mut events, listen_until).await;

    let end_state = if peer_ended {
        ProbeState::Closed
    } else {
        match timeout(
            deadline.saturating_duration_since(Instant::now()),
            sender.close(),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::debug!("close frame not sent: {}", e),
            Err(_) => log::debug!("close frame not sent before the wait budget ran out"),
        }
        let grace_until = (Instant::now() + CLOSE_GRACE).min(deadline);
        listen(&mut tracker, &mut events, grace_until).await;
        ProbeState::TimedOut
    };
    tracker.transition(end_state);

    reader.abort();
    drop(sender);

    let result = tracker.finish(endpoint, "WebSocket endpoint is accessible".to_string());
    report::ws_summary(&result);
    result
}

/// Consume events until `until`; true when the peer closed or errored first
async fn listen(
    tracker: &mut ProbeTracker,
    events: &mut mpsc::Receiver<WsEvent>,
    until: Instant,
) -> bool {
    loop {
        let remaining = until.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return false;
        }
        match timeout(remaining, events.recv()).await {
            Err(_) => return false,
            Ok(None) => return true,
            Ok(Some(WsEvent::Message(msg))) => {
                report::ws_message(&msg);
                tracker.record(msg);
            }
            Ok(Some(WsEvent::Error(e))) => {
                println!("Error: {}", e);
                return true;
            }
            Ok(Some(WsEvent::Closed { code, reason })) => {
                println!("{}", report::ws_closed_line(code, &reason));
                return true;
            }
        }
    }
}
