// ABOUTME: Probe configuration, result types and state machine
// ABOUTME: run() dispatches to the stream or WebSocket probe by transport kind

/// Voice stream (pair0) probe
pub mod stream;
/// Voice WebSocket probe
pub mod websocket;

use crate::endpoint::{Endpoint, TransportKind};
use crate::error::Error;
use crate::protocol::frame::ReceivedMessage;
use std::time::Duration;
use tokio::time::Instant;

/// Timing knobs for one probe run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Overall listening budget once connected
    pub max_wait: Duration,
    /// Per-attempt receive timeout (stream probe)
    pub recv_timeout: Duration,
    /// Dial / handshake timeout
    pub connect_timeout: Duration,
    /// How long the WebSocket probe listens after sending `voice_start`
    pub linger: Duration,
}

impl ProbeConfig {
    /// Defaults for a transport: 30s wait for streams, 10s for WebSockets
    pub fn for_transport(kind: TransportKind) -> Self {
        let max_wait = match kind {
            TransportKind::Stream => Duration::from_secs(30),
            TransportKind::WebSocket => Duration::from_secs(10),
        };
        Self {
            max_wait,
            recv_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(5),
            linger: Duration::from_secs(2),
        }
    }

    /// Reject timings that would make the probe loop meaningless
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_wait.is_zero() {
            return Err(Error::Config("max wait must be positive".to_string()));
        }
        if self.recv_timeout.is_zero() {
            return Err(Error::Config("receive timeout must be positive".to_string()));
        }
        if self.connect_timeout.is_zero() {
            return Err(Error::Config("connect timeout must be positive".to_string()));
        }
        Ok(())
    }

    pub(crate) fn effective_connect_timeout(&self) -> Duration {
        self.connect_timeout.min(self.max_wait)
    }
}

/// Outcome of a probe
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Connection was established
    Passed,
    /// Connection could not be established
    Failed,
}

impl Verdict {
    /// Process exit code for this verdict
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Passed => 0,
            Verdict::Failed => 1,
        }
    }
}

/// Probe lifecycle states
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProbeState {
    /// Nothing attempted yet
    Idle,
    /// Dialing and handshaking
    Connecting,
    /// Handshake finished
    Connected,
    /// Waiting for inbound messages
    Listening,
    /// A message just arrived
    MessageReceived,
    /// Wait budget ran out while listening
    TimedOut,
    /// Peer closed or the transport failed after connecting
    Closed,
    /// Connection could not be established
    Failed,
    /// Verdict produced
    Done,
}

impl ProbeState {
    /// Whether `self -> next` is a legal transition
    pub fn can_transition_to(self, next: ProbeState) -> bool {
        use ProbeState::*;
        matches!(
            (self, next),
            (Idle, Connecting)
                | (Connecting, Connected)
                | (Connecting, Failed)
                | (Connected, Listening)
                | (Listening, MessageReceived)
                | (MessageReceived, Listening)
                | (Listening, TimedOut)
                | (Listening, Closed)
                | (TimedOut, Done)
                | (Closed, Done)
                | (Failed, Done)
        )
    }
}

/// Everything observed during one probe run
#[derive(Clone, Debug)]
pub struct ProbeResult {
    /// Target that was probed
    pub endpoint: Endpoint,
    /// Whether the connection was ever established
    pub connected: bool,
    /// Messages in arrival order
    pub messages_received: Vec<ReceivedMessage>,
    /// Pass/fail outcome
    pub verdict: Verdict,
    /// Human-readable explanation of the verdict
    pub reason: String,
    /// Last state before `Done`: `TimedOut`, `Closed` or `Failed`
    pub final_state: ProbeState,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl ProbeResult {
    /// Number of messages received
    pub fn frame_count(&self) -> usize {
        self.messages_received.len()
    }

    /// Process exit code
    pub fn exit_code(&self) -> i32 {
        self.verdict.exit_code()
    }
}

/// Tracks state and collected messages while a probe runs
pub(crate) struct ProbeTracker {
    state: ProbeState,
    connected: bool,
    messages: Vec<ReceivedMessage>,
    started: Instant,
}

impl ProbeTracker {
    pub(crate) fn new() -> Self {
        Self {
            state: ProbeState::Idle,
            connected: false,
            messages: Vec::new(),
            started: Instant::now(),
        }
    }

    pub(crate) fn transition(&mut self, next: ProbeState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal probe transition {:?} -> {:?}",
            self.state,
            next
        );
        log::debug!("probe state {:?} -> {:?}", self.state, next);
        if next == ProbeState::Connected {
            self.connected = true;
        }
        self.state = next;
    }

    /// Record a message, passing through `MessageReceived` back to `Listening`
    pub(crate) fn record(&mut self, msg: ReceivedMessage) {
        self.transition(ProbeState::MessageReceived);
        self.messages.push(msg);
        self.transition(ProbeState::Listening);
    }

    pub(crate) fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub(crate) fn finish(mut self, endpoint: &Endpoint, reason: String) -> ProbeResult {
        let final_state = self.state;
        self.transition(ProbeState::Done);
        ProbeResult {
            endpoint: endpoint.clone(),
            connected: self.connected,
            messages_received: self.messages,
            verdict: if self.connected {
                Verdict::Passed
            } else {
                Verdict::Failed
            },
            reason,
            final_state,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Probe `endpoint` with the variant matching its transport kind
pub async fn run(endpoint: &Endpoint, config: &ProbeConfig) -> ProbeResult {
    match endpoint.kind() {
        TransportKind::Stream => stream::run(endpoint, config).await,
        TransportKind::WebSocket => websocket::run(endpoint, config).await,
    }
}
