// ABOUTME: Main library entry point for voiceprobe
// ABOUTME: Exports the probe API for voice stream and voice WebSocket endpoints

//! # voiceprobe
//!
//! One-shot liveness probes for a voice-streaming service.
//!
//! Two transports are supported: the per-module voice stream (an NNG `pair0`
//! socket over TCP, spoken natively here) and the `/ws/voice` WebSocket. A probe
//! dials the endpoint, listens for a bounded time, classifies whatever arrives
//! and reports a [`Verdict`].

#![warn(missing_docs)]

/// Endpoint addresses and transport kinds
pub mod endpoint;
/// Probe state machine, configuration and run loops
pub mod probe;
/// Voice frame classification and WebSocket message types
pub mod protocol;
/// Human-readable progress and summary output
pub mod report;
/// Socket implementations (SP pair0 over TCP, WebSocket)
pub mod transport;

pub use endpoint::{Endpoint, TransportKind};
pub use probe::{run, ProbeConfig, ProbeResult, ProbeState, Verdict};
pub use protocol::frame::{Classification, Payload, ReceivedMessage};

/// Result type for voiceprobe operations
pub type Result<T> = std::result::Result<T, error::Error>;

/// Error types for voiceprobe
pub mod error {
    use thiserror::Error;

    /// Error types for probe operations
    #[derive(Error, Debug)]
    pub enum Error {
        /// Address rejected for the requested transport
        #[error("Invalid endpoint: {0}")]
        InvalidEndpoint(String),

        /// Probe timings that cannot be honoured
        #[error("Invalid configuration: {0}")]
        Config(String),

        /// Dial or connect failure
        #[error("Connection error: {0}")]
        Connection(String),

        /// SP protocol header exchange failed
        #[error("Handshake error: {0}")]
        Handshake(String),

        /// WebSocket-related error
        #[error("WebSocket error: {0}")]
        WebSocket(String),

        /// No message within the receive window
        #[error("Timed out")]
        Timeout,

        /// Peer closed the connection
        #[error("Connection closed by peer")]
        Closed,

        /// Protocol violation or malformed frame
        #[error("Protocol error: {0}")]
        Protocol(String),

        /// Underlying socket I/O error
        #[error("I/O error: {0}")]
        Io(#[from] std::io::Error),
    }
}
