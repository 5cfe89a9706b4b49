// ABOUTME: Voice protocol pieces the probes understand
// ABOUTME: Stream frame classification and WebSocket JSON messages

/// Received message payloads and their classification
pub mod frame;
/// WebSocket message type definitions and serialization
pub mod messages;

pub use frame::{Classification, Payload, ReceivedMessage};
pub use messages::ClientMessage;
