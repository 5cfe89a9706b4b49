// ABOUTME: Socket implementations used by the probes
// ABOUTME: Native SP pair0 over TCP and a tokio-tungstenite WebSocket client

/// SP pair0 socket (NNG wire protocol) over TCP
pub mod pair;
/// WebSocket client with event dispatch
pub mod websocket;

pub use pair::PairSocket;
pub use websocket::{WsConnection, WsEvent, WsSender};
