// ABOUTME: WebSocket client transport for the voice endpoint
// ABOUTME: Connects with a timeout and turns inbound frames into a channel of events

use crate::error::Error;
use crate::protocol::frame::ReceivedMessage;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::{
    connect_async, tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Events produced by the reader task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsEvent {
    /// Text or binary frame
    Message(ReceivedMessage),
    /// Transport error; no further events follow
    Error(String),
    /// Peer closed the connection; no further events follow
    Closed {
        /// Close code, if the peer sent a close frame with one
        code: Option<u16>,
        /// Close reason, possibly empty
        reason: String,
    },
}

/// Connected WebSocket, before it is split for event dispatch
pub struct WsConnection {
    stream: WsStream,
}

impl WsConnection {
    /// Connect to `url`, failing if the handshake takes longer than `connect_timeout`
    pub async fn connect(url: &str, connect_timeout: Duration) -> Result<Self, Error> {
        let (stream, response) = match timeout(connect_timeout, connect_async(url)).await {
            Ok(Ok(connected)) => connected,
            Ok(Err(e)) => return Err(Error::Connection(e.to_string())),
            Err(_) => {
                return Err(Error::Connection(format!(
                    "{}: handshake timed out after {:?}",
                    url, connect_timeout
                )))
            }
        };
        log::debug!("WebSocket handshake complete: HTTP {}", response.status());

        Ok(Self { stream })
    }

    /// Serialize `msg` as JSON and send it as one text frame, returning the JSON
    pub async fn send_json<T: Serialize>(&mut self, msg: &T) -> Result<String, Error> {
        let json = serde_json::to_string(msg).map_err(|e| Error::Protocol(e.to_string()))?;
        self.stream
            .send(WsMessage::Text(json.clone()))
            .await
            .map_err(|e| Error::WebSocket(e.to_string()))?;
        Ok(json)
    }

    /// Split into a sender and a spawned reader task delivering [`WsEvent`]s
    pub fn spawn_events(self) -> (WsSender, mpsc::Receiver<WsEvent>, JoinHandle<()>) {
        let (write, read) = self.stream.split();
        let (tx, rx) = mpsc::channel(64);
        let handle = tokio::spawn(read_events(read, tx));
        (WsSender { write }, rx, handle)
    }
}

/// Write half of a split connection
pub struct WsSender {
    write: SplitSink<WsStream, WsMessage>,
}

impl WsSender {
    /// Start the close handshake
    pub async fn close(&mut self) -> Result<(), Error> {
        self.write
            .send(WsMessage::Close(None))
            .await
            .map_err(|e| Error::WebSocket(e.to_string()))
    }
}

async fn read_events(mut read: SplitStream<WsStream>, tx: mpsc::Sender<WsEvent>) {
    while let Some(frame) = read.next().await {
        let event = match frame {
            Ok(WsMessage::Text(text)) => WsEvent::Message(ReceivedMessage::from_text(text)),
            Ok(WsMessage::Binary(data)) => {
                WsEvent::Message(ReceivedMessage::from_ws_binary(data))
            }
            Ok(WsMessage::Close(frame)) => {
                let (code, reason) = match frame {
                    Some(f) => (Some(u16::from(f.code)), f.reason.into_owned()),
                    None => (None, String::new()),
                };
                let _ = tx.send(WsEvent::Closed { code, reason }).await;
                return;
            }
            // tungstenite answers pings itself
            Ok(WsMessage::Ping(_)) | Ok(WsMessage::Pong(_)) | Ok(WsMessage::Frame(_)) => continue,
            Err(e) => {
                let _ = tx.send(WsEvent::Error(e.to_string())).await;
                return;
            }
        };
        if tx.send(event).await.is_err() {
            return;
        }
    }

    let _ = tx
        .send(WsEvent::Closed {
            code: None,
            reason: String::new(),
        })
        .await;
}
