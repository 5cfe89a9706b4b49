// ABOUTME: Received message payloads and their classification
// ABOUTME: Stream frames are [module_char][opus_data]; WebSocket text is optionally JSON

use crate::protocol::messages::message_type;
use std::fmt;

/// Raw payload of a received message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// Binary message (stream frames, WebSocket binary frames)
    Binary(Vec<u8>),
    /// WebSocket text frame
    Text(String),
}

impl Payload {
    /// Payload size in bytes
    pub fn len(&self) -> usize {
        match self {
            Payload::Binary(b) => b.len(),
            Payload::Text(t) => t.len(),
        }
    }

    /// True for a zero-length payload
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a received message turned out to be
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    /// Voice frame on a logical channel (the module letter)
    Frame {
        /// Channel tag taken from byte 0
        channel: char,
        /// Opaque payload bytes after the tag
        payload_len: usize,
    },
    /// Stream message with nothing beyond the channel tag
    Short {
        /// Total message length
        len: usize,
    },
    /// WebSocket text that parsed as JSON
    Json {
        /// The `type` field, if present and a string
        message_type: Option<String>,
    },
    /// WebSocket text that did not parse as JSON
    RawText,
    /// WebSocket binary frame
    Binary {
        /// Frame length
        len: usize,
    },
}

/// A message received during a probe, with its derived classification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceivedMessage {
    /// Bytes or text as received
    pub payload: Payload,
    /// Derived interpretation of the payload
    pub classification: Classification,
}

impl ReceivedMessage {
    /// Classify a binary message from the voice stream
    pub fn from_stream(data: Vec<u8>) -> Self {
        let classification = classify_stream_frame(&data);
        Self {
            payload: Payload::Binary(data),
            classification,
        }
    }

    /// Classify a WebSocket text frame
    pub fn from_text(text: String) -> Self {
        let classification = match message_type(&text) {
            Some(message_type) => Classification::Json { message_type },
            None => Classification::RawText,
        };
        Self {
            payload: Payload::Text(text),
            classification,
        }
    }

    /// Classify a WebSocket binary frame
    pub fn from_ws_binary(data: Vec<u8>) -> Self {
        Self {
            classification: Classification::Binary { len: data.len() },
            payload: Payload::Binary(data),
        }
    }

    /// Channel tag for voice frames
    pub fn channel(&self) -> Option<char> {
        match self.classification {
            Classification::Frame { channel, .. } => Some(channel),
            _ => None,
        }
    }
}

/// Classify a stream message: byte 0 is the channel tag, the rest is payload
pub fn classify_stream_frame(data: &[u8]) -> Classification {
    match data.split_first() {
        Some((&tag, rest)) if !rest.is_empty() => Classification::Frame {
            channel: char::from(tag),
            payload_len: rest.len(),
        },
        _ => Classification::Short { len: data.len() },
    }
}

impl fmt::Display for ReceivedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.classification, &self.payload) {
            (Classification::Frame { channel, payload_len }, _) => {
                write!(f, "module={}, opus_bytes={}", channel, payload_len)
            }
            (Classification::Short { len }, _) => write!(f, "short message: {} bytes", len),
            (Classification::Binary { len }, _) => write!(f, "binary: {} bytes", len),
            (_, Payload::Text(text)) => write!(f, "{}", text),
            (_, Payload::Binary(data)) => write!(f, "{} bytes", data.len()),
        }
    }
}
