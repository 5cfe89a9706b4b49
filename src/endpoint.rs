// ABOUTME: Endpoint address parsing and validation
// ABOUTME: Maps a URL string plus transport kind to a checked Endpoint

use crate::error::Error;
use std::fmt;
use url::Url;

/// Default address of the module A voice stream
pub const DEFAULT_STREAM_URL: &str = "tcp://localhost:5556";

/// Default address of the voice WebSocket
pub const DEFAULT_WEBSOCKET_URL: &str = "ws://localhost:8080/ws/voice";

/// Transport used to reach an endpoint
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransportKind {
    /// NNG pair0 socket over TCP carrying tagged binary voice frames
    Stream,
    /// WebSocket carrying JSON text frames
    WebSocket,
}

impl TransportKind {
    /// Default URL for this transport
    pub fn default_url(self) -> &'static str {
        match self {
            TransportKind::Stream => DEFAULT_STREAM_URL,
            TransportKind::WebSocket => DEFAULT_WEBSOCKET_URL,
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Stream => write!(f, "stream"),
            TransportKind::WebSocket => write!(f, "websocket"),
        }
    }
}

/// A validated probe target
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
    kind: TransportKind,
}

impl Endpoint {
    /// Parse and validate `input` for the given transport.
    ///
    /// Stream endpoints must be `tcp://host:port`. WebSocket endpoints must use
    /// the `ws` or `wss` scheme; `wss` goes through rustls with webpki roots.
    pub fn parse(input: &str, kind: TransportKind) -> Result<Self, Error> {
        let url = Url::parse(input.trim())
            .map_err(|e| Error::InvalidEndpoint(format!("{}: {}", input, e)))?;

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::InvalidEndpoint(format!("{}: missing host", input)))?;

        match kind {
            TransportKind::Stream => {
                if url.scheme() != "tcp" {
                    return Err(Error::InvalidEndpoint(format!(
                        "{}: stream endpoints use tcp://, got {}://",
                        input,
                        url.scheme()
                    )));
                }
                if url.port().is_none() {
                    return Err(Error::InvalidEndpoint(format!(
                        "{}: missing port for host {}",
                        input, host
                    )));
                }
            }
            TransportKind::WebSocket => {
                if !matches!(url.scheme(), "ws" | "wss") {
                    return Err(Error::InvalidEndpoint(format!(
                        "{}: websocket endpoints use ws:// or wss://, got {}://",
                        input,
                        url.scheme()
                    )));
                }
            }
        }

        Ok(Self { url, kind })
    }

    /// Default endpoint for a transport
    pub fn default_for(kind: TransportKind) -> Self {
        Self {
            url: Url::parse(kind.default_url()).expect("default endpoint URLs are valid"),
            kind,
        }
    }

    /// Transport kind
    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    /// Full URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// `host:port` for socket dialing (stream endpoints always carry a port)
    pub fn socket_addr(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        let port = self.url.port_or_known_default().unwrap_or_default();
        // host_str() keeps IPv6 brackets
        format!("{}:{}", host, port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ws:// URLs with an empty path come back from Url with a trailing '/'
        write!(f, "{}", self.url.as_str().trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_requires_port() {
        let err = Endpoint::parse("tcp://localhost", TransportKind::Stream).unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn socket_addr_keeps_ipv6_brackets() {
        let ep = Endpoint::parse("tcp://[::1]:5556", TransportKind::Stream).unwrap();
        assert_eq!(ep.socket_addr(), "[::1]:5556");
    }

    #[test]
    fn defaults_parse() {
        assert_eq!(
            Endpoint::default_for(TransportKind::Stream).socket_addr(),
            "localhost:5556"
        );
        assert_eq!(
            Endpoint::default_for(TransportKind::WebSocket).url().path(),
            "/ws/voice"
        );
    }
}
