use std::time::Duration;
use voiceprobe::error::Error;
use voiceprobe::{Endpoint, ProbeConfig, TransportKind};

#[test]
fn test_stream_endpoint_parse() {
    let ep = Endpoint::parse("tcp://voice.example.net:5557", TransportKind::Stream).unwrap();

    assert_eq!(ep.kind(), TransportKind::Stream);
    assert_eq!(ep.socket_addr(), "voice.example.net:5557");
    assert_eq!(ep.to_string(), "tcp://voice.example.net:5557");
}

#[test]
fn test_stream_rejects_other_schemes() {
    let err = Endpoint::parse("http://localhost:5556", TransportKind::Stream).unwrap_err();
    assert!(matches!(err, Error::InvalidEndpoint(_)));

    let err = Endpoint::parse("localhost:5556", TransportKind::Stream).unwrap_err();
    assert!(matches!(err, Error::InvalidEndpoint(_)));
}

#[test]
fn test_websocket_endpoint_parse() {
    let ep = Endpoint::parse("wss://voice.example.net/ws/voice", TransportKind::WebSocket).unwrap();

    assert_eq!(ep.url().scheme(), "wss");
    assert_eq!(ep.socket_addr(), "voice.example.net:443");
}

#[test]
fn test_websocket_rejects_tcp_scheme() {
    let err = Endpoint::parse("tcp://localhost:8080", TransportKind::WebSocket).unwrap_err();
    assert!(matches!(err, Error::InvalidEndpoint(_)));
}

#[test]
fn test_default_endpoints() {
    assert_eq!(
        Endpoint::default_for(TransportKind::Stream).to_string(),
        "tcp://localhost:5556"
    );
    assert_eq!(
        Endpoint::default_for(TransportKind::WebSocket).to_string(),
        "ws://localhost:8080/ws/voice"
    );
}

#[test]
fn test_default_probe_timings() {
    let stream = ProbeConfig::for_transport(TransportKind::Stream);
    assert_eq!(stream.max_wait, Duration::from_secs(30));
    assert_eq!(stream.recv_timeout, Duration::from_secs(5));

    let ws = ProbeConfig::for_transport(TransportKind::WebSocket);
    assert_eq!(ws.max_wait, Duration::from_secs(10));
    assert!(ws.validate().is_ok());
}
