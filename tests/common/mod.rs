// Shared helpers for integration tests: an in-process SP pair0 peer and
// a port nobody is listening on.

#![allow(dead_code)]

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use voiceprobe::transport::pair::{sp_header, PAIR0_PROTOCOL};

/// Bind an ephemeral port, then release it so connects are refused
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Frame a message the way a pair0 peer writes it
pub fn frame(data: &[u8]) -> Vec<u8> {
    let mut out = (data.len() as u64).to_be_bytes().to_vec();
    out.extend_from_slice(data);
    out
}

/// Accept one connection, answer the SP handshake with `protocol`, then hand
/// the stream to `script`
pub async fn spawn_sp_peer<F, Fut>(protocol: u16, script: F) -> (u16, JoinHandle<()>)
where
    F: FnOnce(TcpStream) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        stream.write_all(&sp_header(protocol)).await.unwrap();
        let mut header = [0u8; 8];
        stream.read_exact(&mut header).await.unwrap();
        assert_eq!(header, sp_header(PAIR0_PROTOCOL));
        script(stream).await;
    });

    (port, handle)
}

/// A pair0 peer that sends `frames` and then holds the connection for `hold`
pub async fn spawn_pair_peer(frames: Vec<Vec<u8>>, hold: Duration) -> (u16, JoinHandle<()>) {
    spawn_sp_peer(PAIR0_PROTOCOL, move |mut stream| async move {
        for f in frames {
            stream.write_all(&frame(&f)).await.unwrap();
        }
        tokio::time::sleep(hold).await;
    })
    .await
}
