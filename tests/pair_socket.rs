mod common;

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use voiceprobe::error::Error;
use voiceprobe::transport::pair::PAIR0_PROTOCOL;
use voiceprobe::transport::PairSocket;

#[tokio::test]
async fn test_dial_refused_is_connection_error() {
    let port = common::closed_port().await;

    let err = PairSocket::dial(&format!("127.0.0.1:{}", port), Duration::from_secs(1))
        .await
        .err()
        .unwrap();

    assert!(matches!(err, Error::Connection(_)));
}

#[tokio::test]
async fn test_split_frame_survives_receive_timeout() {
    let (port, _peer) = common::spawn_sp_peer(PAIR0_PROTOCOL, |mut stream| async move {
        let framed = common::frame(b"Ahello");
        stream.write_all(&framed[..5]).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        stream.write_all(&framed[5..]).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
    })
    .await;

    let mut socket = PairSocket::dial(&format!("127.0.0.1:{}", port), Duration::from_secs(1))
        .await
        .unwrap();

    let first = socket.recv(Duration::from_millis(100)).await;
    assert!(matches!(first, Err(Error::Timeout)));

    let msg = socket.recv(Duration::from_secs(2)).await.unwrap();
    assert_eq!(msg, b"Ahello");
}

#[tokio::test]
async fn test_back_to_back_frames_in_one_write() {
    let (port, _peer) = common::spawn_sp_peer(PAIR0_PROTOCOL, |mut stream| async move {
        let mut both = common::frame(b"A1");
        both.extend(common::frame(b""));
        stream.write_all(&both).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
    })
    .await;

    let mut socket = PairSocket::dial(&format!("127.0.0.1:{}", port), Duration::from_secs(1))
        .await
        .unwrap();

    assert_eq!(socket.recv(Duration::from_secs(1)).await.unwrap(), b"A1");
    assert!(socket.recv(Duration::from_secs(1)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_send_is_length_prefixed() {
    let (port, peer) = common::spawn_sp_peer(PAIR0_PROTOCOL, |mut stream| async move {
        let mut buf = vec![0u8; 8 + 3];
        stream.read_exact(&mut buf).await.unwrap();
        assert_eq!(buf, common::frame(b"Axy"));
    })
    .await;

    let mut socket = PairSocket::dial(&format!("127.0.0.1:{}", port), Duration::from_secs(1))
        .await
        .unwrap();
    socket.send(b"Axy").await.unwrap();

    peer.await.unwrap();
    assert!(matches!(
        socket.recv(Duration::from_secs(1)).await,
        Err(Error::Closed)
    ));
}

#[tokio::test]
async fn test_custom_message_limit() {
    let (port, _peer) = common::spawn_pair_peer(vec![vec![0u8; 64]], Duration::from_secs(2)).await;

    let mut socket = PairSocket::dial(&format!("127.0.0.1:{}", port), Duration::from_secs(1))
        .await
        .unwrap();
    socket.set_max_message_size(16);

    assert!(matches!(
        socket.recv(Duration::from_secs(1)).await,
        Err(Error::Protocol(_))
    ));
}
