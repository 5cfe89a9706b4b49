// ABOUTME: NNG SP pair0 protocol over TCP, dial side only
// ABOUTME: 8-byte SP header exchange, then u64 big-endian length-prefixed messages

use crate::error::Error;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// SP protocol number for pair v0
pub const PAIR0_PROTOCOL: u16 = 0x0010;

/// Receive limit, same as NNG's default `recv-size-max`
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024 * 1024;

const LENGTH_PREFIX: usize = 8;
const READ_CHUNK: usize = 16 * 1024;

/// Build the SP connection header for a protocol
pub fn sp_header(protocol: u16) -> [u8; 8] {
    let [hi, lo] = protocol.to_be_bytes();
    [0x00, b'S', b'P', 0x00, hi, lo, 0x00, 0x00]
}

/// Validate a peer's SP header and return its protocol number
pub fn parse_sp_header(header: &[u8; 8]) -> Result<u16, Error> {
    if header[..4] != [0x00, b'S', b'P', 0x00] || header[6..] != [0x00, 0x00] {
        return Err(Error::Handshake(format!(
            "not an SP peer (header {:02x?})",
            header
        )));
    }
    Ok(u16::from_be_bytes([header[4], header[5]]))
}

/// Connected pair0 socket
pub struct PairSocket {
    stream: TcpStream,
    /// Bytes read but not yet returned as a complete message
    buffer: Vec<u8>,
    max_message_size: usize,
}

impl PairSocket {
    /// Dial `addr` (`host:port`) and run the SP handshake, both within `connect_timeout`
    pub async fn dial(addr: &str, connect_timeout: Duration) -> Result<Self, Error> {
        let stream = match timeout(connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(Error::Connection(format!("{}: {}", addr, e))),
            Err(_) => {
                return Err(Error::Connection(format!(
                    "{}: connect timed out after {:?}",
                    addr, connect_timeout
                )))
            }
        };
        let _ = stream.set_nodelay(true);

        match timeout(connect_timeout, Self::handshake(stream)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Handshake(format!(
                "{}: no SP header within {:?}",
                addr, connect_timeout
            ))),
        }
    }

    async fn handshake(mut stream: TcpStream) -> Result<Self, Error> {
        stream
            .write_all(&sp_header(PAIR0_PROTOCOL))
            .await
            .map_err(|e| Error::Handshake(e.to_string()))?;

        let mut header = [0u8; 8];
        stream
            .read_exact(&mut header)
            .await
            .map_err(|e| Error::Handshake(e.to_string()))?;

        let peer = parse_sp_header(&header)?;
        log::debug!("SP handshake complete, peer protocol 0x{:04x}", peer);
        if peer != PAIR0_PROTOCOL {
            return Err(Error::Handshake(format!(
                "peer speaks protocol 0x{:04x}, expected pair0 (0x{:04x})",
                peer, PAIR0_PROTOCOL
            )));
        }

        Ok(Self {
            stream,
            buffer: Vec::with_capacity(READ_CHUNK),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        })
    }

    /// Change the largest message `recv` will accept
    pub fn set_max_message_size(&mut self, max: usize) {
        self.max_message_size = max;
    }

    /// Receive the next message, waiting at most `recv_timeout`.
    ///
    /// Partial data survives a timeout and is completed by the next call.
    pub async fn recv(&mut self, recv_timeout: Duration) -> Result<Vec<u8>, Error> {
        match timeout(recv_timeout, self.recv_message()).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout),
        }
    }

    // Cancel safe: bytes only enter `buffer` after a completed read
    async fn recv_message(&mut self) -> Result<Vec<u8>, Error> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            if let Some(msg) = self.take_message()? {
                return Ok(msg);
            }
            let n = self.stream.read(&mut chunk).await?;
            if n == 0 {
                return Err(Error::Closed);
            }
            self.buffer.extend_from_slice(&chunk[..n]);
        }
    }

    fn take_message(&mut self) -> Result<Option<Vec<u8>>, Error> {
        if self.buffer.len() < LENGTH_PREFIX {
            return Ok(None);
        }
        let mut prefix = [0u8; LENGTH_PREFIX];
        prefix.copy_from_slice(&self.buffer[..LENGTH_PREFIX]);
        let len = u64::from_be_bytes(prefix);

        if len > self.max_message_size as u64 {
            return Err(Error::Protocol(format!(
                "message of {} bytes exceeds limit of {} bytes",
                len, self.max_message_size
            )));
        }

        let end = LENGTH_PREFIX + len as usize;
        if self.buffer.len() < end {
            return Ok(None);
        }
        let msg = self.buffer[LENGTH_PREFIX..end].to_vec();
        self.buffer.drain(..end);
        Ok(Some(msg))
    }

    /// Send one message
    pub async fn send(&mut self, data: &[u8]) -> Result<(), Error> {
        let mut frame = Vec::with_capacity(LENGTH_PREFIX + data.len());
        frame.extend_from_slice(&(data.len() as u64).to_be_bytes());
        frame.extend_from_slice(data);
        self.stream.write_all(&frame).await?;
        Ok(())
    }

    /// Shut down the write side; the socket itself closes on drop
    pub async fn close(mut self) -> Result<(), Error> {
        self.stream.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair0_header_bytes() {
        assert_eq!(sp_header(PAIR0_PROTOCOL), [0, b'S', b'P', 0, 0x00, 0x10, 0, 0]);
    }

    #[test]
    fn header_round_trip_and_rejection() {
        assert_eq!(parse_sp_header(&sp_header(0x0031)).unwrap(), 0x0031);
        assert!(matches!(
            parse_sp_header(b"HTTP/1.1"),
            Err(Error::Handshake(_))
        ));
    }
}
