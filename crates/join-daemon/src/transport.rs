//! One-shot request/reply transport over TCP.
//!
//! Every connection carries exactly one message in each direction. The
//! initiator writes its request and waits for a single reply; the acceptor
//! reads one request, hands it to a [`Handler`], writes the reply and closes.
//! Messages are self-delimiting JSON, so no length prefix is used: the reader
//! accumulates bytes until one complete JSON value has arrived.

use crate::error::{HandlerError, ServeError, TransportError};
use async_trait::async_trait;
use join_core::protocol::{self, Envelope};
use join_core::{CodecError, Payload, WireMessage};
use serde::de::IgnoredAny;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{lookup_host, TcpListener, TcpSocket, TcpStream};
use tracing::{debug, error, info, warn, Instrument};

/// Maximum inbound message size (1MB). Join messages are tiny; anything
/// bigger is a misbehaving peer.
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

const READ_CHUNK_SIZE: usize = 4096;

/// Service-side logic invoked once per accepted connection.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Produce the single reply for `payload`.
    ///
    /// Returning an error closes the connection without replying.
    async fn handle(&self, payload: Payload) -> Result<Payload, HandlerError>;
}

/// Read exactly one JSON message and return its bytes.
///
/// Bytes following the first complete value are discarded.
pub async fn read_message<R>(reader: &mut R) -> Result<Vec<u8>, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(READ_CHUNK_SIZE);
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    let mut scanner = FrameScanner::default();

    loop {
        let n = reader.read(&mut chunk).await.map_err(TransportError::Read)?;
        if n == 0 {
            if buf.iter().all(u8::is_ascii_whitespace) {
                return Err(TransportError::Closed);
            }
            // Peer hung up mid-message
            return Err(match serde_json::from_slice::<IgnoredAny>(&buf) {
                Err(e) => CodecError::Decoding(e).into(),
                Ok(_) => TransportError::Closed,
            });
        }

        buf.extend_from_slice(&chunk[..n]);

        if scanner.advance(&buf) {
            if let Some(end) = message_end(&buf)? {
                buf.truncate(end);
                return Ok(buf);
            }
        }

        if buf.len() > MAX_MESSAGE_SIZE {
            return Err(TransportError::MessageTooLarge {
                size: buf.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
    }
}

/// Tracks bracket depth across reads so the buffer is only parsed once the
/// first top-level value may be complete.
///
/// Each byte is visited once. A value that does not start with `{` or `[`
/// is never a valid envelope, so for those the scanner gives up and every
/// read is handed to the parser.
#[derive(Debug, Default)]
struct FrameScanner {
    pos: usize,
    depth: usize,
    in_string: bool,
    escaped: bool,
    opaque: bool,
}

impl FrameScanner {
    /// Consume bytes appended since the last call. Returns `true` when the
    /// buffer is worth parsing.
    fn advance(&mut self, buf: &[u8]) -> bool {
        if self.opaque {
            return true;
        }
        while let Some(&b) = buf.get(self.pos) {
            self.pos += 1;
            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if b == b'\\' {
                    self.escaped = true;
                } else if b == b'"' {
                    self.in_string = false;
                }
                continue;
            }
            match b {
                b'"' if self.depth > 0 => self.in_string = true,
                b'{' | b'[' => self.depth += 1,
                b'}' | b']' if self.depth > 0 => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        return true;
                    }
                }
                b if b.is_ascii_whitespace() => {}
                _ if self.depth == 0 => {
                    self.opaque = true;
                    return true;
                }
                _ => {}
            }
        }
        false
    }
}

/// Offset just past the first complete JSON value in `buf`, if there is one.
fn message_end(buf: &[u8]) -> Result<Option<usize>, TransportError> {
    let mut values = serde_json::Deserializer::from_slice(buf).into_iter::<IgnoredAny>();
    match values.next() {
        Some(Ok(_)) => Ok(Some(values.byte_offset())),
        Some(Err(e)) if e.is_eof() => Ok(None),
        Some(Err(e)) => Err(CodecError::Decoding(e).into()),
        None => Ok(None),
    }
}

/// Write the whole message and flush it.
pub async fn write_message<W>(writer: &mut W, data: &[u8]) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(data).await.map_err(TransportError::Write)?;
    writer.flush().await.map_err(TransportError::Write)
}

/// Send one message to `addr` and decode the reply as `R`.
pub async fn request<R>(addr: &str, message: impl Into<Payload>) -> Result<R, TransportError>
where
    R: WireMessage,
{
    let data = protocol::encode(&message.into())?;

    let mut stream = TcpStream::connect(addr)
        .await
        .map_err(|source| TransportError::Connect {
            addr: addr.to_string(),
            source,
        })?;

    write_message(&mut stream, &data).await?;
    debug!("Sent {} bytes to {}", data.len(), addr);

    let reply = read_message(&mut stream).await.map_err(|e| match e {
        TransportError::Codec(codec) => TransportError::InvalidReply(codec),
        other => other,
    })?;

    let payload = protocol::decode(&reply)
        .and_then(Envelope::dispatch)
        .map_err(TransportError::InvalidReply)?;

    R::from_payload(payload).map_err(|other| TransportError::UnexpectedReply {
        expected: R::METHOD,
        got: other.method(),
    })
}

/// Pending connections the kernel queues for a listener.
pub const LISTEN_BACKLOG: u32 = 1024;

/// Bind a TCP listener.
pub async fn bind(addr: &str) -> io::Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Bind a socket to `addr` without listening on it.
///
/// The local port is reserved (and resolved, for port 0) but connection
/// attempts are refused until [`listen`] is called.
pub async fn bind_socket(addr: &str) -> io::Result<TcpSocket> {
    let addr = lookup_host(addr).await?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} did not resolve to any address", addr),
        )
    })?;

    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    #[cfg(unix)]
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    debug!("Bound {}", socket.local_addr()?);
    Ok(socket)
}

/// Start accepting connections on a socket from [`bind_socket`].
pub fn listen(socket: TcpSocket) -> io::Result<TcpListener> {
    let listener = socket.listen(LISTEN_BACKLOG)?;
    info!("Listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Accept connections until `shutdown` resolves.
///
/// Each connection is handled on its own task, so a slow peer never holds
/// up the accept loop. In-flight handlers are abandoned on shutdown.
pub async fn serve<H, F>(listener: TcpListener, handler: Arc<H>, shutdown: F)
where
    H: Handler,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, peer)) => {
                        let handler = Arc::clone(&handler);
                        tokio::spawn(
                            handle_connection(stream, peer, handler).in_current_span(),
                        );
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                    }
                }
            }

            _ = &mut shutdown => {
                info!("Shutting down");
                break;
            }
        }
    }
}

async fn handle_connection<H: Handler>(mut stream: TcpStream, peer: SocketAddr, handler: Arc<H>) {
    debug!("New connection from {}", peer);

    if let Err(e) = respond(&mut stream, handler.as_ref()).await {
        warn!("Closing connection from {} without reply: {}", peer, e);
    }

    if let Err(e) = stream.shutdown().await {
        debug!("Failed to close connection from {}: {}", peer, e);
    }
}

async fn respond<H: Handler>(stream: &mut TcpStream, handler: &H) -> Result<(), ServeError> {
    let data = read_message(stream).await?;
    let payload = protocol::decode(&data)?.dispatch()?;
    let reply = handler.handle(payload).await?;
    let bytes = protocol::encode(&reply)?;
    write_message(stream, &bytes).await?;
    Ok(())
}
