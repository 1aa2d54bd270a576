//! Line streams over plain tokio byte streams (TCP, in-memory duplex).

use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader,
    DuplexStream, ReadHalf, Split, WriteHalf,
};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;

use crate::{ConnectionId, LineStream, TransportError, decode_line_lossy};

/// A [`LineStream`] over a TCP connection.
pub type TcpLineStream = TextLineStream<OwnedReadHalf, OwnedWriteHalf>;

/// A [`LineStream`] over any tokio reader/writer pair.
///
/// The read half is split on `\n` with [`Split`], whose `next_segment` is
/// cancel-safe, so a line that is half-received when a `select!` branch is
/// dropped is kept in the buffer for the next call. Lines are decoded
/// lossily: a stray non-UTF-8 byte costs one character, not the session.
pub struct TextLineStream<R, W> {
    id: ConnectionId,
    reader: Mutex<Split<BufReader<R>>>,
    writer: Mutex<W>,
}

impl<R, W> TextLineStream<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Wraps an already-connected reader/writer pair.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            id: ConnectionId::next(),
            reader: Mutex::new(BufReader::new(reader).split(b'\n')),
            writer: Mutex::new(writer),
        }
    }
}

impl TcpLineStream {
    /// Opens a TCP connection to `addr` (`host:port`).
    pub async fn connect(addr: &str) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(TransportError::ConnectFailed)?;
        // Commands are tiny and latency matters more than packet count.
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "could not disable Nagle");
        }
        let (read, write) = stream.into_split();
        let conn = Self::new(read, write);
        tracing::info!(addr, conn_id = %conn.id, "TCP line stream connected");
        Ok(conn)
    }
}

impl TextLineStream<ReadHalf<DuplexStream>, WriteHalf<DuplexStream>> {
    /// Creates an in-memory line stream and returns it together with the
    /// peer end of the pipe.
    ///
    /// Whatever is written to the peer shows up as received lines, and
    /// every sent line can be read back from the peer.
    pub fn duplex(max_buf_size: usize) -> (Self, DuplexStream) {
        let (ours, theirs) = tokio::io::duplex(max_buf_size);
        let (read, write) = tokio::io::split(ours);
        (Self::new(read, write), theirs)
    }
}

impl<R, W> LineStream for TextLineStream<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    type Error = TransportError;

    async fn send_line(&self, line: &str) -> Result<(), Self::Error> {
        let mut framed = String::with_capacity(line.len() + 1);
        framed.push_str(line);
        framed.push('\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(framed.as_bytes())
            .await
            .map_err(TransportError::SendFailed)?;
        writer.flush().await.map_err(TransportError::SendFailed)
    }

    async fn recv_line(&self) -> Result<Option<String>, Self::Error> {
        let mut reader = self.reader.lock().await;
        let segment = reader
            .next_segment()
            .await
            .map_err(TransportError::ReceiveFailed)?;
        Ok(segment.map(|bytes| decode_line_lossy(self.id, &bytes)))
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.writer
            .lock()
            .await
            .shutdown()
            .await
            .map_err(TransportError::SendFailed)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
