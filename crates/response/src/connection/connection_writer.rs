use crate::connection::Transport;
use crate::protocol::SendError;
use bytes::{Bytes, BytesMut};
use futures::channel::mpsc;
use futures::{FutureExt, Stream, StreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Default size of the write buffer
const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// What a [`ChannelTransport`] forwards to its [`ConnectionWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Data(Bytes),
    Close,
    CloseAfterWriting,
}

/// A transport that hands every call to an asynchronous writer task.
///
/// The composer stays synchronous: events go through an unbounded channel and
/// the [`ConnectionWriter`] on the other end performs the actual I/O.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: mpsc::UnboundedSender<TransportEvent>,
}

impl ChannelTransport {
    /// Creates a transport and the receiving end to feed into a [`ConnectionWriter`].
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TransportEvent>) {
        let (sender, receiver) = mpsc::unbounded();
        (Self { sender }, receiver)
    }

    fn forward(&mut self, event: TransportEvent) {
        if let Err(e) = self.sender.unbounded_send(event) {
            warn!("connection writer is gone, dropping transport event, cause {}", e);
        }
    }
}

impl Transport for ChannelTransport {
    fn send_data(&mut self, data: Bytes) {
        self.forward(TransportEvent::Data(data));
    }

    fn close_connection(&mut self) {
        self.forward(TransportEvent::Close);
    }

    fn close_connection_after_writing(&mut self) {
        self.forward(TransportEvent::CloseAfterWriting);
    }
}

/// Writes transport events to an async writer.
#[derive(Debug)]
pub struct ConnectionWriter<W> {
    writer: W,
    buffer: BytesMut,
    buffer_size: usize,
}

impl<W> ConnectionWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_capacity(writer: W, buffer_size: usize) -> Self {
        Self { writer, buffer: BytesMut::with_capacity(buffer_size), buffer_size }
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Drains `events` until a close request or the end of the stream.
    ///
    /// Data is buffered while further events are immediately available and is
    /// written once the buffer fills or before waiting for the next event.
    /// `CloseAfterWriting` writes what is buffered, then shuts the writer down;
    /// `Close` shuts it down and discards the buffer. When the stream simply ends
    /// the buffer is flushed and the writer is left open.
    pub async fn run<S>(&mut self, mut events: S) -> Result<(), SendError>
    where
        S: Stream<Item = TransportEvent> + Unpin,
    {
        loop {
            let event = match events.next().now_or_never() {
                Some(event) => event,
                None => {
                    self.flush().await?;
                    events.next().await
                }
            };

            let Some(event) = event else {
                break;
            };

            match event {
                TransportEvent::Data(data) => {
                    self.buffer.extend_from_slice(&data);
                    if self.buffer.len() >= self.buffer_size {
                        self.flush().await?;
                    }
                }
                TransportEvent::CloseAfterWriting => {
                    self.flush().await?;
                    self.writer.shutdown().await?;
                    debug!("connection closed after writing");
                    return Ok(());
                }
                TransportEvent::Close => {
                    if !self.buffer.is_empty() {
                        info!(discarded = self.buffer.len(), "connection closed with unwritten data");
                    }
                    self.buffer.clear();
                    self.writer.shutdown().await?;
                    debug!("connection closed");
                    return Ok(());
                }
            }
        }

        self.flush().await
    }

    #[inline]
    pub async fn flush(&mut self) -> Result<(), SendError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.writer.write_all(self.buffer.as_ref()).await?;
        self.buffer.clear();
        Ok(self.writer.flush().await?)
    }
}
