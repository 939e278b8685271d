use bytes::{Bytes, BytesMut};

/// The capability a composer needs from the connection it writes to.
///
/// Implementations own everything below the response layer: buffering,
/// backpressure, socket errors. None of the methods report failures back to
/// the composer.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    /// Queues bytes for transmission.
    fn send_data(&mut self, data: Bytes);

    /// Closes the connection immediately, dropping anything not yet written.
    fn close_connection(&mut self);

    /// Closes the connection once all queued bytes have been written.
    fn close_connection_after_writing(&mut self);
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send_data(&mut self, data: Bytes) {
        (**self).send_data(data);
    }

    fn close_connection(&mut self) {
        (**self).close_connection();
    }

    fn close_connection_after_writing(&mut self) {
        (**self).close_connection_after_writing();
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send_data(&mut self, data: Bytes) {
        (**self).send_data(data);
    }

    fn close_connection(&mut self) {
        (**self).close_connection();
    }

    fn close_connection_after_writing(&mut self) {
        (**self).close_connection_after_writing();
    }
}

/// How a connection was asked to close.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CloseMode {
    Immediately,
    AfterWriting,
}

/// A transport that keeps everything it is given in memory.
///
/// Each `send_data` call is recorded separately, so callers can check how a
/// response was split into writes as well as the bytes themselves.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Vec<Bytes>,
    close: Option<CloseMode>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// The payload of every `send_data` call, in order.
    #[inline]
    pub fn sent(&self) -> &[Bytes] {
        &self.sent
    }

    /// All bytes sent so far, concatenated.
    pub fn written(&self) -> Bytes {
        let size = self.sent.iter().map(Bytes::len).sum();
        let mut buf = BytesMut::with_capacity(size);
        for data in &self.sent {
            buf.extend_from_slice(data);
        }
        buf.freeze()
    }

    /// The first close request received, if any.
    #[inline]
    pub fn close_mode(&self) -> Option<CloseMode> {
        self.close
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.close.is_some()
    }
}

impl Transport for MemoryTransport {
    fn send_data(&mut self, data: Bytes) {
        self.sent.push(data);
    }

    fn close_connection(&mut self) {
        self.close.get_or_insert(CloseMode::Immediately);
    }

    fn close_connection_after_writing(&mut self) {
        self.close.get_or_insert(CloseMode::AfterWriting);
    }
}
