//! HTTP codec module for encoding response messages
//!
//! This module turns response values into the bytes sent on the wire. Each
//! encoder implements tokio-util's [`Encoder`](tokio_util::codec::Encoder) and
//! appends to a caller-supplied `BytesMut`.
//!
//! # Components
//!
//! - [`HeaderEncoder`]: status line and sorted header block
//! - [`ChunkedEncoder`]: chunked transfer coding
//! - [`MultipartEncoder`]: `multipart/x-mixed-replace` parts and epilogue
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use micro_response::codec::ChunkedEncoder;
//! use micro_response::protocol::Chunk;
//! use tokio_util::codec::Encoder;
//!
//! let mut encoder = ChunkedEncoder::new();
//! let mut buffer = BytesMut::new();
//! encoder.encode(Chunk::from("hello"), &mut buffer).unwrap();
//! assert_eq!(&buffer[..], b"5\r\nhello\r\n");
//! ```

use bytes::{BufMut, BytesMut};
use std::io;
use std::io::Write;

mod body;
mod header;

pub use body::{ChunkedEncoder, MultipartEncoder, MultipartItem};
pub use header::HeaderEncoder;

/// Fast writer implementation for writing to BytesMut.
///
/// Lets `write!` format directly into the buffer.
pub(crate) struct FastWrite<'a>(pub(crate) &'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
