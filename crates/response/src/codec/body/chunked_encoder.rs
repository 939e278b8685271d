//! Encoder for HTTP chunked transfer coding, RFC 2616 section 3.6.1.
//!
//! Each chunk is written as its size in uppercase hexadecimal, CRLF, the chunk
//! data and CRLF. A zero-length chunk is the last chunk; after it the encoder
//! refuses further chunks.

use crate::codec::FastWrite;
use crate::protocol::{Chunk, SendError};
use crate::ensure;
use bytes::{BufMut, BytesMut};
use std::io::Write;

use tokio_util::codec::Encoder;
use tracing::{debug, error, trace};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkedEncoder {
    eof: bool,
    send_size: usize,
}

impl ChunkedEncoder {
    pub fn new() -> Self {
        Self { eof: false, send_size: 0 }
    }

    /// Returns true once the zero-length chunk has been encoded.
    #[inline]
    pub fn is_finish(&self) -> bool {
        self.eof
    }

    /// Total payload bytes encoded so far, excluding framing.
    #[inline]
    pub fn send_size(&self) -> usize {
        self.send_size
    }
}

impl Encoder<Chunk> for ChunkedEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Chunk, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if self.eof {
            error!(chunk_size = item.len(), "chunk encoded after the last chunk");
        }
        ensure!(!self.eof, SendError::LastChunkAlreadySent);

        if let Some(extensions) = item.extensions() {
            debug!(extensions, "chunk extensions are not transmitted");
        }

        let data = item.data();
        write!(FastWrite(dst), "{:X}\r\n", data.len())?;
        dst.reserve(data.len() + 2);
        dst.put_slice(data);
        dst.put_slice(b"\r\n");

        self.send_size += data.len();
        if item.is_last() {
            self.eof = true;
        }
        trace!(chunk_size = data.len(), eof = self.eof, "encoded chunk");
        Ok(())
    }
}
