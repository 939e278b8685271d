//! HTTP header encoder implementation for serializing response header blocks
//!
//! This module turns a [`Status`] and a set of [`HeaderFields`] into the raw
//! bytes of a status line and header block. Header lines come out sorted by
//! name so the output is byte-for-byte reproducible.
//!
//! Framing headers (`Content-Length`, `Transfer-Encoding`, the multipart
//! `Content-Type`) are *not* decided here; the composer finalizes them before
//! calling the encoder.

use crate::codec::FastWrite;
use crate::protocol::{HeaderFields, Status};
use crate::protocol::SendError;

use bytes::{BufMut, BytesMut};

use std::io::Write;
use tokio_util::codec::Encoder;

/// Encoder for response header blocks implementing the [`Encoder`] trait.
///
/// Writes `HTTP/1.1 <status>\r\n`, one `<Name>: <Value>\r\n` line per header
/// value in ascending name order, and the terminating blank line.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderEncoder;

impl HeaderEncoder {
    /// Exact size of the encoded status line and header block.
    pub fn encoded_len(status: &Status, headers: &HeaderFields) -> usize {
        let lines: usize = headers.lines().map(|(name, value)| name.len() + value.len() + 4).sum();
        "HTTP/1.1 \r\n".len() + status.as_str().len() + lines + 2
    }
}

impl Encoder<(&Status, &HeaderFields)> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, item: (&Status, &HeaderFields), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (status, headers) = item;

        dst.reserve(Self::encoded_len(status, headers));
        write!(FastWrite(dst), "HTTP/1.1 {status}\r\n")?;

        encode_header_lines(headers, dst);
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Writes the header lines of `headers` without a terminating blank line.
///
/// Shared with the multipart encoder, whose part headers use the same layout.
pub(crate) fn encode_header_lines(headers: &HeaderFields, dst: &mut BytesMut) {
    for (name, value) in headers.lines() {
        dst.put_slice(name.as_bytes());
        dst.put_slice(b": ");
        dst.put_slice(value.as_bytes());
        dst.put_slice(b"\r\n");
    }
}
