//! Encoder for multipart bodies, RFC 2046 section 5.1.1.
//!
//! The CRLF in front of each boundary line belongs to the boundary, not to the
//! preceding part, so part bodies are written untouched.

use crate::codec::header::encode_header_lines;
use crate::protocol::{Part, SendError};
use bytes::{BufMut, BytesMut};

use tokio_util::codec::Encoder;
use tracing::trace;

/// An item of a multipart body stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartItem {
    /// One body part, framed by a boundary line
    Part(Part),
    /// The closing delimiter and empty epilogue
    Epilogue,
}

impl From<Part> for MultipartItem {
    fn from(part: Part) -> Self {
        MultipartItem::Part(part)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartEncoder {
    boundary: String,
}

impl MultipartEncoder {
    pub fn new(boundary: impl Into<String>) -> Self {
        Self { boundary: boundary.into() }
    }

    #[inline]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }
}

impl Encoder<MultipartItem> for MultipartEncoder {
    type Error = SendError;

    fn encode(&mut self, item: MultipartItem, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            MultipartItem::Part(part) => {
                dst.reserve(self.boundary.len() + part.body().len() + 8);
                dst.put_slice(b"\r\n--");
                dst.put_slice(self.boundary.as_bytes());
                dst.put_slice(b"\r\n");
                encode_header_lines(part.headers(), dst);
                dst.put_slice(b"\r\n");
                dst.put_slice(part.body());
                trace!(body_size = part.body().len(), "encoded multipart part");
                Ok(())
            }
            MultipartItem::Epilogue => {
                dst.put_slice(b"\r\n--");
                dst.put_slice(self.boundary.as_bytes());
                dst.put_slice(b"--\r\n\r\n");
                Ok(())
            }
        }
    }
}
