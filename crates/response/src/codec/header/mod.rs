//! HTTP header processing module for encoding response header blocks
//!
//! # Components
//!
//! - [`HeaderEncoder`]: Encodes a status line and header block to bytes
//!   - Emits header lines in ascending name order
//!   - Emits list-valued headers as one line per value
//!
//! The line writer is also used for the header block of each multipart part.

mod header_encoder;

pub use header_encoder::HeaderEncoder;
pub(crate) use header_encoder::encode_header_lines;
