//! HTTP body framing module for response payloads
//!
//! # Encoders
//! - [`ChunkedEncoder`]: Implements chunked transfer coding and guards the last chunk
//! - [`MultipartEncoder`]: Frames body parts and the closing delimiter
//!
//! Fixed-length content needs no framing beyond its `Content-Length` header and
//! is handed to the transport as is.

mod chunked_encoder;
mod multipart_encoder;

pub use chunked_encoder::ChunkedEncoder;
pub use multipart_encoder::MultipartEncoder;
pub use multipart_encoder::MultipartItem;
