use std::io;
use thiserror::Error;

/// Errors raised while sending a response.
///
/// The first three variants are caller misuse and fatal to the current
/// response: the composer never retries, the caller decides whether to abort
/// the connection. `Io` only comes out of the encoders' buffer writes and the
/// async [`ConnectionWriter`](crate::connection::ConnectionWriter).
#[derive(Error, Debug)]
pub enum SendError {
    #[error("sent headers already")]
    HeadersAlreadySent,

    #[error("sent content already")]
    ContentAlreadySent,

    #[error("last chunk already sent")]
    LastChunkAlreadySent,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Returns true if the error comes from driving the response out of order.
    pub fn is_misuse(&self) -> bool {
        !matches!(self, SendError::Io { .. })
    }
}
