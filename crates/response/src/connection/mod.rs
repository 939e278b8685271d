//! Transport capability and connection adapters
//!
//! A [`ResponseComposer`](crate::response::ResponseComposer) never touches a
//! socket. It is bound at construction to a [`Transport`], which offers three
//! operations: send bytes, close now, close after everything is written.
//!
//! # Components
//!
//! - [`Transport`]: the capability trait
//! - [`MemoryTransport`]: records writes in memory
//! - [`ChannelTransport`]: forwards calls as [`TransportEvent`]s to an async task
//! - [`ConnectionWriter`]: the async task writing those events to an `AsyncWrite`

mod connection_writer;
mod transport;

pub use connection_writer::{ChannelTransport, ConnectionWriter, TransportEvent};
pub use transport::{CloseMode, MemoryTransport, Transport};

#[cfg(test)]
pub use transport::MockTransport;
