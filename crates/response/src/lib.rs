//! An HTTP/1.1 response composer
//!
//! This crate composes a single HTTP response and hands its bytes to an
//! already-established connection. It sits directly above a raw byte-send
//! primitive: the caller supplies a status, headers and a body, and the
//! composer emits the status line, a sorted header block and a body framed as
//! fixed-length content, chunked transfer coding or a
//! `multipart/x-mixed-replace` stream.
//!
//! # Example
//!
//! ```
//! use micro_response::connection::MemoryTransport;
//! use micro_response::response::ResponseComposer;
//!
//! let mut response = ResponseComposer::new(MemoryTransport::new());
//! response.set_status(200);
//! response.set_content_type(mime::TEXT_PLAIN);
//! response.chunk("hello");
//! response.send_response().unwrap();
//!
//! let written = response.transport().written();
//! assert_eq!(
//!     &written[..],
//!     &b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n0\r\n\r\n"[..]
//! );
//! ```
//!
//! # Architecture
//!
//! - [`response`]: the [`ResponseComposer`](response::ResponseComposer) state machine
//! - [`protocol`]: status, headers, body representations and errors
//! - [`codec`]: header, chunked and multipart encoders
//! - [`boundary`]: multipart boundary generation
//! - [`connection`]: the [`Transport`](connection::Transport) capability and adapters
//!
//! # Transport
//!
//! The composer never performs I/O itself. It is bound at construction to a
//! [`Transport`](connection::Transport) offering `send_data`, `close_connection`
//! and `close_connection_after_writing`. [`ChannelTransport`](connection::ChannelTransport)
//! and [`ConnectionWriter`](connection::ConnectionWriter) bridge it to a tokio
//! `AsyncWrite`:
//!
//! ```no_run
//! use micro_response::connection::{ChannelTransport, ConnectionWriter};
//! use micro_response::response::ResponseComposer;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let (stream, _remote_addr) = listener.accept().await.unwrap();
//!
//!     let (transport, events) = ChannelTransport::channel();
//!     let mut response = ResponseComposer::new(transport);
//!     response.set_content("Hello World!\r\n");
//!     if let Err(e) = response.send_response() {
//!         error!(cause = %e, "compose response error");
//!     }
//!     drop(response);
//!
//!     let mut writer = ConnectionWriter::new(stream);
//!     match writer.run(events).await {
//!         Ok(()) => info!("finished writing, connection shutdown"),
//!         Err(e) => error!("write response error, cause {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! [`protocol::SendError`] reports a response driven out of order: headers
//! sent twice, content sent twice, or a chunk after the last chunk. These are
//! never recovered internally.
//!
//! # Limitations
//!
//! - HTTP/1.1 only
//! - Chunk extensions and trailer fields are not transmitted
//! - One response per composer

pub mod boundary;
pub mod codec;
pub mod connection;
pub mod protocol;
pub mod response;

mod utils;
pub(crate) use utils::ensure;
