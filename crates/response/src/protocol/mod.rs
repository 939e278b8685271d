//! Response protocol types.
//!
//! This module holds the values a [`ResponseComposer`](crate::response::ResponseComposer)
//! is built from, independent of how they are framed on the wire:
//!
//! - **Status** ([`status`]): status line text with the standard reason-phrase table
//! - **Headers** ([`header`]): case-preserving, name-ordered header fields
//!   - [`HeaderFields`]: the map itself
//!   - [`FieldValue`]: a single value or a list of values (`Set-Cookie`)
//! - **Body** ([`body`]): the three body representations
//!   - [`BodyMode`]: which representation frames the body
//!   - [`Chunk`]: one entry of a chunked body
//!   - [`Part`]: one part of a multipart body
//! - **Errors** ([`error`]): [`SendError`], raised when a response is driven
//!   out of order or the async writer fails

mod status;
pub use status::Status;
pub(crate) use status::DEFAULT_STATUS;

mod header;
pub use header::FieldValue;
pub use header::HeaderFields;
pub use header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION, SET_COOKIE, TRANSFER_ENCODING};

mod body;
pub use body::BodyMode;
pub use body::Chunk;
pub use body::Part;

mod error;
pub use error::SendError;
