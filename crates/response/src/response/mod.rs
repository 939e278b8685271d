//! The response composer.
//!
//! [`ResponseComposer`] owns the state of one in-flight response and walks it
//! through a one-way sequence: header block, body, trailer. Each step can run
//! only once per mode; chunked and multipart bodies may be replenished and
//! drained any number of times before the trailer.

mod composer;

pub use composer::ResponseComposer;
