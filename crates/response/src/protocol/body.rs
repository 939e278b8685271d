//! Body representations a response can carry.

use bytes::Bytes;

use crate::protocol::HeaderFields;

/// How the body of a response is framed on the wire.
///
/// A response carries at most one representation. When a handler filled more
/// than one, [`BodyMode::resolve`] picks the authoritative one by priority:
/// content, then chunks, then multiparts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BodyMode {
    /// A fixed-length body announced with `Content-Length`
    Content,
    /// A body sent with `Transfer-Encoding: chunked`
    Chunked,
    /// A `multipart/x-mixed-replace` body
    Multipart,
    /// Nothing was set; sent as empty content
    Unset,
}

impl BodyMode {
    /// Picks the mode from which representations are present.
    pub fn resolve(has_content: bool, has_chunks: bool, has_multiparts: bool) -> Self {
        if has_content {
            BodyMode::Content
        } else if has_chunks {
            BodyMode::Chunked
        } else if has_multiparts {
            BodyMode::Multipart
        } else {
            BodyMode::Unset
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyMode::Content => "content",
            BodyMode::Chunked => "chunked",
            BodyMode::Multipart => "multipart",
            BodyMode::Unset => "unset",
        }
    }
}

/// One entry of the chunk queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    data: Bytes,
    extensions: Option<String>,
}

impl Chunk {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into(), extensions: None }
    }

    /// Attaches chunk extensions. They are kept with the chunk but not transmitted.
    pub fn with_extensions(data: impl Into<Bytes>, extensions: impl Into<String>) -> Self {
        Self { data: data.into(), extensions: Some(extensions.into()) }
    }

    /// The zero-length chunk that terminates a chunked body.
    pub fn last() -> Self {
        Self::default()
    }

    #[inline]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    #[inline]
    pub fn extensions(&self) -> Option<&str> {
        self.extensions.as_deref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true for the terminal, zero-length chunk.
    #[inline]
    pub fn is_last(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Bytes> for Chunk {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

impl From<&'static str> for Chunk {
    fn from(data: &'static str) -> Self {
        Self::new(data)
    }
}

impl From<String> for Chunk {
    fn from(data: String) -> Self {
        Self::new(data)
    }
}

impl From<Vec<u8>> for Chunk {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

/// One body part of a multipart response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Part {
    headers: HeaderFields,
    body: Bytes,
}

impl Part {
    pub fn new(headers: HeaderFields, body: impl Into<Bytes>) -> Self {
        Self { headers, body: body.into() }
    }

    #[inline]
    pub fn headers(&self) -> &HeaderFields {
        &self.headers
    }

    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderFields {
        &mut self.headers
    }

    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// A bare body becomes a part without headers.
impl From<Bytes> for Part {
    fn from(body: Bytes) -> Self {
        Self::new(HeaderFields::new(), body)
    }
}

impl From<&'static str> for Part {
    fn from(body: &'static str) -> Self {
        Self::new(HeaderFields::new(), body)
    }
}

impl From<String> for Part {
    fn from(body: String) -> Self {
        Self::new(HeaderFields::new(), body)
    }
}

impl From<(HeaderFields, Bytes)> for Part {
    fn from((headers, body): (HeaderFields, Bytes)) -> Self {
        Self::new(headers, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_wins_over_everything() {
        assert_eq!(BodyMode::resolve(true, true, true), BodyMode::Content);
        assert_eq!(BodyMode::resolve(true, false, true), BodyMode::Content);
        assert_eq!(BodyMode::resolve(true, true, false), BodyMode::Content);
    }

    #[test]
    fn chunks_win_over_multiparts() {
        assert_eq!(BodyMode::resolve(false, true, true), BodyMode::Chunked);
        assert_eq!(BodyMode::resolve(false, true, false), BodyMode::Chunked);
    }

    #[test]
    fn multiparts_and_unset() {
        assert_eq!(BodyMode::resolve(false, false, true), BodyMode::Multipart);
        assert_eq!(BodyMode::resolve(false, false, false), BodyMode::Unset);
    }

    #[test]
    fn empty_chunk_is_last() {
        assert!(Chunk::from("").is_last());
        assert!(Chunk::last().is_last());
        assert!(!Chunk::from("x").is_last());
    }

    #[test]
    fn chunk_keeps_extensions() {
        let chunk = Chunk::with_extensions("abc", "name=value");
        assert_eq!(chunk.extensions(), Some("name=value"));
        assert_eq!(chunk.len(), 3);
    }

    #[test]
    fn bare_body_part_has_no_headers() {
        let part = Part::from("hello");
        assert!(part.headers().is_empty());
        assert_eq!(part.body(), &Bytes::from_static(b"hello"));
    }
}
