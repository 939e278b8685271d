use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use mime::Mime;
use tokio_util::codec::Encoder;
use tracing::{debug, error, warn};

use crate::boundary::{BoundaryGenerator, SequenceBoundary};
use crate::codec::{ChunkedEncoder, HeaderEncoder, MultipartEncoder, MultipartItem};
use crate::connection::Transport;
use crate::protocol::{
    BodyMode, CONTENT_LENGTH, CONTENT_TYPE, Chunk, DEFAULT_STATUS, FieldValue, HeaderFields, LOCATION, Part,
    SET_COOKIE, SendError, Status, TRANSFER_ENCODING,
};
use crate::ensure;

/// Composes one HTTP/1.1 response and sends it through a [`Transport`].
///
/// A handler fills in the status, headers and exactly one body representation:
///
/// - fixed content ([`set_content`](Self::set_content)), sent with `Content-Length`
/// - chunks ([`chunk`](Self::chunk)), sent with `Transfer-Encoding: chunked`
/// - parts ([`multipart`](Self::multipart)), sent as `multipart/x-mixed-replace`
///
/// and then drives transmission, either all at once with
/// [`send_response`](Self::send_response) or piecewise with
/// [`send_headers`](Self::send_headers), [`send_body`](Self::send_body) and
/// [`send_trailer`](Self::send_trailer). Chunks and parts may be queued and
/// sent repeatedly between those calls.
///
/// When more than one representation was filled in, content wins over chunks
/// and chunks win over parts. The winning mode is fixed the moment the header
/// block goes out.
pub struct ResponseComposer<T> {
    transport: T,
    boundary_generator: Option<Arc<dyn BoundaryGenerator>>,

    status: Option<Status>,
    headers: HeaderFields,

    content: Option<Bytes>,
    chunks: Option<VecDeque<Chunk>>,
    multiparts: Option<VecDeque<Part>>,

    header_encoder: HeaderEncoder,
    chunked_encoder: ChunkedEncoder,
    multipart_encoder: Option<MultipartEncoder>,

    /// body mode latched when the header block was sent
    framing: Option<BodyMode>,
    content_sent: bool,
    trailer_sent: bool,
    keep_connection_open: bool,
}

impl<T: Transport> ResponseComposer<T> {
    /// Creates a composer drawing multipart boundaries from the process-wide
    /// [`SequenceBoundary`].
    pub fn new(transport: T) -> Self {
        Self::build(transport, None)
    }

    pub fn with_boundary_generator(transport: T, boundary_generator: Arc<dyn BoundaryGenerator>) -> Self {
        Self::build(transport, Some(boundary_generator))
    }

    fn build(transport: T, boundary_generator: Option<Arc<dyn BoundaryGenerator>>) -> Self {
        Self {
            transport,
            boundary_generator,
            status: None,
            headers: HeaderFields::new(),
            content: None,
            chunks: None,
            multiparts: None,
            header_encoder: HeaderEncoder,
            chunked_encoder: ChunkedEncoder::new(),
            multipart_encoder: None,
            framing: None,
            content_sent: false,
            trailer_sent: false,
            keep_connection_open: false,
        }
    }

    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[inline]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    #[inline]
    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Sets the status from a code or a free-form status text.
    pub fn set_status(&mut self, status: impl Into<Status>) {
        self.status = Some(status.into());
    }

    #[inline]
    pub fn headers(&self) -> &HeaderFields {
        &self.headers
    }

    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderFields {
        &mut self.headers
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.headers.insert(name, value);
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get_str(CONTENT_TYPE)
    }

    pub fn content_type_mime(&self) -> Option<Mime> {
        self.content_type()?.parse().ok()
    }

    pub fn set_content_type(&mut self, content_type: impl fmt::Display) {
        self.headers.insert(CONTENT_TYPE, content_type.to_string());
    }

    /// Appends `Set-Cookie` values, keeping those added before.
    pub fn add_set_cookie<I, S>(&mut self, cookies: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cookies = cookies.into_iter().peekable();
        if cookies.peek().is_none() {
            return;
        }
        self.headers.list_mut(SET_COOKIE).extend(cookies.map(Into::into));
    }

    /// Replaces the `Set-Cookie` values and returns the current list.
    ///
    /// With no cookies given the list is returned unchanged.
    pub fn set_cookie<I, S>(&mut self, cookies: I) -> &[String]
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cookies = cookies.into_iter().peekable();
        let list = self.headers.list_mut(SET_COOKIE);
        if cookies.peek().is_some() {
            list.clear();
            list.extend(cookies.map(Into::into));
        }
        list
    }

    pub fn cookies(&self) -> &[String] {
        match self.headers.get(SET_COOKIE) {
            Some(FieldValue::List(values)) => values,
            Some(FieldValue::Single(value)) => std::slice::from_ref(value),
            None => &[],
        }
    }

    /// Keeps the connection open after [`send_response`](Self::send_response),
    /// provided the status is `200 OK`.
    pub fn keep_connection_open(&mut self, keep: bool) {
        self.keep_connection_open = keep;
    }

    #[inline]
    pub fn content(&self) -> Option<&Bytes> {
        self.content.as_ref()
    }

    pub fn set_content(&mut self, content: impl Into<Bytes>) {
        let content = content.into();
        match self.framing {
            Some(BodyMode::Content) if self.content_sent => {
                warn!("content set after it was sent, ignoring it");
                return;
            }
            Some(BodyMode::Content) => {
                let announced = self.content.as_ref().map_or(0, Bytes::len);
                if announced != content.len() {
                    warn!(
                        announced,
                        actual = content.len(),
                        "content length differs from the sent Content-Length, ignoring it"
                    );
                    return;
                }
            }
            Some(mode) => {
                warn!(mode = mode.as_str(), "content set after headers framed the body differently, ignoring it");
                return;
            }
            None => self.warn_mixed(BodyMode::Content),
        }
        self.content = Some(content);
    }

    /// Queues a chunk. An empty chunk terminates the chunked body.
    pub fn chunk(&mut self, chunk: impl Into<Chunk>) {
        match self.framing {
            Some(BodyMode::Chunked) => {}
            Some(mode) => {
                warn!(mode = mode.as_str(), "chunk queued after headers framed the body differently, ignoring it");
                return;
            }
            None => self.warn_mixed(BodyMode::Chunked),
        }
        self.chunks.get_or_insert_with(VecDeque::new).push_back(chunk.into());
    }

    /// Queues a multipart body part. A bare body becomes a part without headers.
    pub fn multipart(&mut self, part: impl Into<Part>) {
        if self.trailer_sent {
            warn!("part queued after the closing delimiter was sent, ignoring it");
            return;
        }
        match self.framing {
            Some(BodyMode::Multipart) => {}
            Some(mode) => {
                warn!(mode = mode.as_str(), "part queued after headers framed the body differently, ignoring it");
                return;
            }
            None => self.warn_mixed(BodyMode::Multipart),
        }
        self.multiparts.get_or_insert_with(VecDeque::new).push_back(part.into());
    }

    /// The body mode that frames this response.
    pub fn body_mode(&self) -> BodyMode {
        self.framing.unwrap_or_else(|| {
            BodyMode::resolve(self.content.is_some(), self.chunks.is_some(), self.multiparts.is_some())
        })
    }

    #[inline]
    pub fn headers_sent(&self) -> bool {
        self.framing.is_some()
    }

    #[inline]
    pub fn content_sent(&self) -> bool {
        self.content_sent
    }

    #[inline]
    pub fn last_chunk_sent(&self) -> bool {
        self.chunked_encoder.is_finish()
    }

    #[inline]
    pub fn trailer_sent(&self) -> bool {
        self.trailer_sent
    }

    /// The multipart boundary, once one has been generated.
    pub fn multipart_boundary(&self) -> Option<&str> {
        self.multipart_encoder.as_ref().map(MultipartEncoder::boundary)
    }

    /// Sends headers, body and trailer, then closes the connection after
    /// writing unless it was asked to stay open and the status is `200 OK`.
    ///
    /// Chunks and parts are sent only if already queued.
    pub fn send_response(&mut self) -> Result<(), SendError> {
        self.send_headers()?;
        self.send_body()?;
        self.send_trailer()?;

        let keep_open = self.keep_connection_open && self.status.as_ref().is_none_or(Status::is_ok);
        if keep_open {
            debug!("response sent, keeping connection open");
        } else {
            debug!("response sent, closing connection after writing");
            self.transport.close_connection_after_writing();
        }
        Ok(())
    }

    /// Sends a `302 Found` response pointing at `location`.
    pub fn send_redirect(&mut self, location: impl Into<String>) -> Result<(), SendError> {
        self.set_status(302);
        self.headers.insert(LOCATION, location.into());
        self.send_response()
    }

    /// Closes the connection right away, abandoning whatever is not yet written.
    pub fn abort(&mut self) {
        warn!(headers_sent = self.headers_sent(), "aborting response");
        self.transport.close_connection();
    }

    /// Finalizes the framing headers and sends the status line and header block.
    ///
    /// Header lines are sorted by name. Fails if the headers were sent before.
    pub fn send_headers(&mut self) -> Result<(), SendError> {
        if self.headers_sent() {
            error!("send headers but headers have been sent already");
        }
        ensure!(!self.headers_sent(), SendError::HeadersAlreadySent);

        let mode = self.fixup_headers();
        self.framing = Some(mode);

        let status = self.status.clone().unwrap_or_else(Status::ok);
        let mut buf = BytesMut::new();
        self.header_encoder.encode((&status, &self.headers), &mut buf)?;

        debug!(status = %status, body_mode = mode.as_str(), "sending response headers");
        self.transport.send_data(buf.freeze());
        Ok(())
    }

    /// Sets the framing headers for the current body mode and returns that mode.
    fn fixup_headers(&mut self) -> BodyMode {
        let mode = self.body_mode();
        match mode {
            BodyMode::Content => {
                let length = self.content.as_ref().map_or(0, Bytes::len);
                self.headers.insert(CONTENT_LENGTH, length.to_string());
            }
            BodyMode::Chunked => {
                // a Content-Length set by the handler is left alone
                self.headers.insert(TRANSFER_ENCODING, "chunked");
            }
            BodyMode::Multipart => {
                let boundary = self.multipart_encoder().boundary();
                let content_type = format!("multipart/x-mixed-replace; boundary=\"{boundary}\"");
                self.headers.insert(CONTENT_TYPE, content_type);
            }
            BodyMode::Unset => {
                self.headers.insert(CONTENT_LENGTH, "0");
            }
        }
        mode
    }

    /// Sends the body for the current mode. Does not close the connection.
    ///
    /// Content can only be sent once; queued chunks and parts are drained and
    /// more may be queued and sent by calling this again.
    pub fn send_body(&mut self) -> Result<(), SendError> {
        match self.body_mode() {
            BodyMode::Content | BodyMode::Unset => self.send_content(),
            BodyMode::Chunked => self.send_chunks(),
            BodyMode::Multipart => self.send_multiparts(),
        }
    }

    /// Sends the content, or nothing if the body is empty. Fails when called twice.
    pub fn send_content(&mut self) -> Result<(), SendError> {
        if self.content_sent {
            error!("send content but content has been sent already");
        }
        ensure!(!self.content_sent, SendError::ContentAlreadySent);
        self.content_sent = true;

        match &self.content {
            Some(content) if !content.is_empty() => {
                self.transport.send_data(content.clone());
            }
            _ => {}
        }
        Ok(())
    }

    /// Sends the queued chunks in order, sending the headers first if needed.
    ///
    /// Fails as soon as a chunk is found after the last chunk was sent. Does
    /// nothing when the headers framed the body differently.
    pub fn send_chunks(&mut self) -> Result<(), SendError> {
        if !self.headers_sent() {
            self.send_headers()?;
        }

        let mode = self.body_mode();
        if mode != BodyMode::Chunked {
            if self.chunks.as_ref().is_some_and(|chunks| !chunks.is_empty()) {
                warn!(mode = mode.as_str(), "send chunks but headers framed the body differently, skipping them");
            }
            return Ok(());
        }

        let Some(chunks) = self.chunks.as_mut() else {
            return Ok(());
        };

        while let Some(chunk) = chunks.pop_front() {
            let mut buf = BytesMut::with_capacity(chunk.len() + 12);
            self.chunked_encoder.encode(chunk, &mut buf)?;
            self.transport.send_data(buf.freeze());
        }
        Ok(())
    }

    /// Sends the queued parts in order, sending the headers first if needed.
    ///
    /// Does nothing when the headers framed the body differently. Parts still
    /// queued once the closing delimiter is out are dropped.
    pub fn send_multiparts(&mut self) -> Result<(), SendError> {
        if !self.headers_sent() {
            self.send_headers()?;
        }

        let mode = self.body_mode();
        if mode != BodyMode::Multipart {
            if self.multiparts.as_ref().is_some_and(|parts| !parts.is_empty()) {
                warn!(mode = mode.as_str(), "send multiparts but headers framed the body differently, skipping them");
            }
            return Ok(());
        }

        if self.trailer_sent {
            if let Some(parts) = self.multiparts.as_mut().filter(|parts| !parts.is_empty()) {
                warn!(dropped = parts.len(), "send multiparts after the closing delimiter, dropping them");
                parts.clear();
            }
            return Ok(());
        }

        if self.multiparts.is_none() {
            return Ok(());
        }
        self.multipart_encoder();

        let (Some(parts), Some(encoder)) = (self.multiparts.as_mut(), self.multipart_encoder.as_mut()) else {
            return Ok(());
        };

        while let Some(part) = parts.pop_front() {
            let mut buf = BytesMut::new();
            encoder.encode(MultipartItem::Part(part), &mut buf)?;
            self.transport.send_data(buf.freeze());
        }
        Ok(())
    }

    /// Sends what ends the body, sending the headers first if needed.
    ///
    /// Nothing for content, the last chunk if it was not sent yet, and the
    /// closing delimiter for multipart bodies. Calling it again does nothing.
    pub fn send_trailer(&mut self) -> Result<(), SendError> {
        if !self.headers_sent() {
            self.send_headers()?;
        }
        if self.trailer_sent {
            debug!("trailer sent already");
            return Ok(());
        }

        match self.body_mode() {
            BodyMode::Content | BodyMode::Unset => {}
            BodyMode::Chunked => {
                if !self.last_chunk_sent() {
                    self.chunk(Chunk::last());
                    self.send_chunks()?;
                }
            }
            BodyMode::Multipart => {
                let mut buf = BytesMut::new();
                self.multipart_encoder().encode(MultipartItem::Epilogue, &mut buf)?;
                self.transport.send_data(buf.freeze());
            }
        }
        self.trailer_sent = true;
        Ok(())
    }

    /// Returns the multipart encoder, generating the boundary on first use.
    fn multipart_encoder(&mut self) -> &mut MultipartEncoder {
        let generator = &self.boundary_generator;
        self.multipart_encoder.get_or_insert_with(|| {
            let boundary = match generator {
                Some(generator) => generator.next_boundary(),
                None => SequenceBoundary::global().next_boundary(),
            };
            debug!(boundary = %boundary, "generated multipart boundary");
            MultipartEncoder::new(boundary)
        })
    }

    /// Warns when `incoming` joins a body representation already present.
    fn warn_mixed(&self, incoming: BodyMode) {
        let current = self.body_mode();
        if current == BodyMode::Unset || current == incoming {
            return;
        }
        let winner = match incoming {
            BodyMode::Content => BodyMode::Content,
            BodyMode::Chunked if current == BodyMode::Multipart => BodyMode::Chunked,
            _ => current,
        };
        warn!(
            current = current.as_str(),
            incoming = incoming.as_str(),
            effective = winner.as_str(),
            "response mixes body representations"
        );
    }
}

impl<T: fmt::Debug> fmt::Debug for ResponseComposer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseComposer")
            .field("transport", &self.transport)
            .field("status", &self.status.as_ref().map_or(DEFAULT_STATUS, Status::as_str))
            .field("headers", &self.headers)
            .field("framing", &self.framing)
            .field("content_sent", &self.content_sent)
            .field("last_chunk_sent", &self.chunked_encoder.is_finish())
            .field("trailer_sent", &self.trailer_sent)
            .field("multipart_boundary", &self.multipart_encoder.as_ref().map(MultipartEncoder::boundary))
            .field("keep_connection_open", &self.keep_connection_open)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::FixedBoundary;
    use crate::connection::{CloseMode, MemoryTransport, MockTransport};
    use indoc::indoc;
    use mockall::Sequence;

    fn composer() -> ResponseComposer<MemoryTransport> {
        ResponseComposer::with_boundary_generator(MemoryTransport::new(), Arc::new(FixedBoundary::new("B")))
    }

    fn crlf(s: &str) -> String {
        s.replace('\n', "\r\n")
    }

    fn sent(composer: &ResponseComposer<MemoryTransport>) -> Vec<&[u8]> {
        composer.transport().sent().iter().map(|b| &b[..]).collect()
    }

    #[test]
    fn content_response() {
        let mut response = composer();
        response.set_content("hi");
        response.send_response().unwrap();

        let expected = indoc! {"
        HTTP/1.1 200 OK
        Content-Length: 2

        "};
        assert_eq!(sent(&response), vec![crlf(expected).as_bytes(), b"hi"]);
        assert_eq!(response.transport().close_mode(), Some(CloseMode::AfterWriting));
        assert!(response.headers_sent());
        assert!(response.content_sent());
    }

    #[test]
    fn default_body_is_empty_content() {
        let mut response = composer();
        response.send_response().unwrap();

        assert_eq!(response.body_mode(), BodyMode::Unset);
        assert_eq!(sent(&response), vec![&b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n"[..]]);
    }

    #[test]
    fn headers_are_sorted_and_repeated() {
        let mut response = composer();
        response.set_header("X-Zeta", "z");
        response.set_content_type(mime::TEXT_PLAIN);
        response.add_set_cookie(["a=1", "b=2"]);
        response.set_header("Cache-Control", "no-cache");
        response.send_headers().unwrap();

        let expected = indoc! {"
        HTTP/1.1 200 OK
        Cache-Control: no-cache
        Content-Length: 0
        Content-Type: text/plain
        Set-Cookie: a=1
        Set-Cookie: b=2
        X-Zeta: z

        "};
        assert_eq!(response.transport().written(), Bytes::from(crlf(expected)));
    }

    #[test]
    fn headers_twice_fails() {
        let mut response = composer();
        response.send_headers().unwrap();

        assert!(matches!(response.send_headers(), Err(SendError::HeadersAlreadySent)));
        assert_eq!(response.transport().sent().len(), 1);
    }

    #[test]
    fn content_twice_fails() {
        let mut response = composer();
        response.set_content("hi");
        response.send_headers().unwrap();
        response.send_body().unwrap();

        assert!(matches!(response.send_body(), Err(SendError::ContentAlreadySent)));
        assert!(matches!(response.send_content(), Err(SendError::ContentAlreadySent)));
    }

    #[test]
    fn chunked_response() {
        let mut response = composer();
        response.chunk("hello");
        response.chunk(", world");
        response.send_response().unwrap();

        let headers = crlf(indoc! {"
        HTTP/1.1 200 OK
        Transfer-Encoding: chunked

        "});
        assert_eq!(
            sent(&response),
            vec![headers.as_bytes(), b"5\r\nhello\r\n", b"7\r\n, world\r\n", b"0\r\n\r\n"]
        );
        assert!(response.last_chunk_sent());
    }

    #[test]
    fn chunks_are_sent_progressively() {
        let mut response = composer();
        response.chunk("a");
        response.send_headers().unwrap();
        response.send_body().unwrap();

        response.chunk("bc");
        response.send_chunks().unwrap();
        assert!(!response.last_chunk_sent());

        response.chunk("");
        response.send_chunks().unwrap();
        assert!(response.last_chunk_sent());

        let body = response.transport().written();
        assert!(body.ends_with(b"1\r\na\r\n2\r\nbc\r\n0\r\n\r\n"));
    }

    #[test]
    fn chunk_after_last_chunk_fails() {
        let mut response = composer();
        response.chunk("");
        response.send_chunks().unwrap();
        assert!(response.last_chunk_sent());

        response.chunk("late");
        assert!(matches!(response.send_chunks(), Err(SendError::LastChunkAlreadySent)));

        // the rejected chunk is consumed, nothing else is queued
        response.send_chunks().unwrap();
    }

    #[test]
    fn trailer_does_not_repeat_last_chunk() {
        let mut response = composer();
        response.chunk("x");
        response.chunk("");
        response.send_response().unwrap();

        let zeros = response.transport().sent().iter().filter(|b| &b[..] == b"0\r\n\r\n").count();
        assert_eq!(zeros, 1);
    }

    #[test]
    fn trailer_completes_chunked_body() {
        let mut response = composer();
        response.chunk("hello");
        response.send_headers().unwrap();
        response.send_body().unwrap();
        response.send_trailer().unwrap();

        assert_eq!(sent(&response).last(), Some(&&b"0\r\n\r\n"[..]));
    }

    #[test]
    fn multipart_response() {
        let mut response = composer();
        response.multipart("a");
        response.multipart(Part::new([("X", "1")].into_iter().collect(), "b"));
        response.send_response().unwrap();

        let headers = crlf(indoc! {r#"
        HTTP/1.1 200 OK
        Content-Type: multipart/x-mixed-replace; boundary="B"

        "#});
        assert_eq!(
            sent(&response),
            vec![headers.as_bytes(), b"\r\n--B\r\n\r\na", b"\r\n--B\r\nX: 1\r\n\r\nb", b"\r\n--B--\r\n\r\n"]
        );
        assert_eq!(response.multipart_boundary(), Some("B"));
    }

    #[test]
    fn multiparts_are_sent_progressively() {
        let mut response = composer();
        response.multipart("first");
        response.send_multiparts().unwrap();
        response.multipart("second");
        response.send_multiparts().unwrap();
        response.send_trailer().unwrap();

        assert_eq!(response.transport().sent().len(), 4);
        assert_eq!(&response.transport().sent()[2][..], b"\r\n--B\r\n\r\nsecond");
    }

    #[test]
    fn boundary_is_generated_once() {
        let mut response = ResponseComposer::new(MemoryTransport::new());
        response.multipart("a");
        response.send_headers().unwrap();

        let boundary = response.multipart_boundary().unwrap().to_owned();
        response.send_body().unwrap();
        response.multipart("b");
        response.send_body().unwrap();
        response.send_trailer().unwrap();

        assert_eq!(response.multipart_boundary(), Some(boundary.as_str()));
        let closing = format!("\r\n--{boundary}--\r\n\r\n");
        assert_eq!(response.transport().sent().last().unwrap(), &Bytes::from(closing));
        let content_type = format!("multipart/x-mixed-replace; boundary=\"{boundary}\"");
        assert_eq!(response.content_type(), Some(content_type.as_str()));
    }

    #[test]
    fn content_wins_over_chunks_and_parts() {
        let mut response = composer();
        response.multipart("part");
        response.chunk("chunk");
        response.set_content("content");
        assert_eq!(response.body_mode(), BodyMode::Content);

        response.send_response().unwrap();
        let written = response.transport().written();
        assert!(written.starts_with(b"HTTP/1.1 200 OK\r\nContent-Length: 7\r\n\r\n"));
        assert!(written.ends_with(b"\r\n\r\ncontent"));
    }

    #[test]
    fn chunks_win_over_parts() {
        let mut response = composer();
        response.multipart("part");
        response.chunk("chunk");
        assert_eq!(response.body_mode(), BodyMode::Chunked);

        response.send_response().unwrap();
        let written = response.transport().written();
        assert!(written.starts_with(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n"));
        assert!(written.ends_with(b"5\r\nchunk\r\n0\r\n\r\n"));
        assert_eq!(response.multipart_boundary(), None);
    }

    #[test]
    fn mode_is_fixed_once_headers_are_sent() {
        let mut response = composer();
        response.chunk("a");
        response.send_headers().unwrap();

        response.set_content("ignored");
        response.multipart("ignored");
        assert_eq!(response.body_mode(), BodyMode::Chunked);
        assert_eq!(response.content(), None);

        response.send_body().unwrap();
        response.send_trailer().unwrap();
        assert!(response.transport().written().ends_with(b"1\r\na\r\n0\r\n\r\n"));
    }

    #[test]
    fn unset_mode_stays_empty() {
        let mut response = composer();
        response.send_headers().unwrap();
        response.chunk("ignored");
        response.send_body().unwrap();
        response.send_trailer().unwrap();

        assert_eq!(response.transport().sent().len(), 1);
        assert!(response.content_sent());
    }

    #[test]
    fn chunks_are_skipped_when_content_frames_the_body() {
        let mut response = composer();
        response.chunk("xyz");
        response.set_content("hi");
        response.send_chunks().unwrap();
        response.send_content().unwrap();

        let expected = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi";
        assert_eq!(response.transport().written(), Bytes::from_static(expected));
    }

    #[test]
    fn parts_are_skipped_when_chunks_frame_the_body() {
        let mut response = composer();
        response.multipart("part");
        response.chunk("c");
        response.send_multiparts().unwrap();
        assert_eq!(response.multipart_boundary(), None);

        response.send_trailer().unwrap();
        let headers = crlf(indoc! {"
        HTTP/1.1 200 OK
        Transfer-Encoding: chunked

        "});
        assert_eq!(sent(&response), vec![headers.as_bytes(), b"1\r\nc\r\n", b"0\r\n\r\n"]);
    }

    #[test]
    fn multipart_trailer_is_sent_once() {
        let mut response = composer();
        response.multipart("a");
        response.send_response().unwrap();
        assert!(response.trailer_sent());

        response.send_trailer().unwrap();
        response.multipart("late");
        response.send_multiparts().unwrap();

        let sent = sent(&response);
        assert_eq!(sent.len(), 3);
        assert_eq!(&sent[1..], [&b"\r\n--B\r\n\r\na"[..], b"\r\n--B--\r\n\r\n"]);
    }

    #[test]
    fn content_keeps_the_sent_length() {
        let mut response = composer();
        response.set_content("hi");
        response.send_headers().unwrap();

        response.set_content("much longer");
        assert_eq!(response.content(), Some(&Bytes::from_static(b"hi")));

        response.set_content("ok");
        response.send_content().unwrap();
        let expected = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok";
        assert_eq!(response.transport().written(), Bytes::from_static(expected));
    }

    #[test]
    fn redirect() {
        let mut response = composer();
        response.send_redirect("/new").unwrap();

        let expected = indoc! {"
        HTTP/1.1 302 Found
        Content-Length: 0
        Location: /new

        "};
        assert_eq!(sent(&response), vec![crlf(expected).as_bytes()]);
        assert_eq!(response.status().map(Status::as_str), Some("302 Found"));
        assert_eq!(response.transport().close_mode(), Some(CloseMode::AfterWriting));
    }

    #[test]
    fn redirect_closes_even_when_kept_open() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_send_data()
            .withf(|data| data.starts_with(b"HTTP/1.1 302 Found\r\n"))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        transport.expect_close_connection_after_writing().times(1).in_sequence(&mut seq).return_const(());
        transport.expect_close_connection().never();

        let mut response = ResponseComposer::new(transport);
        response.keep_connection_open(true);
        response.send_redirect("/new").unwrap();
    }

    #[test]
    fn keep_open_only_for_ok() {
        let mut transport = MockTransport::new();
        transport.expect_send_data().times(2).return_const(());
        transport.expect_close_connection_after_writing().never();
        transport.expect_close_connection().never();

        let mut response = ResponseComposer::new(transport);
        response.keep_connection_open(true);
        response.set_content("ok");
        response.send_response().unwrap();

        let mut response = composer();
        response.keep_connection_open(true);
        response.set_status(404);
        response.send_response().unwrap();
        assert_eq!(response.transport().close_mode(), Some(CloseMode::AfterWriting));

        let mut response = composer();
        response.keep_connection_open(true);
        response.set_status("200 OK");
        response.send_response().unwrap();
        assert!(!response.transport().is_closed());
    }

    #[test]
    fn abort_closes_immediately() {
        let mut transport = MockTransport::new();
        transport.expect_close_connection().times(1).return_const(());
        transport.expect_close_connection_after_writing().never();

        let mut response = ResponseComposer::new(transport);
        response.abort();
    }

    #[test]
    fn unknown_status_is_preserved() {
        let mut response = composer();
        response.set_status(999);
        response.send_headers().unwrap();

        assert!(response.transport().written().starts_with(b"HTTP/1.1 999\r\n"));
    }

    #[test]
    fn trailer_sends_headers_first() {
        let mut response = composer();
        response.set_content("abc");
        response.send_trailer().unwrap();

        assert!(response.headers_sent());
        assert_eq!(sent(&response), vec![&b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\n\r\n"[..]]);
    }

    #[test]
    fn cookies() {
        let mut response = composer();
        assert!(response.cookies().is_empty());

        response.add_set_cookie(["a=1"]);
        response.add_set_cookie(vec![String::from("b=2")]);
        assert_eq!(response.cookies(), ["a=1", "b=2"]);

        assert_eq!(response.set_cookie(Vec::<String>::new()), ["a=1", "b=2"]);
        assert_eq!(response.set_cookie(["c=3"]), ["c=3"]);
        assert_eq!(response.cookies(), ["c=3"]);

        response.add_set_cookie(Vec::<&str>::new());
        assert_eq!(response.cookies(), ["c=3"]);
    }

    #[test]
    fn content_type_sugar() {
        let mut response = composer();
        assert_eq!(response.content_type(), None);

        response.set_content_type("text/html; charset=utf-8");
        assert_eq!(response.content_type(), Some("text/html; charset=utf-8"));
        let mime = response.content_type_mime().unwrap();
        assert_eq!(mime.type_(), mime::TEXT);
        assert_eq!(mime.subtype(), mime::HTML);
        assert_eq!(response.headers().get_str("Content-Type"), Some("text/html; charset=utf-8"));
    }
}
