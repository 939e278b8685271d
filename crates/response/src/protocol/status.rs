//! Response status line values.
//!
//! A [`Status`] holds exactly the text that follows `HTTP/1.1 ` on the status
//! line. Numeric codes found in the standard table are canonicalized to
//! `"<code> <reason phrase>"`; anything else is kept verbatim so that handlers
//! can send codes this table does not know about.

use std::fmt;

/// Standard status codes and their full status text.
const STATUS_TEXTS: &[(u16, &str)] = &[
    (100, "100 Continue"),
    (101, "101 Switching Protocols"),
    (200, "200 OK"),
    (201, "201 Created"),
    (202, "202 Accepted"),
    (203, "203 Non-Authoritative Information"),
    (204, "204 No Content"),
    (205, "205 Reset Content"),
    (206, "206 Partial Content"),
    (300, "300 Multiple Choices"),
    (301, "301 Moved Permanently"),
    (302, "302 Found"),
    (303, "303 See Other"),
    (304, "304 Not Modified"),
    (305, "305 Use Proxy"),
    (307, "307 Temporary Redirect"),
    (400, "400 Bad Request"),
    (401, "401 Unauthorized"),
    (402, "402 Payment Required"),
    (403, "403 Forbidden"),
    (404, "404 Not Found"),
    (405, "405 Method Not Allowed"),
    (406, "406 Not Acceptable"),
    (407, "407 Proxy Authentication Required"),
    (408, "408 Request Timeout"),
    (409, "409 Conflict"),
    (410, "410 Gone"),
    (411, "411 Length Required"),
    (412, "412 Precondition Failed"),
    (413, "413 Request Entity Too Large"),
    (414, "414 Request-URI Too Long"),
    (415, "415 Unsupported Media Type"),
    (416, "416 Requested Range Not Satisfiable"),
    (417, "417 Expectation Failed"),
    (500, "500 Internal Server Error"),
    (501, "501 Not Implemented"),
    (502, "502 Bad Gateway"),
    (503, "503 Service Unavailable"),
    (504, "504 Gateway Timeout"),
    (505, "505 HTTP Version Not Supported"),
];

/// The text of the status line after the protocol version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Status(String);

impl Status {
    /// Builds a status from a numeric code, falling back to the bare number
    /// when the code is not in the standard table.
    pub fn from_code(code: u16) -> Self {
        match status_text(code) {
            Some(text) => Self(text.to_owned()),
            None => Self(code.to_string()),
        }
    }

    /// Returns the `"200 OK"` status used when none was assigned.
    pub fn ok() -> Self {
        Self(DEFAULT_STATUS.to_owned())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is exactly the default `"200 OK"` status.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.0 == DEFAULT_STATUS
    }
}

/// The status text sent when a response never assigned one.
pub(crate) const DEFAULT_STATUS: &str = "200 OK";

fn status_text(code: u16) -> Option<&'static str> {
    STATUS_TEXTS
        .binary_search_by_key(&code, |&(c, _)| c)
        .ok()
        .map(|index| STATUS_TEXTS[index].1)
}

/// Reads the leading decimal digits of `s` as a status code.
fn leading_code(s: &str) -> Option<u16> {
    let end = s.bytes().position(|b| !b.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

impl From<u16> for Status {
    fn from(code: u16) -> Self {
        Self::from_code(code)
    }
}

impl From<http::StatusCode> for Status {
    fn from(code: http::StatusCode) -> Self {
        Self::from_code(code.as_u16())
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        match leading_code(s).and_then(status_text) {
            Some(text) => Self(text.to_owned()),
            None => Self(s.to_owned()),
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match leading_code(&s).and_then(status_text) {
            Some(text) => Self(text.to_owned()),
            None => Self(s),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Status {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        assert!(STATUS_TEXTS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn known_codes_are_canonicalized() {
        assert_eq!(Status::from(200).as_str(), "200 OK");
        assert_eq!(Status::from(404).as_str(), "404 Not Found");
        assert_eq!(Status::from(302).as_str(), "302 Found");
        assert_eq!(Status::from(413).as_str(), "413 Request Entity Too Large");
        assert_eq!(Status::from(505).as_str(), "505 HTTP Version Not Supported");
    }

    #[test]
    fn unknown_codes_pass_through() {
        assert_eq!(Status::from(999).as_str(), "999");
        assert_eq!(Status::from(306).as_str(), "306");
    }

    #[test]
    fn strings_with_known_codes() {
        assert_eq!(Status::from("404").as_str(), "404 Not Found");
        assert_eq!(Status::from(String::from("201")).as_str(), "201 Created");
        assert_eq!(Status::from("404 Whatever").as_str(), "404 Not Found");
        assert_eq!(Status::from(String::from("302 Moved")).as_str(), "302 Found");
    }

    #[test]
    fn free_form_strings_are_verbatim() {
        assert_eq!(Status::from("299 Fine Thanks").as_str(), "299 Fine Thanks");
        assert_eq!(Status::from("teapot").as_str(), "teapot");
        assert_eq!(Status::from(String::from("")).as_str(), "");
    }

    #[test]
    fn from_http_status_code() {
        assert_eq!(Status::from(http::StatusCode::NOT_FOUND).as_str(), "404 Not Found");
        assert_eq!(Status::from(http::StatusCode::IM_A_TEAPOT).as_str(), "418");
    }

    #[test]
    fn default_status() {
        assert!(Status::ok().is_ok());
        assert!(Status::from(200).is_ok());
        assert!(!Status::from(201).is_ok());
    }
}
