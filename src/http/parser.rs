use std::net::SocketAddr;

use bytes::Bytes;

use crate::http::request::{HeaderMap, ParsedRequest};

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{0}")]
    MalformedRequest(&'static str),
    #[error("request head is incomplete")]
    Incomplete,
}

/// Parses a request out of `buf`.
///
/// `buf` must hold the whole head (request line, headers and the blank line).
/// Whatever follows the blank line is taken as the body. Returns the request
/// and the length of the head, so callers can tell how much body arrived.
pub fn parse_http_request(
    buf: &[u8],
    peer: SocketAddr,
    local: SocketAddr,
) -> Result<(ParsedRequest, usize), ParseError> {
    let headers_end = find_headers_end(buf).ok_or(ParseError::Incomplete)?;
    let head_len = headers_end + HEADER_TERMINATOR.len();

    let head = std::str::from_utf8(&buf[..headers_end])
        .map_err(|_| ParseError::MalformedRequest("request head is not valid UTF-8"))?;

    let mut lines = head.split("\r\n");

    // Request line
    let request_line = lines.next().unwrap_or_default();
    let tokens: Vec<&str> = request_line.split(' ').collect();
    let [method, raw_target, version] = tokens.as_slice() else {
        return Err(ParseError::MalformedRequest(
            "request line must have exactly three tokens",
        ));
    };
    if method.is_empty() || raw_target.is_empty() || version.is_empty() {
        return Err(ParseError::MalformedRequest("empty request line token"));
    }

    let (raw_path, query) = match raw_target.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (*raw_target, None),
    };

    // Headers
    let mut headers = HeaderMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }

        let (name, value) = line
            .split_once(':')
            .ok_or(ParseError::MalformedRequest("header line without ':'"))?;

        if name.trim().is_empty() {
            return Err(ParseError::MalformedRequest("empty header name"));
        }

        headers.insert(name, value.trim_start());
    }

    let body = &buf[head_len..];
    let body = (!body.is_empty()).then(|| Bytes::copy_from_slice(body));

    let request = ParsedRequest {
        method: method.to_string(),
        raw_target: raw_target.to_string(),
        path: decode_path(raw_path),
        query,
        version: version.to_string(),
        headers,
        body,
        peer,
        local,
    };

    Ok((request, head_len))
}

/// Position of the blank line that ends the head, if it has arrived.
pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}

/// Declared `Content-Length`, if present.
pub fn content_length(headers: &HeaderMap) -> Result<Option<usize>, ParseError> {
    headers
        .get("Content-Length")
        .map(|v| {
            v.trim()
                .parse::<usize>()
                .map_err(|_| ParseError::MalformedRequest("invalid Content-Length"))
        })
        .transpose()
}

/// Form-style URL decoding: `+` is a space, `%XX` is a byte, and invalid
/// UTF-8 is replaced rather than rejected.
fn decode_path(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}
