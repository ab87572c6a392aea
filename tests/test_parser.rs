use std::net::SocketAddr;

use portico::http::parser::{ParseError, content_length, find_headers_end, parse_http_request};

fn addr() -> SocketAddr {
    "127.0.0.1:8080".parse().unwrap()
}

fn parse(req: &[u8]) -> Result<portico::http::request::ParsedRequest, ParseError> {
    parse_http_request(req, addr(), addr()).map(|(r, _)| r)
}

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let (parsed, consumed) = parse_http_request(req, addr(), addr()).unwrap();

    assert_eq!(parsed.method(), "GET");
    assert_eq!(parsed.raw_target(), "/index.html");
    assert_eq!(parsed.path(), "/index.html");
    assert_eq!(parsed.version(), "HTTP/1.1");
    assert_eq!(parsed.header("Host"), Some("example.com"));
    assert_eq!(parsed.query(), None);
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_splits_query_on_first_question_mark() {
    let parsed = parse(b"GET /search?q=rust?x=%20 HTTP/1.1\r\n\r\n").unwrap();

    assert_eq!(parsed.path(), "/search");
    assert_eq!(parsed.query(), Some("q=rust?x=%20"));
    assert_eq!(parsed.raw_target(), "/search?q=rust?x=%20");
}

#[test]
fn test_parse_empty_query_is_present() {
    let parsed = parse(b"GET /page? HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(parsed.query(), Some(""));
}

#[test]
fn test_parse_decodes_path() {
    let parsed = parse(b"GET /my%20docs/a+b.txt HTTP/1.1\r\n\r\n").unwrap();

    assert_eq!(parsed.path(), "/my docs/a b.txt");
    assert_eq!(parsed.raw_target(), "/my%20docs/a+b.txt");
}

#[test]
fn test_parse_multiple_headers() {
    let req = b"GET /path HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test-client\r\nAccept: */*\r\n\r\n";
    let parsed = parse(req).unwrap();

    let names: Vec<&str> = parsed.headers().iter().map(|(k, _)| k).collect();
    assert_eq!(names, vec!["Host", "User-Agent", "Accept"]);
    assert_eq!(parsed.header("User-Agent"), Some("test-client"));
    assert_eq!(parsed.header("Accept"), Some("*/*"));
}

#[test]
fn test_header_lookup_ignores_case() {
    let parsed = parse(b"GET / HTTP/1.1\r\nX-Request-Id: abc\r\n\r\n").unwrap();

    for variant in ["X-Request-Id", "x-request-id", "X-REQUEST-ID", "x-ReQuEsT-iD"] {
        assert_eq!(parsed.header(variant), Some("abc"), "lookup of {variant}");
    }
}

#[test]
fn test_duplicate_header_last_wins() {
    let parsed = parse(b"GET / HTTP/1.1\r\nAccept: a\r\nHost: h\r\naccept: b\r\n\r\n").unwrap();

    assert_eq!(parsed.headers().len(), 2);
    assert_eq!(parsed.header("Accept"), Some("b"));
}

#[test]
fn test_header_value_keeps_text_after_first_colon() {
    let parsed = parse(b"GET / HTTP/1.1\r\nHost:    localhost:8080\r\n\r\n").unwrap();
    assert_eq!(parsed.header("host"), Some("localhost:8080"));
}

#[test]
fn test_parse_captures_buffered_body() {
    let req = b"POST /api HTTP/1.1\r\nHost: localhost\r\n\r\nname=value";
    let (parsed, consumed) = parse_http_request(req, addr(), addr()).unwrap();

    assert_eq!(parsed.body().unwrap().as_ref(), b"name=value");
    assert_eq!(consumed, req.len() - b"name=value".len());
}

#[test]
fn test_parse_request_line_with_two_tokens() {
    let result = parse(b"GET /\r\n\r\n");
    assert!(matches!(result, Err(ParseError::MalformedRequest(_))));
}

#[test]
fn test_parse_request_line_with_four_tokens() {
    let result = parse(b"GET / HTTP/1.1 extra\r\n\r\n");
    assert!(matches!(result, Err(ParseError::MalformedRequest(_))));
}

#[test]
fn test_parse_request_line_with_double_space() {
    let result = parse(b"GET  / HTTP/1.1\r\n\r\n");
    assert!(matches!(result, Err(ParseError::MalformedRequest(_))));
}

#[test]
fn test_parse_malformed_header() {
    let result = parse(b"GET / HTTP/1.1\r\nBrokenHeader\r\n\r\n");
    assert!(matches!(result, Err(ParseError::MalformedRequest(_))));
}

#[test]
fn test_parse_invalid_utf8_head() {
    let result = parse(b"GET /\xff\xfe HTTP/1.1\r\n\r\n");
    assert!(matches!(result, Err(ParseError::MalformedRequest(_))));
}

#[test]
fn test_parse_incomplete_request_missing_blank_line() {
    let result = parse(b"GET / HTTP/1.1\r\nHost: example.com\r\n");
    assert_eq!(result.unwrap_err(), ParseError::Incomplete);
}

#[test]
fn test_methods_are_kept_verbatim() {
    for method in ["GET", "POST", "PROPFIND", "get"] {
        let req = format!("{method} / HTTP/1.1\r\n\r\n");
        assert_eq!(parse(req.as_bytes()).unwrap().method(), method);
    }
}

#[test]
fn test_find_headers_end() {
    assert_eq!(find_headers_end(b"GET / HTTP/1.1\r\n\r\nbody"), Some(14));
    assert_eq!(find_headers_end(b"GET / HTTP/1.1\r\n"), None);
}

#[test]
fn test_content_length() {
    let parsed = parse(b"POST / HTTP/1.1\r\ncontent-length: 12\r\n\r\n").unwrap();
    assert_eq!(content_length(parsed.headers()), Ok(Some(12)));

    let parsed = parse(b"POST / HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(content_length(parsed.headers()), Ok(None));

    let parsed = parse(b"POST / HTTP/1.1\r\nContent-Length: ten\r\n\r\n").unwrap();
    assert!(content_length(parsed.headers()).is_err());
}
