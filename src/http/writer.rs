use std::time::SystemTime;

use crate::http::request::HeaderMap;
use crate::http::response::StatusCode;

const HTTP_VERSION: &str = "HTTP/1.1";

pub const SERVER_NAME: &str = concat!("portico/", env!("CARGO_PKG_VERSION"));

/// Everything that goes on the wire before the body.
#[derive(Debug)]
pub struct ResponseHead<'a> {
    pub status: StatusCode,
    pub headers: Option<&'a HeaderMap>,
    /// Emitted only when known and non-zero.
    pub content_length: Option<usize>,
    pub keep_alive: bool,
}

impl ResponseHead<'_> {
    pub fn serialize(&self) -> Vec<u8> {
        self.serialize_at(SystemTime::now())
    }

    /// Same as [`serialize`](Self::serialize) with a fixed `Date`.
    pub fn serialize_at(&self, now: SystemTime) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);

        // Status line
        let status_line = format!(
            "{} {} {}\r\n",
            HTTP_VERSION,
            self.status.as_u16(),
            self.status.reason_phrase()
        );
        buf.extend_from_slice(status_line.as_bytes());

        push_header(&mut buf, "Server", SERVER_NAME);
        push_header(&mut buf, "Date", &httpdate::fmt_http_date(now));

        if let Some(len) = self.content_length.filter(|len| *len > 0) {
            push_header(&mut buf, "Content-Length", &len.to_string());
        }
        if self.keep_alive {
            push_header(&mut buf, "Connection", "keep-alive");
        }

        if let Some(headers) = self.headers {
            for (k, v) in headers.iter() {
                push_header(&mut buf, k, v);
            }
        }

        // Header/body separator
        buf.extend_from_slice(b"\r\n");

        buf
    }
}

fn push_header(buf: &mut Vec<u8>, name: &str, value: &str) {
    buf.extend_from_slice(name.as_bytes());
    buf.extend_from_slice(b": ");
    buf.extend_from_slice(value.as_bytes());
    buf.extend_from_slice(b"\r\n");
}
