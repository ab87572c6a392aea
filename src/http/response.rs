use bytes::Bytes;

use crate::http::request::HeaderMap;

/// HTTP status code as sent on the status line.
///
/// The pipeline may set any numeric code, so this is a thin wrapper rather than
/// a closed enum. The constants cover the codes the front end produces itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 200 OK
    pub const OK: StatusCode = StatusCode(200);
    /// 400 Bad Request
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    /// 404 Not Found
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    /// 413 Payload Too Large
    pub const PAYLOAD_TOO_LARGE: StatusCode = StatusCode(413);

    pub fn from_u16(code: u16) -> Self {
        StatusCode(code)
    }

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use portico::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.as_u16(), 200);
    /// assert_eq!(StatusCode::NOT_FOUND.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// Unknown codes get an empty phrase; the status line stays well formed.
    ///
    /// # Example
    ///
    /// ```
    /// # use portico::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::from_u16(299).reason_phrase(), "");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            100 => "Continue",
            101 => "Switching Protocols",
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            206 => "Partial Content",
            301 => "Moved Permanently",
            302 => "Found",
            303 => "See Other",
            304 => "Not Modified",
            307 => "Temporary Redirect",
            308 => "Permanent Redirect",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            408 => "Request Timeout",
            409 => "Conflict",
            411 => "Length Required",
            413 => "Payload Too Large",
            414 => "URI Too Long",
            415 => "Unsupported Media Type",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            505 => "HTTP Version Not Supported",
            _ => "",
        }
    }
}

/// Whether the status line and headers of a pipeline response went out yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    Pending,
    Sent,
}

/// Response state the pipeline builds up between flushes.
///
/// Lives for one request inside the pipeline adapter. Body chunks are
/// append-only; a flush drains them.
#[derive(Debug)]
pub struct PendingResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    chunks: Vec<Bytes>,
    header_state: HeaderState,
}

impl PendingResponse {
    pub fn new() -> Self {
        Self {
            status: None,
            headers: HeaderMap::new(),
            chunks: Vec::new(),
            header_state: HeaderState::Pending,
        }
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    /// Status set by the pipeline, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Last write per name wins, compared case-insensitively.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name, value);
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Copies `data` into a new chunk. Empty slices are dropped.
    pub fn append_body(&mut self, data: &[u8]) {
        if !data.is_empty() {
            self.chunks.push(Bytes::copy_from_slice(data));
        }
    }

    /// Number of chunks waiting for the next flush.
    pub fn buffered_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Removes and returns every chunk buffered since the last drain.
    pub fn drain_body(&mut self) -> Vec<Bytes> {
        std::mem::take(&mut self.chunks)
    }

    pub fn header_state(&self) -> HeaderState {
        self.header_state
    }

    /// Moves `Pending -> Sent`. Returns `false` if the headers were already sent.
    pub fn mark_headers_sent(&mut self) -> bool {
        match self.header_state {
            HeaderState::Pending => {
                self.header_state = HeaderState::Sent;
                true
            }
            HeaderState::Sent => false,
        }
    }
}

impl Default for PendingResponse {
    fn default() -> Self {
        Self::new()
    }
}
