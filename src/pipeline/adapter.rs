use std::path::PathBuf;

use crate::config::Site;
use crate::error::ServerError;
use crate::http::connection::{Connection, Transport};
use crate::http::request::ParsedRequest;
use crate::http::response::{HeaderState, PendingResponse, StatusCode};
use crate::pipeline::headers::{KnownRequestHeader, KnownResponseHeader};

/// The pipeline's view of one request and its response.
///
/// Reads come straight from the parsed request. Writes are buffered in a
/// [`PendingResponse`] and only reach the socket on
/// [`flush_response`](Self::flush_response).
pub struct PipelineAdapter<'a, S> {
    site: &'a Site,
    request: &'a ParsedRequest,
    connection: &'a mut Connection<S>,
    response: PendingResponse,
}

impl<'a, S: Transport> PipelineAdapter<'a, S> {
    pub fn new(site: &'a Site, request: &'a ParsedRequest, connection: &'a mut Connection<S>) -> Self {
        Self {
            site,
            request,
            connection,
            response: PendingResponse::new(),
        }
    }

    /// Virtual directory the application is mounted at.
    pub fn app_path(&self) -> &str {
        self.site.virtual_dir()
    }

    /// Document root on disk.
    pub fn app_path_translated(&self) -> PathBuf {
        self.site.physical_dir().to_path_buf()
    }

    pub fn file_path(&self) -> &str {
        self.request.path()
    }

    /// Request path mapped onto the document root: the mount prefix is
    /// stripped and each `/`-separated segment becomes a path component.
    pub fn file_path_translated(&self) -> PathBuf {
        let path = self.request.path();
        let rest = strip_mount(path, self.site.virtual_dir()).unwrap_or(path);

        let mut translated = self.site.physical_dir().to_path_buf();
        translated.extend(rest.split('/').filter(|segment| !segment.is_empty()));
        translated
    }

    pub fn uri_path(&self) -> &str {
        self.request.path()
    }

    pub fn query_string(&self) -> Option<&str> {
        self.request.query()
    }

    pub fn raw_url(&self) -> &str {
        self.request.raw_target()
    }

    pub fn http_verb_name(&self) -> &str {
        self.request.method()
    }

    pub fn http_version(&self) -> &str {
        self.request.version()
    }

    pub fn remote_address(&self) -> String {
        self.request.peer_addr().ip().to_string()
    }

    pub fn remote_port(&self) -> u16 {
        self.request.peer_addr().port()
    }

    pub fn local_address(&self) -> String {
        self.request.local_addr().ip().to_string()
    }

    pub fn local_port(&self) -> u16 {
        self.request.local_addr().port()
    }

    pub fn known_request_header(&self, header: KnownRequestHeader) -> Option<&str> {
        self.request.header(header.name())
    }

    /// Any request header by name, ignoring case.
    pub fn unknown_request_header(&self, name: &str) -> Option<&str> {
        self.request.header(name)
    }

    /// Request headers that have no [`KnownRequestHeader`] identifier, in
    /// arrival order.
    pub fn unknown_request_headers(&self) -> Vec<(&str, &str)> {
        self.request
            .headers()
            .iter()
            .filter(|(name, _)| KnownRequestHeader::from_name(name).is_none())
            .collect()
    }

    pub fn preloaded_entity_body(&self) -> Option<&[u8]> {
        self.request.body().map(|b| &b[..])
    }

    /// The body is always read in full before the pipeline runs.
    pub fn is_entire_entity_body_preloaded(&self) -> bool {
        true
    }

    /// Sets the response status. The description is not used; the reason
    /// phrase always comes from the code.
    pub fn send_status(&mut self, code: u16, _description: &str) {
        self.response.set_status(StatusCode::from_u16(code));
    }

    pub fn send_known_response_header(&mut self, header: KnownResponseHeader, value: impl Into<String>) {
        self.response.set_header(header.name(), value);
    }

    pub fn send_unknown_response_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.response.set_header(name, value);
    }

    /// Buffers a copy of `data`; the caller may reuse its buffer right away.
    pub fn send_response_from_memory(&mut self, data: &[u8]) {
        self.response.append_body(data);
    }

    pub fn header_state(&self) -> HeaderState {
        self.response.header_state()
    }

    /// Sends what has been buffered so far.
    ///
    /// The first flush writes the status line and headers, without a
    /// `Content-Length` since the full length isn't known yet. Every flush then
    /// writes the body chunks buffered since the previous one. A final flush
    /// also closes the connection.
    pub async fn flush_response(&mut self, final_flush: bool) -> Result<(), ServerError> {
        if self.response.header_state() == HeaderState::Pending {
            let status = self.response.status().unwrap_or(StatusCode::OK);
            self.connection
                .send_headers(status, Some(self.response.headers()), None, false)
                .await?;
            self.response.mark_headers_sent();
        }

        for chunk in self.response.drain_body() {
            self.connection.send_body(&chunk).await?;
        }

        if final_flush {
            self.connection.close().await;
        }
        Ok(())
    }

    pub fn end_of_request(&mut self) {
        tracing::trace!(
            peer = %self.request.peer_addr(),
            headers_sent = self.response.header_state() == HeaderState::Sent,
            "Pipeline finished request"
        );
    }
}

/// Strips `mount` from `path` only on a segment boundary, so `/app` does not
/// match `/application`.
fn strip_mount<'p>(path: &'p str, mount: &str) -> Option<&'p str> {
    let rest = path.strip_prefix(mount)?;
    if mount.ends_with('/') || rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}
