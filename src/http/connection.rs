use std::net::SocketAddr;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::config::{Limits, Site};
use crate::error::ServerError;
use crate::http::mime;
use crate::http::parser::{content_length, find_headers_end, parse_http_request};
use crate::http::request::{HeaderMap, ParsedRequest};
use crate::http::response::StatusCode;
use crate::http::static_files;
use crate::http::writer::ResponseHead;
use crate::pipeline::{Pipeline, PipelineAdapter};

/// Byte stream a connection can run over: a `TcpStream`, or an in-memory
/// duplex in tests.
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}

/// One accepted connection, handled end to end.
///
/// Owns the stream for its whole life. Nothing else reads or writes it; the
/// pipeline only reaches it through [`PipelineAdapter`], which borrows the
/// connection for the duration of one request.
pub struct Connection<S> {
    stream: S,
    peer: SocketAddr,
    local: SocketAddr,
    buffer: BytesMut,
    limits: Limits,
    closed: bool,
}

impl<S: Transport> Connection<S> {
    pub fn new(stream: S, peer: SocketAddr, local: SocketAddr, limits: Limits) -> Self {
        Self {
            stream,
            peer,
            local,
            buffer: BytesMut::with_capacity(4096),
            limits,
            closed: false,
        }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Runs the full request/response cycle and closes the connection.
    ///
    /// Errors the client can see (400, 404, 413) are answered before this
    /// returns; the error is still handed back so the caller can log it.
    pub async fn run<P: Pipeline>(mut self, site: &Site, pipeline: &P) -> Result<(), ServerError> {
        let result = self.process(site, pipeline).await;

        if let Err(e) = &result {
            if let Some(status) = e.status().filter(|_| !self.closed) {
                if let Err(write_err) = self.send_error_response(status).await {
                    tracing::debug!(peer = %self.peer, error = %write_err, "Failed to send error response");
                }
            }
        }

        self.close().await;
        result
    }

    async fn process<P: Pipeline>(&mut self, site: &Site, pipeline: &P) -> Result<(), ServerError> {
        let Some(request) = self.read_request().await? else {
            tracing::debug!(peer = %self.peer, "Connection closed before a request arrived");
            return Ok(());
        };

        tracing::debug!(
            peer = %self.peer,
            method = %request.method(),
            path = %request.path(),
            "Request received"
        );

        let path = request.path();
        if let Some(content_type) = mime::static_content_type(path) {
            self.write_file_response(site, path, content_type).await
        } else if path.ends_with('/') {
            self.write_dir_response(site, path).await
        } else {
            let mut adapter = PipelineAdapter::new(site, &request, self);
            pipeline
                .process_request(&mut adapter)
                .await
                .map_err(ServerError::Pipeline)?;
            adapter.end_of_request();
            Ok(())
        }
    }

    /// Reads until a complete request has arrived.
    ///
    /// Returns `Ok(None)` if the peer went away (or stayed silent past the
    /// idle timeout) without sending a single byte.
    pub async fn read_request(&mut self) -> Result<Option<ParsedRequest>, ServerError> {
        let max = self.limits.max_request_bytes;

        loop {
            if find_headers_end(&self.buffer).is_some() {
                break;
            }
            if self.buffer.len() >= max {
                return Err(ServerError::RequestTooLarge { limit: max });
            }

            match self.read_more().await? {
                Some(n) if n > 0 => {}
                _ if self.buffer.is_empty() => return Ok(None),
                _ => {
                    return Err(ServerError::MalformedRequest(
                        "connection ended inside the request head".into(),
                    ));
                }
            }
        }

        let (request, head_len) = parse_http_request(&self.buffer, self.peer, self.local)?;
        if head_len > max {
            return Err(ServerError::RequestTooLarge { limit: max });
        }

        let Some(declared) = content_length(request.headers())? else {
            self.buffer.clear();
            return Ok(Some(request));
        };

        let total = head_len
            .checked_add(declared)
            .filter(|total| *total <= max)
            .ok_or(ServerError::RequestTooLarge { limit: max })?;

        while self.buffer.len() < total {
            match self.read_more().await? {
                Some(n) if n > 0 => {}
                _ => {
                    return Err(ServerError::MalformedRequest(
                        "body shorter than Content-Length".into(),
                    ));
                }
            }
        }

        let buf = self.buffer.split().freeze();
        Ok(Some(request.with_body(Some(buf.slice(head_len..total)))))
    }

    /// One bounded read. `None` means the idle timeout fired first.
    async fn read_more(&mut self) -> Result<Option<usize>, ServerError> {
        let window = self.limits.read_window as u64;
        let idle = self.limits.idle_timeout;
        let stream = &mut self.stream;
        let buffer = &mut self.buffer;

        let read = timeout(idle, async move {
            let mut limited = stream.take(window);
            limited.read_buf(buffer).await
        })
        .await;

        match read {
            Ok(n) => Ok(Some(n?)),
            Err(_) => {
                tracing::debug!(peer = %self.peer, "Idle timeout while reading request");
                Ok(None)
            }
        }
    }

    async fn write_file_response(
        &mut self,
        site: &Site,
        path: &str,
        content_type: &'static str,
    ) -> Result<(), ServerError> {
        let bytes = static_files::read_file(site.physical_dir(), path).await?;

        let headers = HeaderMap::from_iter([("Content-Type", content_type)]);
        self.send_response(StatusCode::OK, &bytes, Some(&headers), false)
            .await
    }

    async fn write_dir_response(&mut self, site: &Site, path: &str) -> Result<(), ServerError> {
        let entries = static_files::list_directory(site.physical_dir(), path).await?;
        let html = static_files::render_listing(&entries);

        let headers = HeaderMap::from_iter([("Content-Type", "text/html")]);
        self.send_response(StatusCode::OK, html.as_bytes(), Some(&headers), false)
            .await
    }

    /// Sends `status` with its numeric code as a plain-text body, then closes.
    pub async fn send_error_response(&mut self, status: StatusCode) -> Result<(), ServerError> {
        tracing::debug!(peer = %self.peer, status = status.as_u16(), "Sending error response");
        let body = status.as_u16().to_string();
        self.send_response(status, body.as_bytes(), None, false).await
    }

    /// Writes a complete response. Closes afterwards unless `keep_alive`.
    pub async fn send_response(
        &mut self,
        status: StatusCode,
        body: &[u8],
        headers: Option<&HeaderMap>,
        keep_alive: bool,
    ) -> Result<(), ServerError> {
        self.send_headers(status, headers, Some(body.len()), keep_alive)
            .await?;
        self.send_body(body).await?;

        if !keep_alive {
            self.close().await;
        }
        Ok(())
    }

    /// Writes the status line and header block as one socket write.
    pub async fn send_headers(
        &mut self,
        status: StatusCode,
        headers: Option<&HeaderMap>,
        content_length: Option<usize>,
        keep_alive: bool,
    ) -> Result<(), ServerError> {
        let head = ResponseHead {
            status,
            headers,
            content_length,
            keep_alive,
        };
        self.write_raw(&head.serialize()).await
    }

    /// Writes body bytes as they are.
    pub async fn send_body(&mut self, data: &[u8]) -> Result<(), ServerError> {
        if data.is_empty() {
            return Ok(());
        }
        self.write_raw(data).await
    }

    async fn write_raw(&mut self, data: &[u8]) -> Result<(), ServerError> {
        if self.closed {
            return Err(ServerError::ConnectionFault(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "connection already closed",
            )));
        }
        self.stream.write_all(data).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Shuts the stream down. Only the first call does anything; failures are
    /// ignored since the connection is being discarded anyway.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(peer = %self.peer, error = %e, "Error while closing connection");
        }
    }
}
