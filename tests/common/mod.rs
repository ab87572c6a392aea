#![allow(dead_code)]

use std::net::SocketAddr;

use portico::config::{Limits, Site};
use portico::error::ServerError;
use portico::http::connection::Connection;
use tokio::io::DuplexStream;
use tokio::task::JoinHandle;
use portico::pipeline::Pipeline;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const PEER: &str = "127.0.0.1:50000";
pub const LOCAL: &str = "127.0.0.1:45758";

/// A response split into its parts.
#[derive(Debug)]
pub struct RawResponse {
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn parse(bytes: &[u8]) -> Self {
        let end = bytes
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("response has no header terminator");
        let head = std::str::from_utf8(&bytes[..end]).expect("head is not UTF-8");
        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap().to_string();
        let headers = lines
            .map(|l| {
                let (k, v) = l.split_once(": ").expect("bad header line");
                (k.to_string(), v.to_string())
            })
            .collect();

        Self {
            status_line,
            headers,
            body: bytes[end + 4..].to_vec(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).expect("body is not UTF-8")
    }
}

pub fn addr(s: &str) -> SocketAddr {
    s.parse().unwrap()
}

/// Runs one connection over an in-memory stream and returns every byte the
/// server wrote, along with the connection's result. The client half-closes
/// after writing, so a short request reads as EOF rather than waiting out
/// the idle timeout.
pub async fn exchange<P: Pipeline>(
    site: Site,
    pipeline: P,
    limits: Limits,
    request: &[u8],
) -> (Vec<u8>, Result<(), ServerError>) {
    let (mut client, server) = tokio::io::duplex(256 * 1024);
    let conn = Connection::new(server, addr(PEER), addr(LOCAL), limits);

    let task = tokio::spawn(async move { conn.run(&site, &pipeline).await });

    client.write_all(request).await.unwrap();
    client.shutdown().await.unwrap();
    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();

    (out, task.await.unwrap())
}

/// Starts one connection over an in-memory stream and hands back the client
/// end, for tests that pace their writes or leave the stream open.
pub fn open(
    site: Site,
    pipeline: impl Pipeline,
    limits: Limits,
) -> (DuplexStream, JoinHandle<Result<(), ServerError>>) {
    let (client, server) = tokio::io::duplex(256 * 1024);
    let conn = Connection::new(server, addr(PEER), addr(LOCAL), limits);
    let task = tokio::spawn(async move { conn.run(&site, &pipeline).await });
    (client, task)
}
