//! Dynamic-content pipeline contract.
//!
//! Requests that are neither static files nor directory listings are handed
//! to a [`Pipeline`]. The pipeline never sees the socket: it reads the request
//! and writes its response through a [`PipelineAdapter`], which buffers
//! everything until the pipeline asks for a flush.
//!
//! A pipeline is expected to call, in order:
//!
//! 1. [`send_status`](PipelineAdapter::send_status)
//! 2. zero or more header setters
//! 3. zero or more [`send_response_from_memory`](PipelineAdapter::send_response_from_memory)
//! 4. any number of `flush_response(false)`, then exactly one `flush_response(true)`
//!
//! If it never flushes, nothing is written and the connection is closed empty.

use std::future::Future;

use crate::http::connection::Transport;

pub mod adapter;
pub mod echo;
pub mod headers;

pub use adapter::PipelineAdapter;
pub use echo::EchoPipeline;
pub use headers::{KnownRequestHeader, KnownResponseHeader};

/// An external request processor.
///
/// Invoked on the connection's own task; the adapter must not be moved to
/// another task. Returning an error closes the connection without a response,
/// so a pipeline that wants the client to see a 500 must write it itself.
pub trait Pipeline: Send + Sync + 'static {
    fn process_request<S: Transport>(
        &self,
        adapter: &mut PipelineAdapter<'_, S>,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}
