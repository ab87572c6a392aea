//! Portico - minimal HTTP/1.1 front end
//!
//! Serves static files and directory listings from a document root and hands
//! every other request to a pluggable [`pipeline::Pipeline`].

pub mod config;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod server;

pub use error::ServerError;
