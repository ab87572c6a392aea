//! TCP listener and its running/stopped lifecycle.

pub mod listener;

pub use listener::{Server, ServerHandle};
