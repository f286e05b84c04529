//! Shared utilities for the ticket gate.

pub mod logging;

pub use logging::{init_tracing, LogFormat};
