//! # foresight-observability
//!
//! Structured tracing for the preloading subsystem: subscriber setup and
//! one span macro per operation.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, spans::names};
