#![forbid(unsafe_code)]

//! Core: geometry, scroll-container vocabulary, and logging for the windowed carousel.

pub mod geometry;
pub mod logging;
pub mod scroll;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, trace_span, warn};
