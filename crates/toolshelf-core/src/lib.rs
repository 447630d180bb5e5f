#![forbid(unsafe_code)]

//! Core: geometry, pointer events, and drag-threshold tuning.
//!
//! # Role in toolshelf
//! `toolshelf-core` is the host-agnostic input layer. It owns the coordinate
//! types tokens are laid out in, the pointer events hosts translate their
//! platform input into, and the press-versus-drag discrimination rule.
//! The widget crate (`toolshelf-widgets`) builds collections, the drag/drop
//! machine, and the toolbar pair on top of these.

pub mod event;
pub mod geometry;
pub mod gesture;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
