//! Channel layer for pattern matching and PTY operations.
//!
//! This module handles the interactive session management,
//! including prompt detection, pager answering and ANSI stripping.

mod buffer;
mod patterns;
mod pty;

pub use buffer::PatternBuffer;
pub use patterns::end_marker_pattern;
pub use pty::PtyChannel;
