//! Testing utilities for Tether crates

#![warn(missing_docs)]

mod drop_log;
mod tracked;

pub use drop_log::DropLog;
pub use tracked::{Labelled, Tracked, TrackedChild};
