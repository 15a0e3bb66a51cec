//! UkuTabs extraction library - shared modules for all binaries.

pub mod chordpro;
pub mod fetch;
pub mod models;
pub mod progress;
pub mod reconstruct;
pub mod render;
