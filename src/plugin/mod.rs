//! Build-host plugin
//!
//! Wires the version source, cache, delivery endpoint and emitters into one
//! lifecycle-driven object. See [`lifecycle`] for the allowed transitions.

pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod lifecycle;
pub(crate) mod writer;

// Public API module - the only public interface for the plugin
pub mod api;
