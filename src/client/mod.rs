//! Native update client
//!
//! The Rust counterpart of the emitted `checkForUpdate` routine: fetch the
//! version endpoint, compare by value with the snapshot captured at startup,
//! and tell subscribers. Checks never fail; problems read as "no update".

pub mod api;
pub mod checker;
pub mod error;
pub mod fetch;
