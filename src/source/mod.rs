//! Version Source Reader
//!
//! Turns the process environment (git, the project manifest, the clock)
//! into a best-effort [`VersionSnapshot`]. Nothing in here returns an
//! error: each lookup that fails simply leaves its field absent.

pub mod api;
pub mod git;
pub mod manifest;
pub mod reader;
pub mod snapshot;

#[cfg(test)]
mod tests;
