//! End-to-end flow modules

pub mod build;
pub mod dev_server;
pub mod update_check;
