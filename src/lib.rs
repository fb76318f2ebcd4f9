pub mod app;
pub mod cache;
pub mod client;
pub mod core;
pub mod delivery;
pub mod emit;
pub mod plugin;
pub mod projection;
pub mod source;
