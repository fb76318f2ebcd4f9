//! Declaration/Module Emitter
//!
//! Produces the JavaScript body of the virtual module (default export is
//! the artifact object, plus `checkForUpdate` and `onVersionUpdate`) and the
//! TypeScript declaration describing it. Both are Tera templates compiled
//! once per emitter.

pub mod api;
pub mod emitter;
pub mod error;
pub mod virtual_module;
