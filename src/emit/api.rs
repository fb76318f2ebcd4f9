//! Public API for module and declaration emission

pub use crate::emit::emitter::{
    declared_fields, default_export_literal, type_of_extra, DeclaredField, ModuleEmitter,
};
pub use crate::emit::error::{EmitError, EmitResult};
pub use crate::emit::virtual_module::{VirtualModule, DEFAULT_VIRTUAL_ID};
