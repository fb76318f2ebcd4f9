//! Public API for field projection

pub use crate::projection::error::{ProjectionError, ProjectionResult};
pub use crate::projection::extra::{ExtraFields, ExtraValue};
pub use crate::projection::fields::{FieldSelection, DEFAULT_FIELDS};
pub use crate::projection::{project, ProjectedFields};
