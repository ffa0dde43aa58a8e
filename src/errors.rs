//! Operation errors

use crate::float_types::Real;

/// Hard failures an operation can report through
/// [`ModelOperation::apply`](crate::ops::ModelOperation::apply).
///
/// Recoverable geometry problems (a polygon with no derivable plane, a
/// boundary triangle in `Reduce`) are not errors: they are logged and
/// skipped, or held back with an infinite-error sentinel. Out-of-range
/// indices are programmer errors and panic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// The requested polygon-count ratio is outside `(0, 1]`.
    #[error("reduction target {0} is outside (0, 1]")]
    InvalidTarget(Real),

    /// A non-empty Boolean operand produced no polygon with a valid plane.
    #[error("no polygon of the {0} operand defines a valid plane")]
    NoValidPolygons(&'static str),
}
