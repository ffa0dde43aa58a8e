//! Batch operations over a [`Model`].
//!
//! Each operation is configured at construction and applied through
//! [`ModelOperation::apply`], mutating the model in place. Operations are
//! synchronous, single-threaded and never retried internally; recoverable
//! geometry problems are logged and skipped, hard failures surface as
//! [`MeshError`].

use crate::errors::MeshError;
use crate::model::Model;

pub mod boolean;
pub mod bsp;
pub mod clean_degenerate;
pub mod clean_duplicates;
pub mod merge_coplanar;
pub mod merge_model;
pub mod reduce;
pub mod triangulate;

pub use boolean::{Boolean, BooleanOperation};
pub use clean_degenerate::CleanDegenerate;
pub use clean_duplicates::CleanDuplicates;
pub use merge_coplanar::MergeCoplanarAdjacents;
pub use merge_model::MergeModel;
pub use reduce::Reduce;
pub use triangulate::Triangulate;

/// A single in-place transform of a [`Model`].
pub trait ModelOperation {
    /// Apply the operation, mutating `model` in place.
    ///
    /// On `Err` the model may be partially updated; callers that need
    /// atomicity keep a copy.
    fn apply(&self, model: &mut Model) -> Result<(), MeshError>;
}
