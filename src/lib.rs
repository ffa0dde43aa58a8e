//! Polygon-mesh processing built around an indexed, epsilon-welded **[`Model`]**:
//! deduplicated attribute tables, half-edge adjacency ([`ModelAdjacency`]),
//! and batch operations for cleanup, coplanar merging, progressive decimation
//! and Boolean CSG on [BSP](ops::bsp) trees.
//!
//! Every operation is a value configured at construction and applied through
//! [`ModelOperation::apply`](ops::ModelOperation::apply), mutating the model
//! in place. Importers build a `Model`, the cleanup operators normalize it,
//! [`MergeCoplanarAdjacents`](ops::MergeCoplanarAdjacents) and
//! [`Reduce`](ops::Reduce) simplify it, and [`Boolean`](ops::Boolean)
//! combines two models.
//!
//! # Features
//! - **f64**: use f64 as Real
//! - **f32**: use f32 as Real, this conflicts with f64

#![forbid(unsafe_code)]
#![warn(clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod model;
pub mod ops;
pub mod plane;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use errors::MeshError;
pub use model::{ClearFlags, EdgeMode, INVALID_INDEX, Model, ModelAdjacency, Polygon, Vertex};
pub use ops::ModelOperation;
