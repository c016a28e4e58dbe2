//! SPICE Toolkit routines, implemented over a [`maxq_std::Context`].
//!
//! The routines follow the toolkit's conventions rather than Rust's: failures are
//! reported through the global error state in [`errhnd`], not through return values.
//! A routine that fails signals an error and returns a neutral value; callers
//! check [`errhnd::failed`] afterwards. The `Err` side of [`maxq_std::Result`] is
//! reserved for termination (the `ABORT` error action) and I/O failures.
//!
//! Pure geometry (vectors, matrices, most rotations and coordinate conversions)
//! takes no context, since it cannot fail.
//!
//! Most users should use the `maxq` crate, which wraps every call in error
//! translation.

pub mod bodies;
pub mod consts;
pub mod coords;
pub mod ellipses;
pub mod ellipsoid;
pub mod errhnd;
mod kernel_text;
pub mod keeper;
pub mod matrices;
pub mod numeric;
pub mod planes;
pub mod pool;
pub mod rotations;
pub mod states;
pub mod time;
pub mod units;
pub mod vectors;

/// Three-dimensional vector
pub type Vector3 = [f64; 3];

/// 3x3 matrix, stored as rows
pub type Matrix3 = [[f64; 3]; 3];

/// 6x6 state transformation matrix, stored as rows
pub type Matrix6 = [[f64; 6]; 6];

/// Quaternion `(s, v1, v2, v3)` in the SPICE convention
pub type Quaternion = [f64; 4];

pub use maxq_std::{Context, Error, Result};
