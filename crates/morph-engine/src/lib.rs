#![deny(missing_docs)]
//! Morphing pipeline orchestration.
//!
//! The [`Morphing`] engine owns the active marker set and the image slots
//! and drives the per-frame pipeline: update the marker interpolation, warp
//! both source images toward the interpolated mid-geometry, cross-dissolve
//! the warped pair into the caller's output buffer.

/// morphing engine module.
pub mod morphing;

pub use crate::morphing::{Algorithm, Morphing};
