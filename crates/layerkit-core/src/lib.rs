//! # Layerkit Core
//!
//! Core types and utilities for Layerkit.
//! Provides the geometry primitives, numeric clamping helpers and error
//! types shared by the editor and any host integration.

pub mod error;
pub mod geometry;
pub mod math;

pub use error::{LayerDataError, StoreError};
pub use geometry::{point_to_segment_distance, rotate_point, Bounds, Point};
pub use math::{clamp, clamp_opacity, degrees_to_radians, radians_to_degrees};
