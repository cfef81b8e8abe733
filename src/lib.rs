//! Two animated procedural backdrops: a density-regulated Game of Life field
//! that avoids a fuzzy central zone, and drifting topographic contour lines
//! traced from 3D simplex noise.

pub mod app;
pub mod config;
pub mod contour;
pub mod error;
pub mod gpu;
pub mod raster;
pub mod scheduler;
pub mod simulation;
