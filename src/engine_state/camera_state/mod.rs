//! # Camera State Management
//!
//! This module handles the view side of the engine:
//! - `Camera`: position and orientation, producing view matrices
//! - `Projection`: perspective parameters, producing projection matrices
//! - `Frustum`: the six-plane view volume chunks are culled against
//! - `Aabb`: the bounding box type culling tests

pub mod camera;
pub mod frustum;
