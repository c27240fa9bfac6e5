//! # View Frustum Culling
//!
//! A frustum is six planes, each stored as a unit normal and an offset so that
//! `normal · p + d` is the signed distance of `p` from the plane. Points with a
//! non-negative distance to every plane are inside.
//!
//! Boxes are tested with the "positive vertex": per plane, the box corner furthest
//! along the plane normal. If that corner is behind any plane the whole box is
//! outside. Boxes straddling several planes near a frustum corner can pass the test
//! while being outside, which only costs drawing something off-screen.

use cgmath::{InnerSpace, Matrix, Matrix4, Point3, Vector3, Vector4};

use crate::engine_state::voxels::chunk::ChunkCoord;
use crate::error::EngineError;

/// Checks perspective parameters: `0 < fov < 180` degrees, positive aspect,
/// `0 < near < far`, everything finite.
pub fn validate_projection(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<(), EngineError> {
    let finite = [fov_degrees, aspect, near, far].iter().all(|value| value.is_finite());
    if finite && fov_degrees > 0.0 && fov_degrees < 180.0 && aspect > 0.0 && near > 0.0 && far > near {
        Ok(())
    } else {
        Err(EngineError::InvalidProjection { fov_degrees, aspect, near, far })
    }
}

/// A plane in Hessian normal form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Unit normal pointing into the inside half-space.
    pub normal: Vector3<f32>,
    /// Offset along the normal.
    pub d: f32,
}

impl Plane {
    /// Builds a plane from `normal · p + d = 0`, normalizing both.
    pub fn new(normal: Vector3<f32>, d: f32) -> Self {
        let length = normal.magnitude();
        if length > f32::EPSILON {
            Plane { normal: normal / length, d: d / length }
        } else {
            Plane { normal, d }
        }
    }

    fn from_coefficients(v: Vector4<f32>) -> Self {
        Self::new(v.truncate(), v.w)
    }

    /// Signed distance from the plane; positive on the inside.
    pub fn distance(&self, point: Point3<f32>) -> f32 {
        self.normal.x * point.x + self.normal.y * point.y + self.normal.z * point.z + self.d
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f32>,
    /// Maximum corner.
    pub max: Point3<f32>,
}

impl Aabb {
    /// Builds a box from two opposite corners in any order.
    pub fn new(a: Point3<f32>, b: Point3<f32>) -> Self {
        Aabb {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Builds a box from its center and half extents.
    pub fn from_center(center: Point3<f32>, half_extents: Vector3<f32>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// World-space bounds of the chunk at `coord`: `size` units on every axis from its origin.
    pub fn for_chunk(coord: ChunkCoord, size: usize) -> Self {
        let origin = coord.origin(size);
        let min = Point3::new(origin.x as f32, origin.y as f32, origin.z as f32);
        let size = size as f32;
        Self::new(min, min + Vector3::new(size, size, size))
    }

    /// The corner furthest along `normal`.
    fn positive_vertex(&self, normal: Vector3<f32>) -> Point3<f32> {
        Point3::new(
            if normal.x >= 0.0 { self.max.x } else { self.min.x },
            if normal.y >= 0.0 { self.max.y } else { self.min.y },
            if normal.z >= 0.0 { self.max.z } else { self.min.z },
        )
    }
}

/// Six planes bounding a view volume, in the order near, far, left, right, bottom, top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    planes: [Plane; 6],
}

impl Frustum {
    /// Symmetric perspective frustum for a camera at the origin looking down +Z with +Y up.
    ///
    /// `fov_degrees` is the vertical field of view; `aspect` is width over height.
    pub fn from_perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<Self, EngineError> {
        validate_projection(fov_degrees, aspect, near, far)?;

        let tan_half = (fov_degrees.to_radians() * 0.5).tan();
        let tan_half_x = tan_half * aspect;

        Ok(Frustum {
            planes: [
                Plane::new(Vector3::unit_z(), -near),
                Plane::new(-Vector3::unit_z(), far),
                Plane::new(Vector3::new(1.0, 0.0, tan_half_x), 0.0),
                Plane::new(Vector3::new(-1.0, 0.0, tan_half_x), 0.0),
                Plane::new(Vector3::new(0.0, 1.0, tan_half), 0.0),
                Plane::new(Vector3::new(0.0, -1.0, tan_half), 0.0),
            ],
        })
    }

    /// Extracts the planes of a combined view-projection matrix with OpenGL clip
    /// conventions (clip-space depth in `[-w, w]`).
    pub fn from_view_projection(view_projection: Matrix4<f32>) -> Self {
        let row = |i| view_projection.row(i);
        Frustum {
            planes: [
                Plane::from_coefficients(row(3) + row(2)),
                Plane::from_coefficients(row(3) - row(2)),
                Plane::from_coefficients(row(3) + row(0)),
                Plane::from_coefficients(row(3) - row(0)),
                Plane::from_coefficients(row(3) + row(1)),
                Plane::from_coefficients(row(3) - row(1)),
            ],
        }
    }

    /// The six planes, near, far, left, right, bottom, top.
    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    /// Whether any part of `aabb` may be inside the frustum.
    pub fn intersects(&self, aabb: &Aabb) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance(aabb.positive_vertex(plane.normal)) >= 0.0)
    }

    /// Whether `point` is inside the frustum.
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        self.planes.iter().all(|plane| plane.distance(point) >= 0.0)
    }
}
