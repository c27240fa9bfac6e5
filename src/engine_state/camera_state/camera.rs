//! # Camera Implementation
//!
//! This module contains the camera used to derive view frustums:
//! - `Camera`: position and yaw/pitch orientation, producing a view matrix
//! - `Projection`: perspective parameters, producing a projection matrix
//!
//! Both follow OpenGL conventions (right-handed, clip-space depth in `[-w, w]`),
//! which is what [`Frustum::from_view_projection`] expects.

use std::f32::consts::FRAC_PI_2;

use cgmath::{perspective, Deg, InnerSpace, Matrix4, Point3, Rad, Vector3};

use super::frustum::{validate_projection, Frustum};
use crate::config::CameraSettings;
use crate::error::EngineError;

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// A camera in 3D space.
///
/// Yaw is measured in the XZ plane from +X toward +Z; pitch is measured up from
/// the horizon and kept just short of straight up or down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians
    pub yaw: Rad<f32>,
    /// Vertical rotation (around X axis) in radians
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Example
    /// ```
    /// use cgmath::{Deg, Point3};
    /// use terrain_engine::Camera;
    ///
    /// let camera = Camera::new(Point3::new(0.0, 10.0, 0.0), Deg(90.0), Deg(-30.0));
    /// assert!(camera.forward().z > 0.0);
    /// ```
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(position: V, yaw: Y, pitch: P) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: clamp_pitch(pitch.into()),
        }
    }

    /// Creates a camera at `position` facing `target`.
    ///
    /// If the two points coincide the camera faces +X.
    pub fn look_at(position: Point3<f32>, target: Point3<f32>) -> Self {
        let direction = target - position;
        let length = direction.magnitude();
        if length <= f32::EPSILON {
            return Self::new(position, Rad(0.0), Rad(0.0));
        }

        let pitch = Rad((direction.y / length).clamp(-1.0, 1.0).asin());
        let yaw = Rad(direction.z.atan2(direction.x));
        Self::new(position, yaw, pitch)
    }

    /// Creates the camera described by a configuration.
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self::look_at(Point3::from(settings.position), Point3::from(settings.target))
    }

    /// Unit vector the camera is facing.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
    }

    /// Calculates the view matrix for this camera.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }

    /// The view frustum of this camera under `projection`.
    pub fn frustum(&self, projection: &Projection) -> Frustum {
        Frustum::from_view_projection(projection.calc_matrix() * self.calc_matrix())
    }
}

fn clamp_pitch(pitch: Rad<f32>) -> Rad<f32> {
    Rad(pitch.0.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2))
}

/// Represents a camera's projection matrix and related parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Errors
    /// [`EngineError::InvalidProjection`] unless `0 < fovy < 180°`, `aspect > 0` and `0 < znear < zfar`.
    pub fn new<F: Into<Rad<f32>>>(aspect: f32, fovy: F, znear: f32, zfar: f32) -> Result<Self, EngineError> {
        let fovy: Rad<f32> = fovy.into();
        validate_projection(Deg::from(fovy).0, aspect, znear, zfar)?;
        Ok(Self { aspect, fovy, znear, zfar })
    }

    /// Creates the projection described by a configuration.
    pub fn from_settings(settings: &CameraSettings) -> Result<Self, EngineError> {
        Self::new(settings.aspect, Deg(settings.fov_degrees), settings.near, settings.far)
    }

    /// Updates the aspect ratio for a new viewport size. Zero-sized viewports are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Calculates the projection matrix.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}
