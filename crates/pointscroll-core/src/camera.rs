//! Camera math shared by the web and native front-ends.

use crate::constants::{CAMERA_FOVY_DEGREES, CAMERA_Z, CAMERA_ZFAR, CAMERA_ZNEAR};
use glam::{Mat4, Vec2, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// The page camera: looking down -z from (0, 0, 8).
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_DEGREES.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world-space point to `(ndc.x, ndc.y, distance)`, where
    /// distance is the depth in front of the eye. `None` when the point is
    /// behind the near plane or beyond the far plane.
    pub fn project(&self, point: Vec3) -> Option<Vec3> {
        self.project_with(&self.view_projection(), point)
    }

    /// Same as [`Camera::project`] with a precomputed matrix, for hot loops.
    pub fn project_with(&self, view_projection: &Mat4, point: Vec3) -> Option<Vec3> {
        let clip = *view_projection * point.extend(1.0);
        if clip.w < self.znear || clip.w > self.zfar {
            return None;
        }
        Some(Vec3::new(clip.x / clip.w, clip.y / clip.w, clip.w))
    }

    /// Map normalised device coordinates to pixels (origin top-left).
    pub fn ndc_to_screen(ndc: Vec2, width: f32, height: f32) -> Vec2 {
        Vec2::new((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height)
    }

    /// On-screen diameter in pixels of a world-space size at `distance`.
    pub fn pixel_size(&self, world_size: f32, distance: f32, viewport_height: f32) -> f32 {
        let half_height = (self.fovy_radians * 0.5).tan() * distance.max(self.znear);
        world_size / half_height * viewport_height * 0.5
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0)
    }
}
