use serde::{Deserialize, Serialize};
use twistymath::prelude::*;

/// Perspective camera looking at the puzzle.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(default)]
pub struct Camera {
    /// Position of the eye in world space.
    pub eye: [Float; 3],
    /// Point that the camera looks at.
    pub target: [Float; 3],
    /// Approximate up direction.
    pub up: [Float; 3],
    /// Vertical field of view in degrees.
    pub fov_degrees: Float,
    /// Viewport size in pixels.
    pub viewport: [Float; 2],
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: [0.0, 0.0, 8.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fov_degrees: 45.0,
            viewport: [800.0, 600.0],
        }
    }
}

/// Orthonormal camera axes in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraBasis {
    /// Screen right.
    pub right: Vec3,
    /// Screen up.
    pub up: Vec3,
    /// Toward the viewer, opposite the view direction.
    pub back: Vec3,
}

impl Camera {
    /// Returns the camera's orthonormal axes.
    pub fn basis(&self) -> CameraBasis {
        let eye = Vec3::from(self.eye);
        let forward = (Vec3::from(self.target) - eye).normalize();
        let right = forward.cross(Vec3::from(self.up)).normalize();
        let up = right.cross(forward);
        CameraBasis {
            right,
            up,
            back: -forward,
        }
    }

    /// Projects a world-space point to pixel coordinates, with `y` pointing
    /// down. Returns `None` if the point is behind the camera.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let basis = self.basis();
        let d = world - Vec3::from(self.eye);
        let depth = -d.dot(basis.back);
        if depth <= EPSILON {
            return None;
        }
        let [w, h] = self.viewport;
        let tan = (self.fov_degrees.to_radians() / 2.0).tan();
        let aspect = w / h.max(1.0);
        let x_ndc = d.dot(basis.right) / (depth * tan * aspect);
        let y_ndc = d.dot(basis.up) / (depth * tan);
        Some(Vec2::new((x_ndc + 1.0) / 2.0 * w, (1.0 - y_ndc) / 2.0 * h))
    }
}

/// Camera together with the orientation of the puzzle in the world.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct View {
    /// Camera.
    pub camera: Camera,
    /// Rotation from puzzle space to world space. Changed by free rotation,
    /// which never affects the puzzle's state.
    pub rotation: Quat,
}

impl Default for View {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            rotation: Quat::one(),
        }
    }
}

impl View {
    /// Projects a point in puzzle space to pixel coordinates.
    pub fn project(&self, p: Vec3) -> Option<Vec2> {
        self.camera.project(self.rotation.rotate_vector(p))
    }
    /// Converts a world-space direction to puzzle space.
    pub fn world_to_puzzle(&self, v: Vec3) -> Vec3 {
        self.rotation.invert().rotate_vector(v)
    }
    /// Converts a camera-space direction (right, up, back) to puzzle space.
    pub fn camera_to_puzzle(&self, v: Vec3) -> Vec3 {
        let b = self.camera.basis();
        self.world_to_puzzle(b.right * v.x + b.up * v.y + b.back * v.z)
    }
}
