//! Core types: math re-exports, Transform, FlyCamera, input glue, errors.

pub use glam::{EulerRot, Mat4, Quat, Vec3, Vec4, vec3};

pub mod camera;
pub mod error;
pub mod input;
pub mod transform;

pub use camera::{CameraConfig, Direction, FlyCamera, MAX_PITCH_LIMIT, Perspective, WORLD_UP};
pub use error::{CoreError, CoreResult};
pub use input::{CameraController, MouseTracker, MovementKeys};
