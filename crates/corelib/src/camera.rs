//! First-person fly camera (yaw/pitch) and perspective projection.
//!
//! Matrices are glam `Mat4`: column-major, right-handed. `to_cols_array()`
//! can be uploaded to a GL uniform with `transpose = false`.

use crate::{CoreError, CoreResult, Mat4, Vec3, vec3};

/// Fixed reference up vector; the camera's own `up` is always rebuilt from it.
pub const WORLD_UP: Vec3 = Vec3::Y;

const DEGENERATE_EPSILON: f32 = 1e-6;

/// Exclusive upper bound for `pitch_limit`; at 90° the basis collapses.
pub const MAX_PITCH_LIMIT: f32 = 90.0;

/// Discrete movement command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
    ];
}

/// Initial pose and tuning for a [`FlyCamera`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Degrees; -90 looks down -Z.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    /// Degrees per pixel of mouse movement.
    pub mouse_sensitivity: f32,
    /// Degrees, in `[0, 90)`; pitch is clamped to `[-pitch_limit, pitch_limit]`.
    pub pitch_limit: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: vec3(0.0, 4.0, 30.0),
            yaw: -90.0,
            pitch: 0.0,
            mouse_sensitivity: 0.1,
            pitch_limit: 45.0,
        }
    }
}

/// Free-fly camera. `front`, `right` and `up` always form a right-handed
/// orthonormal basis matching the current yaw/pitch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlyCamera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    mouse_sensitivity: f32,
    pitch_limit: f32,
}

impl FlyCamera {
    pub fn new(config: CameraConfig) -> CoreResult<Self> {
        if !(0.0..MAX_PITCH_LIMIT).contains(&config.pitch_limit) {
            return Err(CoreError::InvalidConfig(format!(
                "pitch limit must be in [0, {}) degrees, got {}",
                MAX_PITCH_LIMIT, config.pitch_limit
            )));
        }
        if !config.mouse_sensitivity.is_finite() {
            return Err(CoreError::InvalidConfig(format!(
                "mouse sensitivity must be finite, got {}",
                config.mouse_sensitivity
            )));
        }
        if !config.position.is_finite() {
            return Err(CoreError::InvalidConfig(format!(
                "camera position must be finite, got {}",
                config.position
            )));
        }

        let pitch = config.pitch.clamp(-config.pitch_limit, config.pitch_limit);
        let (front, right, up) = orthonormal_basis(config.yaw, pitch).ok_or(
            CoreError::DegenerateBasis {
                yaw: config.yaw,
                pitch,
            },
        )?;

        Ok(Self {
            position: config.position,
            yaw: config.yaw,
            pitch,
            front,
            right,
            up,
            mouse_sensitivity: config.mouse_sensitivity,
            pitch_limit: config.pitch_limit,
        })
    }

    /// Right-handed look-at from `position` towards `position + front`.
    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Apply a mouse delta (pixels). Positive `y_delta` looks up.
    ///
    /// With `constrain_pitch` and finite deltas the call cannot fail.
    /// Without it, reaching ±90° pitch returns [`CoreError::DegenerateBasis`]
    /// and leaves the camera exactly as it was.
    pub fn look(&mut self, x_delta: f32, y_delta: f32, constrain_pitch: bool) -> CoreResult<()> {
        let yaw = self.yaw + x_delta * self.mouse_sensitivity;
        let mut pitch = self.pitch + y_delta * self.mouse_sensitivity;
        if constrain_pitch {
            pitch = pitch.clamp(-self.pitch_limit, self.pitch_limit);
        }
        self.set_orientation(yaw, pitch)
    }

    /// Set yaw/pitch directly (degrees, no clamping) and rebuild the basis.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) -> CoreResult<()> {
        match orthonormal_basis(yaw, pitch) {
            Some((front, right, up)) => {
                self.yaw = yaw;
                self.pitch = pitch;
                self.front = front;
                self.right = right;
                self.up = up;
                Ok(())
            }
            None => {
                log::warn!(
                    "Camera basis degenerate at yaw={:.3}, pitch={:.3}; keeping previous orientation",
                    yaw,
                    pitch
                );
                Err(CoreError::DegenerateBasis { yaw, pitch })
            }
        }
    }

    /// Translate along `front` or `right`. `distance` is already scaled by
    /// frame time.
    pub fn move_in(&mut self, direction: Direction, distance: f32) {
        let offset = match direction {
            Direction::Forward => self.front * distance,
            Direction::Backward => -self.front * distance,
            Direction::Right => self.right * distance,
            Direction::Left => -self.right * distance,
        };
        self.position += offset;
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    #[inline]
    pub fn front(&self) -> Vec3 {
        self.front
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn mouse_sensitivity(&self) -> f32 {
        self.mouse_sensitivity
    }

    pub fn pitch_limit(&self) -> f32 {
        self.pitch_limit
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        let config = CameraConfig::default();
        let (front, right, up) = orthonormal_basis(config.yaw, config.pitch)
            .unwrap_or((Vec3::NEG_Z, Vec3::X, Vec3::Y));
        Self {
            position: config.position,
            yaw: config.yaw,
            pitch: config.pitch,
            front,
            right,
            up,
            mouse_sensitivity: config.mouse_sensitivity,
            pitch_limit: config.pitch_limit,
        }
    }
}

/// front/right/up from yaw/pitch in degrees, or `None` if either front or
/// right collapses.
fn orthonormal_basis(yaw: f32, pitch: f32) -> Option<(Vec3, Vec3, Vec3)> {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    let front = normalize_checked(vec3(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    ))?;
    let right = normalize_checked(front.cross(WORLD_UP))?;
    let up = normalize_checked(right.cross(front))?;
    Some((front, right, up))
}

#[inline]
fn normalize_checked(v: Vec3) -> Option<Vec3> {
    let len = v.length();
    (len > DEGENERATE_EPSILON).then(|| v / len)
}

/// Perspective projection parameters (OpenGL clip space, z in [-1, 1]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Perspective {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Perspective {
    pub fn new(fov_y_deg: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y_deg,
            aspect,
            z_near,
            z_far,
        }
    }

    /// Aspect ratio for a `width` x `height` viewport (each clamped to 1).
    pub fn viewport_aspect(width: u32, height: u32) -> f32 {
        width.max(1) as f32 / height.max(1) as f32
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_y_deg.to_radians(),
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }
}

impl Default for Perspective {
    fn default() -> Self {
        Self::new(45.0, 800.0 / 600.0, 0.1, 100.0)
    }
}
