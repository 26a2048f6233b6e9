//! Model placement: where a mesh sits in the world.

use crate::{EulerRot, Mat4, Quat, Vec3};

/// Scale, then rotate, then translate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// `rotation_deg` holds X, Y, Z angles in degrees, applied X first.
    pub fn from_degrees(translation: Vec3, rotation_deg: Vec3, scale: Vec3) -> Self {
        let [x, y, z] = rotation_deg.to_array().map(f32::to_radians);
        Self {
            translation,
            rotation: Quat::from_euler(EulerRot::XYZ, x, y, z),
            scale,
        }
    }

    /// Column-major model matrix `T * R * S`.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * p)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
