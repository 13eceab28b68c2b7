//! Local transformation of a scene node.
//!
//! Rotation is stored as XYZ Euler angles so every axis can be driven on its
//! own: a spinning prop can be animated on x and z while y keeps whatever value
//! it was given at placement.

use cgmath::{Euler, Matrix4, Quaternion, Rad, Vector3};

/// Position, rotation and scale of a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Euler<Rad<f32>>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// Identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Euler::new(Rad(0.0), Rad(0.0), Rad(0.0)),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_position(position: [f32; 3]) -> Self {
        Self {
            position: position.into(),
            ..Self::new()
        }
    }

    /// Overwrites the axes that are `Some` and leaves the others untouched.
    ///
    /// `[Some(a), None, Some(b)]` sets x and z; y keeps its previous value. An
    /// absent axis never means zero.
    pub fn set_rotation_axes(&mut self, axes: [Option<f32>; 3]) {
        let [x, y, z] = axes;
        if let Some(x) = x {
            self.rotation.x = Rad(x);
        }
        if let Some(y) = y {
            self.rotation.y = Rad(y);
        }
        if let Some(z) = z {
            self.rotation.z = Rad(z);
        }
    }

    pub fn set_rotation(&mut self, rotation: [f32; 3]) {
        self.set_rotation_axes(rotation.map(Some));
    }

    pub fn set_quaternion(&mut self, rotation: Quaternion<f32>) {
        self.rotation = Euler::from(rotation);
    }

    pub fn quaternion(&self) -> Quaternion<f32> {
        Quaternion::from(self.rotation)
    }

    pub fn multiply_scalar(&mut self, factor: f32) {
        self.scale *= factor;
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.quaternion())
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(position: Vector3<f32>) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }
}
