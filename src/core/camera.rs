use glam::{Mat3, Vec3};

/// Pitch is clamped to straight up and straight down.
pub const MAX_PITCH: f32 = 90.0;

/// Free flying camera. Angles are stored in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World space position
    pub position: Vec3,
    /// Rotation around the world vertical axis, unclamped
    pub yaw: f32,
    /// Rotation around the camera's horizontal axis, always within [-MAX_PITCH, MAX_PITCH]
    pub pitch: f32,
    /// Kept for completeness, never applied by the transform
    pub roll: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 0.0, 0.0, 0.0)
    }
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32, roll: f32) -> Self {
        Self {
            position,
            yaw,
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
            roll,
        }
    }

    /// Add to yaw and pitch, then clamp pitch.
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Horizontal forward direction. Pitch never affects translation.
    pub fn forward(&self) -> Vec3 {
        let (sin, cos) = self.yaw.to_radians().sin_cos();
        Vec3::new(sin, 0.0, cos)
    }

    pub fn right(&self) -> Vec3 {
        let (sin, cos) = self.yaw.to_radians().sin_cos();
        Vec3::new(cos, 0.0, -sin)
    }

    pub fn move_forward(&mut self, amount: f32) {
        self.position += self.forward() * amount;
    }

    pub fn move_right(&mut self, amount: f32) {
        self.position += self.right() * amount;
    }

    /// World y grows downwards, so moving up decreases it.
    pub fn move_up(&mut self, amount: f32) {
        self.position.y -= amount;
    }

    /// Rotation taking camera relative offsets into camera space:
    /// yaw is undone around +Y first, then pitch is applied around +X.
    pub fn view_rotation(&self) -> Mat3 {
        Mat3::from_rotation_x(self.pitch.to_radians())
            * Mat3::from_rotation_y((-self.yaw).to_radians())
    }

    pub fn to_camera_space(&self, world: Vec3) -> Vec3 {
        self.view_rotation() * (world - self.position)
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        (point - self.position).length()
    }
}
