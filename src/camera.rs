use glam::Vec3;

/// Pinhole camera at the world origin looking down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Horizontal extent is derived from this and the grid aspect ratio.
    pub fov_y: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self { fov_y: 1.0 }
    }
}

impl Camera {
    pub const EYE: Vec3 = Vec3::ZERO;

    pub fn new(fov_y: f32) -> Self {
        Self { fov_y }
    }

    /// Normalized direction through the center of cell `(i, j)` of a
    /// `width x height` grid. Row 0 is the top of the image.
    pub fn primary_direction(&self, i: u32, j: u32, width: u32, height: u32) -> Vec3 {
        let (w, h) = (width as f32, height as f32);
        let half = (self.fov_y / 2.0).tan();
        let x = (2.0 * (i as f32 + 0.5) / w - 1.0) * half * w / h;
        let y = -(2.0 * (j as f32 + 0.5) / h - 1.0) * half;
        Vec3::new(x, y, -1.0).normalize()
    }
}
