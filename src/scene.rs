use glam::{Vec3, Vec4};

use crate::util::math::degree_to_radian;

/// Surface description shared by spheres and the checkerboard.
///
/// `albedo` weights the diffuse, specular, reflection and transmission terms
/// in that order. They need not sum to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub refractive_index: f32,
    pub albedo: Vec4,
    pub diffuse_color: Vec3,
    pub specular_exponent: f32,
}

impl Material {
    pub const fn new(
        refractive_index: f32,
        albedo: Vec4,
        diffuse_color: Vec3,
        specular_exponent: f32,
    ) -> Self {
        Self {
            refractive_index,
            albedo,
            diffuse_color,
            specular_exponent,
        }
    }

    pub const IVORY: Material = Material::new(
        1.0,
        Vec4::new(0.6, 0.3, 0.1, 0.0),
        Vec3::new(0.4, 0.4, 0.3),
        50.0,
    );
    pub const GLASS: Material = Material::new(
        1.5,
        Vec4::new(0.0, 0.5, 0.1, 0.8),
        Vec3::new(0.6, 0.7, 0.8),
        125.0,
    );
    pub const RED_RUBBER: Material = Material::new(
        1.0,
        Vec4::new(0.9, 0.1, 0.0, 0.0),
        Vec3::new(0.3, 0.1, 0.1),
        10.0,
    );
    pub const MIRROR: Material = Material::new(
        1.0,
        Vec4::new(0.0, 10.0, 0.8, 0.0),
        Vec3::new(1.0, 1.0, 1.0),
        1425.0,
    );
}

impl Default for Material {
    fn default() -> Self {
        Self {
            refractive_index: 1.0,
            albedo: Vec4::new(1.0, 0.0, 0.0, 0.0),
            diffuse_color: Vec3::ZERO,
            specular_exponent: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        debug_assert!(radius > 0.0, "sphere radius must be positive");
        debug_assert!(material.refractive_index >= 1.0);
        Self {
            center,
            radius,
            material,
        }
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 0.5,
            material: Material::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub intensity: f32,
}

impl Light {
    pub fn new(position: Vec3, intensity: f32) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

/// Everything a render pass reads. Only mutated between frames.
#[derive(Debug, Default, Clone)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub lights: Vec<Light>,
}

impl Scene {
    /// Four spheres of different materials lit by three point lights.
    /// The ivory sphere comes first so it can be driven by an [`Orbit`].
    pub fn showcase() -> Self {
        Self {
            spheres: vec![
                Sphere::new(Vec3::new(-3.0, 0.0, -16.0), 2.0, Material::IVORY),
                Sphere::new(Vec3::new(-1.0, -1.5, -12.0), 2.0, Material::GLASS),
                Sphere::new(Vec3::new(1.5, -0.5, -18.0), 3.0, Material::RED_RUBBER),
                Sphere::new(Vec3::new(7.0, 5.0, -18.0), 4.0, Material::MIRROR),
            ],
            lights: vec![
                Light::new(Vec3::new(-20.0, 20.0, 20.0), 1.5),
                Light::new(Vec3::new(30.0, 50.0, -25.0), 1.8),
                Light::new(Vec3::new(30.0, 20.0, 30.0), 1.7),
            ],
        }
    }
}

/// Circular path in the XZ-plane, advanced once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    /// Current angle in whole degrees, always in `0..360`.
    pub angle: u32,
    pub step: u32,
    pub radius: f32,
    /// Center of the circle as (x, z).
    pub center: (f32, f32),
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            angle: 0,
            step: 4,
            radius: 8.0,
            center: (0.0, -16.0),
        }
    }
}

impl Orbit {
    /// Advances the angle by one step and places `sphere` on the circle.
    /// The sphere keeps its height.
    pub fn advance(&mut self, sphere: &mut Sphere) {
        self.angle = (self.angle + self.step) % 360;
        let theta = degree_to_radian(self.angle as f32);
        sphere.center.x = theta.cos() * self.radius + self.center.0;
        sphere.center.z = theta.sin() * self.radius + self.center.1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_material_is_plain_diffuse() {
        let m = Material::default();
        assert_eq!(m.refractive_index, 1.0);
        assert_eq!(m.albedo, Vec4::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(m.specular_exponent, 0.0);
    }

    #[test]
    fn showcase_layout() {
        let scene = Scene::showcase();
        assert_eq!(scene.spheres.len(), 4);
        assert_eq!(scene.lights.len(), 3);
        assert!(scene.spheres.iter().all(|s| s.radius > 0.0));
        assert!(scene
            .spheres
            .iter()
            .all(|s| s.material.refractive_index >= 1.0));
    }

    #[test]
    fn orbit_wraps_at_full_turn() {
        let mut orbit = Orbit::default();
        let mut sphere = Sphere::default();
        for _ in 0..90 {
            orbit.advance(&mut sphere);
        }
        assert_eq!(orbit.angle, 0);
        assert_relative_eq!(sphere.center.x, 8.0, epsilon = 1e-4);
        assert_relative_eq!(sphere.center.z, -16.0, epsilon = 1e-4);
    }

    #[test]
    fn orbit_keeps_radius_and_height() {
        let mut orbit = Orbit::default();
        let mut sphere = Sphere::new(Vec3::new(0.0, 1.25, 0.0), 2.0, Material::IVORY);
        for _ in 0..37 {
            orbit.advance(&mut sphere);
            let dx = sphere.center.x - orbit.center.0;
            let dz = sphere.center.z - orbit.center.1;
            assert_relative_eq!((dx * dx + dz * dz).sqrt(), 8.0, epsilon = 1e-4);
            assert_eq!(sphere.center.y, 1.25);
        }
        assert_eq!(orbit.angle, 148);
    }
}
