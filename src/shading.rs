use glam::Vec3;

use crate::{
    intersect::scene_intersect,
    scene::Scene,
    util::math::{offset_origin, reflect, refract},
};

/// Color returned for rays that escape the scene or exceed the depth limit.
pub const BACKGROUND: Vec3 = Vec3::new(0.2, 0.7, 0.8);

/// Traces one ray and returns its unclamped color.
///
/// Every non-terminal call spawns a reflection and a transmission ray, so the
/// work per primary ray grows as `2^max_depth`.
pub fn cast_ray(origin: Vec3, direction: Vec3, scene: &Scene, depth: u32, max_depth: u32) -> Vec3 {
    if depth > max_depth {
        return BACKGROUND;
    }
    let Some(hit) = scene_intersect(origin, direction, scene) else {
        return BACKGROUND;
    };
    let (point, normal, material) = (hit.point, hit.normal, hit.material);

    let reflect_dir = reflect(direction, normal).normalize();
    let reflect_color = cast_ray(
        offset_origin(point, reflect_dir, normal),
        reflect_dir,
        scene,
        depth + 1,
        max_depth,
    );

    // Total internal reflection leaves no transmitted ray.
    let refract_dir = refract(direction, normal, material.refractive_index).normalize_or_zero();
    let refract_color = if refract_dir == Vec3::ZERO {
        Vec3::ZERO
    } else {
        cast_ray(
            offset_origin(point, refract_dir, normal),
            refract_dir,
            scene,
            depth + 1,
            max_depth,
        )
    };

    let mut diffuse = 0.0;
    let mut specular = 0.0;
    for light in &scene.lights {
        let to_light = light.position - point;
        let light_distance = to_light.length();
        let light_dir = to_light / light_distance;

        let shadow_orig = offset_origin(point, light_dir, normal);
        if let Some(blocker) = scene_intersect(shadow_orig, light_dir, scene) {
            if blocker.distance < light_distance {
                continue;
            }
        }

        diffuse += light.intensity * light_dir.dot(normal).max(0.0);
        specular += (-reflect(-light_dir, normal).dot(direction))
            .max(0.0)
            .powf(material.specular_exponent)
            * light.intensity;
    }

    material.diffuse_color * diffuse * material.albedo.x
        + Vec3::ONE * specular * material.albedo.y
        + reflect_color * material.albedo.z
        + refract_color * material.albedo.w
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Light, Material, Sphere};
    use approx::assert_relative_eq;
    use glam::Vec4;

    fn white_diffuse() -> Material {
        Material {
            refractive_index: 1.0,
            albedo: Vec4::new(1.0, 0.0, 0.0, 0.0),
            diffuse_color: Vec3::ONE,
            specular_exponent: 50.0,
        }
    }

    #[test]
    fn beyond_max_depth_is_background() {
        let scene = Scene::showcase();
        for max_depth in 1..=4 {
            let c = cast_ray(Vec3::ZERO, -Vec3::Z, &scene, max_depth + 1, max_depth);
            assert_eq!(c, BACKGROUND);
        }
    }

    #[test]
    fn empty_scene_is_background() {
        let scene = Scene::default();
        assert_eq!(cast_ray(Vec3::ZERO, -Vec3::Z, &scene, 0, 4), BACKGROUND);
        assert_eq!(cast_ray(Vec3::ZERO, Vec3::Y, &scene, 0, 4), BACKGROUND);
    }

    #[test]
    fn single_lit_sphere_is_pure_diffuse() {
        let scene = Scene {
            spheres: vec![Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, white_diffuse())],
            lights: vec![Light::new(Vec3::ZERO, 1.0)],
        };
        let c = cast_ray(Vec3::ZERO, -Vec3::Z, &scene, 0, 4);
        // The light sits on the ray origin, so N.L is 1 at the front pole.
        assert_relative_eq!(c.x, 1.0, epsilon = 1e-4);
        assert_eq!(c.x, c.y);
        assert_eq!(c.y, c.z);
        assert!(c.x > 0.0 && c.x <= 1.0);
    }

    #[test]
    fn off_axis_diffuse_is_not_saturated() {
        let scene = Scene {
            spheres: vec![Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, white_diffuse())],
            lights: vec![Light::new(Vec3::new(0.0, 3.0, 0.0), 1.0)],
        };
        let c = cast_ray(Vec3::ZERO, -Vec3::Z, &scene, 0, 4);
        assert!(c.x > 0.0 && c.x < 1.0);
    }

    #[test]
    fn occluded_light_contributes_nothing() {
        let white = white_diffuse();
        let target = Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, white);
        // Front pole is (0, 0, -9); the light sits 10 units away along (0, 0.6, 0.8).
        let light = Light::new(Vec3::new(0.0, 6.0, -1.0), 1.0);
        let lit = Scene {
            spheres: vec![target.clone()],
            lights: vec![light],
        };
        let c = cast_ray(Vec3::ZERO, -Vec3::Z, &lit, 0, 4);
        assert_relative_eq!(c.x, 0.8, epsilon = 1e-4);

        let blocker = Sphere::new(Vec3::new(0.0, 3.0, -5.0), 0.5, white);
        let shadowed = Scene {
            spheres: vec![target, blocker],
            lights: vec![light],
        };
        assert_eq!(cast_ray(Vec3::ZERO, -Vec3::Z, &shadowed, 0, 4), Vec3::ZERO);
    }

    #[test]
    fn mirror_reflects_background() {
        let mirror = Material {
            refractive_index: 1.0,
            albedo: Vec4::new(0.0, 0.0, 1.0, 0.0),
            diffuse_color: Vec3::ZERO,
            specular_exponent: 1.0,
        };
        let scene = Scene {
            spheres: vec![Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, mirror)],
            lights: vec![],
        };
        let c = cast_ray(Vec3::ZERO, -Vec3::Z, &scene, 0, 2);
        assert_relative_eq!(c.x, BACKGROUND.x, epsilon = 1e-6);
        assert_relative_eq!(c.y, BACKGROUND.y, epsilon = 1e-6);
        assert_relative_eq!(c.z, BACKGROUND.z, epsilon = 1e-6);
    }

    #[test]
    fn glass_transmits_what_lies_behind() {
        let glass = Material {
            refractive_index: 1.5,
            albedo: Vec4::new(0.0, 0.0, 0.0, 1.0),
            diffuse_color: Vec3::ZERO,
            specular_exponent: 1.0,
        };
        let scene = Scene {
            spheres: vec![Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, glass)],
            lights: vec![],
        };
        // Head-on, the ray passes straight through and escapes.
        let c = cast_ray(Vec3::ZERO, -Vec3::Z, &scene, 0, 4);
        assert_relative_eq!(c.x, BACKGROUND.x, epsilon = 1e-5);
        assert_relative_eq!(c.z, BACKGROUND.z, epsilon = 1e-5);
    }
}
