use glam::Vec3;

use crate::scene::{Material, Scene, Sphere};

/// Height of the checkerboard plane.
pub const PLANE_Y: f32 = -4.0;
/// Rays whose vertical component is below this never hit the plane.
pub const PLANE_PARALLEL_EPSILON: f32 = 1e-3;
/// Hits at or beyond this distance count as misses.
pub const MISS_DISTANCE: f32 = 1000.0;

const CHECKER_LIGHT: Vec3 = Vec3::new(1.0, 1.0, 1.0);
const CHECKER_DARK: Vec3 = Vec3::new(1.0, 0.7, 0.3);
const CHECKER_DIM: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub point: Vec3,
    pub normal: Vec3,
    pub material: Material,
    pub distance: f32,
}

/// Distance along `direction` to the first positive crossing of the sphere.
///
/// `direction` must be normalized. If the origin is inside the sphere the far
/// root is returned.
pub fn sphere_intersect(origin: Vec3, direction: Vec3, sphere: &Sphere) -> Option<f32> {
    let to_center = sphere.center - origin;
    let projection = to_center.dot(direction);
    let d2 = to_center.dot(to_center) - projection * projection;
    let radius2 = sphere.radius * sphere.radius;
    if d2 > radius2 {
        return None;
    }
    let half_chord = (radius2 - d2).sqrt();
    let near = projection - half_chord;
    let far = projection + half_chord;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

/// Nearest hit among all spheres and the bounded checkerboard plane.
pub fn scene_intersect(origin: Vec3, direction: Vec3, scene: &Scene) -> Option<Hit> {
    let mut nearest: Option<Hit> = None;
    let mut spheres_dist = f32::MAX;

    for sphere in &scene.spheres {
        match sphere_intersect(origin, direction, sphere) {
            Some(dist) if dist < spheres_dist => {
                spheres_dist = dist;
                let point = origin + direction * dist;
                nearest = Some(Hit {
                    point,
                    normal: (point - sphere.center).normalize(),
                    material: sphere.material,
                    distance: dist,
                });
            }
            _ => {}
        }
    }

    if let Some(hit) = checkerboard_intersect(origin, direction) {
        if hit.distance < spheres_dist {
            nearest = Some(hit);
        }
    }

    nearest.filter(|hit| hit.distance < MISS_DISTANCE)
}

fn checkerboard_intersect(origin: Vec3, direction: Vec3) -> Option<Hit> {
    if direction.y.abs() <= PLANE_PARALLEL_EPSILON {
        return None;
    }
    let dist = -(origin.y - PLANE_Y) / direction.y;
    let point = origin + direction * dist;
    if dist <= 0.0 || point.x.abs() >= 10.0 || point.z >= -10.0 || point.z <= -30.0 {
        return None;
    }

    Some(Hit {
        point,
        normal: Vec3::Y,
        material: Material {
            diffuse_color: checker_color(point) * CHECKER_DIM,
            ..Material::default()
        },
        distance: dist,
    })
}

fn checker_color(point: Vec3) -> Vec3 {
    let parity = (0.5 * point.x).floor() as i64 + (0.5 * point.z).floor() as i64;
    if parity & 1 == 1 {
        CHECKER_LIGHT
    } else {
        CHECKER_DARK
    }
}
