pub mod math {
    use glam::Vec3;

    /// Offset applied along the surface normal when spawning secondary rays.
    pub const SURFACE_EPSILON: f32 = 1e-3;

    pub fn degree_to_radian(degree: f32) -> f32 {
        degree * std::f32::consts::PI / 180.0
    }

    /// Mirror reflection of `incident` about `normal`.
    pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
        incident - normal * 2.0 * incident.dot(normal)
    }

    /// Snell's law refraction through a surface with the given refractive index.
    ///
    /// The outside medium is assumed to be air (index 1). When the incident ray
    /// comes from inside the object the indices are swapped and the normal is
    /// flipped. Returns [`Vec3::ZERO`] on total internal reflection.
    pub fn refract(incident: Vec3, normal: Vec3, refractive_index: f32) -> Vec3 {
        let mut cos_i = -incident.dot(normal).clamp(-1.0, 1.0);
        let (mut eta_i, mut eta_t) = (1.0, refractive_index);
        let mut n = normal;
        if cos_i < 0.0 {
            cos_i = -cos_i;
            std::mem::swap(&mut eta_i, &mut eta_t);
            n = -normal;
        }
        let eta = eta_i / eta_t;
        let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
        if k < 0.0 {
            Vec3::ZERO
        } else {
            incident * eta + n * (eta * cos_i - k.sqrt())
        }
    }

    /// Moves `point` off the surface on the side that `direction` leaves through.
    pub fn offset_origin(point: Vec3, direction: Vec3, normal: Vec3) -> Vec3 {
        if direction.dot(normal) < 0.0 {
            point - normal * SURFACE_EPSILON
        } else {
            point + normal * SURFACE_EPSILON
        }
    }

}
