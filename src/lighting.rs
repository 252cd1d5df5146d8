use nalgebra::{Point3, Unit, Vector3};

use crate::{material::Material, math, scene::SceneConfig};

/// The Phong light intensity at `point`, for a surface with the given `normal` seen from `eyev`.
///
/// `point` is relative to the sphere center, in the same space as the scene's light. `normal`
/// and `eyev` must already be unit length. The result is not clamped; scaling it into the
/// displayable range is the caller's job.
pub fn phong(
    scene: &SceneConfig,
    material: &Material,
    point: &Point3<f32>,
    normal: &Unit<Vector3<f32>>,
    eyev: &Unit<Vector3<f32>>,
) -> f32 {
    // direction to the light
    let lightv = Unit::new_normalize(scene.light - point);

    let ambient = material.ambient * scene.ambient_intensity;

    let light_dot_normal = normal.dot(lightv.as_ref());
    let diffuse = material.diffuse * light_dot_normal.max(0.) * scene.diffuse_intensity;

    let reflectv = math::mirror(&lightv, normal);
    let reflect_dot_eye = reflectv.dot(eyev.as_ref()).max(0.);
    let specular =
        material.specular * reflect_dot_eye.powf(material.shininess) * scene.specular_intensity;

    ambient + diffuse + specular
}
