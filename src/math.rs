use nalgebra::{Unit, Vector3};

/// Mirror `lightv` about `normal`: `2 (n · l) n - l`.
///
/// `lightv` points from the surface towards the light. The result is not re-normalized.
pub fn mirror(lightv: &Unit<Vector3<f32>>, normal: &Unit<Vector3<f32>>) -> Vector3<f32> {
    normal.as_ref() * (2. * normal.dot(lightv.as_ref())) - lightv.as_ref()
}
