use na::{Point3, Vector2, Vector3};
extern crate nalgebra as na;
pub type Vector2f = Vector2<f32>;
pub type Vector3f = Vector3<f32>;
pub type Point3f = Point3<f32>;
pub fn vec2_from_slice(v: &[f32]) -> Option<Vector2f> {
    match v {
        [x, y, ..] => Some(Vector2f::new(*x, *y)),
        _ => None,
    }
}
pub fn vec3_from_slice(v: &[f32]) -> Option<Vector3f> {
    match v {
        [x, y, z, ..] => Some(Vector3f::new(*x, *y, *z)),
        _ => None,
    }
}
pub fn p3f_from_v3f(v: &Vector3f) -> Point3f {
    Point3f::new(v.x, v.y, v.z)
}
pub fn is_finite_v3f(v: &Vector3f) -> bool {
    v.iter().all(|x| x.is_finite())
}
