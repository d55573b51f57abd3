use nalgebra as na;
use serde::Serialize;
use smpl_utils::vector::Vector2f;

/// Half-line starting at `origin`, `direction` is unit length
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Ray {
    pub origin: na::Point3<f32>,
    pub direction: na::Unit<na::Vector3<f32>>,
}
impl Ray {
    pub fn new(origin: na::Point3<f32>, direction: na::Vector3<f32>) -> Self {
        Self {
            origin,
            direction: na::Unit::new_normalize(direction),
        }
    }
    /// Point at distance `t` from the origin
    pub fn point_at(&self, t: f32) -> na::Point3<f32> {
        self.origin + self.direction.into_inner() * t
    }
}

/// The camera the aligned scene is viewed through
pub trait ViewingCamera {
    /// Vertical field of view in degrees
    fn field_of_view(&self) -> f32;
    fn set_field_of_view(&mut self, fov_y_deg: f32);
    /// Width over height
    fn aspect(&self) -> f32;
    fn set_aspect(&mut self, aspect: f32);
    fn position(&self) -> na::Point3<f32>;
    fn forward(&self) -> na::Unit<na::Vector3<f32>>;
    fn orientation(&self) -> na::UnitQuaternion<f32>;
    /// Ray from the camera through a viewport point, where (0,0) is the
    /// bottom-left and (1,1) the top-right of the visible frame
    fn viewport_point_to_ray(&self, viewport: &Vector2f) -> Ray;
}

/// Ideal perspective camera. In its own frame x points right, y up and the
/// view direction is +z.
#[derive(Clone, Debug, PartialEq)]
pub struct PinholeCamera {
    pub position: na::Point3<f32>,
    pub orientation: na::UnitQuaternion<f32>,
    pub fov_y_deg: f32,
    pub aspect: f32,
}
impl Default for PinholeCamera {
    fn default() -> Self {
        Self {
            position: na::Point3::origin(),
            orientation: na::UnitQuaternion::identity(),
            fov_y_deg: 60.0,
            aspect: 1.0,
        }
    }
}

impl ViewingCamera for PinholeCamera {
    fn field_of_view(&self) -> f32 {
        self.fov_y_deg
    }
    fn set_field_of_view(&mut self, fov_y_deg: f32) {
        self.fov_y_deg = fov_y_deg;
    }
    fn aspect(&self) -> f32 {
        self.aspect
    }
    fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }
    fn position(&self) -> na::Point3<f32> {
        self.position
    }
    fn forward(&self) -> na::Unit<na::Vector3<f32>> {
        self.orientation * na::Vector3::z_axis()
    }
    fn orientation(&self) -> na::UnitQuaternion<f32> {
        self.orientation
    }
    fn viewport_point_to_ray(&self, viewport: &Vector2f) -> Ray {
        let tan_half = (0.5 * self.fov_y_deg.to_radians()).tan();
        let local = na::Vector3::new(
            (2.0 * viewport.x - 1.0) * tan_half * self.aspect,
            (2.0 * viewport.y - 1.0) * tan_half,
            1.0,
        );
        Ray::new(self.position, self.orientation * local)
    }
}
