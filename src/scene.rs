use nalgebra::{Point2, Point3, Unit, Vector3};

use crate::canvas::Color;

/// The fixed parameters of the scene: canvas, sphere placement, light and global intensities.
///
/// Every render reads from a [`SceneConfig`] and none of them mutate it. The `with_*` methods
/// return a modified copy, for tests and command line overrides.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// The width in pixels of the canvas.
    pub width: u32,

    /// The height in pixels of the canvas.
    pub height: u32,

    /// The radius in pixels of the sphere.
    pub radius: i32,

    /// The pixel that the sphere center projects to.
    pub center: Point2<i32>,

    /// The position of the point light, relative to the sphere center.
    pub light: Point3<f32>,

    /// The direction towards the viewer, the same for every pixel.
    pub view: Unit<Vector3<f32>>,

    pub ambient_intensity: f32,
    pub diffuse_intensity: f32,
    pub specular_intensity: f32,

    /// The color of every pixel outside the sphere.
    pub background: Color,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let (width, height) = (800, 600);
        Self {
            width,
            height,
            radius: 200,
            center: Point2::new((width / 2) as i32, (height / 2) as i32),
            light: Point3::new(-600., -600., 1000.),
            view: Unit::new_unchecked(Vector3::new(0., 0., 1.)),
            ambient_intensity: 0.75,
            diffuse_intensity: 3.5,
            specular_intensity: 1.5,
            background: Color::black(),
        }
    }
}

impl SceneConfig {
    /// Resize the canvas, keeping the sphere centered.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        // half of any u32 fits in an i32
        self.center = Point2::new((width / 2) as i32, (height / 2) as i32);
        self
    }

    pub fn with_radius(mut self, radius: i32) -> Self {
        assert!(radius > 0, "sphere radius must be positive");
        self.radius = radius;
        self
    }

    pub fn with_light(mut self, light: Point3<f32>) -> Self {
        self.light = light;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }
}

#[test]
fn test_default_centers_sphere() {
    let scene = SceneConfig::default();
    assert_eq!(Point2::new(400, 300), scene.center);
    assert_eq!(200, scene.radius);
    assert_eq!(Vector3::new(0., 0., 1.), scene.view.into_inner());
}

#[test]
fn test_with_size_recenters() {
    let scene = SceneConfig::default().with_size(64, 32).with_radius(10);
    assert_eq!(Point2::new(32, 16), scene.center);
    assert_eq!(10, scene.radius);
}

#[test]
fn test_with_size_center_stays_positive() {
    let scene = SceneConfig::default().with_size(u32::MAX, u32::MAX - 1);
    assert_eq!(Point2::new(i32::MAX, i32::MAX - 1), scene.center);
}
