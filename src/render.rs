use std::time::Instant;

use crossbeam::thread;
use log::debug;
use nalgebra::{Point3, Unit};

use crate::{
    canvas::{Canvas, Color},
    lighting,
    material::Material,
    scene::SceneConfig,
};

/// Shade the sphere at the pixel offset `(dx, dy)` from its center.
///
/// Returns `None` when the offset lies outside the sphere's silhouette. Inside it the visible
/// hemisphere is reconstructed from `x² + y² + z² = r²`, taking the positive root.
pub fn shade(scene: &SceneConfig, material: &Material, dx: i32, dy: i32) -> Option<Color> {
    let (r, dx, dy) = (scene.radius as i64, dx as i64, dy as i64);
    let z_squared = r * r - dx * dx - dy * dy;
    if z_squared < 0 {
        return None;
    }

    let point = Point3::new(dx as f32, dy as f32, (z_squared as f32).sqrt());

    // The sphere is centered at the origin, so the outward normal is the normalized position.
    let normal = Unit::new_normalize(point.coords);

    let intensity = lighting::phong(scene, material, &point, &normal, &scene.view);
    Some(material.color.scale(intensity))
}

/// Rasterizes the sphere for a fixed [`SceneConfig`].
#[derive(Debug, Clone)]
pub struct Renderer {
    scene: SceneConfig,
    jobs: usize,
}

impl Renderer {
    pub fn new(scene: SceneConfig) -> Self {
        Self { scene, jobs: 1 }
    }

    /// Split the canvas into `jobs` bands of rows, rendered concurrently.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = usize::max(jobs, 1);
        self
    }

    /// Allocate a canvas sized for the scene.
    pub fn new_canvas(&self) -> Canvas {
        Canvas::new(self.scene.width, self.scene.height)
    }

    /// Render `material` into a freshly allocated canvas.
    pub fn render(&self, material: &Material) -> Canvas {
        let mut canvas = self.new_canvas();
        self.render_into(material, &mut canvas);
        canvas
    }

    /// Overwrite every pixel of `canvas` with the sphere in `material` over the background.
    ///
    /// The canvas must have the dimensions of the scene.
    pub fn render_into(&self, material: &Material, canvas: &mut Canvas) {
        assert_eq!(
            (self.scene.width, self.scene.height),
            (canvas.width(), canvas.height()),
            "canvas does not match the scene dimensions"
        );

        let width = self.scene.width as usize;
        let height = self.scene.height as usize;
        if width == 0 || height == 0 {
            return;
        }

        let start = Instant::now();
        let scene = &self.scene;

        if self.jobs == 1 {
            render_rows(scene, material, 0, canvas.pixels_mut());
        } else {
            let band_rows = (height + self.jobs - 1) / self.jobs;
            let res = thread::scope(|s| {
                for (i, band) in canvas.pixels_mut().chunks_mut(band_rows * width).enumerate() {
                    s.spawn(move |_| render_rows(scene, material, i * band_rows, band));
                }
            });

            if let Err(panic) = res {
                std::panic::resume_unwind(panic);
            }
        }

        debug!(
            "rendered {} with {} job(s) in {:?}",
            material.name,
            self.jobs,
            start.elapsed()
        );
    }
}

/// Render the rows of the canvas that start at `first_row` into `band`.
fn render_rows(scene: &SceneConfig, material: &Material, first_row: usize, band: &mut [Color]) {
    band.fill(scene.background);

    let r = scene.radius as i64;
    let (cx, cy) = (scene.center.x as i64, scene.center.y as i64);

    // the columns of the canvas covered by the square around the silhouette
    let lo = (cx - r).max(0);
    let hi = (cx + r).min(scene.width as i64);

    for (i, row) in band.chunks_mut(scene.width as usize).enumerate() {
        let dy = (first_row + i) as i64 - cy;
        if dy < -r || dy >= r {
            continue;
        }

        // both offsets lie in [-r, r), so they fit the radius' type
        for x in lo..hi {
            if let Some(color) = shade(scene, material, (x - cx) as i32, dy as i32) {
                row[x as usize] = color;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{preset, PRESETS};

    fn small_scene() -> SceneConfig {
        SceneConfig::default()
            .with_size(64, 48)
            .with_radius(20)
            .with_background(Color::new(10, 20, 30))
    }

    /// Every pixel of the canvas with its offset from the sphere center.
    fn offsets(scene: &SceneConfig) -> impl Iterator<Item = (usize, usize, i32, i32)> + '_ {
        (0..scene.height as usize).flat_map(move |y| {
            (0..scene.width as usize).map(move |x| {
                (
                    x,
                    y,
                    x as i32 - scene.center.x,
                    y as i32 - scene.center.y,
                )
            })
        })
    }

    #[test]
    fn test_background_outside_silhouette() {
        let scene = small_scene();
        let r2 = scene.radius * scene.radius;
        let canvas = Renderer::new(scene.clone()).render(preset(0));
        for (x, y, dx, dy) in offsets(&scene) {
            if dx * dx + dy * dy > r2 {
                assert_eq!(&scene.background, canvas.get(x, y), "({}, {})", dx, dy);
            }
        }
    }

    #[test]
    fn test_interior_matches_scaled_base_color() {
        let scene = small_scene();
        let r = scene.radius;
        let m = preset(3);
        let canvas = Renderer::new(scene.clone()).render(m);
        for (x, y, dx, dy) in offsets(&scene) {
            // the square iterated is half-open, so its last row and column stay background
            if dx * dx + dy * dy <= r * r && dx < r && dy < r {
                let z = ((r * r - dx * dx - dy * dy) as f32).sqrt();
                let point = Point3::new(dx as f32, dy as f32, z);
                let normal = Unit::new_normalize(point.coords);
                let intensity = lighting::phong(&scene, m, &point, &normal, &scene.view);
                assert_eq!(&m.color.scale(intensity), canvas.get(x, y));
            }
        }
    }

    #[test]
    fn test_silhouette_edge() {
        let scene = SceneConfig::default();
        let m = preset(2);

        // dx² + dy² = r² exactly, so z = 0
        assert!(shade(&scene, m, -200, 0).is_some());
        assert!(shade(&scene, m, -120, -160).is_some());

        // dx² + dy² = r² + 1
        assert!(shade(&scene, m, -200, 1).is_none());
        assert!(shade(&scene, m, 1, -200).is_none());
    }

    #[test]
    fn test_red_plastic_apex_saturates() {
        let scene = SceneConfig::default();
        let color = shade(&scene, preset(2), 0, 0).expect("apex is inside the sphere");
        assert_eq!(255, color.r);
    }

    #[test]
    fn test_material_change() {
        let scene = small_scene();
        let r2 = scene.radius * scene.radius;
        let renderer = Renderer::new(scene.clone());
        let canvases: Vec<_> = PRESETS.iter().map(|m| renderer.render(m)).collect();

        for (i, a) in canvases.iter().enumerate() {
            for b in &canvases[i + 1..] {
                let mut interior_differs = false;
                for (x, y, dx, dy) in offsets(&scene) {
                    if dx * dx + dy * dy > r2 {
                        assert_eq!(a.get(x, y), b.get(x, y));
                    } else if a.get(x, y) != b.get(x, y) {
                        interior_differs = true;
                    }
                }
                assert!(interior_differs);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let renderer = Renderer::new(small_scene());
        let a = renderer.render(preset(4));
        let b = renderer.render(preset(4));
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn test_parallel_matches_serial() {
        let scene = small_scene();
        let serial = Renderer::new(scene.clone()).render(preset(1));
        for jobs in [2, 3, 7, 100] {
            let parallel = Renderer::new(scene.clone()).with_jobs(jobs).render(preset(1));
            assert_eq!(serial, parallel, "jobs = {}", jobs);
        }
    }

    #[test]
    fn test_render_into_overwrites() {
        let renderer = Renderer::new(small_scene());
        let mut canvas = renderer.new_canvas();
        canvas.fill(Color::new(1, 2, 3));
        renderer.render_into(preset(0), &mut canvas);
        assert_eq!(renderer.render(preset(0)), canvas);
    }

    #[test]
    fn test_sphere_clipped_by_canvas() {
        // A sphere larger than the canvas still renders, clipped at the edges.
        let scene = SceneConfig::default().with_size(16, 16).with_radius(40);
        let canvas = Renderer::new(scene.clone()).with_jobs(4).render(preset(0));
        assert!(canvas.pixels().iter().all(|c| *c != scene.background));
    }

    #[test]
    fn test_radius_beyond_i32_square() {
        // r² no longer fits in an i32 once the radius passes 46340.
        let scene = SceneConfig::default().with_size(4, 4).with_radius(50_000);
        let canvas = Renderer::new(scene.clone()).render(preset(0));
        assert!(canvas.pixels().iter().all(|c| *c != scene.background));

        let scene = SceneConfig::default().with_radius(i32::MAX);
        let m = preset(0);
        assert!(shade(&scene, m, 0, 0).is_some());
        assert!(shade(&scene, m, -i32::MAX, 0).is_some());
        assert!(shade(&scene, m, -i32::MAX, 1).is_none());
        assert!(shade(&scene, m, i32::MIN, i32::MIN).is_none());
    }

    #[test]
    #[should_panic(expected = "canvas does not match")]
    fn test_render_into_wrong_size() {
        let renderer = Renderer::new(small_scene());
        let mut canvas = Canvas::new(1, 1);
        renderer.render_into(preset(0), &mut canvas);
    }
}
