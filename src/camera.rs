use log::debug;

use crate::ray::Ray3D;
use crate::tuple::Tuple3D;
use crate::color::Color;
use crate::world::World;
use crate::canvas::Canvas;
use crate::config::FrameConfig;

/// A pinhole camera looking down -z.
///
/// Pixels map onto the square [-1, 1] x [-1, 1] on the plane one unit in
/// front of the eye. Each axis is scaled independently, so a non-square
/// resolution stretches the image rather than widening the view.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Camera {
    /// The horizontal size of the resultant canvas.
    pub hsize: usize,

    /// The vertical size of the resultant canvas.
    pub vsize: usize,

    /// The eye point every primary ray starts from.
    pub origin: Tuple3D,
}

impl Camera {
    pub fn new(hsize: usize, vsize: usize, origin: Tuple3D) -> Camera {
        Camera { hsize, vsize, origin }
    }

    /// Creates a camera sized for a frame.
    pub fn for_frame(config: &FrameConfig, origin: Tuple3D) -> Camera {
        Camera::new(config.width, config.height, origin)
    }

    /// Builds the primary ray through the center of a pixel.
    ///
    /// `px` counts columns from the left and `py` counts rows from the top.
    /// The screen position is measured from the bottom-left corner, like a
    /// fragment coordinate, so row 0 looks toward +y.
    ///
    /// # Panics
    ///
    /// Panics if `py` is not less than `vsize`. Columns past `hsize` are
    /// not checked; they map to directions beyond the screen edge.
    pub fn ray_for_pixel(&self, px: usize, py: usize) -> Ray3D {
        assert!(py < self.vsize, "row {} is outside a {}-row canvas",
            py, self.vsize);

        let frag_x = px as f64 + 0.5;
        let frag_y = (self.vsize - 1 - py) as f64 + 0.5;

        let screen_x = frag_x / self.hsize as f64;
        let screen_y = frag_y / self.vsize as f64;

        // z is fixed at -1, so the direction is never zero
        let direction = Tuple3D::new(
            screen_x * 2.0 - 1.0,
            screen_y * 2.0 - 1.0,
            -1.0,
        ).normalize();

        Ray3D::from_unit(self.origin, direction)
    }

    /// Computes the color of one pixel for a frame.
    pub fn color_at_pixel(&self, world: &World, config: &FrameConfig,
        px: usize, py: usize) -> Color {
        let ray = self.ray_for_pixel(px, py);
        world.color_at(ray, config.shading_mode, config.bounce_limit)
    }

    /// Renders a frame on the calling thread.
    pub fn render(&self, world: &World, config: &FrameConfig) -> Canvas {
        debug!("Rendering {}x{} sequentially with {:?}",
            self.hsize, self.vsize, config);
        let mut image = Canvas::new(self.hsize, self.vsize);

        for y in 0..self.vsize {
            for x in 0..self.hsize {
                let color = self.color_at_pixel(world, config, x, y);
                image.write_pixel(x, y, &color);
            }
        }

        image
    }
}

#[test]
fn ray_through_center() {
    let c = Camera::new(601, 601, Tuple3D::new(0.0, 0.0, 1.0));
    let r = c.ray_for_pixel(300, 300);

    assert_eq!(r.origin, Tuple3D::new(0.0, 0.0, 1.0));
    assert_eq!(r.direction, Tuple3D::new(0.0, 0.0, -1.0));
}

#[test]
fn ray_through_corners() {
    let c = Camera::new(2, 2, Tuple3D::default());
    let d = Tuple3D::new(0.5, 0.5, -1.0).normalize();

    // Top-left pixel of the canvas looks up and to the left.
    let r = c.ray_for_pixel(0, 0);
    assert_eq!(r.direction, Tuple3D::new(-d.x, d.y, d.z));

    // Bottom-right looks down and to the right.
    let r = c.ray_for_pixel(1, 1);
    assert_eq!(r.direction, Tuple3D::new(d.x, -d.y, d.z));
}

#[test]
fn non_square_canvas_scales_axes_independently() {
    let c = Camera::new(4, 2, Tuple3D::default());
    let r = c.ray_for_pixel(3, 0);

    // Fragment (3.5, 1.5) on a 4x2 screen maps to (0.75, 0.5).
    assert_eq!(r.direction, Tuple3D::new(0.75, 0.5, -1.0).normalize());
}

#[test]
fn render_default_world_center_is_ground() {
    use crate::scene::Scene;
    use crate::light::PointLight;
    use crate::intersect::find_nearest;

    let scene = Scene::default();
    let config = FrameConfig {
        width: 11,
        height: 11,
        ..Default::default()
    };
    let world = World::new(&scene, PointLight::new(config.light_position));
    let camera = Camera::for_frame(&config, scene.camera());

    let ray = camera.ray_for_pixel(5, 5);
    let hit = find_nearest(scene.spheres(), &ray).unwrap();
    assert_eq!(hit.index, 1);

    let image = camera.render(&world, &config);
    assert_eq!(image.read_pixel(5, 5).unwrap(),
        camera.color_at_pixel(&world, &config, 5, 5));

    // The top row looks over everything.
    assert_eq!(image.read_pixel(5, 0).unwrap(), Color::black());
}

#[test]
#[should_panic]
fn row_past_the_bottom_panics() {
    let c = Camera::new(2, 2, Tuple3D::default());
    c.ray_for_pixel(0, 2);
}
