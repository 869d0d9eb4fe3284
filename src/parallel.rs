use std::time::Instant;

use log::{ debug, info };
use rayon::prelude::*;

use crate::world::World;
use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::scene::Scene;
use crate::light::PointLight;
use crate::config::{ Controls, FrameConfig };
use crate::error::Result;

/// Renders a frame on a fixed number of worker threads.
///
/// Rows are handed out to the workers; every pixel is computed independently
/// and written only by the worker that owns its row.
pub fn parallel_render(world: &World, camera: &Camera, config: &FrameConfig,
    num_threads: usize) -> Result<Canvas> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()?;

    let mut canvas = Canvas::new(camera.hsize, camera.vsize);
    pool.install(|| {
        canvas.par_rows_mut().for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = camera.color_at_pixel(world, config, x, y);
            }
        });
    });

    Ok(canvas)
}

/// Renders one frame of `scene` with the given parameters.
pub fn render_frame(scene: &Scene, config: FrameConfig, num_threads: usize)
    -> Result<Canvas> {
    config.validate()?;
    debug!("Frame parameters: {:?}", config);

    let world = World::new(scene, PointLight::new(config.light_position));
    let camera = Camera::for_frame(&config, scene.camera());

    info!("Rendering {}x{} using {} threads...",
        config.width, config.height, num_threads);
    let start = Instant::now();
    let canvas = parallel_render(&world, &camera, &config, num_threads)?;
    info!("...done in {:.2?}.", start.elapsed());

    Ok(canvas)
}

/// Renders one frame from the current state of shared controls.
///
/// The controls are read exactly once, before any pixel is traced; changes
/// made while the frame renders apply to the next frame.
pub fn render_controlled(scene: &Scene, controls: &Controls,
    num_threads: usize) -> Result<Canvas> {
    render_frame(scene, controls.snapshot(), num_threads)
}

#[cfg(test)]
use crate::color::Color;
#[cfg(test)]
use crate::config::ShadingMode;

#[cfg(test)]
fn small_frame(mode: ShadingMode, bounce_limit: usize) -> FrameConfig {
    FrameConfig {
        width: 40,
        height: 40,
        shading_mode: mode,
        bounce_limit,
        ..Default::default()
    }
}

#[cfg(test)]
fn same_bits(a: &Canvas, b: &Canvas) -> bool {
    a.pixels().len() == b.pixels().len()
        && a.pixels().iter().zip(b.pixels()).all(|(p, q)| {
            p.r.to_bits() == q.r.to_bits()
                && p.g.to_bits() == q.g.to_bits()
                && p.b.to_bits() == q.b.to_bits()
        })
}

#[test]
fn parallel_matches_sequential() {
    let scene = Scene::default();
    let config = small_frame(ShadingMode::PhongShadowReflection, 3);
    let world = World::new(&scene, PointLight::new(config.light_position));
    let camera = Camera::for_frame(&config, scene.camera());

    let sequential = camera.render(&world, &config);
    let parallel = parallel_render(&world, &camera, &config, 3).unwrap();

    assert!(same_bits(&sequential, &parallel));
}

#[test]
fn renders_are_reproducible() {
    let scene = Scene::default();

    for code in 0..4i64 {
        let mode = <ShadingMode as std::convert::TryFrom<i64>>::try_from(code)
            .unwrap();
        let first = render_frame(&scene, small_frame(mode, 2), 2).unwrap();
        let second = render_frame(&scene, small_frame(mode, 2), 4).unwrap();

        assert!(same_bits(&first, &second));
    }
}

#[test]
fn zero_bounces_match_plain_phong() {
    let scene = Scene::default();

    let plain = render_frame(&scene,
        small_frame(ShadingMode::Phong, 0), 2).unwrap();
    let reflected = render_frame(&scene,
        small_frame(ShadingMode::PhongReflection, 0), 2).unwrap();

    assert!(same_bits(&plain, &reflected));
}

#[test]
fn shadow_only_touches_ground_pixels() {
    use crate::intersect::find_nearest;

    let scene = Scene::default();
    let config = small_frame(ShadingMode::PhongShadow, 1);
    let camera = Camera::for_frame(&config, scene.camera());

    let phong = render_frame(&scene,
        small_frame(ShadingMode::Phong, 1), 2).unwrap();
    let shadow = render_frame(&scene, config, 2).unwrap();
    let shadow_color = PointLight::default().shadow;

    let mut shadowed = 0;
    for y in 0..config.height {
        for x in 0..config.width {
            let p = phong.read_pixel(x, y).unwrap();
            let s = shadow.read_pixel(x, y).unwrap();
            let hit = find_nearest(scene.spheres(), &camera.ray_for_pixel(x, y));

            match hit {
                Some(h) if scene.is_ground(h.index) => {
                    if s != p {
                        assert_eq!(s, shadow_color);
                        shadowed += 1;
                    }
                },
                _ => assert_eq!(s, p),
            }
        }
    }

    assert!(shadowed > 0);
}

#[test]
fn overhead_light_shadows_ground_under_sphere() {
    use crate::tuple::Tuple3D;
    use crate::intersect::find_nearest;

    let scene = Scene::default();
    let light = PointLight::new(Tuple3D::new(0.3, 10.0, 0.5));
    let world = World::new(&scene, light);

    // Aim from the eye at the ground just below the blue sphere.
    let eye = scene.camera();
    let ray = crate::ray::Ray3D::new(eye,
        Tuple3D::new(0.3, -0.22, 0.5) - eye).unwrap();
    let hit = find_nearest(scene.spheres(), &ray).unwrap();
    assert_eq!(hit.index, Scene::DEFAULT_GROUND);

    let color = world.color_at(ray, ShadingMode::PhongShadow, 1);
    assert_eq!(color, Color::rgb(0.1, 0.1, 0.1));
    assert_eq!(color.to_rgba(), [0.1, 0.1, 0.1, 1.0]);
}

#[test]
fn controls_are_snapshotted_per_frame() {
    let scene = Scene::default();
    let controls = Controls::new(small_frame(ShadingMode::Phong, 1));

    let before = render_controlled(&scene, &controls, 2).unwrap();
    controls.move_light(30.0);
    let after = render_controlled(&scene, &controls, 2).unwrap();
    let expected = render_frame(&scene, controls.snapshot(), 2).unwrap();

    assert!(!same_bits(&before, &after));
    assert!(same_bits(&after, &expected));
}

#[test]
fn invalid_resolution_is_rejected() {
    let scene = Scene::default();
    let config = FrameConfig { height: 0, ..Default::default() };

    assert!(render_frame(&scene, config, 1).is_err());
}
