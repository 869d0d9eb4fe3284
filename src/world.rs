use crate::ray::Ray3D;
use crate::tuple::Tuple3D;
use crate::color::Color;
use crate::scene::Scene;
use crate::light::{ PointLight, phong };
use crate::intersect::{ Hit, find_nearest };
use crate::config::ShadingMode;
use crate::consts::{ REFLECTION_OFFSET, REFLECTION_WEIGHT };

/// A scene lit by one light, as seen during a single frame.
///
/// Worlds are cheap, immutable views: the scene is borrowed and the light is
/// copied out of the frame configuration. Everything here is a pure function
/// of the world and its arguments, so a `World` can be shared across threads.
#[derive(Copy, Clone, Debug)]
pub struct World<'a> {
    pub scene: &'a Scene,
    pub light: PointLight,
}

/// One step of a mirror bounce chain.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounce {
    /// The sphere the bounce ray hit.
    pub index: usize,

    /// Where the bounce ray hit it.
    pub point: Tuple3D,

    /// The bounce ray itself. Its origin is the eye for shading `point`.
    pub ray: Ray3D,
}

/// A lazy chain of mirror bounces starting at a primary hit.
///
/// Yields at most `remaining` bounces and stops for good as soon as a bounce
/// ray leaves the scene.
#[derive(Clone, Debug)]
pub struct Bounces<'w, 'a> {
    world: &'w World<'a>,
    index: usize,
    point: Tuple3D,
    incoming: Ray3D,
    remaining: usize,
}

impl<'w, 'a> Iterator for Bounces<'w, 'a> {
    type Item = Bounce;

    fn next(&mut self) -> Option<Bounce> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let spheres = self.world.scene.spheres();
        let normalv = spheres[self.index].normal_at(self.point);
        let direction = self.incoming.direction.reflect(&normalv).normalize();

        // Start slightly off the surface so the ray doesn't hit it again
        let origin = self.point + direction * REFLECTION_OFFSET;
        let ray = Ray3D::from_unit(origin, direction);

        match find_nearest(spheres, &ray) {
            None => {
                self.remaining = 0;
                None
            },
            Some(hit) => {
                self.index = hit.index;
                self.point = ray.position(hit.t);
                self.incoming = ray;

                Some(Bounce { index: hit.index, point: self.point, ray })
            },
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl<'a> World<'a> {
    pub fn new(scene: &'a Scene, light: PointLight) -> World<'a> {
        World { scene, light }
    }

    /// Determines whether a point is shadowed.
    ///
    /// A ray is cast from `point` toward the light and tested against every
    /// sphere except the ground. Any intersection at all counts, including
    /// one behind `point` or beyond the light.
    pub fn is_shadowed(&self, point: Tuple3D) -> bool {
        let direction = (self.light.position - point).normalize();
        let ray = Ray3D::from_unit(point, direction);

        self.scene.casters().any(|s| s.intersect(&ray).is_some())
    }

    /// Follows mirror reflections from a primary hit.
    ///
    /// `ray` is the ray that produced `hit`.
    pub fn bounces<'w>(&'w self, hit: Hit, ray: Ray3D, bounce_limit: usize)
        -> Bounces<'w, 'a> {
        Bounces {
            world: self,
            index: hit.index,
            point: ray.position(hit.t),
            incoming: ray,
            remaining: bounce_limit,
        }
    }

    /// Determines the color seen along a primary ray.
    ///
    /// Misses are black. A hit is Phong shaded; in reflection modes each
    /// bounce adds half of its own Phong color. In shadow modes a shadowed
    /// ground hit is replaced outright by the light's shadow color.
    pub fn color_at(&self, ray: Ray3D, mode: ShadingMode, bounce_limit: usize)
        -> Color {
        let spheres = self.scene.spheres();
        let hit = match find_nearest(spheres, &ray) {
            None => return Color::black(),
            Some(hit) => hit,
        };

        let point = ray.position(hit.t);
        let mut color = phong(point, hit.sphere(spheres), &self.light, &ray);

        if mode.reflections() {
            for bounce in self.bounces(hit, ray, bounce_limit) {
                color += REFLECTION_WEIGHT * phong(bounce.point,
                    &spheres[bounce.index], &self.light, &bounce.ray);
            }
        }

        if mode.shadows() && self.scene.is_ground(hit.index)
            && self.is_shadowed(point) {
            return self.light.shadow;
        }

        color
    }
}

#[cfg(test)]
use crate::sphere::Sphere;

/// Two facing mirrors on the z axis with the eye between them.
#[cfg(test)]
fn corridor() -> Scene {
    let white = Color::white();
    Scene::new(
        vec![
            Sphere::new(Tuple3D::new(0.0, 0.0, 3.0), 1.0, white, 10.0),
            Sphere::new(Tuple3D::new(0.0, 0.0, -3.0), 1.0, white, 10.0),
        ],
        Tuple3D::new(0.0, 0.0, 0.0),
        None,
    ).unwrap()
}

/// A big ground sphere whose top is the origin, with a caster above it.
#[cfg(test)]
fn table(caster_center: Tuple3D) -> Scene {
    Scene::new(
        vec![
            Sphere::new(caster_center, 1.0, Color::rgb(1.0, 0.0, 0.0), 20.0),
            Sphere::new(Tuple3D::new(0.0, -10.0, 0.0), 10.0,
                Color::rgb(0.4, 0.4, 0.4), crate::consts::MATTE_SPECULAR),
        ],
        Tuple3D::new(0.0, 5.0, 0.0),
        Some(1),
    ).unwrap()
}

#[cfg(test)]
fn straight_down() -> Ray3D {
    Ray3D::new(Tuple3D::new(0.0, 5.0, 0.0), Tuple3D::new(0.0, -1.0, 0.0))
        .unwrap()
}

#[test]
fn color_ray_miss() {
    let scene = Scene::default();
    let w = World::new(&scene, PointLight::default());
    let r = Ray3D::new(
        Tuple3D::new(0.0, 0.0, 1.0),
        Tuple3D::new(0.0, 1.0, 0.0),
    ).unwrap();

    for mode in &[ShadingMode::Phong, ShadingMode::PhongShadowReflection] {
        assert_eq!(w.color_at(r, *mode, 5), Color::black());
    }
}

#[test]
fn bounces_stop_at_limit() {
    let scene = corridor();
    let w = World::new(&scene, PointLight::default());
    let r = Ray3D::new(Tuple3D::default(), Tuple3D::new(0.0, 0.0, -1.0))
        .unwrap();
    let hit = find_nearest(scene.spheres(), &r).unwrap();

    let chain: Vec<Bounce> = w.bounces(hit, r, 5).collect();
    let indices: Vec<usize> = chain.iter().map(|b| b.index).collect();
    assert_eq!(indices, vec![0, 1, 0, 1, 0]);
    assert_eq!(chain[0].point, Tuple3D::new(0.0, 0.0, 2.0));
    assert_eq!(chain[1].point, Tuple3D::new(0.0, 0.0, -2.0));
}

#[test]
fn bounces_stop_when_ray_escapes() {
    let scene = table(Tuple3D::new(5.0, 5.0, 5.0));
    let w = World::new(&scene, PointLight::default());
    let r = straight_down();
    let hit = find_nearest(scene.spheres(), &r).unwrap();

    // Straight back up, past the caster and out of the scene.
    let mut chain = w.bounces(hit, r, 10);
    assert_eq!(chain.next(), None);
    assert_eq!(chain.next(), None);
}

#[test]
fn zero_bounce_limit_is_plain_phong() {
    let scene = corridor();
    let w = World::new(&scene, PointLight::default());
    let r = Ray3D::new(Tuple3D::default(), Tuple3D::new(0.0, 0.0, -1.0))
        .unwrap();

    let plain = w.color_at(r, ShadingMode::Phong, 0);
    let reflected = w.color_at(r, ShadingMode::PhongReflection, 0);
    assert_eq!(plain.r.to_bits(), reflected.r.to_bits());
    assert_eq!(plain.g.to_bits(), reflected.g.to_bits());
    assert_eq!(plain.b.to_bits(), reflected.b.to_bits());

    let hit = find_nearest(scene.spheres(), &r).unwrap();
    assert_eq!(w.bounces(hit, r, 0).count(), 0);
}

#[test]
fn reflection_adds_half_of_each_bounce() {
    let scene = corridor();
    let w = World::new(&scene, PointLight::default());
    let r = Ray3D::new(Tuple3D::default(), Tuple3D::new(0.0, 0.0, -1.0))
        .unwrap();
    let hit = find_nearest(scene.spheres(), &r).unwrap();

    let mut expected = w.color_at(r, ShadingMode::Phong, 0);
    for b in w.bounces(hit, r, 2) {
        expected += 0.5 * phong(b.point, &scene.spheres()[b.index],
            &w.light, &b.ray);
    }

    assert_eq!(w.color_at(r, ShadingMode::PhongReflection, 2), expected);
    assert!(w.color_at(r, ShadingMode::PhongReflection, 2)
        != w.color_at(r, ShadingMode::Phong, 2));
}

#[test]
fn escaped_reflection_adds_nothing() {
    let scene = table(Tuple3D::new(5.0, 5.0, 5.0));
    let w = World::new(&scene, PointLight::new(Tuple3D::new(0.0, 10.0, 0.0)));

    assert_eq!(w.color_at(straight_down(), ShadingMode::PhongReflection, 3),
        w.color_at(straight_down(), ShadingMode::Phong, 3));
}

#[test]
fn shadowed_ground_gets_shadow_color() {
    let scene = table(Tuple3D::new(0.0, 3.0, 3.0));
    let light = PointLight::new(Tuple3D::new(0.0, 10.0, 10.0));
    let w = World::new(&scene, light);

    // Looking at the ground origin from the side so the caster isn't in view.
    let r = Ray3D::new(Tuple3D::new(5.0, 5.0, 0.0),
        Tuple3D::new(-1.0, -1.0, 0.0)).unwrap();
    assert_eq!(find_nearest(scene.spheres(), &r).unwrap().index, 1);

    assert!(w.is_shadowed(Tuple3D::new(0.0, 0.0, 0.0)));
    assert_eq!(w.color_at(r, ShadingMode::PhongShadow, 1), light.shadow);
    assert_eq!(w.color_at(r, ShadingMode::PhongShadowReflection, 1),
        light.shadow);
    assert!(w.color_at(r, ShadingMode::Phong, 1) != light.shadow);
}

#[test]
fn unobstructed_ground_is_lit() {
    let scene = table(Tuple3D::new(0.0, 3.0, -3.0));
    let w = World::new(&scene, PointLight::new(Tuple3D::new(0.0, 10.0, 10.0)));

    assert!(!w.is_shadowed(Tuple3D::new(0.0, 0.0, 0.0)));
    assert_eq!(w.color_at(straight_down(), ShadingMode::PhongShadow, 1),
        w.color_at(straight_down(), ShadingMode::Phong, 1));
}

#[test]
fn occluder_behind_point_still_shadows() {
    // The caster is buried under the ground point, on the far side of the
    // shadow ray's origin. It still counts.
    let scene = table(Tuple3D::new(0.0, -5.0, 0.0));
    let light = PointLight::new(Tuple3D::new(0.0, 10.0, 0.0));
    let w = World::new(&scene, light);

    assert!(w.is_shadowed(Tuple3D::new(0.0, 0.0, 0.0)));
    assert_eq!(w.color_at(straight_down(), ShadingMode::PhongShadow, 0),
        light.shadow);
}

#[test]
fn shadow_never_applies_to_casters() {
    // Seen from the front of sphere 0, the light is blocked by sphere 1.
    // Casters are never shadow tested, so the front stays Phong shaded.
    let white = Color::white();
    let scene = Scene::new(
        vec![
            Sphere::new(Tuple3D::new(0.0, 0.0, 0.0), 1.0, white, 10.0),
            Sphere::new(Tuple3D::new(0.0, 3.0, 0.0), 1.0, white, 10.0),
            Sphere::new(Tuple3D::new(0.0, -20.0, 0.0), 5.0, white, 10.0),
        ],
        Tuple3D::new(0.0, 0.0, 5.0),
        Some(2),
    ).unwrap();
    let light = PointLight::new(Tuple3D::new(0.0, 10.0, 0.5));
    let w = World::new(&scene, light);

    let r = Ray3D::new(Tuple3D::new(0.0, 0.0, 5.0),
        Tuple3D::new(0.0, 0.0, -1.0)).unwrap();
    assert_eq!(find_nearest(scene.spheres(), &r).unwrap().index, 0);
    assert!(w.is_shadowed(Tuple3D::new(0.0, 0.0, 1.0)));

    assert_eq!(w.color_at(r, ShadingMode::PhongShadow, 0),
        w.color_at(r, ShadingMode::Phong, 0));
}
