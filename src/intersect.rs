use crate::ray::Ray3D;
use crate::sphere::Sphere;

/// The nearest forward intersection of a ray with a scene.
///
/// `index` refers into the sphere slice that was searched, and `t` is always
/// strictly positive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub t: f64,
}

impl Hit {
    /// The sphere this hit refers to.
    pub fn sphere<'a>(&self, spheres: &'a [Sphere]) -> &'a Sphere {
        &spheres[self.index]
    }
}

/// Finds the sphere a ray hits first.
///
/// Misses (including a root at the sentinel distance) and roots behind the
/// ray origin are skipped. Among the rest the smallest `t` wins; on an exact
/// tie the lower index wins. Returns `None` if nothing is hit in front of the
/// ray.
pub fn find_nearest(spheres: &[Sphere], ray: &Ray3D) -> Option<Hit> {
    let mut nearest: Option<Hit> = None;

    for (index, sphere) in spheres.iter().enumerate() {
        let t = match sphere.intersect(ray) {
            Some(t) if t > 0.0 => t,
            _ => continue,
        };

        // Strictly closer only, so earlier spheres win ties
        if nearest.map_or(true, |hit| t < hit.t) {
            nearest = Some(Hit { index, t });
        }
    }

    nearest
}

#[cfg(test)]
use crate::tuple::Tuple3D;
#[cfg(test)]
use crate::color::Color;

#[cfg(test)]
fn sphere_at(z: f64, radius: f64) -> Sphere {
    Sphere::new(Tuple3D::new(0.0, 0.0, z), radius, Color::white(), 10.0)
}

#[cfg(test)]
fn looking_down_z() -> Ray3D {
    Ray3D::new(Tuple3D::new(0.0, 0.0, 0.0), Tuple3D::new(0.0, 0.0, -1.0))
        .unwrap()
}

#[test]
fn nearest_of_several() {
    let spheres = vec![
        sphere_at(-10.0, 1.0),
        sphere_at(-4.0, 1.0),
        sphere_at(-7.0, 1.0),
    ];

    let hit = find_nearest(&spheres, &looking_down_z()).unwrap();
    assert_eq!(hit.index, 1);
    assert!(crate::feq(hit.t, 3.0));
}

#[test]
fn nothing_hit() {
    let spheres = vec![sphere_at(10.0, 1.0)];

    assert_eq!(find_nearest(&spheres, &looking_down_z()), None);
    assert_eq!(find_nearest(&[], &looking_down_z()), None);
}

#[test]
fn origin_inside_sphere_is_skipped() {
    // The nearer root of the enclosing sphere is behind the origin.
    let spheres = vec![sphere_at(0.0, 2.0), sphere_at(-5.0, 1.0)];

    let hit = find_nearest(&spheres, &looking_down_z()).unwrap();
    assert_eq!(hit.index, 1);
}

#[test]
fn exact_tie_keeps_first_index() {
    let spheres = vec![sphere_at(-4.0, 1.0), sphere_at(-4.0, 1.0)];

    let hit = find_nearest(&spheres, &looking_down_z()).unwrap();
    assert_eq!(hit.index, 0);
}

#[test]
fn nearest_is_always_in_front() {
    let spheres = vec![
        sphere_at(3.0, 1.0),
        sphere_at(0.0, 0.5),
        sphere_at(-3.0, 1.0),
    ];

    let ray = looking_down_z();
    let hit = find_nearest(&spheres, &ray).unwrap();
    assert!(hit.t > 0.0);
    assert_eq!(hit.index, 2);
    assert_eq!(hit.sphere(&spheres).center, Tuple3D::new(0.0, 0.0, -3.0));
}

#[test]
fn distant_spheres_have_no_cutoff() {
    let spheres = vec![sphere_at(-200_000.0, 1.0)];

    let hit = find_nearest(&spheres, &looking_down_z()).unwrap();
    assert_eq!(hit.index, 0);
    assert!(crate::feq(hit.t, 199_999.0));
}
