use serde::{ Serialize, Deserialize };

use crate::tuple::Tuple3D;
use crate::color::Color;
use crate::ray::Ray3D;

/// A sphere with a flat Phong material.
///
/// `specular` is the Phong exponent. It is unbounded; very large values
/// (see `consts::MATTE_SPECULAR`) make the highlight vanish.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Tuple3D,
    pub radius: f64,
    pub color: Color,
    pub specular: f64,
}

impl Sphere {
    /// The distance the intersector has always reported for "no hit".
    ///
    /// A genuine root at exactly this distance is indistinguishable from a
    /// miss and is reported as one. `intersect` keeps that behavior but
    /// expresses it as `None`.
    pub const SENTINEL: f64 = 0.0;

    pub fn new(center: Tuple3D, radius: f64, color: Color, specular: f64)
        -> Sphere {
        Sphere { center, radius, color, specular }
    }

    /// Intersects a ray with this sphere.
    ///
    /// Solves `a*t^2 + b*t + c = 0` and returns the smaller root, which is
    /// negative when the sphere is behind the ray origin or the origin is
    /// inside the sphere. Callers decide whether such a hit counts.
    ///
    /// Returns `None` for a negative discriminant and for a root equal to
    /// `Sphere::SENTINEL`.
    ///
    /// ```
    /// # use sphere_tracer::{ tuple::Tuple3D, color::Color, ray::Ray3D,
    /// #     sphere::Sphere };
    /// let s = Sphere::new(Tuple3D::new(0.0, 0.0, -5.0), 1.0,
    ///     Color::white(), 10.0);
    /// let r = Ray3D::new(Tuple3D::default(), Tuple3D::new(0.0, 0.0, -1.0))
    ///     .unwrap();
    /// assert_eq!(s.intersect(&r), Some(4.0));
    /// ```
    pub fn intersect(&self, ray: &Ray3D) -> Option<f64> {
        let oc = ray.origin - self.center;

        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * ray.direction.dot(&oc);
        let c = oc.dot(&oc) - self.radius * self.radius;
        let delta = b * b - 4.0 * a * c;

        // Written so that a NaN discriminant is also a miss.
        if !(delta >= 0.0) {
            return None;
        }

        let t1 = (-b + delta.sqrt()) / (2.0 * a);
        let t2 = (-b - delta.sqrt()) / (2.0 * a);
        let t = t1.min(t2);

        if t == Sphere::SENTINEL {
            None
        } else {
            Some(t)
        }
    }

    /// The outward unit normal at a point on the surface.
    pub fn normal_at(&self, point: Tuple3D) -> Tuple3D {
        (point - self.center).normalize()
    }
}

#[cfg(test)]
fn unit_at(x: f64, y: f64, z: f64) -> Sphere {
    Sphere::new(Tuple3D::new(x, y, z), 1.0, Color::white(), 10.0)
}

#[test]
fn ray_hits_sphere_head_on() {
    let s = unit_at(0.0, 0.0, 0.0);
    let r = Ray3D::new(
        Tuple3D::new(0.0, 0.0, -5.0),
        Tuple3D::new(0.0, 0.0, 1.0),
    ).unwrap();

    assert_eq!(s.intersect(&r), Some(4.0));
}

#[test]
fn ray_tangent_to_sphere() {
    let s = unit_at(0.0, 0.0, 0.0);
    let r = Ray3D::new(
        Tuple3D::new(0.0, 1.0, -5.0),
        Tuple3D::new(0.0, 0.0, 1.0),
    ).unwrap();

    assert_eq!(s.intersect(&r), Some(5.0));
}

#[test]
fn ray_misses_sphere() {
    let s = unit_at(0.0, 0.0, 0.0);
    let r = Ray3D::new(
        Tuple3D::new(0.0, 2.0, -5.0),
        Tuple3D::new(0.0, 0.0, 1.0),
    ).unwrap();

    assert_eq!(s.intersect(&r), None);
}

#[test]
fn ray_from_center_reports_radius() {
    let s = Sphere::new(Tuple3D::new(1.0, 2.0, 3.0), 2.5, Color::white(), 1.0);
    let r = Ray3D::new(
        Tuple3D::new(1.0, 2.0, 3.0),
        Tuple3D::new(0.3, -0.2, 0.9),
    ).unwrap();

    // The nearer root lies behind the origin, one radius away.
    let t = s.intersect(&r).unwrap();
    assert!(crate::feq(t, -2.5));
    assert!(crate::feq(t.abs(), s.radius));
}

#[test]
fn sphere_behind_ray_gives_negative_distance() {
    let s = unit_at(0.0, 0.0, 0.0);
    let r = Ray3D::new(
        Tuple3D::new(0.0, 0.0, 5.0),
        Tuple3D::new(0.0, 0.0, 1.0),
    ).unwrap();

    assert_eq!(s.intersect(&r), Some(-6.0));
}

#[test]
fn root_at_origin_is_reported_as_miss() {
    // The ray starts on the surface and points inward, so the roots are 0
    // and 2. The zero root collides with the sentinel.
    let s = unit_at(0.0, 0.0, 0.0);
    let r = Ray3D::new(
        Tuple3D::new(0.0, 0.0, -1.0),
        Tuple3D::new(0.0, 0.0, 1.0),
    ).unwrap();

    assert_eq!(s.intersect(&r), None);
}

#[test]
fn normal_points_outward() {
    let s = unit_at(0.0, 0.0, 0.0);
    let third = 3.0f64.sqrt() / 3.0;

    assert_eq!(s.normal_at(Tuple3D::new(0.0, 0.0, 1.0)),
        Tuple3D::new(0.0, 0.0, 1.0));
    assert_eq!(s.normal_at(Tuple3D::new(third, third, third)),
        Tuple3D::new(third, third, third));
}
