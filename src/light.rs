use serde::{ Serialize, Deserialize };

use crate::color::Color;
use crate::tuple::Tuple3D;
use crate::ray::Ray3D;
use crate::sphere::Sphere;
use crate::consts::{ AMBIENT_WEIGHT, DIFFUSE_WEIGHT, SHADOW_INTENSITY,
    DEFAULT_LIGHT_POSITION };

/// A point light.
///
/// Besides its position the light carries the color of its highlights and
/// the flat color that shadowed ground points are painted with.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Tuple3D,
    pub specular: Color,
    pub shadow: Color,
}

impl Default for PointLight {
    fn default() -> PointLight {
        PointLight::new(DEFAULT_LIGHT_POSITION.into())
    }
}

impl PointLight {
    /// Creates a white point light at `position`.
    pub fn new(position: Tuple3D) -> PointLight {
        PointLight {
            position,
            specular: Color::white(),
            shadow: Color::white() * SHADOW_INTENSITY,
        }
    }
}

/// Calculates the Phong color of a point on a sphere.
///
/// The result is the sum of an ambient term (the sphere's color scaled by a
/// fixed weight), a diffuse term and a specular highlight in the light's
/// color. Nothing is normalized, so the components may exceed 1.0.
///
/// `ray` is the ray that found `point`; its origin is taken as the eye.
pub fn phong(point: Tuple3D, sphere: &Sphere, light: &PointLight, ray: &Ray3D)
    -> Color {
    let normalv = sphere.normal_at(point);
    let lightv = (light.position - point).normalize();
    let reflectv = (-lightv.reflect(&normalv)).normalize();
    let eyev = (ray.origin - point).normalize();

    // Surfaces facing away from the light get no diffuse or highlight
    let cos_theta = lightv.dot(&normalv).max(0.0);
    let cos_alpha = reflectv.dot(&eyev).max(0.0).powf(sphere.specular);

    let ambient = sphere.color * AMBIENT_WEIGHT;
    let specular = light.specular * cos_alpha;
    let diffuse = sphere.color * cos_theta * DIFFUSE_WEIGHT;

    ambient + specular + diffuse
}

#[cfg(test)]
fn grey_unit_sphere(specular: f64) -> Sphere {
    Sphere::new(Tuple3D::default(), 1.0, Color::rgb(0.4, 0.4, 0.4), specular)
}

#[test]
fn eye_between_light_and_surface() {
    let s = grey_unit_sphere(10.0);
    let point = Tuple3D::new(0.0, 0.0, 1.0);
    let light = PointLight::new(Tuple3D::new(0.0, 0.0, 10.0));
    let ray = Ray3D::new(
        Tuple3D::new(0.0, 0.0, 5.0),
        Tuple3D::new(0.0, 0.0, -1.0),
    ).unwrap();

    // ambient 0.084 + full highlight 1.0 + full diffuse 0.2
    let c = phong(point, &s, &light, &ray);
    assert_eq!(c, Color::rgb(1.284, 1.284, 1.284));
}

#[test]
fn matte_surface_has_no_highlight() {
    use crate::consts::MATTE_SPECULAR;

    let s = grey_unit_sphere(MATTE_SPECULAR);
    let point = Tuple3D::new(0.0, 0.0, 1.0);
    let light = PointLight::new(Tuple3D::new(0.0, 1.0, 10.0));
    let ray = Ray3D::new(
        Tuple3D::new(0.0, 0.0, 5.0),
        Tuple3D::new(0.0, 0.0, -1.0),
    ).unwrap();

    let c = phong(point, &s, &light, &ray);
    let cos_theta = Tuple3D::new(0.0, 1.0, 9.0).normalize().z;
    let expected = 0.4 * 0.21 + 0.4 * cos_theta * 0.5;
    assert_eq!(c, Color::rgb(expected, expected, expected));
}

#[test]
fn light_behind_surface_leaves_ambient() {
    let s = grey_unit_sphere(10.0);
    let point = Tuple3D::new(0.0, 0.0, 1.0);
    let light = PointLight::new(Tuple3D::new(0.0, 0.0, -10.0));
    let ray = Ray3D::new(
        Tuple3D::new(0.0, 0.0, 5.0),
        Tuple3D::new(0.0, 0.0, -1.0),
    ).unwrap();

    let c = phong(point, &s, &light, &ray);
    assert_eq!(c, Color::rgb(0.084, 0.084, 0.084));
}

#[test]
fn shadow_color_is_dim_grey() {
    let light = PointLight::default();

    assert_eq!(light.position, Tuple3D::new(-1.0, 10.0, 3.0));
    assert_eq!(light.shadow, Color::rgb(0.1, 0.1, 0.1));
    assert_eq!(light.specular, Color::white());
}
