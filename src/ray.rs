use crate::tuple::Tuple3D;
use crate::error::Result;

/// A ray with a unit-length direction.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray3D {
    pub origin: Tuple3D,
    pub direction: Tuple3D,
}

impl Ray3D {
    /// Creates a ray, normalizing `direction`.
    ///
    /// Fails with `TraceError::ZeroDirection` if `direction` has no length.
    pub fn new(origin: Tuple3D, direction: Tuple3D) -> Result<Ray3D> {
        Ok(Ray3D { origin, direction: direction.try_normalize()? })
    }

    /// Creates a ray from a direction that is already unit length.
    ///
    /// Used for secondary rays, whose directions come out of normalized
    /// shading vectors.
    pub(crate) fn from_unit(origin: Tuple3D, direction: Tuple3D) -> Ray3D {
        Ray3D { origin, direction }
    }

    pub fn position(&self, t: f64) -> Tuple3D {
        self.origin + (t * self.direction)
    }
}

#[test]
fn ray_position() {
    let r = Ray3D::new(
                Tuple3D::new(2.0, 3.0, 4.0),
                Tuple3D::new(1.0, 0.0, 0.0)
            ).unwrap();

    assert_eq!(r.position(0.0), Tuple3D::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Tuple3D::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Tuple3D::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Tuple3D::new(4.5, 3.0, 4.0));
}

#[test]
fn ray_direction_is_normalized() {
    let r = Ray3D::new(
                Tuple3D::new(0.0, 0.0, 0.0),
                Tuple3D::new(0.0, 3.0, 4.0)
            ).unwrap();

    assert_eq!(r.direction, Tuple3D::new(0.0, 0.6, 0.8));
}

#[test]
fn ray_rejects_zero_direction() {
    use crate::error::TraceError;

    let r = Ray3D::new(Tuple3D::new(1.0, 1.0, 1.0), Tuple3D::default());

    assert!(matches!(r, Err(TraceError::ZeroDirection)));
}
