use std::ops::{ Add, AddAssign, Mul };

use serde::{ Serialize, Deserialize };

use crate::feq;

/// A color.
///
/// Represented with red-green-blue (RGB) values. Shading freely produces
/// components above 1.0; they are only clamped when a pixel leaves the
/// renderer (see `to_rgba`).
///
/// # Examples
///
/// ```
/// # use sphere_tracer::color::Color;
/// let grey = Color::rgb(0.4, 0.4, 0.4);
/// assert_eq!(grey * 0.5, Color::rgb(0.2, 0.2, 0.2));
/// ```
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Components are compared with a tolerance, like `Tuple3D`.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl From<[f64; 3]> for Color {
    fn from(v: [f64; 3]) -> Color {
        Color { r: v[0], g: v[1], b: v[2] }
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// The color black.
    pub fn black() -> Color {
        Color { r: 0.0, g: 0.0, b: 0.0 }
    }

    /// The color white.
    pub fn white() -> Color {
        Color { r: 1.0, g: 1.0, b: 1.0 }
    }

    /// Clamps the color into displayable range and appends an opaque alpha.
    ///
    /// ```
    /// # use sphere_tracer::color::Color;
    /// let hot = Color::rgb(1.7, 0.25, 0.0);
    /// assert_eq!(hot.to_rgba(), [1.0, 0.25, 0.0, 1.0]);
    /// ```
    pub fn to_rgba(&self) -> [f64; 4] {
        [
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            1.0,
        ]
    }

    /// Converts to 8-bit RGBA, rounding each clamped channel.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let [r, g, b, a] = self.to_rgba();
        let quantize = |c: f64| (c * 255.0).round() as u8;

        [quantize(r), quantize(g), quantize(b), quantize(a)]
    }
}

impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl AddAssign<Color> for Color {
    fn add_assign(&mut self, other: Color) {
        *self = *self + other;
    }
}

/// Multiplies a color by a scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

/// Multiplies a scalar by a color.
impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        other * self
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1 + c2, Color::rgb(1.6, 0.7, 1.0));
}

#[test]
fn add_assign_colors() {
    let mut c = Color::rgb(0.1, 0.2, 0.3);
    c += Color::rgb(0.1, 0.1, 0.1);

    assert_eq!(c, Color::rgb(0.2, 0.3, 0.4));
}

#[test]
fn scale_colors() {
    let c = Color::rgb(0.2, 0.3, 0.4);

    assert_eq!(c * 2.0, Color::rgb(0.4, 0.6, 0.8));
    assert_eq!(0.5 * c, Color::rgb(0.1, 0.15, 0.2));
}

#[test]
fn rgba_clamps_overbright_channels() {
    let c = Color::rgb(1.25, -0.5, 0.5);

    assert_eq!(c.to_rgba(), [1.0, 0.0, 0.5, 1.0]);
    assert_eq!(c.to_rgba8(), [255, 0, 128, 255]);
}

#[test]
fn black_is_opaque() {
    assert_eq!(Color::black().to_rgba8(), [0, 0, 0, 255]);
}
