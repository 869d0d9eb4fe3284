use std::io;
use std::io::{ BufWriter, Write };
use std::fs::File;
use std::path::Path;

use rayon::prelude::*;

use crate::color::Color;

/// A canvas for drawing pixels.
///
/// The canvas stores the unclamped color the tracer produced for each pixel.
/// Clamping into displayable range happens only on the way out, in
/// `to_rgba8` and the image writers.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored row by row from the top.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a new black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. `x` is the column and `y` the row,
    /// both zero-indexed from the top-left.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sphere_tracer::color::Color;
    /// # use sphere_tracer::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        // Silently ignore out-of-bounds pixels
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`.
    ///
    /// Returns `None` if the location is out-of-bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Splits the canvas into rows that can be filled concurrently.
    ///
    /// Each item is `(y, row)`; rows never overlap, so no locking is needed.
    pub fn par_rows_mut(&mut self)
        -> impl IndexedParallelIterator<Item = (usize, &mut [Color])> + '_ {
        // A zero-width canvas has no pixels; avoid a zero chunk size.
        let width = self.width.max(1);
        self.pixels.par_chunks_mut(width).enumerate()
    }

    /// Packs the canvas into clamped 8-bit RGBA, row by row from the top.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_rgba8()).collect()
    }

    /// Saves a canvas to a PPM file.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let out = File::create(path)?;
        let mut out = BufWriter::new(out);
        self.write_ppm(&mut out)?;
        out.flush()
    }

    /// Writes the canvas as a plain-text (P3) PPM image.
    ///
    /// Lines in the PPM file are clamped to 70 columns. If some color exceeds
    /// the 70 column mark on a line, it is moved to the next line over.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        // Write PPM header, as well as metadata
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?; // Maximum color value

        // Each row starts on a fresh line
        for row in self.pixels.chunks(self.width.max(1)) {
            let mut col = 0;
            for pixel in row {
                let [r, g, b, _] = pixel.to_rgba8();
                for channel in &[r, g, b] {
                    let s = channel.to_string();

                    if col > 0 && col + 1 + s.len() > 70 {
                        writeln!(out)?;
                        col = 0;
                    }

                    if col > 0 {
                        write!(out, " ")?;
                        col += 1;
                    }

                    write!(out, "{}", s)?;
                    col += s.len();
                }
            }

            writeln!(out)?;
        }

        Ok(())
    }
}

#[test]
fn canvas_starts_black() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.pixels().len(), 200);
    assert!(c.pixels().iter().all(|p| *p == Color::black()));
}

#[test]
fn out_of_bounds_pixels_are_ignored() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(2, 0, &Color::white());

    assert_eq!(c.read_pixel(2, 0), None);
    assert!(c.pixels().iter().all(|p| *p == Color::black()));
}

#[test]
fn ppm_header_and_clamping() {
    let mut c = Canvas::new(5, 3);
    c.write_pixel(0, 0, &Color::rgb(1.5, 0.0, 0.0));
    c.write_pixel(2, 1, &Color::rgb(0.0, 0.5, 0.0));
    c.write_pixel(4, 2, &Color::rgb(-0.5, 0.0, 1.0));

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "P3");
    assert_eq!(lines[1], "5 3");
    assert_eq!(lines[2], "255");
    assert_eq!(lines[3], "255 0 0 0 0 0 0 0 0 0 0 0 0 0 0");
    assert_eq!(lines[4], "0 0 0 0 0 0 0 128 0 0 0 0 0 0 0");
    assert_eq!(lines[5], "0 0 0 0 0 0 0 0 0 0 0 0 0 0 255");
    assert!(text.ends_with('\n'));
}

#[test]
fn ppm_lines_wrap_at_70_columns() {
    let mut c = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            c.write_pixel(x, y, &Color::rgb(1.0, 0.8, 0.6));
        }
    }

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.lines().all(|l| l.len() <= 70));
    assert_eq!(text.lines().nth(3).unwrap(),
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204");
}

#[test]
fn rgba_buffer_is_row_major() {
    let mut c = Canvas::new(2, 1);
    c.write_pixel(1, 0, &Color::white());

    assert_eq!(c.to_rgba8(), vec![0, 0, 0, 255, 255, 255, 255, 255]);
}
