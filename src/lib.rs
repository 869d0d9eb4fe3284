//! A per-pixel sphere ray tracer.
//!
//! Every pixel is a pure function of its coordinate, a fixed `Scene` and a
//! `FrameConfig`: the primary ray is Phong shaded, optionally followed by a
//! bounded chain of mirror bounces, and ground hits can be replaced by a flat
//! shadow color.

pub mod consts;
pub mod error;

pub mod tuple;
pub mod ray;
pub mod color;

pub mod sphere;
pub mod intersect;
pub mod light;

pub mod config;
pub mod scene;
pub mod world;
pub mod camera;
pub mod canvas;
pub mod parallel;

pub use crate::error::{ Result, TraceError };
pub use crate::config::{ Controls, FrameConfig, ShadingMode };
pub use crate::scene::Scene;
pub use crate::parallel::{ render_frame, render_controlled };

use crate::consts::FEQ_EPSILON;

/// Compares two floats with the tolerance used throughout the crate.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
