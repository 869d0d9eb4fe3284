// Runtime parameters
pub const NUM_THREADS: usize = 4;
pub const CANVAS_WIDTH: usize = 600;
pub const CANVAS_HEIGHT: usize = 600;
pub const OUT_FILE: &str = "./out.ppm";

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Startup values of the interactive controls
pub const DEFAULT_LIGHT_POSITION: [f64; 3] = [-1.0, 10.0, 3.0];
pub const DEFAULT_BOUNCE_LIMIT: usize = 1;
pub const LIGHT_SLIDER_SCALE: f64 = 10.0;

// Phong weights
pub const AMBIENT_WEIGHT: f64 = 0.21;
pub const DIFFUSE_WEIGHT: f64 = 0.5;

// Each reflected hit contributes this fraction of its own shading
pub const REFLECTION_WEIGHT: f64 = 0.5;

// Distance a bounce ray is pushed off the surface it left
pub const REFLECTION_OFFSET: f64 = 0.01;

// A specular exponent large enough to make a surface matte
pub const MATTE_SPECULAR: f64 = 10_000_000.0;

// Intensity of the flat color used for ground points in shadow
pub const SHADOW_INTENSITY: f64 = 0.1;
