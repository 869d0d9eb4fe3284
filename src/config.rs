use std::convert::TryFrom;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use log::debug;
use serde::{ Serialize, Deserialize };

use crate::tuple::Tuple3D;
use crate::error::{ Result, TraceError };
use crate::consts::{ CANVAS_WIDTH, CANVAS_HEIGHT, DEFAULT_LIGHT_POSITION,
    DEFAULT_BOUNCE_LIMIT, LIGHT_SLIDER_SCALE };

/// Which effects are layered on top of Phong shading.
///
/// The discriminants are the integers the interactive controls use.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ShadingMode {
    Phong = 0,
    PhongShadow = 1,
    PhongReflection = 2,
    PhongShadowReflection = 3,
}

impl Default for ShadingMode {
    fn default() -> ShadingMode {
        ShadingMode::Phong
    }
}

impl ShadingMode {
    /// Whether shadowed ground points are painted with the shadow color.
    pub fn shadows(self) -> bool {
        matches!(self, ShadingMode::PhongShadow
            | ShadingMode::PhongShadowReflection)
    }

    /// Whether mirror bounces are added to the primary hit's color.
    pub fn reflections(self) -> bool {
        matches!(self, ShadingMode::PhongReflection
            | ShadingMode::PhongShadowReflection)
    }
}

impl TryFrom<i64> for ShadingMode {
    type Error = TraceError;

    fn try_from(value: i64) -> Result<ShadingMode> {
        match value {
            0 => Ok(ShadingMode::Phong),
            1 => Ok(ShadingMode::PhongShadow),
            2 => Ok(ShadingMode::PhongReflection),
            3 => Ok(ShadingMode::PhongShadowReflection),
            _ => Err(TraceError::InvalidShadingMode(value)),
        }
    }
}

impl From<ShadingMode> for i64 {
    fn from(mode: ShadingMode) -> i64 {
        mode as i64
    }
}

/// Everything a frame needs from the outside world.
///
/// A `FrameConfig` is a plain value. Renderers take one by value at the start
/// of a frame, so later changes to the controls never reach a frame that is
/// already in flight.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Output width in pixels. Also the horizontal extent of the screen
    /// mapping.
    pub width: usize,

    /// Output height in pixels. Also the vertical extent of the screen
    /// mapping.
    pub height: usize,

    pub light_position: Tuple3D,

    /// Maximum number of mirror bounces after the primary hit.
    pub bounce_limit: usize,

    pub shading_mode: ShadingMode,
}

impl Default for FrameConfig {
    fn default() -> FrameConfig {
        FrameConfig {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            light_position: DEFAULT_LIGHT_POSITION.into(),
            bounce_limit: DEFAULT_BOUNCE_LIMIT,
            shading_mode: ShadingMode::Phong,
        }
    }
}

impl FrameConfig {
    /// Reads a frame configuration from a JSON file.
    ///
    /// Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<FrameConfig> {
        let text = fs::read_to_string(path)?;
        let config: FrameConfig = serde_json::from_str(&text)?;
        config.validate()?;

        debug!("Loaded frame config from {:?}: {:?}", path, config);
        Ok(config)
    }

    /// Checks that the resolution describes at least one pixel.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TraceError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }

        Ok(())
    }
}

/// Frame parameters shared between an input thread and a renderer.
///
/// Setters mirror the interactive controls. A renderer calls `snapshot` once
/// per frame and works only from the copy.
#[derive(Debug, Default)]
pub struct Controls {
    state: RwLock<FrameConfig>,
}

impl Controls {
    pub fn new(config: FrameConfig) -> Controls {
        Controls { state: RwLock::new(config) }
    }

    /// Copies the current parameters for one frame.
    pub fn snapshot(&self) -> FrameConfig {
        // A panicked writer cannot leave a `FrameConfig` half-written, since
        // every setter assigns whole fields.
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn update<F: FnOnce(&mut FrameConfig)>(&self, f: F) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        f(&mut *state);
    }

    /// Moves the light along x from a slider value.
    ///
    /// The slider works in tenths of a scene unit.
    pub fn move_light(&self, slider: f64) {
        self.update(|c| c.light_position.x = slider / LIGHT_SLIDER_SCALE);
    }

    pub fn set_light_position(&self, position: Tuple3D) {
        self.update(|c| c.light_position = position);
    }

    pub fn set_bounce_limit(&self, bounce_limit: usize) {
        self.update(|c| c.bounce_limit = bounce_limit);
    }

    /// Selects a shading mode by its integer code.
    pub fn set_shading_mode(&self, code: i64) -> Result<()> {
        let mode = ShadingMode::try_from(code)?;
        self.update(|c| c.shading_mode = mode);
        Ok(())
    }

    pub fn set_resolution(&self, width: usize, height: usize) -> Result<()> {
        FrameConfig { width, height, ..Default::default() }.validate()?;
        self.update(|c| {
            c.width = width;
            c.height = height;
        });
        Ok(())
    }
}

#[test]
fn shading_mode_flags() {
    assert!(!ShadingMode::Phong.shadows());
    assert!(!ShadingMode::Phong.reflections());
    assert!(ShadingMode::PhongShadow.shadows());
    assert!(!ShadingMode::PhongShadow.reflections());
    assert!(!ShadingMode::PhongReflection.shadows());
    assert!(ShadingMode::PhongReflection.reflections());
    assert!(ShadingMode::PhongShadowReflection.shadows());
    assert!(ShadingMode::PhongShadowReflection.reflections());
}

#[test]
fn shading_mode_from_code() {
    assert_eq!(ShadingMode::try_from(2).unwrap(), ShadingMode::PhongReflection);
    assert!(matches!(ShadingMode::try_from(4),
        Err(TraceError::InvalidShadingMode(4))));
    assert!(matches!(ShadingMode::try_from(-1),
        Err(TraceError::InvalidShadingMode(-1))));
}

#[test]
fn frame_config_from_partial_json() {
    let config: FrameConfig = serde_json::from_str(
        r#"{ "bounce_limit": 3, "shading_mode": 3 }"#
    ).unwrap();

    assert_eq!(config.bounce_limit, 3);
    assert_eq!(config.shading_mode, ShadingMode::PhongShadowReflection);
    assert_eq!(config.width, 600);
    assert_eq!(config.light_position, Tuple3D::new(-1.0, 10.0, 3.0));
}

#[test]
fn frame_config_rejects_bad_mode() {
    let config = serde_json::from_str::<FrameConfig>(r#"{ "shading_mode": 7 }"#);

    assert!(config.is_err());
}

#[test]
fn frame_config_rejects_empty_resolution() {
    let config = FrameConfig { width: 0, ..Default::default() };

    assert!(matches!(config.validate(),
        Err(TraceError::InvalidResolution { width: 0, height: 600 })));
}

#[test]
fn controls_snapshot_is_detached() {
    let controls = Controls::new(FrameConfig::default());
    let before = controls.snapshot();

    controls.move_light(25.0);
    controls.set_bounce_limit(4);
    controls.set_shading_mode(1).unwrap();

    assert_eq!(before, FrameConfig::default());

    let after = controls.snapshot();
    assert_eq!(after.light_position, Tuple3D::new(2.5, 10.0, 3.0));
    assert_eq!(after.bounce_limit, 4);
    assert_eq!(after.shading_mode, ShadingMode::PhongShadow);
}

#[test]
fn controls_keep_mode_on_bad_code() {
    let controls = Controls::default();
    controls.set_shading_mode(2).unwrap();

    assert!(controls.set_shading_mode(9).is_err());
    assert_eq!(controls.snapshot().shading_mode, ShadingMode::PhongReflection);
    assert!(controls.set_resolution(0, 10).is_err());
    assert_eq!(controls.snapshot().width, 600);
}

#[test]
fn set_light_position_reaches_next_snapshot() {
    let controls = Controls::default();
    let before = controls.snapshot();

    controls.set_light_position(Tuple3D::new(0.3, 10.0, 0.5));

    assert_eq!(before.light_position, Tuple3D::new(-1.0, 10.0, 3.0));
    assert_eq!(controls.snapshot().light_position,
        Tuple3D::new(0.3, 10.0, 0.5));
}
