use std::convert::TryFrom;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{ Serialize, Deserialize };

use crate::tuple::Tuple3D;
use crate::color::Color;
use crate::sphere::Sphere;
use crate::error::{ Result, TraceError };
use crate::consts::MATTE_SPECULAR;

/// The fixed geometry of a render.
///
/// Spheres are kept in order; the order decides ties in the nearest-hit
/// search. At most one sphere is the ground: the only surface that receives
/// shadows, and the only one that never casts them.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    spheres: Vec<Sphere>,
    camera: Tuple3D,
    ground: Option<usize>,
}

impl Default for Scene {
    /// Three small spheres resting on a large matte ground sphere, seen from
    /// (0, 0, 1).
    fn default() -> Scene {
        let spheres = vec![
            Sphere::new(Tuple3D::new(-0.3, 0.1, 0.5), 0.2,
                Color::rgb(0.0, 1.0, 0.0), 29.0),
            Sphere::new(Tuple3D::new(0.0, 0.28, -0.2), 0.49,
                Color::rgb(1.0, 0.0, 0.0), 15.0),
            Sphere::new(Tuple3D::new(0.3, 0.1, 0.5), 0.2,
                Color::rgb(0.0, 0.0, 1.0), 100.0),
            Sphere::new(Tuple3D::new(0.0, -2.5, 0.0), 2.3,
                Color::rgb(0.4, 0.4, 0.4), MATTE_SPECULAR),
        ];

        Scene {
            spheres,
            camera: Tuple3D::new(0.0, 0.0, 1.0),
            ground: Some(Scene::DEFAULT_GROUND),
        }
    }
}

impl Scene {
    /// Index of the ground sphere in the default scene.
    pub const DEFAULT_GROUND: usize = 3;

    /// Creates a scene, checking that every radius is positive and that
    /// `ground`, if given, names one of the spheres.
    pub fn new(spheres: Vec<Sphere>, camera: Tuple3D, ground: Option<usize>)
        -> Result<Scene> {
        for (index, sphere) in spheres.iter().enumerate() {
            if !(sphere.radius > 0.0) {
                return Err(TraceError::InvalidRadius {
                    index,
                    radius: sphere.radius,
                });
            }
        }

        if let Some(index) = ground {
            if index >= spheres.len() {
                return Err(TraceError::InvalidGround {
                    index,
                    len: spheres.len(),
                });
            }
        }

        Ok(Scene { spheres, camera, ground })
    }

    /// Loads a scene from a JSON description.
    pub fn load(path: &Path) -> Result<Scene> {
        let text = fs::read_to_string(path)?;
        let scene_json: SceneJson = serde_json::from_str(&text)?;
        let scene = Scene::try_from(scene_json)?;

        debug!("Loaded {} spheres from {:?}", scene.spheres.len(), path);
        Ok(scene)
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// The eye point every primary ray starts from.
    pub fn camera(&self) -> Tuple3D {
        self.camera
    }

    pub fn ground(&self) -> Option<usize> {
        self.ground
    }

    pub fn is_ground(&self, index: usize) -> bool {
        self.ground == Some(index)
    }

    /// The spheres that can shadow the ground: every sphere but the ground.
    pub fn casters(&self) -> impl Iterator<Item = &Sphere> + '_ {
        self.spheres.iter()
            .enumerate()
            .filter(move |(i, _)| !self.is_ground(*i))
            .map(|(_, s)| s)
    }
}

/// The on-disk form of a scene.
///
/// ```json
/// {
///     "camera": [0.0, 0.0, 1.0],
///     "ground": 1,
///     "spheres": [
///         { "center": [0.0, 0.2, 0.0], "radius": 0.3,
///           "color": [1.0, 0.0, 0.0], "specular": 15.0 },
///         { "center": [0.0, -2.5, 0.0], "radius": 2.3,
///           "color": [0.4, 0.4, 0.4] }
///     ]
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneJson {
    #[serde(default = "default_camera")]
    camera: [f64; 3],
    #[serde(default)]
    ground: Option<usize>,
    spheres: Vec<SphereJson>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct SphereJson {
    center: [f64; 3],
    radius: f64,
    color: [f64; 3],
    #[serde(default = "default_specular")]
    specular: f64,
}

fn default_camera() -> [f64; 3] {
    [0.0, 0.0, 1.0]
}

fn default_specular() -> f64 {
    MATTE_SPECULAR
}

impl TryFrom<SceneJson> for Scene {
    type Error = TraceError;

    fn try_from(scene_json: SceneJson) -> Result<Scene> {
        let spheres = scene_json.spheres.into_iter()
            .map(|s| Sphere::new(s.center.into(), s.radius, s.color.into(),
                s.specular))
            .collect();

        Scene::new(spheres, scene_json.camera.into(), scene_json.ground)
    }
}

impl From<&Scene> for SceneJson {
    fn from(scene: &Scene) -> SceneJson {
        SceneJson {
            camera: [scene.camera.x, scene.camera.y, scene.camera.z],
            ground: scene.ground,
            spheres: scene.spheres.iter().map(|s| SphereJson {
                center: [s.center.x, s.center.y, s.center.z],
                radius: s.radius,
                color: [s.color.r, s.color.g, s.color.b],
                specular: s.specular,
            }).collect(),
        }
    }
}

#[test]
fn default_scene_layout() {
    let scene = Scene::default();

    assert_eq!(scene.spheres().len(), 4);
    assert_eq!(scene.ground(), Some(3));
    assert_eq!(scene.camera(), Tuple3D::new(0.0, 0.0, 1.0));
    assert!(scene.spheres().iter().all(|s| s.radius > 0.0));
}

#[test]
fn ground_never_casts() {
    let scene = Scene::default();
    let casters: Vec<&Sphere> = scene.casters().collect();

    assert_eq!(casters.len(), 3);
    assert!(casters.iter().all(|s| s.radius < 1.0));
}

#[test]
fn scene_without_ground_casts_everything() {
    let scene = Scene::new(
        Scene::default().spheres().to_vec(),
        Tuple3D::new(0.0, 0.0, 1.0),
        None,
    ).unwrap();

    assert_eq!(scene.casters().count(), 4);
    assert!(!scene.is_ground(3));
}

#[test]
fn reject_non_positive_radius() {
    let s = Sphere::new(Tuple3D::default(), 0.0, Color::white(), 1.0);
    let scene = Scene::new(vec![s], Tuple3D::default(), None);

    assert!(matches!(scene, Err(TraceError::InvalidRadius { index: 0, .. })));
}

#[test]
fn reject_ground_out_of_range() {
    let s = Sphere::new(Tuple3D::default(), 1.0, Color::white(), 1.0);
    let scene = Scene::new(vec![s], Tuple3D::default(), Some(1));

    assert!(matches!(scene,
        Err(TraceError::InvalidGround { index: 1, len: 1 })));
}

#[test]
fn scene_from_json() {
    let scene_json: SceneJson = serde_json::from_str(r#"{
        "ground": 1,
        "spheres": [
            { "center": [0.0, 0.2, 0.0], "radius": 0.3,
              "color": [1.0, 0.0, 0.0], "specular": 15.0 },
            { "center": [0.0, -2.5, 0.0], "radius": 2.3,
              "color": [0.4, 0.4, 0.4] }
        ]
    }"#).unwrap();
    let scene = Scene::try_from(scene_json).unwrap();

    assert_eq!(scene.camera(), Tuple3D::new(0.0, 0.0, 1.0));
    assert_eq!(scene.spheres()[0].specular, 15.0);
    assert_eq!(scene.spheres()[1].specular, MATTE_SPECULAR);
    assert!(scene.is_ground(1));
}

#[test]
fn default_scene_survives_json() {
    let scene = Scene::default();
    let text = serde_json::to_string(&SceneJson::from(&scene)).unwrap();
    let back = Scene::try_from(
        serde_json::from_str::<SceneJson>(&text).unwrap()
    ).unwrap();

    assert_eq!(back, scene);
}
