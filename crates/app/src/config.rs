//! Command-line configuration: `--key=value` flags.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use asset::FaceMode;
use corelib::{CameraConfig, Direction, Vec3, transform::Transform, vec3};

/// A mesh to load and where to put it.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshSpec {
    pub name: String,
    pub path: PathBuf,
    pub transform: Transform,
}

impl MeshSpec {
    pub fn new(path: impl Into<PathBuf>, transform: Transform) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            path,
            transform,
        }
    }

    /// The two-object scene: the character at the origin and the cat off to
    /// the right, stood up and shrunk.
    pub fn default_scene() -> Vec<MeshSpec> {
        vec![
            MeshSpec::new("meshes/chibi.obj", Transform::identity()),
            MeshSpec::new(
                "meshes/Cat/Cat.obj",
                Transform::from_degrees(
                    vec3(30.0, 0.0, 0.0),
                    vec3(90.0, 0.0, 0.0),
                    Vec3::splat(0.2),
                ),
            ),
        ]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub meshes: Vec<MeshSpec>,
    pub face_mode: FaceMode,
    pub frames: u32,
    /// Fixed frame time in seconds.
    pub dt: f32,
    /// Camera speed in world units per second.
    pub speed: f32,
    pub walk: Vec<Direction>,
    /// Cursor drift per frame, in pixels (screen coordinates, y down).
    pub look: (f32, f32),
    pub constrain_pitch: bool,
    pub camera: CameraConfig,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            meshes: MeshSpec::default_scene(),
            face_mode: FaceMode::default(),
            frames: 120,
            dt: 1.0 / 60.0,
            speed: 10.0,
            walk: Vec::new(),
            look: (0.0, 0.0),
            constrain_pitch: true,
            camera: CameraConfig::default(),
            width: 800,
            height: 600,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_args(std::env::args().skip(1))
    }

    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cfg = Self::default();
        let mut meshes = Vec::new();

        for arg in args {
            let arg = arg.as_ref();
            if arg == "--no-pitch-clamp" {
                cfg.constrain_pitch = false;
                continue;
            }
            let Some((key, val)) = arg.split_once('=') else {
                log::warn!("Ignoring argument '{}'", arg);
                continue;
            };
            match key {
                "--mesh" => meshes.push(parse_mesh(val)?),
                "--faces" => {
                    cfg.face_mode = match val.to_ascii_lowercase().as_str() {
                        "first" | "first-triangle" => FaceMode::FirstTriangle,
                        "fan" => FaceMode::Fan,
                        other => bail!("Unknown face mode '{}' (expected first|fan)", other),
                    }
                }
                "--frames" => cfg.frames = parse_num(key, val)?,
                "--dt" => cfg.dt = parse_num(key, val)?,
                "--speed" => cfg.speed = parse_num(key, val)?,
                "--walk" => {
                    for dir in val.split(',').filter(|s| !s.is_empty()) {
                        cfg.walk.push(parse_direction(dir)?);
                    }
                }
                "--look" => {
                    let [dx, dy] = parse_floats::<2>(key, val)?;
                    cfg.look = (dx, dy);
                }
                "--sensitivity" => cfg.camera.mouse_sensitivity = parse_num(key, val)?,
                "--pitch-limit" => cfg.camera.pitch_limit = parse_num(key, val)?,
                "--camera-pos" => cfg.camera.position = Vec3::from_array(parse_floats(key, val)?),
                "--yaw" => cfg.camera.yaw = parse_num(key, val)?,
                "--pitch" => cfg.camera.pitch = parse_num(key, val)?,
                "--size" => {
                    let (w, h) = val
                        .split_once('x')
                        .or_else(|| val.split_once('X'))
                        .ok_or_else(|| anyhow!("--size expects WIDTHxHEIGHT, got '{}'", val))?;
                    cfg.width = parse_num::<u32>(key, w)?.max(1);
                    cfg.height = parse_num::<u32>(key, h)?.max(1);
                }
                _ => log::warn!("Ignoring unknown flag '{}'", key),
            }
        }

        if !meshes.is_empty() {
            cfg.meshes = meshes;
        }
        if !(cfg.dt.is_finite() && cfg.dt >= 0.0) {
            bail!("--dt must be a non-negative number of seconds, got {}", cfg.dt);
        }
        Ok(cfg)
    }
}

/// `PATH[@x,y,z]`
fn parse_mesh(val: &str) -> Result<MeshSpec> {
    let (path, translation) = match val.rsplit_once('@') {
        Some((path, offset)) => (path, Vec3::from_array(parse_floats("--mesh", offset)?)),
        None => (val, Vec3::ZERO),
    };
    if path.is_empty() {
        bail!("--mesh needs a path");
    }
    Ok(MeshSpec::new(path, Transform::from_translation(translation)))
}

fn parse_direction(val: &str) -> Result<Direction> {
    Ok(match val.to_ascii_lowercase().as_str() {
        "forward" | "w" => Direction::Forward,
        "backward" | "s" => Direction::Backward,
        "left" | "a" => Direction::Left,
        "right" | "d" => Direction::Right,
        other => bail!("Unknown walk direction '{}'", other),
    })
}

fn parse_num<T>(key: &str, val: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    val.parse::<T>()
        .with_context(|| format!("Invalid value '{}' for {}", val, key))
}

fn parse_floats<const N: usize>(key: &str, val: &str) -> Result<[f32; N]> {
    let values = val
        .split(',')
        .map(|s| parse_num::<f32>(key, s.trim()))
        .collect::<Result<Vec<_>>>()?;
    <[f32; N]>::try_from(values)
        .map_err(|v| anyhow!("{} expects {} comma-separated numbers, got {}", key, N, v.len()))
}
