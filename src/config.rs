use std::{path::PathBuf, str::FromStr};

use glam::Vec3;

use crate::{
    camera::CameraConfig,
    color::Color,
    geometry::{
        furniture::FurnitureConfig,
        room_shell::{RoomColors, RoomDimensions},
    },
    lights::LightConfig,
};

#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// 4x MSAA when enabled.
    pub antialias: bool,
    /// Cap on the device pixel ratio used for the internal render resolution.
    pub max_pixel_ratio: f64,
    pub background: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            antialias: true,
            max_pixel_ratio: 2.0,
            background: Color::from_hex(0xd3d3d3),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenePreset {
    #[default]
    Furnished,
    Bare,
}

impl FromStr for ScenePreset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "furnished" => Ok(ScenePreset::Furnished),
            "bare" => Ok(ScenePreset::Bare),
            other => Err(anyhow::anyhow!(
                "Unknown scene preset {other:?}, expected \"furnished\" or \"bare\""
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub title: &'static str,
    pub room: RoomDimensions,
    pub room_colors: RoomColors,
    pub camera: CameraConfig,
    pub lights: LightConfig,
    pub furniture: Vec<FurnitureConfig>,
    pub model_path: Option<PathBuf>,
}

const DORM_ROOM: RoomDimensions = RoomDimensions {
    width: 6.0,
    depth: 8.0,
    height: 2.6,
};

fn room_colors() -> RoomColors {
    RoomColors {
        floor: Color::from_hex(0x8b7d6b),
        walls: Color::from_hex(0xf5f5dc),
        ceiling: Color::WHITE,
    }
}

fn light_rig() -> LightConfig {
    LightConfig {
        ambient_color: Color::WHITE,
        ambient_intensity: 1.2,
        directional_color: Color::WHITE,
        directional_intensity: 1.0,
        directional_position: Vec3::new(5.0, 10.0, 5.0),
        directional_target: Vec3::ZERO,
        cast_shadow: true,
    }
}

impl SceneConfig {
    pub fn preset(preset: ScenePreset) -> Self {
        match preset {
            ScenePreset::Furnished => Self::furnished(),
            ScenePreset::Bare => Self::bare(),
        }
    }

    fn furnished() -> Self {
        Self {
            title: "Dorm room",
            room: DORM_ROOM,
            room_colors: room_colors(),
            camera: CameraConfig {
                eye: Vec3::new(-1.2, 1.1, 0.1),
                target: Vec3::new(2.0, 0.8, -1.5),
                fov_degrees: 60.0,
            },
            lights: light_rig(),
            furniture: vec![
                FurnitureConfig {
                    name: "Desk",
                    size: Vec3::new(2.0, 0.1, 1.0),
                    position: Vec3::new(-2.0, 0.5, -2.0),
                    color: Color::from_hex(0x8b4513),
                    cast_shadow: true,
                },
                FurnitureConfig {
                    name: "Chair",
                    size: Vec3::new(0.6, 0.8, 0.6),
                    position: Vec3::new(-1.5, 0.4, -1.5),
                    color: Color::from_hex(0xff0000),
                    cast_shadow: true,
                },
                FurnitureConfig {
                    name: "Bed",
                    size: Vec3::new(1.5, 0.3, 2.5),
                    position: Vec3::new(2.0, 0.3, 0.0),
                    color: Color::from_hex(0x4169e1),
                    cast_shadow: true,
                },
                FurnitureConfig {
                    name: "Nightstand",
                    size: Vec3::new(0.5, 0.6, 0.5),
                    position: Vec3::new(2.6, 0.3, 1.5),
                    color: Color::from_hex(0xffd700),
                    cast_shadow: true,
                },
            ],
            model_path: Some(PathBuf::from("assets/room.glb")),
        }
    }

    fn bare() -> Self {
        Self {
            title: "Dorm room (bare)",
            room: DORM_ROOM,
            room_colors: room_colors(),
            camera: CameraConfig {
                eye: Vec3::new(0.0, 1.3, 3.5),
                target: Vec3::new(0.0, 1.3, 0.0),
                fov_degrees: 75.0,
            },
            lights: light_rig(),
            furniture: Vec::new(),
            model_path: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scene: SceneConfig,
    pub render: RenderConfig,
}

impl AppConfig {
    /// Builds the configuration from command line arguments (without the
    /// program name). The first argument, if any, names the scene preset.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let preset = match args.next() {
            Some(name) => name.parse()?,
            None => ScenePreset::default(),
        };

        Ok(Self {
            scene: SceneConfig::preset(preset),
            render: RenderConfig::default(),
        })
    }
}
