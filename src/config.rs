//! TOML scene description: barn filters, the lights going through them and a camera to look at
//! the result.

use std::fs;
use std::path::Path;

use na::{Matrix4, Rotation3, Vector3};
use nalgebra as na;
use serde::Deserialize;

use crate::error::Result;
use crate::frustum::params::FilterParameters;

/// Translation, XYZ Euler rotation in degrees and scale, composed as T * R * S.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translation: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        return Self {
            translation: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        };
    }
}

impl Transform {
    pub fn to_matrix(&self) -> Matrix4<f32> {
        let [rx, ry, rz] = self.rotation.map(f32::to_radians);
        let rotation = Rotation3::from_euler_angles(rx, ry, rz).to_homogeneous();
        let translation = Matrix4::new_translation(&Vector3::from(self.translation));
        let scale = Matrix4::new_nonuniform_scaling(&Vector3::from(self.scale));
        return translation * rotation * scale;
    }
}

/// One filter instance with the lights it shapes.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub name: String,
    pub params: FilterParameters,
    pub transform: Transform,
    pub lights: Vec<Transform>,
}

impl FilterConfig {
    pub fn light_matrices(&self) -> Vec<Matrix4<f32>> {
        return self.lights.iter().map(Transform::to_matrix).collect();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub look_from: [f32; 3],
    pub look_at: [f32; 3],
    pub up: [f32; 3],
    /// Distance from the camera to the center of projection.
    pub focal_distance: f32,
    /// Half of the visible world extent at `look_at`.
    pub extent: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        return Self {
            look_from: [8.0, -14.0, 9.0],
            look_at: [0.0, 0.0, 0.0],
            up: [0.0, 0.0, 1.0],
            focal_distance: 20.0,
            extent: 9.0,
        };
    }
}

impl CameraConfig {
    pub fn look_from(&self) -> Vector3<f32> {
        return Vector3::from(self.look_from);
    }

    pub fn look_at(&self) -> Vector3<f32> {
        return Vector3::from(self.look_at);
    }

    pub fn up(&self) -> Vector3<f32> {
        return Vector3::from(self.up);
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub filters: Vec<FilterConfig>,
}

impl Default for SceneConfig {
    /// One filter 4 units above the origin, lit by an area light above it.
    fn default() -> Self {
        let light = Transform {
            translation: [0.0, 0.0, 6.0],
            scale: [2.0, 2.0, 2.0],
            ..Default::default()
        };
        let filter = FilterConfig {
            name: String::from("barn"),
            params: FilterParameters {
                width: 2.0,
                height: 1.5,
                radius: 0.5,
                edge: 0.2,
                depth: 6.0,
                ..Default::default()
            },
            transform: Transform {
                translation: [0.0, 0.0, 4.0],
                ..Default::default()
            },
            lights: vec![light],
        };
        return Self {
            camera: CameraConfig::default(),
            filters: vec![filter],
        };
    }
}

impl SceneConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        return Self::from_toml(&content);
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        return Ok(toml::from_str(content)?);
    }
}
