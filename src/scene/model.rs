use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

use crate::foundation::{
    core::FrameIndex,
    error::{MovieError, MovieResult},
};

/// Parsed movie configuration: object setup, ordered scenes and production settings.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct MovieConfig {
    #[serde(default)]
    pub setup: Vec<ObjectSetup>,
    #[serde(default)]
    pub scenes: Vec<SceneDescription>,
    // Interpreted by `ProductionSettings::resolve`; kept loose so bad values become diagnostics.
    #[serde(default)]
    pub produce: serde_json::Map<String, serde_json::Value>,
}

/// An object whose trajectory is streamed in before the first scene.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ObjectSetup {
    pub name: String,
    pub directory: PathBuf,
    #[serde(alias = "states")]
    pub frame_count: usize,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SceneDescription {
    #[serde(rename = "scene", alias = "key", deserialize_with = "de_scene_key")]
    pub key: String,
    pub frame: FrameIndex,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<Vec<serde_json::Value>>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub state: usize,
    #[serde(default)]
    pub actions: Vec<serde_json::Value>,
    /// Only needed when the object was not declared in `setup`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl MovieConfig {
    pub fn from_json_str(s: &str) -> MovieResult<Self> {
        serde_json::from_str(s).map_err(|e| MovieError::config(format!("invalid config JSON: {e}")))
    }

    pub fn validate(&self) -> MovieResult<()> {
        let mut seen = BTreeSet::new();
        for obj in &self.setup {
            if obj.name.trim().is_empty() {
                return Err(MovieError::config("setup object name must be non-empty"));
            }
            if !seen.insert(obj.name.as_str()) {
                return Err(MovieError::config(format!(
                    "setup declares object '{}' more than once",
                    obj.name
                )));
            }
        }

        for scene in &self.scenes {
            if scene.key.trim().is_empty() {
                return Err(MovieError::config("scene key must be non-empty"));
            }
            for obj in &scene.objects {
                if obj.name.trim().is_empty() {
                    return Err(MovieError::config(format!(
                        "scene '{}' has an object with an empty name",
                        scene.key
                    )));
                }
            }
        }

        Ok(())
    }
}

fn de_scene_key<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum KeyRepr {
        Int(u64),
        Str(String),
    }

    Ok(match KeyRepr::deserialize(deserializer)? {
        KeyRepr::Int(n) => n.to_string(),
        KeyRepr::Str(s) => s,
    })
}
