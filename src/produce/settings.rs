use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::{
    diagnostics::{Diagnostic, Origin},
    engine::RenderMode,
    foundation::error::{MovieError, MovieResult},
};

pub const DEFAULT_FILENAME: &str = "output";
pub const DEFAULT_WIDTH: u32 = 1264;
pub const DEFAULT_HEIGHT: u32 = 720;
pub const DEFAULT_FRAMERATE: f64 = 30.0;
pub const DEFAULT_QUALITY: u8 = 50;

const KNOWN_KEYS: &[&str] = &[
    "filename",
    "mode",
    "width",
    "height",
    "framerate",
    "quality",
    "format",
    "frame_count",
    "frames",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Session,
    Video,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Session => "pse",
            Self::Video => "mp4",
        }
    }

    /// Extensions a filename may already carry for this format.
    fn accepts_extension(self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        match self {
            Self::Session => ext == "pse",
            Self::Video => matches!(ext.as_str(), "mp4" | "mpg" | "mov"),
        }
    }
}

/// Fully-resolved production settings. Every field holds a valid value.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ProductionSettings {
    pub filename: String,
    pub mode: RenderMode,
    pub width: u32,
    pub height: u32,
    pub framerate: f64,
    pub quality: u8,
    pub format: OutputFormat,
    pub frame_count: u64,
}

impl ProductionSettings {
    /// Validate `raw`, replacing each missing or invalid option with its default.
    ///
    /// Each correction yields one diagnostic. The input is left untouched. Only a missing or
    /// invalid `frame_count` fails, since no default length is safe.
    pub fn resolve(raw: &Map<String, Value>) -> MovieResult<(Self, Vec<Diagnostic>)> {
        let mut diags = Vec::new();
        let mut note = |message: String| {
            diags.push(Diagnostic {
                origin: Origin::Production,
                message,
            })
        };

        let frame_count = match raw.get("frame_count").or_else(|| raw.get("frames")) {
            None | Some(Value::Null) => {
                return Err(MovieError::config("produce.frame_count is required"));
            }
            Some(v) => v.as_u64().filter(|n| *n > 0).ok_or_else(|| {
                MovieError::config(format!(
                    "produce.frame_count must be a positive integer, got {v}"
                ))
            })?,
        };

        let filename = match raw.get("filename").and_then(Value::as_str).map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => {
                note(format!(
                    "filename is missing or not a string; using default \"{DEFAULT_FILENAME}\"."
                ));
                DEFAULT_FILENAME.to_string()
            }
        };

        let mode = match raw.get("mode").and_then(Value::as_str) {
            Some("normal") => RenderMode::Normal,
            Some("fast") => RenderMode::Fast,
            Some("ray") => RenderMode::Ray,
            _ => {
                note(
                    "mode is missing or not one of \"normal\", \"fast\", \"ray\"; using default \"normal\"."
                        .to_string(),
                );
                RenderMode::Normal
            }
        };

        let width = positive_u32(raw.get("width")).unwrap_or_else(|| {
            note(format!(
                "width is missing or not a positive integer; using default {DEFAULT_WIDTH}."
            ));
            DEFAULT_WIDTH
        });

        let height = positive_u32(raw.get("height")).unwrap_or_else(|| {
            note(format!(
                "height is missing or not a positive integer; using default {DEFAULT_HEIGHT}."
            ));
            DEFAULT_HEIGHT
        });

        let framerate = raw
            .get("framerate")
            .and_then(Value::as_f64)
            .filter(|f| f.is_finite() && *f > 0.0)
            .unwrap_or_else(|| {
                note(format!(
                    "framerate is missing or not a positive number; using default {DEFAULT_FRAMERATE}."
                ));
                DEFAULT_FRAMERATE
            });

        let quality = raw
            .get("quality")
            .and_then(Value::as_u64)
            .filter(|q| *q <= 100)
            .map(|q| q as u8)
            .unwrap_or_else(|| {
                note(format!(
                    "quality is missing or not an integer within 0-100; using default {DEFAULT_QUALITY}."
                ));
                DEFAULT_QUALITY
            });

        let format = match raw.get("format").and_then(Value::as_str) {
            Some("session" | "pse") => OutputFormat::Session,
            Some("video" | "mp4" | "mpg" | "mov") => OutputFormat::Video,
            _ => {
                note(
                    "format is missing or not one of \"session\", \"video\"; using default \"session\"."
                        .to_string(),
                );
                OutputFormat::Session
            }
        };

        for key in raw.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                note(format!("option \"{key}\" is not recognized and is ignored."));
            }
        }

        Ok((
            Self {
                filename,
                mode,
                width,
                height,
                framerate,
                quality,
                format,
                frame_count,
            },
            diags,
        ))
    }

    /// `filename` with the format's extension appended, unless it already ends in one the
    /// format accepts. Other dots (`run.v2`) are part of the name.
    pub fn output_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.filename);
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if self.format.accepts_extension(ext) => path,
            _ => PathBuf::from(format!("{}.{}", self.filename, self.format.extension())),
        }
    }
}

fn positive_u32(v: Option<&Value>) -> Option<u32> {
    v.and_then(Value::as_u64)
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
}
