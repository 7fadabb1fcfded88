use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    engine::{Command, Engine},
    foundation::error::{MovieError, MovieResult},
};

pub const DEFAULT_FRAME_EXTENSION: &str = "pdb";

/// One frame file plus the index parsed from its name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameHandle {
    pub index: u64,
    pub path: PathBuf,
}

/// Numerically ordered trajectory frames for one object, streamed into the engine on demand.
///
/// `loaded` only ever grows: `0 <= loaded <= frames.len()`.
#[derive(Clone, Debug)]
pub struct TrajectoryStream {
    name: String,
    frames: Vec<FrameHandle>,
    loaded: usize,
}

impl TrajectoryStream {
    /// Enumerate `directory` for `*.<extension>` frame files and sort them by trailing index.
    pub fn open(name: impl Into<String>, directory: &Path, extension: &str) -> MovieResult<Self> {
        let name = name.into();
        let paths = list_frame_files(directory, extension)?;
        if paths.is_empty() {
            return Err(MovieError::NoTrajectoryFound {
                name,
                directory: directory.to_path_buf(),
            });
        }
        let stream = Self::from_paths(name, paths)?;
        tracing::debug!(
            name = %stream.name,
            directory = %directory.display(),
            frames = stream.frames.len(),
            "opened trajectory"
        );
        Ok(stream)
    }

    /// Build a stream from an already-enumerated set of frame files (any order).
    pub fn from_paths(name: impl Into<String>, paths: Vec<PathBuf>) -> MovieResult<Self> {
        let name = name.into();
        if paths.is_empty() {
            return Err(MovieError::NoTrajectoryFound {
                name,
                directory: PathBuf::new(),
            });
        }

        let mut frames = paths
            .into_iter()
            .map(|path| {
                let index =
                    frame_index(&path).ok_or_else(|| MovieError::InvalidFrameName(path.clone()))?;
                Ok(FrameHandle { index, path })
            })
            .collect::<MovieResult<Vec<_>>>()?;
        // Ties on index fall back to the path, so directory listing order never leaks in.
        frames.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.path.cmp(&b.path)));

        Ok(Self {
            name,
            frames,
            loaded: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frames(&self) -> &[FrameHandle] {
        &self.frames
    }

    pub fn available(&self) -> usize {
        self.frames.len()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    /// Load every frame from `loaded + 1` through `target` into the engine under `name`.
    ///
    /// A target at or below the loaded count is a no-op. A target past the end loads as far
    /// as it can and then fails with [`MovieError::OutOfRangeState`]; frames loaded before the
    /// overrun stay loaded. Returns the number of frames newly loaded.
    pub fn load_up_to(&mut self, target: usize, engine: &mut dyn Engine) -> MovieResult<usize> {
        if target <= self.loaded {
            return Ok(0);
        }

        let start = self.loaded;
        while self.loaded < target {
            let Some(frame) = self.frames.get(self.loaded) else {
                return Err(MovieError::OutOfRangeState {
                    name: self.name.clone(),
                    requested: target,
                    available: self.frames.len(),
                    loaded: self.loaded,
                });
            };
            engine.execute(Command::LoadFrame {
                path: frame.path.clone(),
                object: self.name.clone(),
            })?;
            self.loaded += 1;
        }

        let actual = engine.count_states(&self.name);
        if actual != self.loaded {
            return Err(MovieError::StateCountMismatch {
                name: self.name.clone(),
                expected: self.loaded,
                actual,
            });
        }

        tracing::debug!(name = %self.name, from = start, to = self.loaded, "loaded states");
        Ok(self.loaded - start)
    }
}

/// Trailing `_<digits>` of the file stem, e.g. `frame_10.pdb` -> 10.
pub fn frame_index(path: &Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    let suffix = stem.rsplit('_').next()?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

fn list_frame_files(directory: &Path, extension: &str) -> MovieResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(directory)
        .with_context(|| format!("read trajectory directory '{}'", directory.display()))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("list trajectory directory '{}'", directory.display()))?;
        let path = entry.path();
        let matches_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches_ext && path.is_file() {
            out.push(path);
        }
    }
    Ok(out)
}
