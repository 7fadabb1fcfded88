use std::fmt;
use std::path::{Path, PathBuf};

use crate::foundation::core::{Axis, FrameIndex};

/// Trajectory state an object shows at a bound frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateBinding {
    pub object: String,
    pub state: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    Normal,
    Fast,
    Ray,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Fast => "draw",
            Self::Ray => "ray",
        }
    }
}

/// Parameters of the video export primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoExport {
    pub path: PathBuf,
    pub mode: RenderMode,
    pub quality: u8,
    pub width: u32,
    pub height: u32,
    pub framerate: f64,
}

/// One engine primitive. Commands are fire-and-forget against engine-global state.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    LoadFrame {
        path: PathBuf,
        object: String,
    },
    StoreScene {
        key: String,
    },
    AllocateTimeline {
        frames: u64,
    },
    SetLoop(bool),
    SetFramerate(f64),
    BindFrame {
        frame: FrameIndex,
        scene: String,
        binding: Option<StateBinding>,
    },
    SetColor {
        target: String,
        color: String,
    },
    SetRepresentation {
        target: String,
        representation: String,
    },
    Show {
        target: String,
        representation: String,
    },
    Hide {
        target: String,
    },
    Rotate {
        target: String,
        axis: Axis,
        angle: f64,
    },
    Translate {
        target: String,
        vector: [f64; 3],
    },
    SetTransparency {
        target: String,
        value: f64,
    },
    TurnViewport {
        axis: Axis,
        angle: f64,
    },
    MoveViewport {
        axis: Axis,
        magnitude: f64,
    },
    ZoomViewport {
        selection: String,
        animate: f64,
    },
    OrientViewport {
        selection: String,
    },
    SetView {
        view: Vec<f64>,
    },
    Roll {
        first: FrameIndex,
        last: FrameIndex,
        looped: bool,
        axis: Axis,
    },
    Rock {
        first: FrameIndex,
        last: FrameIndex,
        angle: f64,
        phase: f64,
        looped: bool,
        axis: Axis,
    },
    SaveSession {
        path: PathBuf,
    },
    ExportVideo(VideoExport),
}

impl Command {
    /// Export primitives end a production run; their failure is a production failure.
    pub fn is_export(&self) -> bool {
        matches!(self, Self::SaveSession { .. } | Self::ExportVideo(_))
    }
}

/// Quote a path for a PML argument list, which splits on commas.
fn quoted(path: &Path) -> String {
    let text = path.display().to_string();
    if text.contains('"') {
        format!("'{text}'")
    } else {
        format!("\"{text}\"")
    }
}

// Renders PyMOL command syntax, one command per line.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadFrame { path, object } => write!(f, "load {}, {object}", quoted(path)),
            Self::StoreScene { key } => write!(f, "scene {key}, store"),
            Self::AllocateTimeline { frames } => write!(f, "mset 1x{frames}"),
            Self::SetLoop(on) => write!(f, "set movie_loop, {}", u8::from(*on)),
            Self::SetFramerate(fps) => write!(f, "set movie_fps, {fps}"),
            Self::BindFrame {
                frame,
                scene,
                binding,
            } => match binding {
                Some(b) => write!(
                    f,
                    "mview store, {frame}, scene={scene}, state={}, object={}",
                    b.state, b.object
                ),
                None => write!(f, "mview store, {frame}, scene={scene}"),
            },
            Self::SetColor { target, color } => write!(f, "color {color}, {target}"),
            Self::SetRepresentation {
                target,
                representation,
            } => write!(f, "show_as {representation}, {target}"),
            Self::Show {
                target,
                representation,
            } => write!(f, "show {representation}, {target}"),
            Self::Hide { target } => write!(f, "hide everything, {target}"),
            Self::Rotate {
                target,
                axis,
                angle,
            } => write!(f, "rotate {axis}, {angle}, {target}"),
            Self::Translate { target, vector } => write!(
                f,
                "translate [{}, {}, {}], {target}",
                vector[0], vector[1], vector[2]
            ),
            Self::SetTransparency { target, value } => {
                write!(f, "set transparency, {value}, {target}")
            }
            Self::TurnViewport { axis, angle } => write!(f, "turn {axis}, {angle}"),
            Self::MoveViewport { axis, magnitude } => write!(f, "move {axis}, {magnitude}"),
            Self::ZoomViewport { selection, animate } => {
                write!(f, "zoom {selection}, animate={animate}")
            }
            Self::OrientViewport { selection } => write!(f, "orient {selection}"),
            Self::SetView { view } => {
                let parts: Vec<String> = view.iter().map(|v| v.to_string()).collect();
                write!(f, "set_view ({})", parts.join(", "))
            }
            Self::Roll {
                first,
                last,
                looped,
                axis,
            } => write!(f, "movie.roll {first}, {last}, {}, {axis}", u8::from(*looped)),
            Self::Rock {
                first,
                last,
                angle,
                phase,
                looped,
                axis,
            } => write!(
                f,
                "movie.rock {first}, {last}, {angle}, {phase}, {}, {axis}",
                u8::from(*looped)
            ),
            Self::SaveSession { path } => write!(f, "save {}", quoted(path)),
            Self::ExportVideo(v) => write!(
                f,
                "set movie_fps, {}\nmovie.produce {}, mode={}, quality={}, width={}, height={}",
                v.framerate,
                quoted(&v.path),
                v.mode.as_str(),
                v.quality,
                v.width,
                v.height
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_object_commands() {
        let color = Command::SetColor {
            target: "luke and chain A".to_string(),
            color: "red".to_string(),
        };
        assert_eq!(color.to_string(), "color red, luke and chain A");

        let tr = Command::Translate {
            target: "isaac and chain A".to_string(),
            vector: [0.0, 10.0, 0.0],
        };
        assert_eq!(tr.to_string(), "translate [0, 10, 0], isaac and chain A");
    }

    #[test]
    fn renders_bindings_with_and_without_object() {
        let bound = Command::BindFrame {
            frame: FrameIndex(51),
            scene: "2".to_string(),
            binding: Some(StateBinding {
                object: "luke".to_string(),
                state: 101,
            }),
        };
        assert_eq!(
            bound.to_string(),
            "mview store, 51, scene=2, state=101, object=luke"
        );

        let boundary = Command::BindFrame {
            frame: FrameIndex(51),
            scene: "2".to_string(),
            binding: None,
        };
        assert_eq!(boundary.to_string(), "mview store, 51, scene=2");
    }

    #[test]
    fn only_save_and_export_are_exports() {
        assert!(
            Command::SaveSession {
                path: PathBuf::from("out.pse")
            }
            .is_export()
        );
        assert!(!Command::SetLoop(false).is_export());
    }

    #[test]
    fn video_export_sets_fps_before_produce() {
        let cmd = Command::ExportVideo(VideoExport {
            path: PathBuf::from("movie.mp4"),
            mode: RenderMode::Ray,
            quality: 90,
            width: 1920,
            height: 1080,
            framerate: 24.0,
        });
        let text = cmd.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "set movie_fps, 24");
        assert!(lines[1].starts_with("movie.produce \"movie.mp4\", mode=ray, quality=90"));
    }

    #[test]
    fn paths_with_commas_stay_one_argument() {
        let load = Command::LoadFrame {
            path: PathBuf::from("runs/a,b/frame_1.pdb"),
            object: "luke".to_string(),
        };
        assert_eq!(load.to_string(), "load \"runs/a,b/frame_1.pdb\", luke");

        let save = Command::SaveSession {
            path: PathBuf::from("take 2, final.pse"),
        };
        assert_eq!(save.to_string(), "save \"take 2, final.pse\"");

        let odd = Command::SaveSession {
            path: PathBuf::from("say \"hi\".pse"),
        };
        assert_eq!(odd.to_string(), "save 'say \"hi\".pse'");
    }

    #[test]
    fn renders_rock() {
        let rock = Command::Rock {
            first: FrameIndex(1),
            last: FrameIndex(90),
            angle: 30.0,
            phase: 0.0,
            looped: true,
            axis: Axis::Y,
        };
        assert_eq!(rock.to_string(), "movie.rock 1, 90, 30, 0, 1, y");
    }
}
