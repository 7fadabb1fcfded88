//! Object and camera actions.
//!
//! Actions arrive as single-key JSON objects, `{ "<tag>": { ...params } }`. Parsing turns them
//! into one of two closed families. Anything that can't be parsed comes back as an
//! [`ActionIssue`], which the compiler reports and skips.

use std::fmt;

use serde_json::Value;

use crate::{
    engine::Command,
    foundation::core::{Axis, FrameIndex},
};

pub const DEFAULT_ZOOM_ANIMATE: f64 = 1.0;
pub const SURFACE_STICKS_TRANSPARENCY: f64 = 0.5;
pub const DEFAULT_ROCK_ANGLE: f64 = 30.0;

#[derive(Clone, Debug, PartialEq)]
pub enum ObjectAction {
    Color {
        selection: String,
        color: String,
    },
    Representation {
        selection: String,
        representation: String,
    },
    Rotate {
        selection: String,
        axis: Axis,
        angle: f64,
    },
    Translate {
        selection: String,
        vector: [f64; 3],
    },
    SurfaceSticks {
        selection: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum CameraAction {
    Turn { axis: Axis, angle: f64 },
    Move { axis: Axis, magnitude: f64 },
    Zoom { selection: String, animate: f64 },
    Orient { selection: String },
    SetView { view: Vec<f64> },
    /// Full turn about `axis` between the scene-relative `frame` and the absolute `end`.
    Roll {
        frame: u64,
        end: u64,
        looped: bool,
        axis: Axis,
    },
    /// Swing back and forth by `angle` degrees between `frame` and `end`.
    Rock {
        frame: u64,
        end: u64,
        angle: f64,
        phase: f64,
        looped: bool,
        axis: Axis,
    },
}

/// Why an action entry was skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionIssue {
    NotSingleKey,
    Unknown { tag: String },
    BadParam { tag: String, param: &'static str },
}

impl fmt::Display for ActionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSingleKey => f.write_str("An action must be an object with exactly one key."),
            Self::Unknown { tag } => write!(f, "The choice \"{tag}\" is not recognized."),
            Self::BadParam { tag, param } => write!(
                f,
                "The choice \"{tag}\" has a missing or invalid \"{param}\" parameter."
            ),
        }
    }
}

type ParseResult<T> = Result<T, ActionIssue>;

fn split_tag(raw: &Value) -> ParseResult<(&str, &Value)> {
    match raw.as_object() {
        Some(map) if map.len() == 1 => {
            let (tag, params) = map.iter().next().ok_or(ActionIssue::NotSingleKey)?;
            Ok((tag.as_str(), params))
        }
        _ => Err(ActionIssue::NotSingleKey),
    }
}

pub fn parse_object_action(raw: &Value) -> ParseResult<ObjectAction> {
    let (tag, p) = split_tag(raw)?;
    let params = Params { tag, value: p };

    match tag {
        "color" => Ok(ObjectAction::Color {
            selection: params.string("selection")?,
            color: params.string("color")?,
        }),
        "representation" => Ok(ObjectAction::Representation {
            selection: params.string("selection")?,
            representation: params.string("representation")?,
        }),
        "rotate" => Ok(ObjectAction::Rotate {
            selection: params.string("selection")?,
            axis: params.axis("axis")?,
            angle: params.number("angle")?,
        }),
        "translate" => Ok(ObjectAction::Translate {
            selection: params.string("selection")?,
            vector: params.vec3("vector")?,
        }),
        "surface_sticks" => Ok(ObjectAction::SurfaceSticks {
            selection: params.string("selection")?,
        }),
        _ => Err(ActionIssue::Unknown {
            tag: tag.to_string(),
        }),
    }
}

pub fn parse_camera_action(raw: &Value) -> ParseResult<CameraAction> {
    let (tag, p) = split_tag(raw)?;
    let params = Params { tag, value: p };

    match tag {
        "turn" => Ok(CameraAction::Turn {
            axis: params.axis("axis")?,
            angle: params.number("angle")?,
        }),
        "move" => Ok(CameraAction::Move {
            axis: params.axis("axis")?,
            magnitude: params.number("magnitude")?,
        }),
        "zoom" => Ok(CameraAction::Zoom {
            selection: params.string("selection")?,
            animate: params
                .optional_number("animate")?
                .unwrap_or(DEFAULT_ZOOM_ANIMATE),
        }),
        "orient" => Ok(CameraAction::Orient {
            selection: params.string("selection")?,
        }),
        "set_view" => {
            let view = params.numbers("view")?;
            if view.len() != 18 {
                return Err(params.bad("view"));
            }
            Ok(CameraAction::SetView { view })
        }
        "roll" => Ok(CameraAction::Roll {
            frame: params.optional_frame("frame")?.unwrap_or(1),
            end: params.frame("end")?,
            looped: params.optional_flag("loop")?.unwrap_or(true),
            axis: params.optional_axis("axis")?.unwrap_or(Axis::Y),
        }),
        "rock" => Ok(CameraAction::Rock {
            frame: params.optional_frame("frame")?.unwrap_or(1),
            end: params.frame("end")?,
            angle: params
                .optional_number("angle")?
                .unwrap_or(DEFAULT_ROCK_ANGLE),
            phase: params.optional_number("phase")?.unwrap_or(0.0),
            looped: params.optional_flag("loop")?.unwrap_or(true),
            axis: params.optional_axis("axis")?.unwrap_or(Axis::Y),
        }),
        _ => Err(ActionIssue::Unknown {
            tag: tag.to_string(),
        }),
    }
}

impl ObjectAction {
    /// Engine commands for this action, targeting `<object> and <selection>`.
    pub fn commands(&self, object: &str) -> Vec<Command> {
        let target = |selection: &str| format!("{object} and {selection}");
        match self {
            Self::Color { selection, color } => vec![Command::SetColor {
                target: target(selection),
                color: color.clone(),
            }],
            Self::Representation {
                selection,
                representation,
            } => vec![Command::SetRepresentation {
                target: target(selection),
                representation: representation.clone(),
            }],
            Self::Rotate {
                selection,
                axis,
                angle,
            } => vec![Command::Rotate {
                target: target(selection),
                axis: *axis,
                angle: *angle,
            }],
            Self::Translate { selection, vector } => vec![Command::Translate {
                target: target(selection),
                vector: *vector,
            }],
            Self::SurfaceSticks { selection } => {
                let t = target(selection);
                vec![
                    Command::Hide {
                        target: object.to_string(),
                    },
                    Command::Show {
                        target: t.clone(),
                        representation: "surface".to_string(),
                    },
                    Command::Show {
                        target: t.clone(),
                        representation: "sticks".to_string(),
                    },
                    Command::SetTransparency {
                        target: t,
                        value: SURFACE_STICKS_TRANSPARENCY,
                    },
                ]
            }
        }
    }
}

impl CameraAction {
    /// Engine command for this action. `scene_frame` anchors the scene-relative start frame of
    /// `roll` and `rock`: `frame: 1` is the scene's own first frame.
    pub fn command(&self, scene_frame: FrameIndex) -> Command {
        let first = |offset: u64| FrameIndex(scene_frame.0 + offset.saturating_sub(1));
        match self {
            Self::Turn { axis, angle } => Command::TurnViewport {
                axis: *axis,
                angle: *angle,
            },
            Self::Move { axis, magnitude } => Command::MoveViewport {
                axis: *axis,
                magnitude: *magnitude,
            },
            Self::Zoom { selection, animate } => Command::ZoomViewport {
                selection: selection.clone(),
                animate: *animate,
            },
            Self::Orient { selection } => Command::OrientViewport {
                selection: selection.clone(),
            },
            Self::SetView { view } => Command::SetView { view: view.clone() },
            Self::Roll {
                frame,
                end,
                looped,
                axis,
            } => Command::Roll {
                first: first(*frame),
                last: FrameIndex(*end),
                looped: *looped,
                axis: *axis,
            },
            Self::Rock {
                frame,
                end,
                angle,
                phase,
                looped,
                axis,
            } => Command::Rock {
                first: first(*frame),
                last: FrameIndex(*end),
                angle: *angle,
                phase: *phase,
                looped: *looped,
                axis: *axis,
            },
        }
    }
}

struct Params<'a> {
    tag: &'a str,
    value: &'a Value,
}

impl Params<'_> {
    fn bad(&self, param: &'static str) -> ActionIssue {
        ActionIssue::BadParam {
            tag: self.tag.to_string(),
            param,
        }
    }

    fn string(&self, key: &'static str) -> ParseResult<String> {
        match self.value.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
            // Numeric selections/colors (e.g. `color: 4`) are passed through verbatim.
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(self.bad(key)),
        }
    }

    fn number(&self, key: &'static str) -> ParseResult<f64> {
        self.optional_number(key)?.ok_or_else(|| self.bad(key))
    }

    fn optional_number(&self, key: &'static str) -> ParseResult<Option<f64>> {
        match self.value.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v
                .as_f64()
                .filter(|x| x.is_finite())
                .map(Some)
                .ok_or_else(|| self.bad(key)),
        }
    }

    fn numbers(&self, key: &'static str) -> ParseResult<Vec<f64>> {
        let arr = self
            .value
            .get(key)
            .and_then(Value::as_array)
            .ok_or_else(|| self.bad(key))?;
        arr.iter()
            .map(|v| v.as_f64().filter(|x| x.is_finite()).ok_or_else(|| self.bad(key)))
            .collect()
    }

    fn vec3(&self, key: &'static str) -> ParseResult<[f64; 3]> {
        match self.numbers(key)?.as_slice() {
            [x, y, z] => Ok([*x, *y, *z]),
            _ => Err(self.bad(key)),
        }
    }

    fn frame(&self, key: &'static str) -> ParseResult<u64> {
        self.optional_frame(key)?.ok_or_else(|| self.bad(key))
    }

    fn optional_frame(&self, key: &'static str) -> ParseResult<Option<u64>> {
        match self.value.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v
                .as_u64()
                .filter(|n| *n > 0)
                .map(Some)
                .ok_or_else(|| self.bad(key)),
        }
    }

    // `loop` is a bool, or 0/1 as PyMOL writes it.
    fn optional_flag(&self, key: &'static str) -> ParseResult<Option<bool>> {
        match self.value.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(v) => match v.as_u64() {
                Some(0) => Ok(Some(false)),
                Some(1) => Ok(Some(true)),
                _ => Err(self.bad(key)),
            },
        }
    }

    fn axis(&self, key: &'static str) -> ParseResult<Axis> {
        self.optional_axis(key)?.ok_or_else(|| self.bad(key))
    }

    fn optional_axis(&self, key: &'static str) -> ParseResult<Option<Axis>> {
        match self.value.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v
                .as_str()
                .and_then(Axis::parse)
                .map(Some)
                .ok_or_else(|| self.bad(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_every_object_action() {
        assert_eq!(
            parse_object_action(&json!({ "color": { "selection": "chain A", "color": "red" } })),
            Ok(ObjectAction::Color {
                selection: "chain A".to_string(),
                color: "red".to_string()
            })
        );
        assert_eq!(
            parse_object_action(&json!({ "rotate": { "selection": "all", "axis": "x", "angle": 45 } })),
            Ok(ObjectAction::Rotate {
                selection: "all".to_string(),
                axis: Axis::X,
                angle: 45.0
            })
        );
        assert_eq!(
            parse_object_action(&json!({ "translate": { "selection": "chain A", "vector": [0, 10, 0] } })),
            Ok(ObjectAction::Translate {
                selection: "chain A".to_string(),
                vector: [0.0, 10.0, 0.0]
            })
        );
        assert!(matches!(
            parse_object_action(&json!({ "representation": { "selection": "all", "representation": "sticks" } })),
            Ok(ObjectAction::Representation { .. })
        ));
        assert!(matches!(
            parse_object_action(&json!({ "surface_sticks": { "selection": "resn LIG" } })),
            Ok(ObjectAction::SurfaceSticks { .. })
        ));
    }

    #[test]
    fn unknown_tag_reports_exact_message() {
        let issue = parse_object_action(&json!({ "reentation": { "selection": "all" } })).unwrap_err();
        assert_eq!(issue.to_string(), "The choice \"reentation\" is not recognized.");

        let issue = parse_camera_action(&json!({ "mve": { "axis": "x", "magnitude": 50 } })).unwrap_err();
        assert_eq!(issue.to_string(), "The choice \"mve\" is not recognized.");
    }

    #[test]
    fn families_are_disjoint() {
        let turn = json!({ "turn": { "axis": "y", "angle": 90 } });
        assert!(parse_camera_action(&turn).is_ok());
        assert_eq!(
            parse_object_action(&turn),
            Err(ActionIssue::Unknown {
                tag: "turn".to_string()
            })
        );
    }

    #[test]
    fn bad_params_name_the_parameter() {
        let issue = parse_camera_action(&json!({ "turn": { "axis": "w", "angle": 90 } })).unwrap_err();
        assert_eq!(
            issue.to_string(),
            "The choice \"turn\" has a missing or invalid \"axis\" parameter."
        );

        let issue =
            parse_object_action(&json!({ "translate": { "selection": "all", "vector": [1, 2] } }))
                .unwrap_err();
        assert_eq!(
            issue,
            ActionIssue::BadParam {
                tag: "translate".to_string(),
                param: "vector"
            }
        );
    }

    #[test]
    fn multi_key_entries_are_rejected() {
        let issue = parse_object_action(&json!({ "color": {}, "rotate": {} })).unwrap_err();
        assert_eq!(issue, ActionIssue::NotSingleKey);
        assert_eq!(parse_camera_action(&json!("turn")), Err(ActionIssue::NotSingleKey));
    }

    #[test]
    fn zoom_animate_defaults() {
        assert_eq!(
            parse_camera_action(&json!({ "zoom": { "selection": "chain A" } })),
            Ok(CameraAction::Zoom {
                selection: "chain A".to_string(),
                animate: DEFAULT_ZOOM_ANIMATE
            })
        );
    }

    #[test]
    fn set_view_needs_eighteen_numbers() {
        let view: Vec<f64> = (0..18).map(f64::from).collect();
        assert!(parse_camera_action(&json!({ "set_view": { "view": view } })).is_ok());
        assert!(parse_camera_action(&json!({ "set_view": { "view": [1, 2, 3] } })).is_err());
    }

    #[test]
    fn roll_and_rock_fill_pymol_defaults() {
        assert_eq!(
            parse_camera_action(&json!({ "roll": { "end": 120 } })),
            Ok(CameraAction::Roll {
                frame: 1,
                end: 120,
                looped: true,
                axis: Axis::Y
            })
        );
        assert_eq!(
            parse_camera_action(&json!({ "rock": { "frame": 5, "end": 60, "phase": 90, "loop": 0, "axis": "x" } })),
            Ok(CameraAction::Rock {
                frame: 5,
                end: 60,
                angle: DEFAULT_ROCK_ANGLE,
                phase: 90.0,
                looped: false,
                axis: Axis::X
            })
        );
    }

    #[test]
    fn roll_and_rock_reject_bad_params() {
        assert_eq!(
            parse_camera_action(&json!({ "roll": { "frame": 1 } })),
            Err(ActionIssue::BadParam {
                tag: "roll".to_string(),
                param: "end"
            })
        );
        assert_eq!(
            parse_camera_action(&json!({ "rock": { "end": 60, "loop": "yes" } })),
            Err(ActionIssue::BadParam {
                tag: "rock".to_string(),
                param: "loop"
            })
        );
    }

    #[test]
    fn roll_starts_relative_to_the_scene() {
        let roll = parse_camera_action(&json!({ "roll": { "frame": 10, "end": 200, "loop": false } }))
            .unwrap();
        let cmd = roll.command(FrameIndex(101));
        assert_eq!(
            cmd,
            Command::Roll {
                first: FrameIndex(110),
                last: FrameIndex(200),
                looped: false,
                axis: Axis::Y
            }
        );
        assert_eq!(cmd.to_string(), "movie.roll 110, 200, 0, y");
    }

    #[test]
    fn surface_sticks_expands_to_four_commands() {
        let action = ObjectAction::SurfaceSticks {
            selection: "resn LIG".to_string(),
        };
        let cmds = action.commands("luke");
        assert_eq!(
            cmds,
            vec![
                Command::Hide {
                    target: "luke".to_string()
                },
                Command::Show {
                    target: "luke and resn LIG".to_string(),
                    representation: "surface".to_string()
                },
                Command::Show {
                    target: "luke and resn LIG".to_string(),
                    representation: "sticks".to_string()
                },
                Command::SetTransparency {
                    target: "luke and resn LIG".to_string(),
                    value: 0.5
                },
            ]
        );
    }
}
