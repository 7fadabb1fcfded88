//! molmovie compiles a declarative movie description into a sequenced trajectory timeline.
//!
//! # Pipeline overview
//!
//! 1. **Setup**: each declared object gets a [`TrajectoryStream`] over its numbered frame files,
//!    pre-streamed to its declared state count.
//! 2. **Compile**: [`SceneCompiler::setup_scene`] runs once per scene, in order. It stores a
//!    scene checkpoint, streams object states on demand, dispatches object and camera actions,
//!    and appends `(scene, frame, object, state)` entries to the [`Timeline`].
//! 3. **Produce**: [`TimelineProducer::produce`] resolves production settings, commits the
//!    timeline and saves a session or exports a video.
//!
//! The visualization engine is reached only through the [`Engine`] trait. [`PmlScriptEngine`]
//! records commands and renders them as a PyMOL script.
//!
//! Unknown action tags and bad production options are reported as [`Diagnostic`]s and never
//! abort a run. Missing trajectories, bad frame names, out-of-range states and export failures
//! raise a [`MovieError`].
#![forbid(unsafe_code)]

mod action;
mod compile;
mod diagnostics;
mod engine;
mod foundation;
mod produce;
mod scene;
mod session;
mod trajectory;

pub use action::{ActionIssue, CameraAction, ObjectAction, parse_camera_action, parse_object_action};
pub use compile::compiler::{CompileOpts, SceneCompiler};
pub use compile::timeline::{SceneEntry, Timeline};
pub use diagnostics::{Diagnostic, Diagnostics, Origin};
pub use engine::pymol::{PYMOL_BIN, is_pymol_on_path, run_pymol};
pub use engine::script::PmlScriptEngine;
pub use engine::{Command, Engine, RenderMode, StateBinding, VideoExport};
pub use foundation::core::{Axis, FrameIndex};
pub use foundation::error::{MovieError, MovieResult};
pub use produce::producer::TimelineProducer;
pub use produce::settings::{OutputFormat, ProductionSettings};
pub use scene::model::{MovieConfig, ObjectSetup, SceneDescription, SceneObject};
pub use session::{Report, compile};
pub use trajectory::stream::{DEFAULT_FRAME_EXTENSION, FrameHandle, TrajectoryStream, frame_index};
