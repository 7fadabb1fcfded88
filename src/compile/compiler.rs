use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};

use crate::{
    action::{parse_camera_action, parse_object_action},
    compile::timeline::{SceneEntry, Timeline},
    diagnostics::{Diagnostics, Origin},
    engine::{Command, Engine},
    foundation::{
        core::FrameIndex,
        error::{MovieError, MovieResult},
    },
    scene::model::{ObjectSetup, SceneDescription, SceneObject},
    trajectory::stream::{DEFAULT_FRAME_EXTENSION, TrajectoryStream},
};

/// Where trajectory frames are found on disk.
#[derive(Clone, Debug)]
pub struct CompileOpts {
    /// Relative trajectory directories are resolved against this.
    pub frames_root: PathBuf,
    pub frame_extension: String,
}

impl Default for CompileOpts {
    fn default() -> Self {
        Self {
            frames_root: PathBuf::from("."),
            frame_extension: DEFAULT_FRAME_EXTENSION.to_string(),
        }
    }
}

/// Turns scene descriptions into engine commands and timeline entries, one scene at a time.
///
/// Owns one [`TrajectoryStream`] per object name. Streams are created on first reference and
/// live until the compiler is dropped.
#[derive(Debug)]
pub struct SceneCompiler {
    opts: CompileOpts,
    streams: BTreeMap<String, TrajectoryStream>,
    timeline: Timeline,
}

impl SceneCompiler {
    pub fn new(opts: CompileOpts) -> Self {
        Self {
            opts,
            streams: BTreeMap::new(),
            timeline: Timeline::new(),
        }
    }

    /// Open a declared object's trajectory and pre-stream `frame_count` states.
    pub fn setup_object(&mut self, setup: &ObjectSetup, engine: &mut dyn Engine) -> MovieResult<()> {
        if self.streams.contains_key(&setup.name) {
            return Err(MovieError::config(format!(
                "object '{}' is already set up",
                setup.name
            )));
        }
        let dir = resolve_dir(&self.opts.frames_root, &setup.directory);
        let mut stream = TrajectoryStream::open(&setup.name, &dir, &self.opts.frame_extension)?;
        stream.load_up_to(setup.frame_count, engine)?;
        tracing::info!(
            name = %setup.name,
            loaded = stream.loaded_count(),
            available = stream.available(),
            "object set up"
        );
        self.streams.insert(setup.name.clone(), stream);
        Ok(())
    }

    /// Register an already-built stream. Replaces any stream with the same name.
    pub fn insert_stream(&mut self, stream: TrajectoryStream) {
        self.streams.insert(stream.name().to_string(), stream);
    }

    pub fn stream(&self, name: &str) -> Option<&TrajectoryStream> {
        self.streams.get(name)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }

    #[tracing::instrument(skip_all, fields(scene = %scene.key, frame = %scene.frame))]
    pub fn setup_scene(
        &mut self,
        scene: &SceneDescription,
        engine: &mut dyn Engine,
        diags: &mut Diagnostics,
    ) -> MovieResult<()> {
        let origin = || Origin::Scene(scene.key.clone());

        if scene.frame < FrameIndex::FIRST {
            diags.push(origin(), "scene frame 0 is before the first frame (frames are 1-based).");
        }
        if let Some(prev) = self.timeline.last_scene_frame()
            && scene.frame < prev
        {
            diags.push(
                origin(),
                format!(
                    "scene starts at frame {} but the previous scene starts at frame {prev}.",
                    scene.frame
                ),
            );
        }

        engine.execute(Command::StoreScene {
            key: scene.key.clone(),
        })?;

        for obj in &scene.objects {
            let stream = self.resolve_stream(obj)?;
            stream.load_up_to(obj.state, engine)?;

            for raw in &obj.actions {
                match parse_object_action(raw) {
                    Ok(action) => {
                        for cmd in action.commands(&obj.name) {
                            engine.execute(cmd)?;
                        }
                    }
                    Err(issue) => diags.push(origin(), issue.to_string()),
                }
            }

            // State 0 is the "no trajectory binding" marker, never a real frame.
            if obj.state == 0 {
                diags.push(
                    origin(),
                    format!(
                        "object \"{}\" has state 0 (states are 1-based); no binding is stored.",
                        obj.name
                    ),
                );
                continue;
            }
            self.timeline.push(SceneEntry::object(
                &scene.key,
                scene.frame,
                &obj.name,
                obj.state,
            ));
        }

        if let Some(camera) = &scene.camera {
            for raw in camera {
                match parse_camera_action(raw) {
                    Ok(action) => engine.execute(action.command(scene.frame))?,
                    Err(issue) => diags.push(origin(), issue.to_string()),
                }
            }
        }

        self.timeline
            .push(SceneEntry::boundary(&scene.key, scene.frame));

        tracing::info!(objects = scene.objects.len(), "scene compiled");
        Ok(())
    }

    fn resolve_stream(&mut self, obj: &SceneObject) -> MovieResult<&mut TrajectoryStream> {
        match self.streams.entry(obj.name.clone()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let Some(directory) = &obj.directory else {
                    return Err(MovieError::config(format!(
                        "object '{}' is not set up and has no directory",
                        obj.name
                    )));
                };
                let dir = resolve_dir(&self.opts.frames_root, directory);
                let stream = TrajectoryStream::open(&obj.name, &dir, &self.opts.frame_extension)?;
                tracing::debug!(name = %obj.name, "stream created on first reference");
                Ok(e.insert(stream))
            }
        }
    }
}

fn resolve_dir(root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}
