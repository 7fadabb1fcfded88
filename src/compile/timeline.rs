use crate::{engine::StateBinding, foundation::core::FrameIndex};

/// One `(scene, frame, object, state)` binding. `binding` is `None` for scene boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneEntry {
    pub scene: String,
    pub frame: FrameIndex,
    pub binding: Option<StateBinding>,
}

impl SceneEntry {
    pub fn object(scene: &str, frame: FrameIndex, object: &str, state: usize) -> Self {
        Self {
            scene: scene.to_string(),
            frame,
            binding: Some(StateBinding {
                object: object.to_string(),
                state,
            }),
        }
    }

    pub fn boundary(scene: &str, frame: FrameIndex) -> Self {
        Self {
            scene: scene.to_string(),
            frame,
            binding: None,
        }
    }

    pub fn is_boundary(&self) -> bool {
        self.binding.is_none()
    }
}

/// Append-only list of scene entries, in the order scenes were compiled.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    entries: Vec<SceneEntry>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: SceneEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[SceneEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn boundary_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_boundary()).count()
    }

    /// Frame of the most recent scene boundary.
    pub fn last_scene_frame(&self) -> Option<FrameIndex> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.is_boundary())
            .map(|e| e.frame)
    }
}
