use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::{
    compile::timeline::Timeline,
    diagnostics::{Diagnostics, Origin},
    engine::{Command, Engine, VideoExport},
    foundation::{
        core::FrameIndex,
        error::{MovieError, MovieResult},
    },
    produce::settings::{OutputFormat, ProductionSettings},
};

/// Commits an accumulated [`Timeline`] to the engine and exports it.
pub struct TimelineProducer<'a> {
    timeline: &'a Timeline,
}

impl<'a> TimelineProducer<'a> {
    pub fn new(timeline: &'a Timeline) -> Self {
        Self { timeline }
    }

    /// Resolve settings, allocate the timeline, replay every entry in append order, then save
    /// or export.
    ///
    /// Entries are replayed as-is, so a later binding for the same frame and object replaces
    /// an earlier one inside the engine. A failing export surfaces as
    /// [`MovieError::ProductionFailed`] and is not retried.
    #[tracing::instrument(skip_all, fields(entries = self.timeline.len()))]
    pub fn produce(
        &self,
        raw: &Map<String, Value>,
        engine: &mut dyn Engine,
        diags: &mut Diagnostics,
    ) -> MovieResult<ProductionSettings> {
        let (settings, corrections) = ProductionSettings::resolve(raw)?;
        diags.extend(corrections);

        engine.execute(Command::AllocateTimeline {
            frames: settings.frame_count,
        })?;
        engine.execute(Command::SetLoop(false))?;
        engine.execute(Command::SetFramerate(settings.framerate))?;

        let mut bound = HashSet::<(FrameIndex, &str)>::new();
        let mut beyond = 0usize;
        for entry in self.timeline.entries() {
            if entry.frame.0 > settings.frame_count {
                beyond += 1;
            }
            if let Some(b) = &entry.binding
                && !bound.insert((entry.frame, b.object.as_str()))
            {
                tracing::debug!(
                    frame = %entry.frame,
                    object = %b.object,
                    scene = %entry.scene,
                    "later binding overrides earlier one"
                );
            }
            engine.execute(Command::BindFrame {
                frame: entry.frame,
                scene: entry.scene.clone(),
                binding: entry.binding.clone(),
            })?;
        }
        if beyond > 0 {
            diags.push(
                Origin::Production,
                format!(
                    "{beyond} timeline entries lie beyond frame_count {} and will not be shown.",
                    settings.frame_count
                ),
            );
        }

        let path = settings.output_path();
        let export = match settings.format {
            OutputFormat::Session => Command::SaveSession { path },
            OutputFormat::Video => Command::ExportVideo(VideoExport {
                path,
                mode: settings.mode,
                quality: settings.quality,
                width: settings.width,
                height: settings.height,
                framerate: settings.framerate,
            }),
        };
        engine.execute(export).map_err(|e| match e {
            MovieError::ProductionFailed(_) => e,
            other => MovieError::production(other.to_string()),
        })?;

        tracing::info!(
            format = ?settings.format,
            path = %settings.output_path().display(),
            frames = settings.frame_count,
            "movie produced"
        );
        Ok(settings)
    }
}
