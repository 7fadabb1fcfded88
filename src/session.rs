use std::process::ExitCode;

use crate::{
    compile::{
        compiler::{CompileOpts, SceneCompiler},
        timeline::Timeline,
    },
    diagnostics::{Diagnostic, Diagnostics},
    engine::Engine,
    foundation::error::{MovieError, MovieResult},
    produce::{producer::TimelineProducer, settings::ProductionSettings},
    scene::model::MovieConfig,
};

/// Outcome of a full run: every diagnostic, the timeline as far as it got, and the raised
/// condition if any.
#[derive(Debug)]
pub struct Report {
    pub diagnostics: Vec<Diagnostic>,
    pub timeline: Timeline,
    pub settings: Option<ProductionSettings>,
    pub error: Option<MovieError>,
}

impl Report {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// Diagnostics are warnings; only a raised condition fails the run.
    pub fn exit_code(&self) -> ExitCode {
        if self.succeeded() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Set up every object, compile every scene in declaration order, then produce.
///
/// Stops at the first raised condition. Whatever was already issued to `engine` stays issued;
/// there is no rollback.
pub fn compile(config: &MovieConfig, engine: &mut dyn Engine, opts: &CompileOpts) -> Report {
    let mut diags = Diagnostics::new();
    let mut compiler = SceneCompiler::new(opts.clone());

    let outcome = run(config, engine, &mut compiler, &mut diags);
    if let Err(e) = &outcome {
        tracing::error!(error = %e, "run aborted");
    }
    if !diags.is_empty() {
        tracing::info!(count = diags.len(), "run finished with diagnostics");
    }

    let (settings, error) = match outcome {
        Ok(s) => (Some(s), None),
        Err(e) => (None, Some(e)),
    };
    Report {
        diagnostics: diags.into_vec(),
        timeline: compiler.into_timeline(),
        settings,
        error,
    }
}

fn run(
    config: &MovieConfig,
    engine: &mut dyn Engine,
    compiler: &mut SceneCompiler,
    diags: &mut Diagnostics,
) -> MovieResult<ProductionSettings> {
    config.validate()?;

    for setup in &config.setup {
        compiler.setup_object(setup, engine)?;
    }
    for scene in &config.scenes {
        compiler.setup_scene(scene, engine, diags)?;
    }

    TimelineProducer::new(compiler.timeline()).produce(&config.produce, engine, diags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::script::PmlScriptEngine;

    #[test]
    fn empty_config_fails_on_missing_frame_count() {
        let config = MovieConfig::default();
        let mut engine = PmlScriptEngine::new();
        let report = compile(&config, &mut engine, &CompileOpts::default());

        assert!(!report.succeeded());
        assert!(matches!(report.error, Some(MovieError::Config(_))));
        assert!(report.timeline.is_empty());
    }

    #[test]
    fn camera_only_movie_succeeds() {
        let config = MovieConfig::from_json_str(
            r#"{
                "scenes": [
                    { "scene": 1, "frame": 1, "camera": [ { "turn": { "axis": "y", "angle": 90 } } ] },
                    { "scene": 2, "frame": 31, "camera": [ { "zoom": { "selection": "all" } } ] }
                ],
                "produce": { "filename": "cam", "mode": "normal", "width": 64, "height": 64,
                             "framerate": 30, "quality": 50, "format": "session", "frame_count": 60 }
            }"#,
        )
        .unwrap();
        let mut engine = PmlScriptEngine::new();
        let report = compile(&config, &mut engine, &CompileOpts::default());

        assert!(report.succeeded(), "{:?}", report.error);
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.timeline.len(), 2);
        assert_eq!(report.timeline.boundary_count(), 2);
        assert_eq!(report.settings.unwrap().frame_count, 60);
    }
}
