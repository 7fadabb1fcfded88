use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    engine::{Command, Engine},
    foundation::error::{MovieError, MovieResult},
};

/// Engine that records every command and renders the log as a PyMOL command script.
///
/// Without an output path it is a pure in-memory recorder (used for dry runs and tests).
/// With one, each export command flushes the full script to disk.
#[derive(Debug, Default)]
pub struct PmlScriptEngine {
    commands: Vec<Command>,
    states: HashMap<String, usize>,
    out_path: Option<PathBuf>,
}

impl PmlScriptEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: Some(out_path.into()),
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn out_path(&self) -> Option<&Path> {
        self.out_path.as_deref()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for cmd in &self.commands {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "{cmd}");
        }
        out
    }

    fn flush(&self) -> MovieResult<()> {
        let Some(path) = &self.out_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create script dir '{}'", parent.display()))?;
        }
        std::fs::write(path, self.render())
            .with_context(|| format!("write script '{}'", path.display()))?;
        tracing::info!(path = %path.display(), commands = self.commands.len(), "wrote script");
        Ok(())
    }
}

impl Engine for PmlScriptEngine {
    fn execute(&mut self, command: Command) -> MovieResult<()> {
        if let Command::LoadFrame { object, .. } = &command {
            *self.states.entry(object.clone()).or_default() += 1;
        }
        let export = command.is_export();
        self.commands.push(command);
        if export {
            self.flush()
                .map_err(|e| MovieError::production(format!("{e:#}")))?;
        }
        Ok(())
    }

    fn count_states(&self, object: &str) -> usize {
        self.states.get(object).copied().unwrap_or(0)
    }
}
