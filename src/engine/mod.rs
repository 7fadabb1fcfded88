//! Engine capability the compiler drives.
//!
//! The visualization engine is a single-threaded, globally-stateful command sink. The compiler
//! only talks to it through [`Engine`], so tests can substitute a recording engine and the CLI
//! can render the same command stream into a PyMOL script.

pub mod command;
pub mod pymol;
pub mod script;

use crate::foundation::error::MovieResult;

pub use command::{Command, RenderMode, StateBinding, VideoExport};

pub trait Engine {
    /// Issue one command. Commands are applied in call order.
    fn execute(&mut self, command: Command) -> MovieResult<()>;

    /// Number of trajectory states currently loaded into `object`.
    fn count_states(&self, object: &str) -> usize;
}
