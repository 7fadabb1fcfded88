use std::path::PathBuf;

/// Convenience result type used across molmovie.
pub type MovieResult<T> = Result<T, MovieError>;

/// Raised conditions. Anything in here unwinds the current scene or production step.
///
/// Recoverable configuration issues never show up here; they are reported as
/// [`Diagnostic`](crate::Diagnostic)s instead.
#[derive(thiserror::Error, Debug)]
pub enum MovieError {
    /// A trajectory directory yielded no frame files.
    #[error("no trajectory found for '{name}' in '{}'", directory.display())]
    NoTrajectoryFound { name: String, directory: PathBuf },

    /// A frame file name lacks a parseable trailing `_<index>` suffix.
    #[error("invalid frame name '{}': expected a trailing numeric index", .0.display())]
    InvalidFrameName(PathBuf),

    /// A scene asked for a trajectory state past the end of the stream.
    #[error(
        "state {requested} is out of range for '{name}' ({available} frames available, {loaded} loaded)"
    )]
    OutOfRangeState {
        name: String,
        requested: usize,
        available: usize,
        loaded: usize,
    },

    /// The engine disagrees with a stream about how many states it holds.
    #[error("engine reports {actual} states for '{name}', stream loaded {expected}")]
    StateCountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// The final save/export primitive failed.
    #[error("production failed: {0}")]
    ProductionFailed(String),

    /// Configuration that has no safe default.
    #[error("configuration error: {0}")]
    Config(String),

    /// A non-export engine command failed.
    #[error("engine error: {0}")]
    Engine(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MovieError {
    /// Build a [`MovieError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`MovieError::Engine`] value.
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Build a [`MovieError::ProductionFailed`] value.
    pub fn production(msg: impl Into<String>) -> Self {
        Self::ProductionFailed(msg.into())
    }
}
