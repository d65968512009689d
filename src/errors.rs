use std::path::PathBuf;
use thiserror::Error;

/// Failure to extract members from class source.
///
/// `ClassNotFound` is a recoverable sentinel: the composer turns it into a
/// placeholder line instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("Could not find class declaration")]
    ClassNotFound,
}

#[derive(Debug, Error)]
pub enum LitmusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{kind} file not found: {}", path.display())]
    MissingFile { kind: &'static str, path: PathBuf },

    #[error("Discovery failed in {}: {reason}", dir.display())]
    Discovery { dir: PathBuf, reason: String },

    #[error("Config error in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("Duplicate output {}: {first} and {second} share a class name", path.display())]
    DuplicateOutput { path: PathBuf, first: String, second: String },

    #[error("No component pairs found under {}", dir.display())]
    NoComponents { dir: PathBuf },

    #[error("{failures} component(s) could not be processed")]
    BatchFailed { failures: usize },

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),
}
