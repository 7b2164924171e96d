use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OxidockError {
    #[error("No docking engine build for this platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Failed to load molecule {path}: {reason}")]
    MoleculeLoad { path: PathBuf, reason: String },

    #[error("Unsupported molecule format: {0}")]
    UnsupportedFormat(String),

    #[error("Pocket detection failed: {0}")]
    PocketDetection(String),

    #[error("Docking engine exited with {status}: {stderr}")]
    EngineInvocation { status: String, stderr: String },

    #[error("Docking engine timed out after {seconds}s")]
    EngineTimeout { seconds: u64 },

    #[error("Invalid search region: {0}")]
    InvalidRegion(String),

    #[error("Download error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, OxidockError>;
