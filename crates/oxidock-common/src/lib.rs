//! oxidock-common — Shared error taxonomy and settings used across all oxidock crates.

pub mod config;
pub mod error;

pub use config::DockSettings;
pub use error::{OxidockError, Result};
