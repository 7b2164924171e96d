//! Binding pocket detection boundary.
//!
//! The workflow only needs an ordered list of candidate pockets with their
//! axis-aligned bounds and coordinate sets; how they are found is the
//! detector's business. The shipping detector wraps fpocket.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use oxidock_common::{OxidockError, Result};
use oxidock_mol::{geometry, Structure};

/// A candidate binding region on the receptor surface.
#[derive(Debug, Clone)]
pub struct Pocket {
    /// Per-axis `(min, max)` bounds of the pocket.
    pub bounds: [(f64, f64); 3],
    /// Serials of the receptor atoms lining the pocket.
    pub atom_indices: Vec<usize>,
    /// Coordinates of those atoms.
    pub coords: Vec<[f64; 3]>,
}

/// Common interface for pocket detectors.
///
/// Implementations return candidates in their own preference order; callers
/// rely on that order being deterministic for a given input.
#[async_trait]
pub trait PocketFinder: Send + Sync {
    async fn find_pockets(&self, protein: &Path, ligand: &Path) -> Result<Vec<Pocket>>;
}

/// Detector wrapping the fpocket binary.
pub struct FpocketFinder {
    executable: PathBuf,
}

impl FpocketFinder {
    pub fn new() -> Self {
        Self {
            executable: PathBuf::from("fpocket"),
        }
    }

    /// Use a specific fpocket binary instead of whatever is on PATH.
    pub fn with_executable<P: AsRef<Path>>(executable: P) -> Self {
        Self {
            executable: executable.as_ref().to_path_buf(),
        }
    }
}

impl Default for FpocketFinder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PocketFinder for FpocketFinder {
    async fn find_pockets(&self, protein: &Path, _ligand: &Path) -> Result<Vec<Pocket>> {
        info!("Running fpocket on {:?}", protein);

        let output = Command::new(&self.executable)
            .arg("-f")
            .arg(protein)
            .output()
            .await
            .map_err(|e| OxidockError::PocketDetection(format!("failed to launch fpocket: {}", e)))?;

        if !output.status.success() {
            return Err(OxidockError::PocketDetection(format!(
                "fpocket failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        // fpocket writes its results next to the input, in <stem>_out/pockets.
        let stem = protein
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("protein");
        let pockets_dir = protein
            .with_file_name(format!("{}_out", stem))
            .join("pockets");
        if !pockets_dir.is_dir() {
            return Err(OxidockError::PocketDetection(format!(
                "fpocket output directory not found: {:?}",
                pockets_dir
            )));
        }

        let mut indexed: Vec<(usize, PathBuf)> = std::fs::read_dir(&pockets_dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let path = entry.path();
                let name = path.file_name()?.to_str()?;
                pocket_index(name).map(|i| (i, path))
            })
            .collect();
        indexed.sort_by_key(|(i, _)| *i);

        let mut pockets = Vec::with_capacity(indexed.len());
        for (index, path) in indexed {
            let structure = Structure::load(&path)?;
            let coords = structure.coords();
            let bounds = geometry::axis_bounds(&coords).ok_or_else(|| {
                OxidockError::PocketDetection(format!("pocket {} has no atoms", index))
            })?;
            debug!("Pocket {}: {} atoms", index, coords.len());
            pockets.push(Pocket {
                bounds,
                atom_indices: structure.atoms.iter().map(|a| a.serial).collect(),
                coords,
            });
        }
        Ok(pockets)
    }
}

/// Pocket number from an fpocket atom-file name (`pocket<N>_atm.pdb`).
fn pocket_index(file_name: &str) -> Option<usize> {
    let rest = file_name.strip_prefix("pocket")?;
    let digits = rest.strip_suffix("_atm.pdb")?;
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pocket_index_parsing() {
        assert_eq!(pocket_index("pocket1_atm.pdb"), Some(1));
        assert_eq!(pocket_index("pocket12_atm.pdb"), Some(12));
        assert_eq!(pocket_index("pocket1_vert.pqr"), None);
        assert_eq!(pocket_index("info.txt"), None);
    }

    #[test]
    fn test_pocket_index_orders_numerically() {
        let mut names = vec!["pocket10_atm.pdb", "pocket2_atm.pdb", "pocket1_atm.pdb"];
        names.sort_by_key(|n| pocket_index(n).unwrap());
        assert_eq!(
            names,
            vec!["pocket1_atm.pdb", "pocket2_atm.pdb", "pocket10_atm.pdb"]
        );
    }
}
