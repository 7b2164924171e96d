//! Search region resolution.
//!
//! Three ways to pick where the engine searches, in fixed precedence order:
//! an explicit caller-supplied region always wins; otherwise either the
//! whole receptor padded by [`BOX_PADDING`], or the first pocket the
//! detector proposes.

use std::path::Path;

use tracing::{debug, info};

use crate::pocket::PocketFinder;
use oxidock_common::{OxidockError, Result};
use oxidock_mol::{geometry, Structure};

/// Padding added to each axis of the receptor extent when docking against
/// the whole molecule.
pub const BOX_PADDING: f64 = 5.0;

/// The docking search volume: a centroid and per-axis box sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRegion {
    pub center: [f64; 3],
    pub size: [f64; 3],
}

impl SearchRegion {
    /// Build a region, enforcing the invariants: finite centroid, strictly
    /// positive finite sizes.
    pub fn new(center: [f64; 3], size: [f64; 3]) -> Result<Self> {
        if center.iter().any(|v| !v.is_finite()) {
            return Err(OxidockError::InvalidRegion(format!(
                "centroid must be finite, got {:?}",
                center
            )));
        }
        if size.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(OxidockError::InvalidRegion(format!(
                "box dimensions must be strictly positive, got {:?}",
                size
            )));
        }
        Ok(Self { center, size })
    }
}

/// Resolves the search region for one docking job.
pub struct RegionResolver {
    finder: Box<dyn PocketFinder>,
    detect_pockets: bool,
}

impl RegionResolver {
    pub fn new(finder: Box<dyn PocketFinder>, detect_pockets: bool) -> Self {
        Self {
            finder,
            detect_pockets,
        }
    }

    /// Determine the search region for `protein`/`ligand`.
    ///
    /// When both `centroid` and `box_dims` are given they are used as-is
    /// (beyond the positivity check), regardless of pocket detection.
    pub async fn resolve(
        &self,
        protein: &Path,
        ligand: &Path,
        centroid: Option<[f64; 3]>,
        box_dims: Option<[f64; 3]>,
    ) -> Result<SearchRegion> {
        if let (Some(center), Some(size)) = (centroid, box_dims) {
            debug!("Using caller-supplied search region");
            return SearchRegion::new(center, size);
        }

        if !self.detect_pockets {
            // Coarse fallback: search the receptor's whole bounding box.
            let coords = Structure::load(protein)?.coords();
            let center = geometry::centroid(&coords).ok_or_else(|| OxidockError::MoleculeLoad {
                path: protein.to_path_buf(),
                reason: "no coordinates".to_string(),
            })?;
            let range = geometry::axis_range(&coords).unwrap_or_default();
            let size = [
                range[0] + BOX_PADDING,
                range[1] + BOX_PADDING,
                range[2] + BOX_PADDING,
            ];
            info!(
                "Docking against whole receptor: center {:?}, box {:?}",
                center, size
            );
            return SearchRegion::new(center, size);
        }

        info!("About to find putative binding pockets");
        let pockets = self.finder.find_pockets(protein, ligand).await?;
        if pockets.is_empty() {
            return Err(OxidockError::PocketDetection(
                "detector returned no candidate pockets".to_string(),
            ));
        }
        debug!("Detector proposed {} pockets", pockets.len());

        // Fixed policy: the detector's first candidate, never merged or
        // re-ranked. Selecting anything else is an extension point.
        let pocket = &pockets[0];
        let center = geometry::centroid(&pocket.coords).ok_or_else(|| {
            OxidockError::PocketDetection("selected pocket has no coordinates".to_string())
        })?;
        let size = [
            (pocket.bounds[0].1 - pocket.bounds[0].0) / 2.0,
            (pocket.bounds[1].1 - pocket.bounds[1].0) / 2.0,
            (pocket.bounds[2].1 - pocket.bounds[2].0) / 2.0,
        ];
        info!("Selected pocket: center {:?}, box {:?}", center, size);
        SearchRegion::new(center, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pocket::Pocket;
    use async_trait::async_trait;

    struct StubFinder {
        pockets: Vec<Pocket>,
    }

    #[async_trait]
    impl PocketFinder for StubFinder {
        async fn find_pockets(&self, _protein: &Path, _ligand: &Path) -> Result<Vec<Pocket>> {
            Ok(self.pockets.clone())
        }
    }

    fn pocket(offset: f64) -> Pocket {
        Pocket {
            bounds: [
                (offset, offset + 4.0),
                (offset, offset + 6.0),
                (offset, offset + 8.0),
            ],
            atom_indices: vec![1, 2],
            coords: vec![
                [offset, offset, offset],
                [offset + 4.0, offset + 6.0, offset + 8.0],
            ],
        }
    }

    fn resolver(pockets: Vec<Pocket>, detect: bool) -> RegionResolver {
        RegionResolver::new(Box::new(StubFinder { pockets }), detect)
    }

    const PROTEIN_PDB: &str = "\
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  ALA A   1      10.000  20.000   5.000  1.00  0.00           C
END
";

    #[tokio::test]
    async fn test_explicit_region_wins_over_detection() {
        let r = resolver(vec![pocket(0.0)], true);
        let region = r
            .resolve(
                Path::new("prot.pdb"),
                Path::new("lig.sdf"),
                Some([1.0, 2.0, 3.0]),
                Some([10.0, 11.0, 12.0]),
            )
            .await
            .unwrap();
        assert_eq!(region.center, [1.0, 2.0, 3.0]);
        assert_eq!(region.size, [10.0, 11.0, 12.0]);
    }

    #[tokio::test]
    async fn test_explicit_region_rejects_nonpositive_box() {
        let r = resolver(vec![], false);
        let err = r
            .resolve(
                Path::new("prot.pdb"),
                Path::new("lig.sdf"),
                Some([0.0, 0.0, 0.0]),
                Some([10.0, -1.0, 12.0]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OxidockError::InvalidRegion(_)));
    }

    #[tokio::test]
    async fn test_whole_receptor_fallback_pads_each_axis() {
        let dir = tempfile::tempdir().unwrap();
        let protein = dir.path().join("prot.pdb");
        std::fs::write(&protein, PROTEIN_PDB).unwrap();

        let r = resolver(vec![], false);
        let region = r
            .resolve(&protein, Path::new("lig.sdf"), None, None)
            .await
            .unwrap();
        assert_eq!(region.size, [15.0, 25.0, 10.0]);
        assert_eq!(region.center, [5.0, 10.0, 2.5]);
    }

    #[tokio::test]
    async fn test_first_pocket_selected_deterministically() {
        let first = pocket(0.0);
        let expected = {
            let r = resolver(vec![first.clone(), pocket(50.0), pocket(100.0)], true);
            r.resolve(Path::new("p.pdb"), Path::new("l.sdf"), None, None)
                .await
                .unwrap()
        };
        // Reordering everything after index 0 changes nothing.
        let r = resolver(vec![first, pocket(100.0), pocket(50.0)], true);
        let region = r
            .resolve(Path::new("p.pdb"), Path::new("l.sdf"), None, None)
            .await
            .unwrap();
        assert_eq!(region, expected);
        assert_eq!(region.center, [2.0, 3.0, 4.0]);
        assert_eq!(region.size, [2.0, 3.0, 4.0]);
    }

    #[tokio::test]
    async fn test_empty_pocket_list_is_an_error() {
        let r = resolver(vec![], true);
        let err = r
            .resolve(Path::new("p.pdb"), Path::new("l.sdf"), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, OxidockError::PocketDetection(_)));
    }
}
