//! Pose-generation orchestration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::conf::DockingJobConfig;
use crate::engine::VinaEngine;
use crate::pocket::{FpocketFinder, PocketFinder};
use crate::region::RegionResolver;
use oxidock_common::{DockSettings, OxidockError, Result};
use oxidock_mol::{MoleculePreparer, ObabelPreparer};

/// Paths to the docked complex: the hydrogenated receptor for downstream
/// reuse and the engine-native docked ligand.
#[derive(Debug, Clone)]
pub struct DockingResult {
    pub hydrogenated_receptor: PathBuf,
    pub docked_ligand: PathBuf,
}

/// The abstract pose-generation capability. Alternative engines implement
/// this same contract.
#[async_trait]
pub trait PoseGenerator: Send + Sync {
    /// Generate the docked complex and return the output file paths.
    async fn generate_poses(
        &self,
        protein: &Path,
        ligand: &Path,
        out_dir: Option<&Path>,
    ) -> Result<DockingResult>;
}

/// One docking job.
///
/// `centroid`/`box_dims` override region resolution when both are present.
/// With `out_dir` unset, a fresh uniquely-named directory is created and
/// left in place afterwards; cleaning it up is the caller's business.
#[derive(Debug, Clone, Default)]
pub struct DockingRequest {
    pub protein: PathBuf,
    pub ligand: PathBuf,
    pub centroid: Option<[f64; 3]>,
    pub box_dims: Option<[f64; 3]>,
    pub dry_run: bool,
    pub out_dir: Option<PathBuf>,
}

/// Pose generation via AutoDock Vina.
///
/// The stage order is fixed: resolve search region, prepare receptor,
/// prepare ligand, write config, invoke engine. Collaborators are injected
/// so the workflow can run against stand-ins; [`VinaPoseGenerator::new`]
/// wires the shipping ones.
pub struct VinaPoseGenerator {
    engine: VinaEngine,
    preparer: Box<dyn MoleculePreparer>,
    resolver: RegionResolver,
    exhaustiveness: Option<u32>,
}

impl VinaPoseGenerator {
    /// Default wiring: Open Babel preparation, fpocket detection, the
    /// engine binary at `vina_path` (see `install::ensure_installed`).
    pub fn new<P: AsRef<Path>>(vina_path: P, settings: &DockSettings) -> Self {
        Self::with_collaborators(
            vina_path,
            Box::new(ObabelPreparer::new()),
            Box::new(FpocketFinder::new()),
            settings,
        )
    }

    /// Wire explicit collaborators.
    pub fn with_collaborators<P: AsRef<Path>>(
        vina_path: P,
        preparer: Box<dyn MoleculePreparer>,
        finder: Box<dyn PocketFinder>,
        settings: &DockSettings,
    ) -> Self {
        let mut engine = VinaEngine::new(vina_path);
        if let Some(secs) = settings.engine_timeout_secs {
            engine = engine.with_timeout(Duration::from_secs(secs));
        }
        Self {
            engine,
            preparer,
            resolver: RegionResolver::new(finder, settings.detect_pockets),
            exhaustiveness: settings.exhaustiveness,
        }
    }

    /// Run the full workflow for one request.
    pub async fn generate(&self, request: &DockingRequest) -> Result<DockingResult> {
        let work_dir = match &request.out_dir {
            Some(dir) => dir.clone(),
            // Never deleted here; the caller owns the directory's lifetime.
            None => tempfile::Builder::new()
                .prefix("oxidock-")
                .tempdir()?
                .keep(),
        };
        info!(
            "Docking {:?} against {:?} in {:?}",
            request.ligand, request.protein, work_dir
        );

        let region = self
            .resolver
            .resolve(
                &request.protein,
                &request.ligand,
                request.centroid,
                request.box_dims,
            )
            .await?;

        let receptor = self
            .preparer
            .prepare_receptor(&request.protein, &work_dir)
            .await?;
        let ligand = self
            .preparer
            .prepare_ligand(&request.ligand, &work_dir)
            .await?;

        let conf_path = work_dir.join("conf.txt");
        DockingJobConfig {
            receptor: receptor.engine_ready.clone(),
            ligand: ligand.engine_ready.clone(),
            region,
            exhaustiveness: self.exhaustiveness,
        }
        .write(&conf_path)?;
        debug!("Wrote engine config to {:?}", conf_path);

        let ligand_stem = file_stem(&request.ligand)?;
        let log_path = work_dir.join(format!("{}_log.txt", ligand_stem));
        let docked_path = work_dir.join(format!("{}_docked.pdbqt", ligand_stem));

        self.engine
            .dock(&conf_path, &log_path, &docked_path, request.dry_run)
            .await?;

        Ok(DockingResult {
            hydrogenated_receptor: receptor.hydrogenated,
            docked_ligand: docked_path,
        })
    }
}

#[async_trait]
impl PoseGenerator for VinaPoseGenerator {
    async fn generate_poses(
        &self,
        protein: &Path,
        ligand: &Path,
        out_dir: Option<&Path>,
    ) -> Result<DockingResult> {
        let request = DockingRequest {
            protein: protein.to_path_buf(),
            ligand: ligand.to_path_buf(),
            out_dir: out_dir.map(Path::to_path_buf),
            ..Default::default()
        };
        self.generate(&request).await
    }
}

fn file_stem(path: &Path) -> Result<&str> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| OxidockError::MoleculeLoad {
            path: path.to_path_buf(),
            reason: "unusable file name".to_string(),
        })
}
