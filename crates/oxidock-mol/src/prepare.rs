//! Molecule preparation for the docking engine.
//!
//! The engine needs protonated, charge-annotated PDBQT input. Preparation is
//! behind a trait so the workflow can be exercised without an Open Babel
//! install; the shipping implementation shells out to `obabel`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::structure::Structure;
use oxidock_common::{OxidockError, Result};

/// Receptor artifacts: a hydrogenated copy for downstream reuse plus the
/// engine-format file referenced by the docking config.
#[derive(Debug, Clone)]
pub struct PreparedReceptor {
    pub coords: Vec<[f64; 3]>,
    pub hydrogenated: PathBuf,
    pub engine_ready: PathBuf,
}

/// Ligand artifact: engine-format file only.
#[derive(Debug, Clone)]
pub struct PreparedLigand {
    pub coords: Vec<[f64; 3]>,
    pub engine_ready: PathBuf,
}

/// Common interface for molecule preparation.
///
/// Hydrogen addition and partial-charge assignment are part of the contract,
/// not options: every implementation must emit structures the engine can
/// score.
#[async_trait]
pub trait MoleculePreparer: Send + Sync {
    /// Prepare a receptor, writing `<stem>_hyd.<ext>` and `<stem>.pdbqt`
    /// into `work_dir`.
    async fn prepare_receptor(&self, protein: &Path, work_dir: &Path) -> Result<PreparedReceptor>;

    /// Prepare a ligand, writing `<stem>.pdbqt` into `work_dir`.
    async fn prepare_ligand(&self, ligand: &Path, work_dir: &Path) -> Result<PreparedLigand>;
}

/// Preparer backed by Open Babel.
///
/// Receptors are converted rigid (`-xr`); both inputs get hydrogens and
/// Gasteiger partial charges. Receptor input policy is `.pdb` and ligand
/// input policy is `.sdf`; other formats are rejected up front rather than
/// passed through to obabel.
pub struct ObabelPreparer {
    executable: PathBuf,
}

impl ObabelPreparer {
    pub fn new() -> Self {
        Self {
            executable: PathBuf::from("obabel"),
        }
    }

    /// Use a specific obabel binary instead of whatever is on PATH.
    pub fn with_executable<P: AsRef<Path>>(executable: P) -> Self {
        Self {
            executable: executable.as_ref().to_path_buf(),
        }
    }

    /// Whether the obabel binary can be launched at all.
    pub async fn available(&self) -> bool {
        Command::new(&self.executable)
            .arg("-V")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await
            .is_ok()
    }

    async fn convert(&self, input: &Path, output: &Path, extra: &[&str]) -> Result<()> {
        debug!("Converting {:?} -> {:?}", input, output);
        let mut cmd = Command::new(&self.executable);
        cmd.arg(input)
            .arg("-O")
            .arg(output)
            .args(["-h", "--partialcharge", "gasteiger"])
            .args(extra);

        let out = cmd.output().await.map_err(|e| OxidockError::MoleculeLoad {
            path: input.to_path_buf(),
            reason: format!("failed to launch obabel: {}", e),
        })?;

        if !out.status.success() {
            return Err(OxidockError::MoleculeLoad {
                path: input.to_path_buf(),
                reason: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        if !output.exists() {
            return Err(OxidockError::MoleculeLoad {
                path: input.to_path_buf(),
                reason: format!("obabel produced no output at {:?}", output),
            });
        }
        Ok(())
    }
}

impl Default for ObabelPreparer {
    fn default() -> Self {
        Self::new()
    }
}

fn check_input(path: &Path, allowed_ext: &str) -> Result<(String, String)> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != allowed_ext {
        return Err(OxidockError::UnsupportedFormat(format!(
            "expected a .{} file, got {:?}",
            allowed_ext, path
        )));
    }
    if !path.exists() {
        return Err(OxidockError::MoleculeLoad {
            path: path.to_path_buf(),
            reason: "file not found".to_string(),
        });
    }
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| OxidockError::MoleculeLoad {
            path: path.to_path_buf(),
            reason: "unusable file name".to_string(),
        })?
        .to_string();
    Ok((stem, ext))
}

#[async_trait]
impl MoleculePreparer for ObabelPreparer {
    async fn prepare_receptor(&self, protein: &Path, work_dir: &Path) -> Result<PreparedReceptor> {
        let (stem, ext) = check_input(protein, "pdb")?;
        info!("Preparing receptor {:?}", protein);

        let hydrogenated = work_dir.join(format!("{}_hyd.{}", stem, ext));
        let engine_ready = work_dir.join(format!("{}.pdbqt", stem));

        self.convert(protein, &hydrogenated, &[]).await?;
        self.convert(protein, &engine_ready, &["-xr"]).await?;

        let coords = Structure::load(&hydrogenated)?.coords();
        Ok(PreparedReceptor {
            coords,
            hydrogenated,
            engine_ready,
        })
    }

    async fn prepare_ligand(&self, ligand: &Path, work_dir: &Path) -> Result<PreparedLigand> {
        let (stem, _ext) = check_input(ligand, "sdf")?;
        info!("Preparing ligand {:?}", ligand);

        let engine_ready = work_dir.join(format!("{}.pdbqt", stem));
        self.convert(ligand, &engine_ready, &[]).await?;

        let coords = Structure::load(&engine_ready)?.coords();
        Ok(PreparedLigand {
            coords,
            engine_ready,
        })
    }
}
