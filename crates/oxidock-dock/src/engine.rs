//! AutoDock Vina invocation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info};

use oxidock_common::{OxidockError, Result};

/// Wrapper for one docking engine binary.
pub struct VinaEngine {
    executable: PathBuf,
    timeout: Option<Duration>,
}

impl VinaEngine {
    pub fn new<P: AsRef<Path>>(executable: P) -> Self {
        Self {
            executable: executable.as_ref().to_path_buf(),
            timeout: None,
        }
    }

    /// Cap a single invocation's runtime. Off by default: the engine's own
    /// behavior is unbounded.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Run the engine against a written config.
    ///
    /// `dry_run` skips the subprocess entirely, so the binary does not need
    /// to exist and neither `log` nor `out` is touched.
    pub async fn dock(&self, conf: &Path, log: &Path, out: &Path, dry_run: bool) -> Result<()> {
        if dry_run {
            debug!("Dry run: skipping engine invocation for {:?}", conf);
            return Ok(());
        }

        info!("Running AutoDock Vina with config {:?}", conf);
        let mut command = Command::new(&self.executable);
        command
            .arg("--config")
            .arg(conf)
            .arg("--log")
            .arg(log)
            .arg("--out")
            .arg(out);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| OxidockError::EngineTimeout {
                    seconds: limit.as_secs(),
                })??,
            None => command.output().await?,
        };

        if !output.status.success() {
            let status = match output.status.code() {
                Some(code) => format!("status {}", code),
                None => "signal".to_string(),
            };
            return Err(OxidockError::EngineInvocation {
                status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!("Engine completed, output in {:?}", out);
        Ok(())
    }
}
