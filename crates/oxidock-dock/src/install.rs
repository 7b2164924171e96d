//! One-time engine installation.
//!
//! Explicit and idempotent: callers run [`ensure_installed`] once before
//! docking. When the expected install directory already exists nothing is
//! downloaded, so repeated calls are free and offline-safe. There is no
//! cross-process locking; concurrent first use from several processes can
//! race.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use oxidock_common::{OxidockError, Result};

const DOWNLOAD_BASE: &str = "http://vina.scripps.edu/download";

/// Where to fetch the engine for one platform, and the directory the
/// archive unpacks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub archive: &'static str,
    pub dir_name: &'static str,
}

impl DownloadTarget {
    pub fn url(&self) -> String {
        format!("{}/{}", DOWNLOAD_BASE, self.archive)
    }
}

/// Resolve the host platform to a download target.
///
/// Only Linux x86 and macOS builds are distributed; everything else is
/// unsupported.
pub fn download_target(os: &str, sixty_four_bit: bool) -> Result<DownloadTarget> {
    match os {
        "linux" => Ok(DownloadTarget {
            archive: "autodock_vina_1_1_2_linux_x86.tgz",
            dir_name: "autodock_vina_1_1_2_linux_x86",
        }),
        "macos" if sixty_four_bit => Ok(DownloadTarget {
            archive: "autodock_vina_1_1_2_mac_64bit.tar.gz",
            dir_name: "autodock_vina_1_1_2_mac_catalina_64bit",
        }),
        "macos" => Ok(DownloadTarget {
            archive: "autodock_vina_1_1_2_mac.tgz",
            dir_name: "autodock_vina_1_1_2_mac",
        }),
        other => Err(OxidockError::UnsupportedPlatform {
            os: other.to_string(),
            arch: if sixty_four_bit { "64-bit" } else { "32-bit" }.to_string(),
        }),
    }
}

/// Path of the engine binary under an install directory.
fn binary_path(install_dir: &Path) -> PathBuf {
    install_dir.join("bin").join("vina")
}

/// Make sure the engine is installed under `data_dir`, downloading and
/// extracting it on first use. Returns the engine binary path.
pub async fn ensure_installed(data_dir: &Path) -> Result<PathBuf> {
    let target = download_target(std::env::consts::OS, cfg!(target_pointer_width = "64"))?;
    let install_dir = data_dir.join(target.dir_name);
    let binary = binary_path(&install_dir);

    if install_dir.exists() {
        debug!("Engine already installed at {:?}", install_dir);
        return Ok(binary);
    }

    info!("Engine not available. Downloading {}", target.url());
    tokio::fs::create_dir_all(data_dir).await?;

    let response = reqwest::Client::new()
        .get(target.url())
        .send()
        .await?
        .error_for_status()?;
    let bytes = response.bytes().await?;

    let archive_path = data_dir.join(target.archive);
    tokio::fs::write(&archive_path, &bytes).await?;

    info!("Downloaded engine archive. Extracting");
    let unpack_from = archive_path.clone();
    let unpack_into = data_dir.to_path_buf();
    tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let file = std::fs::File::open(&unpack_from)?;
        let decoder = flate2::read::GzDecoder::new(file);
        tar::Archive::new(decoder).unpack(&unpack_into)
    })
    .await
    .map_err(|e| OxidockError::Other(anyhow::anyhow!("extraction task failed: {}", e)))??;

    tokio::fs::remove_file(&archive_path).await?;

    if !binary.exists() {
        return Err(OxidockError::Other(anyhow::anyhow!(
            "engine archive did not contain {:?}",
            binary
        )));
    }
    info!("Engine installed at {:?}", install_dir);
    Ok(binary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_target() {
        let target = download_target("linux", true).unwrap();
        assert_eq!(target.archive, "autodock_vina_1_1_2_linux_x86.tgz");
        assert!(target.url().starts_with("http://vina.scripps.edu/download/"));
    }

    #[test]
    fn test_macos_targets_differ_by_bit_width() {
        let wide = download_target("macos", true).unwrap();
        let narrow = download_target("macos", false).unwrap();
        assert_eq!(wide.dir_name, "autodock_vina_1_1_2_mac_catalina_64bit");
        assert_eq!(narrow.dir_name, "autodock_vina_1_1_2_mac");
        assert_ne!(wide.archive, narrow.archive);
    }

    #[test]
    fn test_unsupported_platform() {
        let err = download_target("windows", true).unwrap_err();
        assert!(matches!(err, OxidockError::UnsupportedPlatform { .. }));
    }

    #[cfg(any(target_os = "linux", target_os = "macos"))]
    #[tokio::test]
    async fn test_ensure_installed_is_idempotent_offline() {
        let data_dir = tempfile::tempdir().unwrap();
        let target = download_target(std::env::consts::OS, true).unwrap();

        // Seed a fake install; no network must be needed afterwards.
        let bin_dir = data_dir.path().join(target.dir_name).join("bin");
        std::fs::create_dir_all(&bin_dir).unwrap();
        std::fs::write(bin_dir.join("vina"), b"#!/bin/sh\n").unwrap();

        let first = ensure_installed(data_dir.path()).await.unwrap();
        let second = ensure_installed(data_dir.path()).await.unwrap();
        assert_eq!(first, second);
        assert!(first.ends_with("bin/vina"));
        assert!(first.exists());
    }
}
