//! Engine configuration serialization.

use std::path::{Path, PathBuf};

use crate::region::SearchRegion;
use oxidock_common::Result;

/// One docking job as the engine sees it: prepared inputs, search region,
/// and optional search effort. Serialized verbatim to the engine's
/// key=value config format.
#[derive(Debug, Clone)]
pub struct DockingJobConfig {
    pub receptor: PathBuf,
    pub ligand: PathBuf,
    pub region: SearchRegion,
    /// Omitted from the config entirely when `None`; the engine then uses
    /// its own default.
    pub exhaustiveness: Option<u32>,
}

impl DockingJobConfig {
    /// The config file text, fixed key order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("receptor = {}\n", self.receptor.display()));
        out.push_str(&format!("ligand = {}\n\n", self.ligand.display()));

        out.push_str(&format!("center_x = {:.6}\n", self.region.center[0]));
        out.push_str(&format!("center_y = {:.6}\n", self.region.center[1]));
        out.push_str(&format!("center_z = {:.6}\n\n", self.region.center[2]));

        out.push_str(&format!("size_x = {:.6}\n", self.region.size[0]));
        out.push_str(&format!("size_y = {:.6}\n", self.region.size[1]));
        out.push_str(&format!("size_z = {:.6}\n\n", self.region.size[2]));

        if let Some(exhaustiveness) = self.exhaustiveness {
            out.push_str(&format!("exhaustiveness = {}\n", exhaustiveness));
        }
        out
    }

    /// Write the config to `dest`, replacing whatever was there.
    pub fn write(&self, dest: &Path) -> Result<()> {
        std::fs::write(dest, self.render())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(exhaustiveness: Option<u32>) -> DockingJobConfig {
        DockingJobConfig {
            receptor: PathBuf::from("/work/prot.pdbqt"),
            ligand: PathBuf::from("/work/lig.pdbqt"),
            region: SearchRegion::new([5.0, 10.0, 2.5], [15.0, 25.0, 10.0]).unwrap(),
            exhaustiveness,
        }
    }

    fn parse_keys(text: &str) -> HashMap<String, String> {
        text.lines()
            .filter_map(|line| {
                let (key, value) = line.split_once('=')?;
                Some((key.trim().to_string(), value.trim().to_string()))
            })
            .collect()
    }

    #[test]
    fn test_render_roundtrips_values() {
        let rendered = config(Some(8)).render();
        let keys = parse_keys(&rendered);

        assert_eq!(keys["receptor"], "/work/prot.pdbqt");
        assert_eq!(keys["ligand"], "/work/lig.pdbqt");
        assert_eq!(keys["center_x"].parse::<f64>().unwrap(), 5.0);
        assert_eq!(keys["center_y"].parse::<f64>().unwrap(), 10.0);
        assert_eq!(keys["center_z"].parse::<f64>().unwrap(), 2.5);
        assert_eq!(keys["size_x"].parse::<f64>().unwrap(), 15.0);
        assert_eq!(keys["size_y"].parse::<f64>().unwrap(), 25.0);
        assert_eq!(keys["size_z"].parse::<f64>().unwrap(), 10.0);
        assert_eq!(keys["exhaustiveness"], "8");
    }

    #[test]
    fn test_render_fixed_key_order() {
        let rendered = config(Some(8)).render();
        let keys: Vec<&str> = rendered
            .lines()
            .filter_map(|l| l.split_once('=').map(|(k, _)| k.trim()))
            .collect();
        assert_eq!(
            keys,
            vec![
                "receptor",
                "ligand",
                "center_x",
                "center_y",
                "center_z",
                "size_x",
                "size_y",
                "size_z",
                "exhaustiveness"
            ]
        );
    }

    #[test]
    fn test_exhaustiveness_line_present_only_when_set() {
        assert!(config(Some(8)).render().contains("exhaustiveness = 8"));
        assert!(!config(None).render().contains("exhaustiveness"));
    }

    #[test]
    fn test_write_overwrites_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("conf.txt");
        std::fs::write(&dest, "stale").unwrap();

        config(None).write(&dest).unwrap();
        let text = std::fs::read_to_string(&dest).unwrap();
        assert!(text.starts_with("receptor = "));
        assert!(!text.contains("stale"));
    }
}
