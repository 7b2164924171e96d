//! Minimal PDB/PDBQT structure reader.
//!
//! Only what the docking workflow needs: atom serials, names, and
//! coordinates from fixed-column `ATOM`/`HETATM` records. Connectivity,
//! occupancy, and the PDBQT charge/type columns are ignored.

use std::path::Path;

use oxidock_common::{OxidockError, Result};

/// A single atom record.
#[derive(Debug, Clone)]
pub struct Atom {
    pub serial: usize,
    pub name: String,
    pub pos: [f64; 3],
}

/// An in-memory molecule: the ordered atom list of one structure file.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    pub atoms: Vec<Atom>,
}

impl Structure {
    /// Read a structure from disk. Accepts `.pdb` and `.pdbqt`.
    pub fn load(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if ext != "pdb" && ext != "pdbqt" {
            return Err(OxidockError::UnsupportedFormat(format!(
                "cannot read coordinates from '.{}' files",
                ext
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| OxidockError::MoleculeLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let structure = Self::parse(&text).map_err(|reason| OxidockError::MoleculeLoad {
            path: path.to_path_buf(),
            reason,
        })?;

        if structure.atoms.is_empty() {
            return Err(OxidockError::MoleculeLoad {
                path: path.to_path_buf(),
                reason: "no ATOM/HETATM records".to_string(),
            });
        }
        Ok(structure)
    }

    /// Parse PDB-format text. Lines other than `ATOM`/`HETATM` are skipped.
    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        let mut atoms = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            if !line.starts_with("ATOM") && !line.starts_with("HETATM") {
                continue;
            }
            // Standard PDB columns: serial 6-11, name 12-16, x/y/z 30-54.
            if line.len() < 54 {
                return Err(format!("truncated atom record at line {}", lineno + 1));
            }
            let serial = line[6..11]
                .trim()
                .parse::<usize>()
                .map_err(|_| format!("bad atom serial at line {}", lineno + 1))?;
            let name = line[12..16].trim().to_string();
            let x = parse_coord(&line[30..38], "x", lineno)?;
            let y = parse_coord(&line[38..46], "y", lineno)?;
            let z = parse_coord(&line[46..54], "z", lineno)?;
            atoms.push(Atom {
                serial,
                name,
                pos: [x, y, z],
            });
        }
        Ok(Self { atoms })
    }

    /// The coordinate set, in atom-record order.
    pub fn coords(&self) -> Vec<[f64; 3]> {
        self.atoms.iter().map(|a| a.pos).collect()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

fn parse_coord(field: &str, axis: &str, lineno: usize) -> std::result::Result<f64, String> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("bad {} coordinate at line {}", axis, lineno + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
HEADER    TEST STRUCTURE
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  ALA A   1      10.000  20.000   5.000  1.00  0.00           C
HETATM    3  O   HOH A   2       5.000  10.000   2.500  1.00  0.00           O
END
";

    #[test]
    fn test_parse_atom_records() {
        let s = Structure::parse(SAMPLE).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.atoms[0].serial, 1);
        assert_eq!(s.atoms[0].name, "N");
        assert_eq!(s.atoms[1].pos, [10.0, 20.0, 5.0]);
        assert_eq!(s.atoms[2].pos, [5.0, 10.0, 2.5]);
    }

    #[test]
    fn test_parse_skips_non_atom_lines() {
        let s = Structure::parse("REMARK nothing here\nEND\n").unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn test_parse_rejects_truncated_record() {
        assert!(Structure::parse("ATOM      1  N   ALA").is_err());
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let err = Structure::load(Path::new("ligand.mol2")).unwrap_err();
        assert!(matches!(err, OxidockError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_rejects_empty_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdb");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "REMARK no atoms").unwrap();

        let err = Structure::load(&path).unwrap_err();
        assert!(matches!(err, OxidockError::MoleculeLoad { .. }));
    }

    #[test]
    fn test_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mol.pdb");
        std::fs::write(&path, SAMPLE).unwrap();

        let s = Structure::load(&path).unwrap();
        assert_eq!(s.len(), 3);
    }
}
