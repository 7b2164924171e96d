//! oxidock-mol — Molecule I/O for the docking workflow.
//!
//! Three narrow concerns:
//! 1. Reading atom coordinates out of structure files (`structure`)
//! 2. Centroid / extent math over coordinate sets (`geometry`)
//! 3. Preparing engine-ready molecules: protonation, partial charges,
//!    PDBQT emission (`prepare`)

pub mod geometry;
pub mod prepare;
pub mod structure;

pub use prepare::{MoleculePreparer, ObabelPreparer, PreparedLigand, PreparedReceptor};
pub use structure::{Atom, Structure};
