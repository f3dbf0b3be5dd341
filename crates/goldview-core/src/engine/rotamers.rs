//! Transfer of GOLD's rotated receptor atoms onto a shared receptor structure.
//!
//! When GOLD allows receptor side chains to flex, each solution file records the moved
//! atoms in a `Gold.Protein.RotatedAtoms` data block: one line per atom with the new
//! coordinates in the first three columns and the receptor atom serial in column 19.

use crate::core::models::structure::{ResidueLocation, Structure};
use nalgebra::Point3;
use thiserror::Error;
use tracing::{debug, warn};

pub const ROTATED_ATOMS_TAG: &str = "> <Gold.Protein.RotatedAtoms>";

/// Zero-based column of the receptor atom serial in a rotated-atoms line.
const SERIAL_FIELD: usize = 18;
const DATA_BLOCK_PREFIX: &str = "> ";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RotamerError {
    #[error("No rotamer information in the solution")]
    Unavailable,
}

/// Result of applying one rotated-atoms block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotamerReport {
    /// Atoms whose coordinates were overwritten.
    pub applied: usize,
    /// Lines that named an unknown serial or could not be parsed.
    pub skipped: usize,
    /// Residues made visible, in first-touched order.
    pub residues: Vec<ResidueLocation>,
}

/// What a rotamer request did at the level of the display workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotamerOutcome {
    /// The experiment declares no receptor; nothing was changed.
    NoReceptor,
    /// The solution carries no rotated-atoms block.
    Unavailable,
    Applied(RotamerReport),
}

/// Applies the rotated-atoms block found in `payload` to `receptor`.
///
/// Each line moves the first receptor atom with the listed serial, searching the
/// receptor's molecules in order. Lines naming an absent serial are skipped. Every
/// residue that owns a moved atom is then made visible as a whole.
///
/// # Errors
///
/// Returns [`RotamerError::Unavailable`] if `payload` has no rotated-atoms block; the
/// receptor is left untouched.
pub fn apply_rotamers(
    receptor: &mut Structure,
    payload: &[String],
) -> Result<RotamerReport, RotamerError> {
    let start = payload
        .iter()
        .position(|line| line.trim() == ROTATED_ATOMS_TAG)
        .ok_or(RotamerError::Unavailable)?;

    let mut report = RotamerReport::default();
    for line in payload[start + 1..]
        .iter()
        .take_while(|line| !line.starts_with(DATA_BLOCK_PREFIX))
    {
        if line.trim().is_empty() {
            continue;
        }
        let Some((position, serial)) = parse_rotated_atom(line) else {
            warn!(line = %line, "Skipping malformed rotated-atom line.");
            report.skipped += 1;
            continue;
        };
        let Some(location) = receptor.find_atom_by_serial(serial) else {
            debug!(serial, "No receptor atom with this serial.");
            report.skipped += 1;
            continue;
        };

        let system = &mut receptor.molecules_mut()[location.molecule].system;
        let Some(atom) = system.atom_mut(location.atom_id) else {
            report.skipped += 1;
            continue;
        };
        atom.position = position;
        let touched = ResidueLocation {
            molecule: location.molecule,
            residue_id: atom.residue_id,
        };
        report.applied += 1;
        if !report.residues.contains(&touched) {
            report.residues.push(touched);
        }
    }

    for touched in &report.residues {
        let system = &mut receptor.molecules_mut()[touched.molecule].system;
        system.set_residue_visible(touched.residue_id, true);
    }

    debug!(
        applied = report.applied,
        skipped = report.skipped,
        residues = report.residues.len(),
        "Rotamers applied."
    );
    Ok(report)
}

fn parse_rotated_atom(line: &str) -> Option<(Point3<f64>, usize)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let serial = fields.get(SERIAL_FIELD)?.parse().ok()?;
    let x = fields.first()?.parse().ok()?;
    let y = fields.get(1)?.parse().ok()?;
    let z = fields.get(2)?.parse().ok()?;
    Some((Point3::new(x, y, z), serial))
}
