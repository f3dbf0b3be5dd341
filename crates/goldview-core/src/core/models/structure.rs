use super::ids::{AtomId, ResidueId};
use super::system::MolecularSystem;
use std::path::{Path, PathBuf};

/// One molecule record of a loaded file.
///
/// `payload` keeps the raw text lines of the record so that data blocks the parser
/// does not model (scores, rotamer annotations) remain available to later steps.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub name: String,
    pub system: MolecularSystem,
    pub payload: Vec<String>,
}

impl Molecule {
    pub fn new(name: &str, system: MolecularSystem, payload: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            system,
            payload,
        }
    }
}

/// Locates an atom inside a [`Structure`]: the molecule index plus the atom id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtomLocation {
    pub molecule: usize,
    pub atom_id: AtomId,
}

/// Locates a residue inside a [`Structure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResidueLocation {
    pub molecule: usize,
    pub residue_id: ResidueId,
}

/// A structure handle as produced by a structure loader.
///
/// A file may hold several molecule records; they are kept in file order and are the
/// "sub-structures" searched by atom lookups.
#[derive(Debug, Clone)]
pub struct Structure {
    path: PathBuf,
    molecules: Vec<Molecule>,
}

impl Structure {
    pub fn new(path: impl Into<PathBuf>, molecules: Vec<Molecule>) -> Self {
        Self {
            path: path.into(),
            molecules,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    pub fn molecules_mut(&mut self) -> &mut [Molecule] {
        &mut self.molecules
    }

    /// Raw text payload of the first molecule record, if any.
    pub fn payload(&self) -> Option<&[String]> {
        self.molecules.first().map(|m| m.payload.as_slice())
    }

    pub fn atom_count(&self) -> usize {
        self.molecules.iter().map(|m| m.system.atom_count()).sum()
    }

    /// Finds the first atom with `serial`, searching molecules in file order.
    pub fn find_atom_by_serial(&self, serial: usize) -> Option<AtomLocation> {
        self.molecules
            .iter()
            .enumerate()
            .find_map(|(molecule, m)| {
                m.system
                    .find_atom_by_serial(serial)
                    .map(|atom_id| AtomLocation { molecule, atom_id })
            })
    }
}
