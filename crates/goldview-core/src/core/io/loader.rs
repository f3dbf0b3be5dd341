use crate::core::io::mol2::{Mol2Error, Mol2File};
use crate::core::io::pdb::{PdbError, PdbFile};
use crate::core::io::traits::{MolecularFile, StructureLoader};
use crate::core::models::structure::Structure;
use std::path::Path;
use thiserror::Error;

/// Structure file formats GoldView can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    Mol2,
    Pdb,
}

impl StructureFormat {
    /// Picks the format from the file extension; anything that is not PDB is read as mol2.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdb") || ext.eq_ignore_ascii_case("ent") => {
                StructureFormat::Pdb
            }
            _ => StructureFormat::Mol2,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Mol2(#[from] Mol2Error),
    #[error(transparent)]
    Pdb(#[from] PdbError),
}

impl LoadError {
    /// The underlying I/O error, if the failure came from the filesystem.
    pub fn as_io(&self) -> Option<&std::io::Error> {
        match self {
            LoadError::Mol2(Mol2Error::Io(e)) | LoadError::Pdb(PdbError::Io(e)) => Some(e),
            _ => None,
        }
    }
}

/// Loads receptors and solutions by file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl StructureLoader for FileLoader {
    type Error = LoadError;

    fn load(&self, path: &Path) -> Result<Structure, Self::Error> {
        let molecules = match StructureFormat::from_path(path) {
            StructureFormat::Pdb => PdbFile::read_from_path(path)?,
            StructureFormat::Mol2 => Mol2File::read_from_path(path)?,
        };
        Ok(Structure::new(path, molecules))
    }
}

/// Writes `structure` to `path` in the format it was loaded from.
pub fn write_structure(structure: &Structure, path: &Path) -> Result<(), LoadError> {
    match StructureFormat::from_path(structure.path()) {
        StructureFormat::Pdb => PdbFile::write_to_path(structure.molecules(), path)?,
        StructureFormat::Mol2 => Mol2File::write_to_path(structure.molecules(), path)?,
    }
    Ok(())
}
