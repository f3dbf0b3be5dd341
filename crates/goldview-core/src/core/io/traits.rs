use crate::core::models::structure::{Molecule, Structure};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing molecular file formats.
///
/// Implementors parse every molecule record of a file, keeping each record's raw
/// text as payload, and serialize molecules back out.
pub trait MolecularFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads all molecule records from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Molecule>, Self::Error>;

    /// Writes molecule records to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or I/O operations encounter issues.
    fn write_to(molecules: &[Molecule], writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads all molecule records from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Molecule>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes molecule records to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(molecules: &[Molecule], path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(molecules, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// The viewer-side collaborator that turns a path into a [`Structure`].
///
/// The engine never opens structure files itself; the receptor and every displayed
/// solution go through a loader, so a host application can plug in its own viewer.
pub trait StructureLoader {
    /// The error type reported when a structure cannot be loaded.
    type Error: Error + Send + Sync + 'static;

    /// Loads the structure stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or not a valid structure.
    fn load(&self, path: &Path) -> Result<Structure, Self::Error>;
}
