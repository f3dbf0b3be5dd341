use super::ids::ResidueId;
use nalgebra::Point3;

/// An atom of a loaded structure.
///
/// Only the fields GoldView reads or mutates are kept: the serial number used to
/// correlate rotamer annotations, the coordinates that get patched, and the display
/// flag toggled for modified residues.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The serial number from the source file (mol2 `atom_id`).
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "O").
    pub name: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The SYBYL atom type (e.g., "C.3", "N.am").
    pub sybyl_type: String,
    /// The partial atomic charge in elementary charge units.
    pub partial_charge: f64,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Whether the viewer should draw this atom.
    pub visible: bool,
}

impl Atom {
    /// Creates a new hidden `Atom` with an empty type and zero charge.
    ///
    /// # Arguments
    ///
    /// * `serial` - The serial number of the atom.
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(serial: usize, name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            serial,
            name: name.to_string(),
            residue_id,
            sybyl_type: String::new(),
            partial_charge: 0.0,
            position,
            visible: false,
        }
    }
}
