use super::atom::Atom;
use super::ids::{AtomId, ResidueId};
use super::residue::Residue;
use slotmap::SlotMap;
use std::collections::HashMap;

/// Represents a single molecule with its atoms and residues.
///
/// Atoms and residues live in slot maps so that ids stay stable while coordinates
/// and display flags are mutated in place. A serial-number index keeps the lookup
/// used by rotamer transfer constant-time.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Primary storage for atoms using a slot map for efficient ID management.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues using a slot map for efficient ID management.
    residues: SlotMap<ResidueId, Residue>,
    /// Lookup map for finding residues by their substructure number.
    residue_number_map: HashMap<isize, ResidueId>,
    /// First atom registered under each serial number.
    serial_index: HashMap<usize, AtomId>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves an immutable reference to an atom by its ID.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Retrieves a mutable reference to an atom by its ID.
    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    /// Returns an iterator over all atoms in insertion order.
    ///
    /// # Return
    ///
    /// An iterator yielding `(AtomId, &Atom)` pairs.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    /// Returns a mutable iterator over all atoms in insertion order.
    pub fn atoms_iter_mut(&mut self) -> impl Iterator<Item = (AtomId, &mut Atom)> {
        self.atoms.iter_mut()
    }

    /// Returns the number of atoms in the system.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Retrieves an immutable reference to a residue by its ID.
    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Returns an iterator over all residues in the system.
    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residues.iter()
    }

    /// Returns the number of residues in the system.
    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    /// Finds a residue ID by its substructure number.
    pub fn find_residue_by_number(&self, number: isize) -> Option<ResidueId> {
        self.residue_number_map.get(&number).copied()
    }

    /// Finds the first atom registered with the given serial number.
    ///
    /// # Arguments
    ///
    /// * `serial` - The serial number from the source file.
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if an atom carries that serial, otherwise `None`.
    pub fn find_atom_by_serial(&self, serial: usize) -> Option<AtomId> {
        self.serial_index.get(&serial).copied()
    }

    /// Adds a new residue to the system or returns the existing one.
    ///
    /// This method is idempotent on the substructure number; the name of an existing
    /// residue is left untouched.
    ///
    /// # Arguments
    ///
    /// * `number` - The substructure number of the residue.
    /// * `name` - The name of the residue.
    ///
    /// # Return
    ///
    /// The ID of the residue (new or existing).
    pub fn add_residue(&mut self, number: isize, name: &str) -> ResidueId {
        *self
            .residue_number_map
            .entry(number)
            .or_insert_with(|| self.residues.insert(Residue::new(number, name)))
    }

    /// Adds an atom to a specific residue.
    ///
    /// The atom's `residue_id` is overwritten with `residue_id`. When several atoms share
    /// a serial number, serial lookups keep resolving to the first one.
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if successful, otherwise `None` (if the residue doesn't exist).
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, mut atom: Atom) -> Option<AtomId> {
        let residue = self.residues.get_mut(residue_id)?;
        atom.residue_id = residue_id;
        let serial = atom.serial;

        let atom_id = self.atoms.insert(atom);
        residue.add_atom(atom_id);
        self.serial_index.entry(serial).or_insert(atom_id);

        Some(atom_id)
    }

    /// Sets the display flag of every atom in a residue.
    ///
    /// # Return
    ///
    /// The number of atoms updated, or `None` if the residue doesn't exist.
    pub fn set_residue_visible(&mut self, residue_id: ResidueId, visible: bool) -> Option<usize> {
        let residue = self.residues.get(residue_id)?;
        let mut updated = 0;
        for &atom_id in residue.atoms() {
            if let Some(atom) = self.atoms.get_mut(atom_id) {
                atom.visible = visible;
                updated += 1;
            }
        }
        Some(updated)
    }
}
