use super::ids::AtomId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub number: isize,             // Substructure id from the source file
    pub name: String,              // Substructure name (e.g., "ALA123", "LIG1")
    pub(crate) atoms: Vec<AtomId>, // Atoms belonging to this residue, in file order
}

impl Residue {
    pub(crate) fn new(number: isize, name: &str) -> Self {
        Self {
            number,
            name: name.to_string(),
            atoms: Vec::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_id: AtomId) {
        self.atoms.push(atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }
}
