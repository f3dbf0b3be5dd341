use crate::core::io::traits::{MolecularFile, StructureLoader};
use crate::core::models::atom::Atom;
use crate::core::models::structure::{Molecule, Structure};
use crate::core::models::system::MolecularSystem;
use nalgebra::Point3;
use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::path::Path;
use thiserror::Error;

pub const MOLECULE_TAG: &str = "@<TRIPOS>MOLECULE";
const ATOM_TAG: &str = "@<TRIPOS>ATOM";
const RECORD_PREFIX: &str = "@<TRIPOS>";

const DEFAULT_SUBST_ID: isize = 1;
const DEFAULT_SUBST_NAME: &str = "UNK";
const UNKNOWN_SYBYL_TYPE: &str = "Du";

#[derive(Debug, Error)]
pub enum Mol2Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: Mol2ParseErrorKind },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(&'static str),
}

#[derive(Debug, Error)]
pub enum Mol2ParseErrorKind {
    #[error("ATOM line has {found} fields, expected at least 6")]
    TooFewFields { found: usize },
    #[error("Invalid integer in field '{field}' (value: '{value}')")]
    InvalidInt { field: &'static str, value: String },
    #[error("Invalid float in field '{field}' (value: '{value}')")]
    InvalidFloat { field: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Molecule,
    Atom,
    Other,
}

impl Section {
    fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case(MOLECULE_TAG) {
            Section::Molecule
        } else if tag.eq_ignore_ascii_case(ATOM_TAG) {
            Section::Atom
        } else {
            Section::Other
        }
    }
}

struct RecordBuilder {
    name: Option<String>,
    system: MolecularSystem,
    payload: Vec<String>,
    seen_serials: HashSet<usize>,
    section: Section,
}

impl RecordBuilder {
    fn new() -> Self {
        Self {
            name: None,
            system: MolecularSystem::new(),
            payload: Vec::new(),
            seen_serials: HashSet::new(),
            section: Section::Molecule,
        }
    }

    fn add_atom_line(&mut self, line: &str, line_num: usize) -> Result<(), Mol2Error> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 6 {
            return Err(Mol2Error::Parse {
                line: line_num,
                kind: Mol2ParseErrorKind::TooFewFields { found: parts.len() },
            });
        }

        let serial: usize = parse_field(parts[0], line_num, |value| {
            Mol2ParseErrorKind::InvalidInt {
                field: "atom_id",
                value,
            }
        })?;
        let x: f64 = parse_float(parts[2], "x", line_num)?;
        let y: f64 = parse_float(parts[3], "y", line_num)?;
        let z: f64 = parse_float(parts[4], "z", line_num)?;
        let subst_id = match parts.get(6) {
            Some(raw) => parse_field(raw, line_num, |value| {
                Mol2ParseErrorKind::InvalidInt {
                    field: "subst_id",
                    value,
                }
            })?,
            None => DEFAULT_SUBST_ID,
        };
        let subst_name = parts.get(7).copied().unwrap_or(DEFAULT_SUBST_NAME);
        let charge = match parts.get(8) {
            Some(raw) => parse_float(raw, "charge", line_num)?,
            None => 0.0,
        };

        if !self.seen_serials.insert(serial) {
            return Err(Mol2Error::Inconsistency(format!(
                "Duplicate atom serial {} in molecule '{}'",
                serial,
                self.name.as_deref().unwrap_or_default()
            )));
        }

        let residue_id = self.system.add_residue(subst_id, subst_name);
        let mut atom = Atom::new(serial, parts[1], residue_id, Point3::new(x, y, z));
        atom.sybyl_type = parts[5].to_string();
        atom.partial_charge = charge;
        self.system.add_atom_to_residue(residue_id, atom);
        Ok(())
    }

    fn finish(self) -> Molecule {
        Molecule::new(
            self.name.as_deref().unwrap_or_default(),
            self.system,
            self.payload,
        )
    }
}

fn parse_field<T: std::str::FromStr>(
    raw: &str,
    line_num: usize,
    kind: impl FnOnce(String) -> Mol2ParseErrorKind,
) -> Result<T, Mol2Error> {
    raw.parse().map_err(|_| Mol2Error::Parse {
        line: line_num,
        kind: kind(raw.to_string()),
    })
}

fn parse_float(raw: &str, field: &'static str, line_num: usize) -> Result<f64, Mol2Error> {
    parse_field(raw, line_num, |value| Mol2ParseErrorKind::InvalidFloat {
        field,
        value,
    })
}

fn format_atom_line(serial: usize, name: &str, position: &Point3<f64>, sybyl_type: &str) -> String {
    format!(
        "{:>7} {:<8} {:>10.4} {:>10.4} {:>10.4} {:<8}",
        serial, name, position.x, position.y, position.z, sybyl_type
    )
}

/// Tripos mol2 reader/writer.
///
/// Only the `ATOM` section is modelled. Everything else, including bonds and the
/// `COMMENT` data blocks GOLD appends, is kept verbatim in each molecule's payload and
/// written back untouched; on write, atom lines are re-emitted with current coordinates.
pub struct Mol2File;

impl Mol2File {
    fn write_payload(molecule: &Molecule, writer: &mut impl Write) -> Result<(), Mol2Error> {
        let mut section = Section::Other;
        for line in &molecule.payload {
            let trimmed = line.trim();
            if trimmed.starts_with(RECORD_PREFIX) {
                section = Section::from_tag(trimmed);
                writeln!(writer, "{}", line)?;
                continue;
            }
            if section != Section::Atom || trimmed.is_empty() {
                writeln!(writer, "{}", line)?;
                continue;
            }

            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            let atom = parts
                .first()
                .and_then(|raw| raw.parse::<usize>().ok())
                .and_then(|serial| molecule.system.find_atom_by_serial(serial))
                .and_then(|id| molecule.system.atom(id));
            match (atom, parts.len() >= 6) {
                (Some(atom), true) => {
                    let mut patched =
                        format_atom_line(atom.serial, parts[1], &atom.position, parts[5]);
                    for extra in &parts[6..] {
                        patched.push(' ');
                        patched.push_str(extra);
                    }
                    writeln!(writer, "{}", patched)?;
                }
                _ => writeln!(writer, "{}", line)?,
            }
        }
        Ok(())
    }

    fn write_generated(molecule: &Molecule, writer: &mut impl Write) -> Result<(), Mol2Error> {
        let system = &molecule.system;
        writeln!(writer, "{}", MOLECULE_TAG)?;
        writeln!(writer, "{}", molecule.name)?;
        writeln!(
            writer,
            "{:>5} {:>5} {:>5} {:>5} {:>5}",
            system.atom_count(),
            0,
            system.residue_count(),
            0,
            0
        )?;
        writeln!(writer, "SMALL")?;
        writeln!(writer, "USER_CHARGES")?;
        writeln!(writer)?;
        writeln!(writer, "{}", ATOM_TAG)?;
        for (_, atom) in system.atoms_iter() {
            let residue = system.residue(atom.residue_id).ok_or_else(|| {
                Mol2Error::Inconsistency(format!(
                    "Atom {} references a residue missing from molecule '{}'",
                    atom.serial, molecule.name
                ))
            })?;
            let sybyl_type = if atom.sybyl_type.is_empty() {
                UNKNOWN_SYBYL_TYPE
            } else {
                atom.sybyl_type.as_str()
            };
            writeln!(
                writer,
                "{} {:>5} {:<8} {:>9.4}",
                format_atom_line(atom.serial, &atom.name, &atom.position, sybyl_type),
                residue.number,
                residue.name,
                atom.partial_charge
            )?;
        }
        Ok(())
    }
}

impl MolecularFile for Mol2File {
    type Error = Mol2Error;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Molecule>, Self::Error> {
        let mut molecules = Vec::new();
        let mut current: Option<RecordBuilder> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();

            if trimmed.eq_ignore_ascii_case(MOLECULE_TAG) {
                if let Some(done) = current.take() {
                    molecules.push(done.finish());
                }
                current = Some(RecordBuilder::new());
            }
            let Some(record) = current.as_mut() else {
                continue;
            };

            if trimmed.starts_with(RECORD_PREFIX) {
                record.section = Section::from_tag(trimmed);
            } else if !trimmed.is_empty() {
                match record.section {
                    Section::Molecule if record.name.is_none() => {
                        record.name = Some(trimmed.to_string());
                    }
                    Section::Atom => record.add_atom_line(trimmed, line_num)?,
                    _ => {}
                }
            }
            record.payload.push(line);
        }

        if let Some(done) = current.take() {
            molecules.push(done.finish());
        }
        if molecules.is_empty() {
            return Err(Mol2Error::MissingRecord(MOLECULE_TAG));
        }
        Ok(molecules)
    }

    fn write_to(molecules: &[Molecule], writer: &mut impl Write) -> Result<(), Self::Error> {
        for molecule in molecules {
            if molecule.payload.is_empty() {
                Self::write_generated(molecule, writer)?;
            } else {
                Self::write_payload(molecule, writer)?;
            }
        }
        Ok(())
    }
}

/// Loads structures from mol2 files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mol2Loader;

impl StructureLoader for Mol2Loader {
    type Error = Mol2Error;

    fn load(&self, path: &Path) -> Result<Structure, Self::Error> {
        let molecules = Mol2File::read_from_path(path)?;
        Ok(Structure::new(path, molecules))
    }
}
