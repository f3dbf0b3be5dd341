use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::ids::ResidueId;
use crate::core::models::structure::Molecule;
use crate::core::models::system::MolecularSystem;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

const ATOM_RECORDS: &str = "ATOM/HETATM records";
const COORDS_START: usize = 30;
const COORDS_END: usize = 54;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(&'static str),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: &'static str, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: &'static str, value: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn record_name(line: &str) -> &str {
    slice_and_trim(line, 0, 6)
}

fn is_atom_record(line: &str) -> bool {
    matches!(record_name(line), "ATOM" | "HETATM")
}

fn parse_int<T: std::str::FromStr>(
    line: &str,
    start: usize,
    end: usize,
    columns: &'static str,
    line_num: usize,
) -> Result<T, PdbError> {
    let raw = slice_and_trim(line, start, end);
    raw.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns,
            value: raw.to_string(),
        },
    })
}

fn parse_float(
    line: &str,
    start: usize,
    end: usize,
    columns: &'static str,
    line_num: usize,
) -> Result<f64, PdbError> {
    let raw = slice_and_trim(line, start, end);
    raw.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns,
            value: raw.to_string(),
        },
    })
}

/// Chain, sequence number, insertion code and residue name of an atom record.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResidueKey {
    chain: String,
    seq: isize,
    insertion: String,
    name: String,
}

struct ModelBuilder {
    name: String,
    system: MolecularSystem,
    payload: Vec<String>,
    current_residue: Option<(ResidueKey, ResidueId)>,
}

impl ModelBuilder {
    fn new() -> Self {
        Self {
            name: String::new(),
            system: MolecularSystem::new(),
            payload: Vec::new(),
            current_residue: None,
        }
    }

    fn has_atoms(&self) -> bool {
        self.system.atom_count() > 0
    }

    fn add_atom_line(&mut self, line: &str, line_num: usize) -> Result<(), PdbError> {
        if line.len() < COORDS_END {
            return Err(PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::LineTooShort,
            });
        }

        let serial: usize = parse_int(line, 6, 11, "7-11", line_num)?;
        let atom_name = slice_and_trim(line, 12, 16);
        let key = ResidueKey {
            name: slice_and_trim(line, 17, 20).to_string(),
            chain: slice_and_trim(line, 21, 22).to_string(),
            seq: parse_int(line, 22, 26, "23-26", line_num)?,
            insertion: slice_and_trim(line, 26, 27).to_string(),
        };
        let x = parse_float(line, 30, 38, "31-38", line_num)?;
        let y = parse_float(line, 38, 46, "39-46", line_num)?;
        let z = parse_float(line, 46, 54, "47-54", line_num)?;

        let residue_id = match &self.current_residue {
            Some((current, id)) if *current == key => *id,
            _ => {
                // Residues are numbered in file order; chains may reuse sequence numbers.
                let number = self.system.residue_count() as isize + 1;
                let label = format!("{}{}{}", key.name, key.seq, key.insertion);
                let id = self.system.add_residue(number, &label);
                self.current_residue = Some((key, id));
                id
            }
        };

        let atom = Atom::new(serial, atom_name, residue_id, Point3::new(x, y, z));
        self.system.add_atom_to_residue(residue_id, atom);
        Ok(())
    }

    fn finish(self) -> Molecule {
        Molecule::new(&self.name, self.system, self.payload)
    }
}

/// Fixed-column PDB reader/writer.
///
/// Atom records become atoms grouped into residues; every line, atom records
/// included, is kept as payload. On write only columns 31-54 of atom records change.
pub struct PdbFile;

impl PdbFile {
    fn write_payload(molecule: &Molecule, writer: &mut impl Write) -> Result<(), PdbError> {
        for line in &molecule.payload {
            let atom = if is_atom_record(line) {
                slice_and_trim(line, 6, 11)
                    .parse::<usize>()
                    .ok()
                    .and_then(|serial| molecule.system.find_atom_by_serial(serial))
                    .and_then(|id| molecule.system.atom(id))
            } else {
                None
            };
            let patched = atom.and_then(|atom| {
                let head = line.get(..COORDS_START)?;
                let tail = line.get(COORDS_END..)?;
                Some(format!(
                    "{}{:>8.3}{:>8.3}{:>8.3}{}",
                    head, atom.position.x, atom.position.y, atom.position.z, tail
                ))
            });
            writeln!(writer, "{}", patched.as_deref().unwrap_or(line))?;
        }
        Ok(())
    }

    fn write_generated(molecule: &Molecule, writer: &mut impl Write) -> Result<(), PdbError> {
        let system = &molecule.system;
        for (_, atom) in system.atoms_iter() {
            let residue = system.residue(atom.residue_id).ok_or_else(|| {
                PdbError::Inconsistency(format!(
                    "Atom {} references a residue missing from molecule '{}'",
                    atom.serial, molecule.name
                ))
            })?;
            let res_name: String = residue.name.chars().take(3).collect();
            writeln!(
                writer,
                "{:<6}{:>5} {:<4} {:>3}  {:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}",
                "ATOM",
                atom.serial,
                atom.name,
                res_name,
                residue.number,
                atom.position.x,
                atom.position.y,
                atom.position.z,
                1.0,
                0.0
            )?;
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}

impl MolecularFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Molecule>, Self::Error> {
        let mut molecules = Vec::new();
        let mut current = ModelBuilder::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match record_name(&line) {
                "MODEL" => {
                    if current.has_atoms() {
                        molecules.push(std::mem::replace(&mut current, ModelBuilder::new()).finish());
                    }
                    current.name = format!("model {}", slice_and_trim(&line, 10, 14));
                }
                "ATOM" | "HETATM" => current.add_atom_line(&line, line_num)?,
                "ENDMDL" => {
                    current.payload.push(line.clone());
                    molecules.push(std::mem::replace(&mut current, ModelBuilder::new()).finish());
                    continue;
                }
                _ => {}
            }
            current.payload.push(line);
        }

        if current.has_atoms() {
            molecules.push(current.finish());
        } else if let Some(last) = molecules.last_mut() {
            last.payload.extend(current.payload);
        }
        if !molecules.iter().any(|m| m.system.atom_count() > 0) {
            return Err(PdbError::MissingRecord(ATOM_RECORDS));
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const RECEPTOR: &str = "\
HEADER    HYDROLASE                               01-JAN-00   1ABC
ATOM      1  N   SER A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  SER A   1       1.400   0.000   0.000  1.00  0.00           C
ATOM      3  OG1 THR A   2       2.000   1.000   0.000  1.00  0.00           O
ATOM      4  N   SER B   1      10.000  10.000  10.000  1.00  0.00           N
HETATM    5  O   HOH A 101       5.000   5.000   5.000  1.00  0.00           O
TER
END
";

    fn read(text: &str) -> Result<Vec<Molecule>, PdbError> {
        PdbFile::read_from(&mut Cursor::new(text))
    }

    #[test]
    fn atoms_are_grouped_into_residues_in_file_order() {
        let molecules = read(RECEPTOR).unwrap();
        assert_eq!(molecules.len(), 1);
        let system = &molecules[0].system;
        assert_eq!(system.atom_count(), 5);
        assert_eq!(system.residue_count(), 4);

        let og1 = system.atom(system.find_atom_by_serial(3).unwrap()).unwrap();
        assert_eq!(og1.name, "OG1");
        assert_eq!(og1.position, Point3::new(2.0, 1.0, 0.0));
        let residue = system.residue(og1.residue_id).unwrap();
        assert_eq!((residue.number, residue.name.as_str()), (2, "THR2"));

        let ca = system.atom(system.find_atom_by_serial(2).unwrap()).unwrap();
        let chain_b = system.atom(system.find_atom_by_serial(4).unwrap()).unwrap();
        assert_ne!(ca.residue_id, chain_b.residue_id);
    }

    #[test]
    fn payload_keeps_every_line() {
        let molecules = read(RECEPTOR).unwrap();
        assert_eq!(molecules[0].payload.len(), RECEPTOR.lines().count());
        assert!(molecules[0].payload[0].starts_with("HEADER"));
        assert_eq!(molecules[0].payload.last().unwrap(), "END");
    }

    #[test]
    fn models_become_separate_molecules() {
        let text = "\
MODEL        1
ATOM      1  CA  GLY A   1       0.000   0.000   0.000  1.00  0.00           C
ENDMDL
MODEL        2
ATOM      1  CA  GLY A   1       1.000   1.000   1.000  1.00  0.00           C
ENDMDL
END
";
        let molecules = read(text).unwrap();
        assert_eq!(molecules.len(), 2);
        assert_eq!(molecules[0].name, "model 1");
        assert_eq!(molecules[1].name, "model 2");
        assert_eq!(molecules[1].payload.last().unwrap(), "END");
    }

    #[test]
    fn file_without_atoms_is_an_error() {
        assert!(matches!(
            read("HEADER    EMPTY\nEND\n"),
            Err(PdbError::MissingRecord(ATOM_RECORDS))
        ));
    }

    #[test]
    fn bad_coordinate_reports_line_and_columns() {
        let text = "HEADER\nATOM      1  CA  GLY A   1         abc   0.000   0.000  1.00  0.00\n";
        match read(text) {
            Err(PdbError::Parse {
                line: 2,
                kind: PdbParseErrorKind::InvalidFloat { columns: "31-38", .. },
            }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn truncated_atom_record_is_rejected() {
        assert!(matches!(
            read("ATOM      1  CA  GLY A   1       0.000\n"),
            Err(PdbError::Parse {
                kind: PdbParseErrorKind::LineTooShort,
                ..
            })
        ));
    }

    #[test]
    fn write_patches_only_coordinate_columns() {
        let mut molecules = read(RECEPTOR).unwrap();
        let system = &mut molecules[0].system;
        let og1 = system.find_atom_by_serial(3).unwrap();
        system.atom_mut(og1).unwrap().position = Point3::new(-1.5, 4.25, 10.0);

        let mut out = Vec::new();
        PdbFile::write_to(&molecules, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text.lines().nth(3).unwrap(),
            "ATOM      3  OG1 THR A   2      -1.500   4.250  10.000  1.00  0.00           O"
        );
        assert_eq!(text.lines().nth(1).unwrap(), RECEPTOR.lines().nth(1).unwrap());
        assert_eq!(text.lines().count(), RECEPTOR.lines().count());
    }

    #[test]
    fn write_generates_atom_records_without_payload() {
        let mut system = MolecularSystem::new();
        let residue_id = system.add_residue(7, "LIG");
        system.add_atom_to_residue(
            residue_id,
            Atom::new(1, "C1", residue_id, Point3::new(1.0, 2.0, 3.0)),
        );
        let molecules = vec![Molecule::new("generated", system, Vec::new())];

        let mut out = Vec::new();
        PdbFile::write_to(&molecules, &mut out).unwrap();
        let reread = read(&String::from_utf8(out).unwrap()).unwrap();

        let system = &reread[0].system;
        let atom = system.atom(system.find_atom_by_serial(1).unwrap()).unwrap();
        assert_eq!(atom.name, "C1");
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(system.residue(atom.residue_id).unwrap().name, "LIG7");
    }
}
