//! On-disk GOLD experiments for engine tests.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub(crate) const RECEPTOR: &str = "\
@<TRIPOS>MOLECULE
receptor
    4     0     2     0     0
PROTEIN
USER_CHARGES

@<TRIPOS>ATOM
      1 N           0.0000     0.0000     0.0000 N.am        1 SER1        0.0000
      2 CA          1.4000     0.0000     0.0000 C.3         1 SER1        0.0000
      3 OG1         2.0000     1.0000     0.0000 O.3         2 THR2        0.0000
      4 CB          2.5000     1.5000     0.0000 C.3         2 THR2        0.0000
";

/// The atoms of [`RECEPTOR`] as a PDB file.
pub(crate) const RECEPTOR_PDB: &str = "\
HEADER    RECEPTOR
ATOM      1  N   SER A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  SER A   1       1.400   0.000   0.000  1.00  0.00           C
ATOM      3  OG1 THR A   2       2.000   1.000   0.000  1.00  0.00           O
ATOM      4  CB  THR A   2       2.500   1.500   0.000  1.00  0.00           C
END
";

pub(crate) const SCORE_FIELDS: [&str; 3] = ["Score", "S(PLP)", "S(hbond)"];

/// A rotated-atoms record placing atom `serial` at (`x`, `y`, `z`).
pub(crate) fn rotamer_line(x: f64, y: f64, z: f64, serial: usize) -> String {
    format!("{x:.4} {y:.4} {z:.4} {}{serial}", "0 ".repeat(15))
}

/// Text of one solution file with the given score row and optional rotamer block.
pub(crate) fn solution_text(name: &str, scores: [&str; 3], rotamers: Option<&[String]>) -> String {
    let mut text = format!(
        "\
@<TRIPOS>MOLECULE
{name}
    1     0     1     0     0
SMALL
USER_CHARGES

@<TRIPOS>ATOM
      1 C1          1.0000     2.0000     3.0000 C.3         1 LIG1        0.0000
@<TRIPOS>COMMENT
> <Gold.Id.Protein>
receptor

> <Gold.Score>
 {}
 {}

",
        SCORE_FIELDS.join(" "),
        scores.join(" ")
    );
    if let Some(lines) = rotamers {
        text.push_str("> <Gold.Protein.RotatedAtoms>\n");
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        text.push('\n');
    }
    text.push_str("> <Gold.Chemscore.Hbonds>\n");
    text
}

pub(crate) struct Experiment {
    pub dir: TempDir,
    pub conf_path: PathBuf,
}

impl Experiment {
    pub(crate) fn root(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }
}

/// An experiment with one ligand and one output directory holding two solutions.
///
/// The second solution carries a rotamer block that moves atoms 2 and 3 and names a
/// serial the receptor does not have.
pub(crate) fn two_solution_experiment(with_protein: bool) -> Experiment {
    let dir = tempfile::tempdir().unwrap();
    let mut conf = String::from("  GOLD CONFIGURATION FILE\n\nligand_data_file ligandA.mol2 10\n");
    conf.push_str("directory = out1\n");
    if with_protein {
        conf.push_str("protein_datafile = receptor.mol2\n");
    }
    let experiment = Experiment {
        conf_path: dir.path().join("gold.conf"),
        dir,
    };
    fs::write(&experiment.conf_path, conf).unwrap();
    if with_protein {
        experiment.write("receptor.mol2", RECEPTOR);
    }

    experiment.write(
        "out1/1_ligandA_1_1.mol2",
        &solution_text("ligandA", ["55.10", "-40.10", "2.00"], None),
    );
    let rotamers = vec![
        rotamer_line(9.0, 8.0, 7.0, 2),
        rotamer_line(6.0, 5.0, 4.0, 3),
        rotamer_line(1.0, 1.0, 1.0, 99),
    ];
    experiment.write(
        "out1/2_ligandA_1_2.mol2",
        &solution_text("ligandA", ["61.30", "-47.00", "3.50"], Some(&rotamers)),
    );
    experiment
}

/// [`two_solution_experiment`] with the receptor declared as a PDB file.
pub(crate) fn pdb_receptor_experiment() -> Experiment {
    let experiment = two_solution_experiment(false);
    fs::write(
        &experiment.conf_path,
        "ligand_data_file ligandA.mol2 10\ndirectory = out1\nprotein_datafile = receptor.pdb\n",
    )
    .unwrap();
    experiment.write("receptor.pdb", RECEPTOR_PDB);
    experiment
}
