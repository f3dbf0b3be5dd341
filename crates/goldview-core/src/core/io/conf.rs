//! Reader for the GOLD experiment configuration file (`gold.conf`).
//!
//! Only the three keys needed to locate the results are interpreted; every other
//! line is ignored.

use crate::core::utils::paths::normalize;
use phf::phf_map;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Length of the file-extension marker (`.mol2`) stripped from ligand inputs.
const LIGAND_SUFFIX_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfKey {
    LigandDataFile,
    Directory,
    ProteinDatafile,
}

impl ConfKey {
    fn name(self) -> &'static str {
        match self {
            ConfKey::LigandDataFile => "ligand_data_file",
            ConfKey::Directory => "directory",
            ConfKey::ProteinDatafile => "protein_datafile",
        }
    }
}

static CONF_KEYS: phf::Map<&'static str, ConfKey> = phf_map! {
    "ligand_data_file" => ConfKey::LigandDataFile,
    "directory" => ConfKey::Directory,
    "protein_datafile" => ConfKey::ProteinDatafile,
};

#[derive(Debug, Error)]
pub enum ConfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed '{key}' entry on line {line}: {reason}")]
    Malformed {
        line: usize,
        key: &'static str,
        reason: &'static str,
    },
}

/// One glob pattern matching the solution files of a (directory, ligand) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionPattern {
    pub directory: String,
    pub ligand: String,
    pub pattern: String,
}

/// The parameters of a GOLD experiment needed to locate its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldConf {
    base_dir: PathBuf,
    ligand_bases: Vec<String>,
    directories: Vec<String>,
    protein_path: Option<PathBuf>,
}

impl GoldConf {
    /// Reads and parses a configuration file; its parent directory becomes the base
    /// directory of the experiment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::Io`] if the file cannot be read and
    /// [`ConfError::Malformed`] for an entry missing its value.
    pub fn from_path(path: &Path) -> Result<Self, ConfError> {
        let text = fs::read_to_string(path)?;
        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        debug!(path = %path.display(), "Parsing GOLD configuration.");
        Self::parse(&text, base_dir)
    }

    /// Parses configuration text.
    ///
    /// `ligand_data_file` and `directory` may repeat and are kept in file order;
    /// the last `protein_datafile` wins and is resolved against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::Malformed`] for a recognised key without a usable value.
    pub fn parse(text: &str, base_dir: impl Into<PathBuf>) -> Result<Self, ConfError> {
        let base_dir = base_dir.into();
        let mut ligand_bases = Vec::new();
        let mut directories = Vec::new();
        let mut protein_path = None;

        for (idx, line) in text.lines().enumerate() {
            let line_num = idx + 1;
            let token = line
                .split(|c: char| c.is_whitespace() || c == '=')
                .next()
                .unwrap_or_default();
            let Some(&key) = CONF_KEYS.get(token) else {
                continue;
            };
            let rest = &line[token.len()..];

            match key {
                ConfKey::LigandDataFile => {
                    ligand_bases.push(parse_ligand_base(rest, line_num)?);
                }
                ConfKey::Directory => {
                    directories.push(assigned_value(rest, key, line_num)?.to_string());
                }
                ConfKey::ProteinDatafile => {
                    let value = assigned_value(rest, key, line_num)?;
                    protein_path = Some(base_dir.join(value));
                }
            }
        }

        Ok(Self {
            base_dir,
            ligand_bases,
            directories,
            protein_path,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Ligand inputs with their extension stripped, in file order.
    pub fn ligand_bases(&self) -> &[String] {
        &self.ligand_bases
    }

    /// Output directories, in file order.
    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    pub fn protein_path(&self) -> Option<&Path> {
        self.protein_path.as_deref()
    }

    /// Glob patterns for every (directory, ligand) pair, directories outermost.
    ///
    /// Each pattern has the form `<base>/<directory>/*_<ligand name>_*_*.mol2`; the
    /// literal parts are escaped so that bracket or star characters in directory
    /// names are matched verbatim.
    pub fn solution_patterns(&self) -> Vec<SolutionPattern> {
        let mut patterns = Vec::with_capacity(self.directories.len() * self.ligand_bases.len());
        for directory in &self.directories {
            let output_dir = normalize(&self.base_dir.join(directory));
            let escaped_dir = glob::Pattern::escape(&output_dir.to_string_lossy());
            for ligand in &self.ligand_bases {
                let name = Path::new(ligand)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| ligand.clone());
                let file_pattern = format!("*_{}_*_*.mol2", glob::Pattern::escape(&name));
                patterns.push(SolutionPattern {
                    directory: directory.clone(),
                    ligand: ligand.clone(),
                    pattern: Path::new(&escaped_dir)
                        .join(file_pattern)
                        .to_string_lossy()
                        .into_owned(),
                });
            }
        }
        patterns
    }
}

fn parse_ligand_base(rest: &str, line_num: usize) -> Result<String, ConfError> {
    let malformed = |reason| ConfError::Malformed {
        line: line_num,
        key: ConfKey::LigandDataFile.name(),
        reason,
    };

    let rest = rest.trim_start();
    let rest = rest.strip_prefix('=').unwrap_or(rest);
    let file = rest
        .split_whitespace()
        .next()
        .ok_or_else(|| malformed("missing ligand file name"))?;

    let cut = file
        .char_indices()
        .rev()
        .nth(LIGAND_SUFFIX_LEN - 1)
        .map(|(idx, _)| idx)
        .filter(|&idx| idx > 0)
        .ok_or_else(|| malformed("ligand file name is too short to carry an extension"))?;
    Ok(file[..cut].to_string())
}

fn assigned_value(rest: &str, key: ConfKey, line_num: usize) -> Result<&str, ConfError> {
    let malformed = |reason| ConfError::Malformed {
        line: line_num,
        key: key.name(),
        reason,
    };
    let (_, value) = rest.split_once('=').ok_or_else(|| malformed("missing '='"))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(malformed("empty value"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONF: &str = "\
  GOLD CONFIGURATION FILE

  AUTOMATIC SETTINGS
autoscale = 1

  DATA FILES
ligand_data_file ligands/ligandA.mol2 10
ligand_data_file ligandB.mol2 10
param_file = DEFAULT
directory = out1
directory = ./out2

  PROTEIN DATA
protein_datafile = protein.mol2
";

    #[test]
    fn parses_repeated_keys_in_order() {
        let conf = GoldConf::parse(CONF, "/exp").unwrap();
        assert_eq!(conf.ligand_bases(), &["ligands/ligandA", "ligandB"]);
        assert_eq!(conf.directories(), &["out1", "./out2"]);
        assert_eq!(conf.base_dir(), Path::new("/exp"));
    }

    #[test]
    fn protein_path_is_resolved_against_base_dir() {
        let conf = GoldConf::parse(CONF, "/exp").unwrap();
        assert_eq!(conf.protein_path(), Some(Path::new("/exp/protein.mol2")));
    }

    #[test]
    fn last_protein_datafile_wins() {
        let text = "protein_datafile = a.mol2\nprotein_datafile = b.mol2\n";
        let conf = GoldConf::parse(text, "/exp").unwrap();
        assert_eq!(conf.protein_path(), Some(Path::new("/exp/b.mol2")));
    }

    #[test]
    fn missing_protein_datafile_leaves_no_protein() {
        let conf = GoldConf::parse("directory = out\n", "/exp").unwrap();
        assert!(conf.protein_path().is_none());
    }

    #[test]
    fn ligand_entry_accepts_assignment_form() {
        let conf = GoldConf::parse("ligand_data_file = ligandA.mol2\n", "/exp").unwrap();
        assert_eq!(conf.ligand_bases(), &["ligandA"]);
    }

    #[test]
    fn directory_value_is_taken_after_first_equals() {
        let conf = GoldConf::parse("directory =  out=weird  \n", "/exp").unwrap();
        assert_eq!(conf.directories(), &["out=weird"]);
    }

    #[test]
    fn keys_must_match_a_whole_token() {
        let text = "directory_extra = nope\n ligand_data_file indented.mol2\nprotein_datafile_x = y\n";
        let conf = GoldConf::parse(text, "/exp").unwrap();
        assert!(conf.directories().is_empty());
        assert!(conf.ligand_bases().is_empty());
        assert!(conf.protein_path().is_none());
    }

    #[test]
    fn ligand_without_file_is_malformed() {
        let err = GoldConf::parse("autoscale = 1\nligand_data_file\n", "/exp").unwrap_err();
        assert!(matches!(
            err,
            ConfError::Malformed {
                line: 2,
                key: "ligand_data_file",
                ..
            }
        ));
    }

    #[test]
    fn ligand_shorter_than_extension_is_malformed() {
        let err = GoldConf::parse("ligand_data_file .mol2\n", "/exp").unwrap_err();
        assert!(matches!(err, ConfError::Malformed { line: 1, .. }));
    }

    #[test]
    fn directory_without_value_is_malformed() {
        assert!(matches!(
            GoldConf::parse("directory out\n", "/exp"),
            Err(ConfError::Malformed {
                key: "directory",
                reason: "missing '='",
                ..
            })
        ));
        assert!(matches!(
            GoldConf::parse("directory =   \n", "/exp"),
            Err(ConfError::Malformed {
                key: "directory",
                reason: "empty value",
                ..
            })
        ));
    }

    #[test]
    fn pattern_count_is_directories_times_ligands() {
        for (n, m) in [(1, 1), (2, 3), (3, 2), (0, 4)] {
            let mut text = String::new();
            for i in 0..n {
                text.push_str(&format!("ligand_data_file lig{i}.mol2 10\n"));
            }
            for j in 0..m {
                text.push_str(&format!("directory = out{j}\n"));
            }
            let conf = GoldConf::parse(&text, "/exp").unwrap();
            assert_eq!(conf.solution_patterns().len(), n * m);
        }
    }

    #[cfg(unix)]
    #[test]
    fn patterns_iterate_directories_outermost_and_use_ligand_basename() {
        let conf = GoldConf::parse(CONF, "/exp").unwrap();
        let patterns: Vec<String> = conf
            .solution_patterns()
            .into_iter()
            .map(|p| p.pattern)
            .collect();
        assert_eq!(
            patterns,
            vec![
                "/exp/out1/*_ligandA_*_*.mol2",
                "/exp/out1/*_ligandB_*_*.mol2",
                "/exp/out2/*_ligandA_*_*.mol2",
                "/exp/out2/*_ligandB_*_*.mol2",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn pattern_literals_are_escaped() {
        let conf = GoldConf::parse("ligand_data_file l[1].mol2\ndirectory = run*\n", "/exp").unwrap();
        let pattern = &conf.solution_patterns()[0].pattern;
        assert_eq!(pattern, "/exp/run[*]/*_l[[]1[]]_*_*.mol2");
    }

    #[test]
    fn from_path_uses_parent_as_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gold.conf");
        std::fs::write(&path, CONF).unwrap();

        let conf = GoldConf::from_path(&path).unwrap();
        assert_eq!(conf.base_dir(), dir.path());
        assert_eq!(conf.protein_path(), Some(dir.path().join("protein.mol2").as_path()));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            GoldConf::from_path(&dir.path().join("missing.conf")),
            Err(ConfError::Io(_))
        ));
    }
}
