//! Path helpers used to shorten solution identifiers.
//!
//! The common path is computed on the string form of the directories (with a trailing
//! separator), which keeps the result on a component boundary: the longest shared
//! string prefix is cut back to its last separator.

use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};

/// Lexically normalises a path: drops `.` components and folds `..` into the
/// preceding normal component. `..` directly under the root is discarded, and an
/// empty result becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

fn absolute(path: &Path) -> PathBuf {
    normalize(&std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()))
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((idx, _), _)| idx)
        .unwrap_or_else(|| a.len().min(b.len()))
}

/// Longest common ancestor directory of a set of directories.
///
/// Returns `None` for an empty input. Directories on unrelated roots degrade to the
/// filesystem root.
pub fn common_path<I, P>(directories: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let normalized: Vec<String> = directories
        .into_iter()
        .map(|dir| {
            let mut text = absolute(dir.as_ref()).to_string_lossy().into_owned();
            if !text.ends_with(MAIN_SEPARATOR) {
                text.push(MAIN_SEPARATOR);
            }
            text
        })
        .collect();

    let (first, rest) = normalized.split_first()?;
    let prefix_len = rest
        .iter()
        .fold(first.len(), |len, other| common_prefix_len(&first[..len], other));
    let prefix = &first[..prefix_len];

    let dir = match prefix.rfind(MAIN_SEPARATOR) {
        Some(0) => &prefix[..1],
        Some(idx) => &prefix[..idx],
        None => ".",
    };
    Some(PathBuf::from(dir))
}

/// [`common_path`] over the parent directories of a set of files.
pub fn common_path_of_filenames<I, P>(filenames: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    common_path(filenames.into_iter().map(|file| {
        file.as_ref()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }))
}
