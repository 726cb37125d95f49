//! Builds the directory manifest JSON: for each given path, the sorted,
//! extension-stripped list of files in its directory.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

/// Lists `directory`'s immediate entries (not recursing into
/// subdirectories), skipping dotfiles, and strips each entry's
/// extension.
fn directory_files(directory: &Path) -> Result<Vec<String>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        entries.push(stem);
    }
    entries.sort();
    Ok(entries)
}

/// For each path in `paths`, lists the files of the directory it names
/// (a directory path lists itself; a file path lists its parent), keyed
/// by that directory's basename.
pub fn build_manifest(paths: &[&Path]) -> Result<BTreeMap<String, Vec<String>>> {
    let mut manifest = BTreeMap::new();
    for path in paths {
        let directory = if path.is_dir() {
            path
        } else {
            path.parent().unwrap_or(Path::new("."))
        };
        let name = directory
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        manifest.insert(name, directory_files(directory)?);
    }
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_files_stripped_and_sorted() {
        let dir = std::env::temp_dir().join(format!("allisbns-manifest-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.png"), b"").unwrap();
        std::fs::write(dir.join("a.png"), b"").unwrap();
        let manifest = build_manifest(&[dir.as_path()]).unwrap();
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(manifest.get(&name), Some(&vec!["a".to_string(), "b".to_string()]));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn dotfiles_are_excluded() {
        let dir = std::env::temp_dir().join(format!("allisbns-manifest-dot-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("visible.png"), b"").unwrap();
        std::fs::write(dir.join(".hidden.png"), b"").unwrap();
        let manifest = build_manifest(&[dir.as_path()]).unwrap();
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(manifest.get(&name), Some(&vec!["visible".to_string()]));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn a_file_path_is_keyed_by_its_parent_directory() {
        let dir = std::env::temp_dir().join(format!("allisbns-manifest-file-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("tile.png");
        std::fs::write(&file, b"").unwrap();
        let manifest = build_manifest(&[file.as_path()]).unwrap();
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(manifest.get(&name), Some(&vec!["tile".to_string()]));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
