//! Codebase reading - discovery and parallel per-file extraction
//!
//! Walks a directory tree, parses every Python source file and collects the
//! per-file record lists. Per-file extraction shares no state (the package
//! probe memoizes behind its own lock), so files fan out across the rayon
//! pool and fan back in ordered by relative path.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::extractors::{DeclarationRecord, PythonExtractor};
use crate::language;
use crate::utils::file_utils;
use crate::utils::paths::to_relative_unix_style;

/// Per-file record lists keyed by relative Unix-style path
pub type CodebaseMap = BTreeMap<String, Vec<DeclarationRecord>>;

/// Extract every Python file under `root`.
///
/// Files that fail to read or parse are skipped with a warning; one broken
/// file never poisons the rest of the run.
pub fn read_codebase(root: &Path) -> Result<CodebaseMap> {
    let files = discover_python_files(root)?;
    info!(
        "Extracting {} Python files under {}",
        files.len(),
        root.display()
    );

    let entries: Vec<(String, Vec<DeclarationRecord>)> = files
        .par_iter()
        .filter_map(|path| match extract_file(path, root) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping {}: {e:#}", path.display());
                None
            }
        })
        .collect();

    Ok(entries.into_iter().collect())
}

fn discover_python_files(root: &Path) -> Result<Vec<PathBuf>> {
    let pattern = root.join("**").join("*.py");
    let pattern = pattern.to_string_lossy().into_owned();

    let mut files = Vec::new();
    for entry in
        glob::glob(&pattern).with_context(|| format!("invalid discovery pattern {pattern}"))?
    {
        match entry {
            Ok(path) if path.is_file() && file_utils::is_python_file(&path) => files.push(path),
            Ok(_) => {}
            Err(e) => warn!("Unreadable path during discovery: {e}"),
        }
    }
    Ok(files)
}

fn extract_file(path: &Path, root: &Path) -> Result<(String, Vec<DeclarationRecord>)> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let relative = to_relative_unix_style(path, root)
        .unwrap_or_else(|_| path.to_string_lossy().replace('\\', "/"));
    debug!("Extracting {relative}");

    let tree = language::parse(&content)?;
    let extractor = PythonExtractor::new(relative.clone(), content);
    let records = extractor.extract(&tree)?;
    Ok((relative, records))
}

/// Render the codebase map for the documentation renderer boundary
pub fn to_json(codebase: &CodebaseMap) -> Result<String> {
    serde_json::to_string_pretty(codebase).context("serializing codebase records")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_fan_in_ordered_by_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        std::fs::create_dir(root.join("pkg")).unwrap();
        std::fs::write(root.join("zeta.py"), "import os\n").unwrap();
        std::fs::write(root.join("pkg").join("alpha.py"), "LIMIT = 3\nTIMEOUT = 5\n").unwrap();
        std::fs::write(root.join("notes.txt"), "not python").unwrap();

        let codebase = read_codebase(root).unwrap();

        let paths: Vec<&str> = codebase.keys().map(String::as_str).collect();
        assert_eq!(paths, vec!["pkg/alpha.py", "zeta.py"]);
        assert_eq!(codebase["pkg/alpha.py"].len(), 2);
        assert_eq!(codebase["zeta.py"].len(), 1);
    }

    #[test]
    fn broken_files_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        std::fs::write(root.join("good.py"), "X = 1\n").unwrap();
        // Invalid UTF-8 fails the read; the rest of the run continues
        std::fs::write(root.join("bad.py"), [0xff, 0xfe, 0x00]).unwrap();

        let codebase = read_codebase(root).unwrap();
        assert_eq!(codebase.len(), 1);
        assert!(codebase.contains_key("good.py"));
    }

    #[test]
    fn json_rendering_keeps_path_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("mod.py"), "DEBUG = True\n").unwrap();

        let codebase = read_codebase(root).unwrap();
        let json = to_json(&codebase).unwrap();
        assert!(json.contains("\"mod.py\""));
        assert!(json.contains("\"kind\": \"assign\""));
    }
}
