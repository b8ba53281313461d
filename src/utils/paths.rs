// Path conversion utilities
//
// The codebase map keys on relative Unix-style paths so results stay stable
// and comparable across platforms.

use anyhow::{Context, Result};
use std::path::Path;

/// Convert an absolute path to a relative Unix-style path (with `/`
/// separators), stripped of the workspace root prefix.
pub fn to_relative_unix_style(absolute: &Path, workspace_root: &Path) -> Result<String> {
    // Canonicalize both sides when possible so symlinked roots still match;
    // fall back to the originals for paths that do not exist yet
    let (path, root) = match (absolute.canonicalize(), workspace_root.canonicalize()) {
        (Ok(path), Ok(root)) => (path, root),
        _ => (absolute.to_path_buf(), workspace_root.to_path_buf()),
    };

    let relative = path.strip_prefix(&root).with_context(|| {
        format!(
            "{} is not inside workspace {}",
            path.display(),
            root.display()
        )
    })?;

    Ok(relative.to_string_lossy().replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_the_workspace_prefix() {
        let relative =
            to_relative_unix_style(Path::new("/work/project/src/main.py"), Path::new("/work/project"))
                .unwrap();
        assert_eq!(relative, "src/main.py");
    }

    #[test]
    fn rejects_paths_outside_the_workspace() {
        assert!(
            to_relative_unix_style(Path::new("/elsewhere/main.py"), Path::new("/work/project"))
                .is_err()
        );
    }
}
