use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds executables named `plugin-<name>` directly inside `plugin_dir`,
/// per spec.md §4.7's discovery rule.
pub fn discover_plugins(plugin_dir: &Path) -> Vec<(String, PathBuf)> {
    let mut found = Vec::new();
    if !plugin_dir.is_dir() {
        return found;
    }
    for entry in WalkDir::new(plugin_dir).min_depth(1).max_depth(1) {
        let Ok(entry) = entry else { continue };
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().to_string();
        if let Some(name) = file_name.strip_prefix("plugin-") {
            found.push((name.to_string(), entry.path().to_path_buf()));
        }
    }
    found.sort_by(|a, b| a.0.cmp(&b.0));
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_plugin_prefixed_executables() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("plugin-foo"), b"").unwrap();
        std::fs::write(dir.path().join("plugin-bar"), b"").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"").unwrap();

        let found = discover_plugins(dir.path());
        let names: Vec<_> = found.iter().map(|(n, _)| n.clone()).collect();
        assert_eq!(names, vec!["bar", "foo"]);
    }

    #[test]
    fn missing_directory_yields_no_plugins() {
        assert!(discover_plugins(Path::new("/nonexistent/path/xyz")).is_empty());
    }
}
