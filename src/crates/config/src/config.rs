use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const ENV_VAR_PREFIX: &str = "IMPOSTER";

/// Lists the YAML files directly inside (or, if `recursive`, beneath)
/// `config_dir`, sorted by filename so that declaration order across files
/// is lexicographic per spec.md §4.1 tie-break rule (v).
pub fn get_config_files(config_dir: &str, recursive: bool) -> Vec<PathBuf> {
    let walker = WalkDir::new(config_dir)
        .sort_by_file_name()
        .follow_links(true);
    let walker = if recursive {
        walker
    } else {
        walker.max_depth(1)
    };

    walker
        .into_iter()
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();
            if path.is_file() && is_yaml(path) {
                Some(path.to_path_buf())
            } else {
                None
            }
        })
        .collect()
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}
