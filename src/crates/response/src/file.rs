use imposter_errors::ImposterError;
use std::path::Path;

/// Reads a `file` response relative to the owning plugin's config directory
/// (spec.md §4.3 "read file relative to the config directory of the owning
/// plugin").
pub fn read_response_file(config_dir: &Path, file_name: &str) -> Result<Vec<u8>, ImposterError> {
    let path = config_dir.join(file_name);
    std::fs::read(&path).map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "failed to read response file");
        ImposterError::IoError(e)
    })
}

/// Infers a `Content-Type` from the file's extension, falling back to
/// `application/octet-stream` (spec.md §4.3).
pub fn infer_content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .to_string()
}
