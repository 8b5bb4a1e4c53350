use std::path::Path;

/// Render `path` relative to `base` with forward slashes; `.` when equal.
pub fn relative_display(path: &Path, base: &Path) -> String {
    let relative = pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf());
    let rendered = normalize_path_separator(&relative.to_string_lossy());
    if rendered.is_empty() {
        ".".to_string()
    } else {
        rendered
    }
}

// Helper function for cross-platform path comparison
pub fn normalize_path_separator(s: &str) -> String {
    s.replace('\\', "/")
}
