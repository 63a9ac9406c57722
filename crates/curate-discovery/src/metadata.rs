//! Built-in path metadata

use curate_constraint::PathMetadata;

/// Add the `path.file`, `path.ext` and `path.parent` entries for a
/// root-relative, slash-separated path
pub fn builtin_metadata(rel_path: &str, metadata: &mut PathMetadata) {
    let (parent, name) = match rel_path.rsplit_once('/') {
        Some((dir, name)) => (dir.rsplit('/').next().unwrap_or(dir), name),
        None => ("", rel_path),
    };
    let (stem, ext) = match name.rfind('.') {
        Some(dot) => (&name[..dot], &name[dot + 1..]),
        None => (name, ""),
    };

    metadata.insert("path.file".to_string(), stem.to_string());
    metadata.insert("path.ext".to_string(), normalize_ext(ext));
    metadata.insert("path.parent".to_string(), parent.to_string());
}

fn normalize_ext(ext: &str) -> String {
    match ext.to_lowercase().as_str() {
        "yml" => "yaml".to_string(),
        other => other.to_string(),
    }
}
