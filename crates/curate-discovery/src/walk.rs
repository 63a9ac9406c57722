//! Repository walk and file-to-type assignment

use crate::metadata::builtin_metadata;
use curate_config::{Config, PatternCache, CONFIG_FILE_NAME};
use curate_constraint::PathMetadata;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into, besides hidden ones
const IGNORED_DIRS: [&str; 2] = ["node_modules", "__pycache__"];

/// A data file assigned to one type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Root-relative path with forward slashes
    pub path: String,
    pub type_name: String,
    pub path_metadata: PathMetadata,
}

/// Everything found by a walk
#[derive(Debug, Default)]
pub struct Discovery {
    /// Matched files, sorted by path
    pub files: Vec<DiscoveredFile>,
    pub errors: Vec<String>,
}

impl Discovery {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Walk `root` and assign each file to the single type whose patterns match it
pub fn discover(root: &Path, config: &Config, patterns: &PatternCache) -> Discovery {
    let outputs: HashSet<String> = config
        .types
        .iter()
        .filter_map(|t| t.output.as_ref())
        .map(|output| normalize_output_path(&output.path))
        .collect();

    let mut discovery = Discovery::default();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                discovery.errors.push(format!("walking directory: {}", e));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(rel_path) = relative_path(root, entry.path()) else {
            continue;
        };

        if entry.file_name() == CONFIG_FILE_NAME {
            if let Some((dir, _)) = rel_path.rsplit_once('/') {
                discovery.errors.push(format!(
                    "found {} in subdirectory {:?}; only the root {} is allowed",
                    CONFIG_FILE_NAME, dir, CONFIG_FILE_NAME
                ));
            }
            continue;
        }

        if outputs.contains(&rel_path) {
            trace!(path = %rel_path, "skipping output file");
            continue;
        }

        let mut matches: Vec<(&str, PathMetadata)> = patterns
            .all()
            .iter()
            .filter_map(|type_patterns| {
                type_patterns
                    .match_path(&rel_path)
                    .map(|captures| (type_patterns.type_name.as_str(), captures))
            })
            .collect();

        match matches.len() {
            0 => {}
            1 => {
                let (type_name, mut path_metadata) = matches.remove(0);
                builtin_metadata(&rel_path, &mut path_metadata);
                trace!(path = %rel_path, type_name, "matched file");
                discovery.files.push(DiscoveredFile {
                    path: rel_path,
                    type_name: type_name.to_string(),
                    path_metadata,
                });
            }
            _ => {
                let names: Vec<&str> = matches.iter().map(|(name, _)| *name).collect();
                discovery.errors.push(format!(
                    "file {:?} matches multiple types: {}",
                    rel_path,
                    names.join(", ")
                ));
            }
        }
    }

    discovery.files.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(
        files = discovery.files.len(),
        errors = discovery.errors.len(),
        "discovery finished"
    );
    discovery
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || IGNORED_DIRS.iter().any(|dir| *dir == name)
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

fn normalize_output_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.strip_prefix("./").unwrap_or(&path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CONFIG: &str = r#"
version: 1.0.0
types:
  - name: team
    input: yaml
    match:
      include: ['^teams/(?P<slug>[^/]+)\.ya?ml$']
    schema: { type: object }
  - name: user
    input: json
    match:
      include: ['^users/.*\.json$']
      exclude: ['^users/drafts/']
    schema: { type: object }
    output: { path: users/all.json, format: json }
"#;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn run(root: &Path, yaml: &str) -> Discovery {
        let config = Config::from_yaml_str(yaml).unwrap();
        let patterns = PatternCache::build(&config.types).unwrap();
        discover(root, &config, &patterns)
    }

    #[test]
    fn test_files_are_typed_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "users/zed.json", "{}");
        write(dir.path(), "users/amy.json", "{}");
        write(dir.path(), "teams/core.yml", "id: core");
        write(dir.path(), "README.md", "");

        let discovery = run(dir.path(), CONFIG);
        assert!(discovery.is_ok(), "{:?}", discovery.errors);

        let found: Vec<_> = discovery
            .files
            .iter()
            .map(|f| (f.path.as_str(), f.type_name.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("teams/core.yml", "team"),
                ("users/amy.json", "user"),
                ("users/zed.json", "user"),
            ]
        );
    }

    #[test]
    fn test_path_metadata() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "teams/core.yml", "id: core");

        let discovery = run(dir.path(), CONFIG);
        let metadata = &discovery.files[0].path_metadata;
        assert_eq!(metadata["path.slug"], "core");
        assert_eq!(metadata["path.file"], "core");
        assert_eq!(metadata["path.ext"], "yaml");
        assert_eq!(metadata["path.parent"], "teams");
    }

    #[test]
    fn test_excludes_outputs_and_hidden_dirs() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "users/drafts/new.json", "{}");
        write(dir.path(), "users/all.json", "{}");
        write(dir.path(), "users/.cache/x.json", "{}");
        write(dir.path(), "node_modules/users/y.json", "{}");
        write(dir.path(), "users/ok.json", "{}");

        let discovery = run(dir.path(), CONFIG);
        let paths: Vec<_> = discovery.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["users/ok.json"]);
    }

    #[test]
    fn test_nested_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), CONFIG_FILE_NAME, CONFIG);
        write(dir.path(), "sub/.curate", CONFIG);

        let discovery = run(dir.path(), CONFIG);
        assert_eq!(discovery.errors.len(), 1);
        assert!(discovery.errors[0].contains("\"sub\""));
    }

    #[test]
    fn test_multiple_type_match_is_an_error() {
        let yaml = r#"
version: 1.0.0
types:
  - name: a
    input: json
    match: { include: ['\.json$'] }
  - name: b
    input: json
    match: { include: ['^data/'] }
"#;
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "data/x.json", "{}");

        let discovery = run(dir.path(), yaml);
        assert!(discovery.files.is_empty());
        assert_eq!(discovery.errors.len(), 1);
        assert!(discovery.errors[0].contains("matches multiple types: a, b"));
    }

    #[test]
    fn test_output_path_normalization() {
        assert_eq!(normalize_output_path("./out/all.json"), "out/all.json");
        assert_eq!(normalize_output_path("out\\all.json"), "out/all.json");
    }
}
