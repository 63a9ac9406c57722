//! Semantic validation of a loaded configuration

use crate::model::{Config, InputFormat, TypeDef};
use curate_constraint::{ConstraintKind, Reference};
use curate_selector::Selector;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

/// Warnings and errors found while validating a configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiagnostics {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ConfigDiagnostics {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

static SEMVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)$").unwrap());

static TYPE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").unwrap());

static PATH_SELECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^path\.(file|parent|ext|[a-zA-Z_][a-zA-Z0-9_]*)$").unwrap()
});

const BUILTIN_PATH_ENTRIES: [&str; 3] = ["file", "parent", "ext"];

/// Check a configuration for every semantic problem at once
///
/// `cli_version` is the running binary's version. An empty or `dev`
/// version skips the compatibility check with a warning.
pub fn validate(config: &Config, cli_version: &str) -> ConfigDiagnostics {
    let mut diag = ConfigDiagnostics::default();

    check_version(config, cli_version, &mut diag);

    let mut names = HashSet::new();
    let mut output_paths: HashMap<&str, &str> = HashMap::new();

    for (index, type_def) in config.types.iter().enumerate() {
        let prefix = format!("types[{}]({})", index, type_def.name);

        if !names.insert(type_def.name.as_str()) {
            diag.error(format!(
                "{}: duplicate type name {:?}",
                prefix, type_def.name
            ));
        }
        if !TYPE_NAME.is_match(&type_def.name) {
            diag.error(format!(
                "{}: type name must match {}",
                prefix,
                TYPE_NAME.as_str()
            ));
        }

        check_patterns(&prefix, type_def, &mut diag);
        check_schema(&prefix, type_def, &mut diag);
        check_csv(&prefix, type_def, &mut diag);

        if let Some(output) = &type_def.output {
            if output.path.is_empty() {
                diag.error(format!("{}: output.path is required", prefix));
            } else if let Some(previous) = output_paths.insert(&output.path, &type_def.name) {
                diag.error(format!(
                    "{}: output.path {:?} conflicts with type {:?}",
                    prefix, output.path, previous
                ));
            }
        }

        for (position, constraint) in type_def.constraints.iter().enumerate() {
            let cprefix = format!("{}.constraints[{}]", prefix, position);
            check_constraint(&cprefix, type_def, &constraint.kind, &mut diag);
        }
    }

    // Referenced types may be declared after the referencing one
    for (index, type_def) in config.types.iter().enumerate() {
        for (position, constraint) in type_def.constraints.iter().enumerate() {
            if let ConstraintKind::ForeignKey {
                references: Some(reference),
                ..
            } = &constraint.kind
            {
                if !reference.type_name.is_empty() && !names.contains(reference.type_name.as_str())
                {
                    diag.error(format!(
                        "types[{}]({}).constraints[{}]: references.type {:?} does not match any defined type",
                        index, type_def.name, position, reference.type_name
                    ));
                }
            }
        }
    }

    debug!(
        warnings = diag.warnings.len(),
        errors = diag.errors.len(),
        "validated configuration"
    );
    diag
}

fn check_version(config: &Config, cli_version: &str, diag: &mut ConfigDiagnostics) {
    let Some(wanted) = parse_semver(&config.version) else {
        diag.error(format!(
            "version {:?} is not valid semver (expected major.minor.patch)",
            config.version
        ));
        return;
    };

    if cli_version.is_empty() || cli_version == "dev" {
        diag.warn("CLI version is dev/empty; skipping config version compatibility check");
        return;
    }

    let Some(running) = parse_semver(cli_version) else {
        diag.warn(format!(
            "CLI version {:?} is not semver; skipping version comparison",
            cli_version
        ));
        return;
    };

    if running.0 != wanted.0 {
        diag.error(format!(
            "major version mismatch: config requires {}.x.x but CLI is {}",
            wanted.0, cli_version
        ));
    } else if running < wanted {
        diag.error(format!(
            "CLI version {} is older than config version {}",
            cli_version, config.version
        ));
    }
}

fn parse_semver(text: &str) -> Option<(u64, u64, u64)> {
    let caps = SEMVER.captures(text)?;
    let part = |i: usize| -> Option<u64> { caps.get(i)?.as_str().parse().ok() };
    Some((part(1)?, part(2)?, part(3)?))
}

fn check_patterns(prefix: &str, type_def: &TypeDef, diag: &mut ConfigDiagnostics) {
    if type_def.match_def.include.is_empty() {
        diag.error(format!(
            "{}: match.include must have at least 1 pattern",
            prefix
        ));
    }
    for (field, patterns) in [
        ("include", &type_def.match_def.include),
        ("exclude", &type_def.match_def.exclude),
    ] {
        for (i, pattern) in patterns.iter().enumerate() {
            if let Err(e) = Regex::new(pattern) {
                diag.error(format!(
                    "{}: match.{}[{}] invalid regex: {}",
                    prefix, field, i, e
                ));
            }
        }
    }
}

fn check_schema(prefix: &str, type_def: &TypeDef, diag: &mut ConfigDiagnostics) {
    match &type_def.schema {
        None => diag.error(format!("{}: schema is required", prefix)),
        Some(schema) if schema.get("type").and_then(|t| t.as_str()) != Some("object") => {
            diag.error(format!("{}: schema.type must be \"object\"", prefix))
        }
        Some(_) => {}
    }
}

fn check_csv(prefix: &str, type_def: &TypeDef, diag: &mut ConfigDiagnostics) {
    if type_def.input == InputFormat::Csv && type_def.csv.is_none() {
        diag.error(format!(
            "{}: csv config is required when input is csv",
            prefix
        ));
    }
    if let Some(csv) = &type_def.csv {
        if csv.delimiter.chars().count() != 1 {
            diag.error(format!(
                "{}: csv.delimiter must be exactly 1 character",
                prefix
            ));
        }
    }
}

fn check_constraint(
    prefix: &str,
    type_def: &TypeDef,
    kind: &ConstraintKind,
    diag: &mut ConfigDiagnostics,
) {
    match kind {
        ConstraintKind::Unique { key, .. } => check_selector(prefix, "key", key, diag),

        ConstraintKind::ForeignKey { key, references } => {
            check_selector(prefix, "key", key, diag);
            match references {
                None => diag.error(format!(
                    "{}: references is required for foreign_key",
                    prefix
                )),
                Some(reference) => {
                    if reference.type_name.is_empty() {
                        diag.error(format!("{}: references.type is required", prefix));
                    }
                    check_selector(prefix, "references.key", &reference.key, diag);
                }
            }
        }

        ConstraintKind::PathEqualsAttr {
            path_selector,
            references,
            ..
        } => check_path_equals_attr(prefix, type_def, path_selector, references.as_ref(), diag),
    }
}

fn check_path_equals_attr(
    prefix: &str,
    type_def: &TypeDef,
    path_selector: &str,
    references: Option<&Reference>,
    diag: &mut ConfigDiagnostics,
) {
    let capture = PATH_SELECTOR
        .captures(path_selector)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());

    if capture.is_none() {
        diag.error(format!(
            "{}: path_selector {:?} is invalid",
            prefix, path_selector
        ));
    }

    match references {
        None => diag.error(format!(
            "{}: references is required for path_equals_attr",
            prefix
        )),
        Some(reference) => check_selector(prefix, "references.key", &reference.key, diag),
    }

    let Some(name) = capture.filter(|name| !BUILTIN_PATH_ENTRIES.contains(name)) else {
        return;
    };

    for (i, pattern) in type_def.match_def.include.iter().enumerate() {
        // Compile failures are reported by check_patterns
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        if !re.capture_names().flatten().any(|group| group == name) {
            diag.error(format!(
                "{}: path_selector uses capture {:?} but match.include[{}] does not define named group (?P<{}>...)",
                prefix, name, i, name
            ));
        }
    }
}

fn check_selector(prefix: &str, field: &str, value: &str, diag: &mut ConfigDiagnostics) {
    if value.is_empty() {
        diag.error(format!("{}: {} is required", prefix, field));
    } else if let Err(e) = Selector::parse(value) {
        diag.error(format!(
            "{}: {} {:?} is not a valid selector: {}",
            prefix, field, value, e
        ));
    }
}
