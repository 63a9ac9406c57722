pub mod export;
pub mod tidy;
pub mod validate;
pub mod version;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::exit::{ExitStatus, Halt};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Teams as YAML files named after their id, users in one CSV file
    pub const TEAMS_AND_USERS: &str = r#"
version: 1.0.0
types:
  - name: team
    input: yaml
    match:
      include: ['^teams/(?P<team_id>[^/]+)\.yaml$']
    schema:
      type: object
      required: [id, name]
      properties:
        id: { type: string }
        name: { type: string }
    constraints:
      - type: unique
        key: $.id
      - type: path_equals_attr
        path_selector: path.team_id
        references: { key: $.id }
    output: { path: dist/teams.json, format: json }
  - name: user
    input: csv
    csv: { delimiter: "," }
    match:
      include: ['^users\.csv$']
    schema:
      type: object
      required: [id, team]
      properties:
        id: { type: string }
        team: { type: string }
        age: { type: integer }
    constraints:
      - id: user_team
        type: foreign_key
        key: $.team
        references: { type: team, key: $.id }
    output: { path: dist/users.jsonl, format: jsonl }
"#;

    /// A repository holding `.curate` and the given files
    pub fn repo(config: &str, files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".curate"), config).unwrap();
        for (path, content) in files {
            write(dir.path(), path, content);
        }
        dir
    }

    pub fn write(root: &Path, path: &str, content: &str) {
        let path = root.join(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// `None` on success, the halt status otherwise
    pub fn exit_status(result: anyhow::Result<()>) -> Option<ExitStatus> {
        match result {
            Ok(()) => None,
            Err(err) => Some(err.downcast_ref::<Halt>().expect("reported failure").status),
        }
    }
}
