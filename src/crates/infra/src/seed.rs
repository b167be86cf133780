use application::command::user::CreateUserCmd;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 种子文件中的一个用户
#[derive(Debug, Deserialize)]
struct SeedUser {
    name: String,
    #[serde(default)]
    collections: IndexMap<String, Vec<String>>,
}

impl From<SeedUser> for CreateUserCmd {
    fn from(seed: SeedUser) -> Self {
        CreateUserCmd {
            name: seed.name,
            collections: seed.collections.into_iter().collect(),
        }
    }
}

/// 解析种子 JSON：`[{"name": "...", "collections": {"favourites": ["O1", "129"]}}]`
pub fn parse_seed(json: &str) -> Result<Vec<CreateUserCmd>, SeedError> {
    let users: Vec<SeedUser> = serde_json::from_str(json)?;
    Ok(users.into_iter().map(CreateUserCmd::from).collect())
}

pub fn load_seed_file(path: impl AsRef<Path>) -> Result<Vec<CreateUserCmd>, SeedError> {
    let content = std::fs::read_to_string(path)?;
    parse_seed(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_users_with_and_without_collections() {
        let cmds = parse_seed(
            r#"[
                {"name": "Ada", "collections": {"prints": ["O1"], "later": []}},
                {"name": "Grace"}
            ]"#,
        )
        .unwrap();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].collections[0].0, "prints");
        assert_eq!(cmds[0].collections[1].0, "later");
        assert!(cmds[1].collections.is_empty());
    }

    #[test]
    fn reports_malformed_json() {
        assert!(matches!(parse_seed("{"), Err(SeedError::Parse(_))));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "Ada"}}]"#).unwrap();
        let cmds = load_seed_file(file.path()).unwrap();
        assert_eq!(cmds[0].name, "Ada");
        assert!(matches!(
            load_seed_file(file.path().with_extension("missing")),
            Err(SeedError::Io(_))
        ));
    }
}
