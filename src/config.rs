use std::path::Path;

use serde::Deserialize;

use crate::error::{BankCsvError, Result};

/// Rule file contents. Rules are kept in file order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(rename = "AccountFromDescription", default)]
    pub account_from_description: Vec<AccountRule>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccountRule {
    #[serde(rename = "Account")]
    pub account: String,
    #[serde(rename = "Regex")]
    pub regex: String,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|source| BankCsvError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = serde_json::from_str(&content).map_err(|source| BankCsvError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "Loaded {} rule(s) from {}",
        config.account_from_description.len(),
        path.display()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("rules.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_keeps_rule_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"{"AccountFromDescription": [
                {"Account": "Expenses:Coffee", "Regex": "Coffee"},
                {"Account": "Expenses:Food", "Regex": "(?i)market"}
            ]}"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.account_from_description.len(), 2);
        assert_eq!(config.account_from_description[0].account, "Expenses:Coffee");
        assert_eq!(config.account_from_description[1].regex, "(?i)market");
    }

    #[test]
    fn test_missing_rule_list_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"Comment": "nothing here"}"#);
        let config = load_config(&path).unwrap();
        assert!(config.account_from_description.is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"AccountFromDescription": [{"Account": }"#);
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, BankCsvError::Config { .. }));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, BankCsvError::ConfigRead { .. }));
    }
}
