use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::info;

use super::registry::{read_json, ContractIssue, ContractRegistry, IssueKind};
use super::ContractError;

pub const GOLDEN_FILE: &str = "contracts.golden.json";
pub const LAST_UPDATED_KEY: &str = "_last_updated";

/// SHA-256 of the compact, key-sorted serialization of `document`.
pub fn canonical_hash(document: &Value) -> String {
    let canonical = sorted(document).to_string();
    format!("{:x}", Sha256::digest(canonical.as_bytes()))
}

// Rebuild objects with keys inserted in sorted order so the output is
// canonical regardless of how serde_json orders maps.
fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), sorted(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

/// Pinned hashes of published contract versions, keyed by file name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoldenHashes {
    hashes: BTreeMap<String, String>,
    last_updated: Option<String>,
}

impl GoldenHashes {
    /// Load the golden map. A missing file is an empty map.
    pub fn load(path: &Path) -> Result<Self, ContractError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let document = read_json(path)?;
        let Value::Object(map) = document else {
            return Err(ContractError::NotAnObject(GOLDEN_FILE.to_string()));
        };

        let mut golden = Self::default();
        for (key, value) in map {
            let Some(value) = value.as_str() else {
                continue;
            };
            if key == LAST_UPDATED_KEY {
                golden.last_updated = Some(value.to_string());
            } else {
                golden.hashes.insert(key, value.to_string());
            }
        }
        Ok(golden)
    }

    pub fn save(&self, path: &Path) -> Result<(), ContractError> {
        let mut map = serde_json::Map::new();
        if let Some(last_updated) = &self.last_updated {
            map.insert(LAST_UPDATED_KEY.to_string(), Value::from(last_updated.clone()));
        }
        for (file, hash) in &self.hashes {
            map.insert(file.clone(), Value::from(hash.clone()));
        }

        let mut body = serde_json::to_string_pretty(&Value::Object(map)).map_err(|e| {
            ContractError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        body.push('\n');

        fs::write(path, body).map_err(|source| ContractError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn get(&self, file: &str) -> Option<&str> {
        self.hashes.get(file).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    /// Compare every contract against its pinned hash.
    ///
    /// Contracts that cannot be parsed are skipped here; `validate` reports them.
    pub fn check(&self, registry: &ContractRegistry) -> Vec<ContractIssue> {
        let mut issues = Vec::new();

        for contract in registry.contracts() {
            let Ok(document) = contract.load() else {
                continue;
            };
            let file = contract.file_name();
            let actual = canonical_hash(&document);

            match self.hashes.get(&file) {
                None => issues.push(ContractIssue {
                    kind: IssueKind::Golden,
                    file,
                    message: "missing from golden hashes".to_string(),
                }),
                Some(expected) if *expected != actual => issues.push(ContractIssue {
                    kind: IssueKind::Golden,
                    file,
                    message: format!("hash mismatch (golden {}, current {})", expected, actual),
                }),
                Some(_) => {}
            }
        }

        issues
    }

    /// Pin hashes for contracts not yet in the map.
    ///
    /// Refuses to rewrite the hash of an already published version. Returns the
    /// file names that were added.
    pub fn update(
        &mut self,
        registry: &ContractRegistry,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, ContractError> {
        let mut pending = Vec::new();

        for contract in registry.contracts() {
            let document = contract.load()?;
            let file = contract.file_name();
            let actual = canonical_hash(&document);

            match self.hashes.get(&file) {
                Some(expected) if *expected != actual => {
                    return Err(ContractError::ImmutableVersion {
                        file,
                        expected: expected.clone(),
                        actual,
                    });
                }
                Some(_) => {}
                None => pending.push((file, actual)),
            }
        }

        let added: Vec<String> = pending.iter().map(|(file, _)| file.clone()).collect();
        for (file, hash) in pending {
            info!(file = %file, hash = %hash, "Pinned contract hash");
            self.hashes.insert(file, hash);
        }
        if !added.is_empty() {
            self.last_updated = Some(now.to_rfc3339());
        }

        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn registry_with(dir: &Path, files: &[(&str, &str)]) -> ContractRegistry {
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
        ContractRegistry::open(dir).unwrap()
    }

    #[test]
    fn test_canonical_hash_ignores_key_order_and_whitespace() {
        let a: Value = serde_json::from_str(r#"{"b": 1, "a": {"y": [1, 2], "x": null}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a":{"x":null,"y":[1,2]},"b":1}"#).unwrap();
        assert_eq!(canonical_hash(&a), canonical_hash(&b));
        assert_eq!(canonical_hash(&a).len(), 64);
        assert_ne!(canonical_hash(&a), canonical_hash(&json!({"b": 2})));
    }

    #[test]
    fn test_canonical_hash_known_value() {
        // sha256 of the two bytes "{}"
        assert_eq!(
            canonical_hash(&json!({})),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let golden = GoldenHashes::load(&dir.path().join(GOLDEN_FILE)).unwrap();
        assert!(golden.is_empty());
        assert_eq!(golden.last_updated(), None);
    }

    #[test]
    fn test_update_save_load_check() {
        let dir = TempDir::new().unwrap();
        let registry = registry_with(
            dir.path(),
            &[("actuator.v1.json", r#"{"type": "object"}"#)],
        );
        let path = dir.path().join(GOLDEN_FILE);

        let mut golden = GoldenHashes::load(&path).unwrap();
        assert_eq!(golden.check(&registry).len(), 1);

        let added = golden.update(&registry, Utc::now()).unwrap();
        assert_eq!(added, vec!["actuator.v1.json".to_string()]);
        golden.save(&path).unwrap();

        let reloaded = GoldenHashes::load(&path).unwrap();
        assert_eq!(reloaded, golden);
        assert!(reloaded.last_updated().is_some());
        assert!(reloaded.check(&registry).is_empty());

        // Nothing new: no additions.
        let mut again = reloaded.clone();
        assert!(again.update(&registry, Utc::now()).unwrap().is_empty());
    }

    #[test]
    fn test_check_detects_mismatch() {
        let dir = TempDir::new().unwrap();
        let registry = registry_with(dir.path(), &[("actuator.v1.json", r#"{"v": 1}"#)]);
        let path = dir.path().join(GOLDEN_FILE);

        let mut golden = GoldenHashes::default();
        golden.update(&registry, Utc::now()).unwrap();
        golden.save(&path).unwrap();

        fs::write(dir.path().join("actuator.v1.json"), r#"{"v": 2}"#).unwrap();
        let issues = GoldenHashes::load(&path).unwrap().check(&registry);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Golden);
        assert!(issues[0].message.contains("mismatch"));
    }

    #[test]
    fn test_update_refuses_to_rewrite_published_hash() {
        let dir = TempDir::new().unwrap();
        let registry = registry_with(dir.path(), &[("actuator.v1.json", r#"{"v": 1}"#)]);

        let mut golden = GoldenHashes::default();
        golden.update(&registry, Utc::now()).unwrap();
        let pinned = golden.get("actuator.v1.json").unwrap().to_string();

        fs::write(dir.path().join("actuator.v1.json"), r#"{"v": 2}"#).unwrap();
        fs::write(dir.path().join("actuator.v2.json"), r#"{"v": 2}"#).unwrap();
        let registry = ContractRegistry::open(dir.path()).unwrap();

        let err = golden.update(&registry, Utc::now()).unwrap_err();
        assert!(matches!(err, ContractError::ImmutableVersion { .. }));
        assert_eq!(golden.get("actuator.v1.json"), Some(pinned.as_str()));
        assert_eq!(golden.get("actuator.v2.json"), None);
    }

    #[test]
    fn test_zero_padded_version_is_keyed_by_file_name() {
        let dir = TempDir::new().unwrap();
        let registry = registry_with(dir.path(), &[("actuator.v01.json", "{}")]);

        let mut golden = GoldenHashes::default();
        let added = golden.update(&registry, Utc::now()).unwrap();
        assert_eq!(added, vec!["actuator.v01.json".to_string()]);
        assert_eq!(golden.get("actuator.v1.json"), None);
        assert!(golden.check(&registry).is_empty());
    }

    #[test]
    fn test_saved_file_carries_last_updated_key() {
        let dir = TempDir::new().unwrap();
        let registry = registry_with(dir.path(), &[("a.v1.json", "{}")]);
        let path = dir.path().join(GOLDEN_FILE);

        let mut golden = GoldenHashes::default();
        golden.update(&registry, Utc::now()).unwrap();
        golden.save(&path).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.get(LAST_UPDATED_KEY).is_some());
        assert_eq!(raw["a.v1.json"], json!(canonical_hash(&json!({}))));
    }
}
