use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use super::ContractError;

const EXAMPLES_DIR: &str = "examples";

/// One versioned contract file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    pub name: String,
    pub version: u32,
    pub path: PathBuf,
    file_name: String,
}

impl Contract {
    /// Parse `<name>.v<N>.json`. Returns `None` for anything else.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let stem = file_name.strip_suffix(".json")?;
        let (name, version) = stem.rsplit_once(".v")?;
        if name.is_empty() || version.is_empty() || !version.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            version: version.parse().ok()?,
            path: path.to_path_buf(),
            file_name: file_name.to_string(),
        })
    }

    /// On-disk file name, used as the golden-map key.
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    /// Prefix shared by this contract's example fixtures, e.g. `actuator.v1.`.
    fn example_prefix(&self) -> &str {
        &self.file_name[..self.file_name.len() - "json".len()]
    }

    /// Read and parse the contract, requiring a top-level object.
    pub fn load(&self) -> Result<Value, ContractError> {
        let document = read_json(&self.path)?;
        if !document.is_object() {
            return Err(ContractError::NotAnObject(self.file_name()));
        }
        Ok(document)
    }
}

/// Category of a registry problem, used as the report prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Json,
    Example,
    Golden,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Json => write!(f, "JSON"),
            IssueKind::Example => write!(f, "EXAMPLE"),
            IssueKind::Golden => write!(f, "GOLDEN"),
        }
    }
}

/// A single problem found while validating the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractIssue {
    pub kind: IssueKind,
    pub file: String,
    pub message: String,
}

impl fmt::Display for ContractIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.file, self.message)
    }
}

/// Contracts discovered in one directory.
#[derive(Debug, Clone)]
pub struct ContractRegistry {
    dir: PathBuf,
    contracts: Vec<Contract>,
}

impl ContractRegistry {
    /// Scan `dir` for contract files, sorted by file name.
    pub fn open(dir: &Path) -> Result<Self, ContractError> {
        if !dir.is_dir() {
            return Err(ContractError::DirectoryNotFound(dir.to_path_buf()));
        }

        let entries = fs::read_dir(dir).map_err(|source| ContractError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut contracts: Vec<Contract> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| Contract::from_path(&path))
            .collect();
        contracts.sort_by(|a, b| a.path.cmp(&b.path));

        debug!(dir = %dir.display(), count = contracts.len(), "Discovered contracts");

        Ok(Self {
            dir: dir.to_path_buf(),
            contracts,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Highest version of the named contract.
    pub fn latest(&self, name: &str) -> Option<&Contract> {
        self.contracts
            .iter()
            .filter(|contract| contract.name == name)
            .max_by_key(|contract| contract.version)
    }

    /// Example fixtures for `contract`, sorted by path.
    pub fn examples_for(&self, contract: &Contract) -> Vec<PathBuf> {
        let prefix = contract.example_prefix();
        let Ok(entries) = fs::read_dir(self.dir.join(EXAMPLES_DIR)) else {
            return Vec::new();
        };

        let mut examples: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(prefix) && name.ends_with(".json"))
            })
            .collect();
        examples.sort();
        examples
    }

    /// Well-formedness and example checks for every contract.
    pub fn validate(&self) -> Vec<ContractIssue> {
        let mut issues = Vec::new();

        for contract in &self.contracts {
            let document = match contract.load() {
                Ok(document) => Some(document),
                Err(e) => {
                    issues.push(ContractIssue {
                        kind: IssueKind::Json,
                        file: contract.file_name(),
                        message: e.to_string(),
                    });
                    None
                }
            };

            let required = document
                .as_ref()
                .and_then(|doc| doc.get("required"))
                .and_then(Value::as_array)
                .map(|fields| {
                    fields
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();

            for example in self.examples_for(contract) {
                if let Err(message) = check_example(&example, &required) {
                    issues.push(ContractIssue {
                        kind: IssueKind::Example,
                        file: display_name(&example),
                        message,
                    });
                }
            }
        }

        issues
    }
}

fn check_example(path: &Path, required: &[String]) -> Result<(), String> {
    let example = read_json(path).map_err(|e| format!("invalid: {}", e))?;
    for field in required {
        if example.get(field).is_none() {
            return Err(format!("invalid: missing required field '{}'", field));
        }
    }
    Ok(())
}

pub(super) fn read_json(path: &Path) -> Result<Value, ContractError> {
    let raw = fs::read_to_string(path).map_err(|source| ContractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|e| ContractError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
