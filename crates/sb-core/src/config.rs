//! Project configuration parsing for `config.yaml`

use crate::context::RESERVED_NAMES;
use crate::error::{CoreError, CoreResult};
use crate::variables::Variables;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Group used when `order` is grouped and the caller names none.
pub const DEFAULT_GROUP: &str = "main";

/// File names probed, in order, when loading a project's config.
const CONFIG_FILE_NAMES: &[&str] = &["config.yaml", "config.yml"];

/// Step order of a project.
///
/// Decided once when the config is deserialized: either a flat list of
/// template names, or a mapping from group name to such a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderSpec {
    /// A single ordered list of steps
    Flat(Vec<String>),
    /// Named alternative orderings, selected at run time
    Grouped(BTreeMap<String, Vec<String>>),
}

impl OrderSpec {
    /// Resolve the step list for `group`.
    ///
    /// A flat order only accepts `None`. A grouped order falls back to
    /// [`DEFAULT_GROUP`] when no group is given.
    pub fn resolve(&self, group: Option<&str>) -> CoreResult<&[String]> {
        match self {
            OrderSpec::Flat(steps) => match group {
                Some(group) => Err(CoreError::OrderNotInRightFormat {
                    group: group.to_string(),
                }),
                None => Ok(steps),
            },
            OrderSpec::Grouped(groups) => {
                let group = group.unwrap_or(DEFAULT_GROUP);
                groups
                    .get(group)
                    .map(Vec::as_slice)
                    .ok_or_else(|| CoreError::GroupNotFound {
                        group: group.to_string(),
                        available: groups.keys().cloned().collect::<Vec<_>>().join(", "),
                    })
            }
        }
    }

    /// Group names, empty for a flat order
    pub fn group_names(&self) -> Vec<&str> {
        match self {
            OrderSpec::Flat(_) => Vec::new(),
            OrderSpec::Grouped(groups) => groups.keys().map(String::as_str).collect(),
        }
    }
}

/// Declarative configuration of one project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Step order (flat or grouped)
    pub order: OrderSpec,

    /// Overrides for the `c` namespace, keyed by connection name
    #[serde(default)]
    pub connection_variables: BTreeMap<String, Variables>,

    /// Overrides for the `e` namespace, keyed by environment name
    #[serde(default)]
    pub environment_variables: BTreeMap<String, Variables>,

    /// Overrides for top-level variables
    #[serde(default)]
    pub project_variables: Variables,

    /// Template (in `queries/`) run once after each connection opens
    #[serde(default)]
    pub connection_query: Option<String>,
}

impl ProjectConfig {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content).map_err(|e| match e {
            CoreError::ConfigParseError { message, .. } => CoreError::ConfigParseError {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parse configuration from YAML text
    pub fn parse(content: &str) -> CoreResult<Self> {
        let config: ProjectConfig =
            serde_yaml::from_str(content).map_err(|e| CoreError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    /// Looks for config.yaml, then config.yml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        Self::config_path(dir)
            .ok_or_else(|| CoreError::ConfigNotFound {
                path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
            })
            .and_then(|path| Self::load(&path))
    }

    /// Path of the config file inside `dir`, if any
    pub fn config_path(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    fn validate(&self) -> CoreResult<()> {
        if let OrderSpec::Grouped(groups) = &self.order {
            if groups.is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "'order' mapping must declare at least one group".to_string(),
                });
            }
        }
        if let Some(name) = self
            .project_variables
            .keys()
            .find(|k| RESERVED_NAMES.contains(&k.as_str()))
        {
            return Err(CoreError::ReservedVariableName { name: name.clone() });
        }
        if self
            .connection_query
            .as_deref()
            .is_some_and(|q| q.trim().is_empty())
        {
            return Err(CoreError::ConfigInvalid {
                message: "'connection_query' cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
