//! Bucket-wide settings from `sqlbucket.yml`

use crate::error::{CoreError, CoreResult};
use crate::variables::Variables;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default bucket settings file name
pub const BUCKET_CONFIG_FILE: &str = "sqlbucket.yml";

/// Environment variable overriding `env_name`
pub const ENV_NAME_VAR: &str = "SQLBUCKET_ENV";

/// Process-wide settings: where projects live, which connections exist,
/// and the active environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BucketConfig {
    /// Directory holding one sub-directory per project
    #[serde(default = "default_projects_folder")]
    pub projects_folder: PathBuf,

    /// Extra macro directory searched after the built-in macros
    #[serde(default)]
    pub macro_folder: Option<PathBuf>,

    /// Active environment name
    #[serde(default)]
    pub env_name: Option<String>,

    /// Variables exposed under `e`
    #[serde(default)]
    pub env_variables: Variables,

    /// Variables exposed under `c`, keyed by connection name
    #[serde(default)]
    pub connection_variables: BTreeMap<String, Variables>,

    /// Connection name to connection URL
    #[serde(default)]
    pub connections: BTreeMap<String, String>,
}

fn default_projects_folder() -> PathBuf {
    PathBuf::from("projects")
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            projects_folder: default_projects_folder(),
            macro_folder: None,
            env_name: None,
            env_variables: Variables::new(),
            connection_variables: BTreeMap::new(),
            connections: BTreeMap::new(),
        }
    }
}

impl BucketConfig {
    /// Load settings from a file path.
    ///
    /// Relative `projects_folder` and `macro_folder` are resolved against
    /// the directory containing the file.
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
        let mut config: BucketConfig =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.projects_folder = absolutize(base, &config.projects_folder);
        config.macro_folder = config.macro_folder.map(|p| absolutize(base, &p));
        Ok(config)
    }

    /// Environment name: `SQLBUCKET_ENV` when set, else `env_name`
    pub fn resolve_env_name(&self) -> Option<String> {
        std::env::var(ENV_NAME_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.env_name.clone())
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
