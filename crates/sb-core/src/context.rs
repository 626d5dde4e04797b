//! Rendering context: building it from the bucket registries and caller
//! variables, then merging project-declared overrides on top.
//!
//! A context has three reserved namespaces next to the plain variables:
//!
//! | key | content                                                   |
//! |-----|-----------------------------------------------------------|
//! | `c` | connection variables, always including `name`             |
//! | `e` | environment variables, always including `name` (may be null) |
//! | `f` | registered helper functions                               |

use crate::config::ProjectConfig;
use crate::error::{CoreError, CoreResult};
use crate::function::FunctionRegistry;
use crate::variables::Variables;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Namespace key holding connection variables
pub const CONNECTION_KEY: &str = "c";
/// Namespace key holding environment variables
pub const ENVIRONMENT_KEY: &str = "e";
/// Namespace key holding helper functions
pub const FUNCTIONS_KEY: &str = "f";

/// Top-level names callers may not use
pub const RESERVED_NAMES: [&str; 3] = [CONNECTION_KEY, ENVIRONMENT_KEY, FUNCTIONS_KEY];

const NAME_KEY: &str = "name";

/// The merged variable mapping fed into template rendering
#[derive(Debug, Clone, Serialize)]
pub struct Context {
    /// `c` namespace
    #[serde(rename = "c")]
    pub connection: Variables,

    /// `e` namespace
    #[serde(rename = "e")]
    pub environment: Variables,

    /// Plain top-level variables
    #[serde(flatten)]
    pub variables: Variables,

    /// `f` namespace, never serialized
    #[serde(skip)]
    pub functions: FunctionRegistry,
}

impl Context {
    /// Active connection name (`c.name`)
    pub fn connection_name(&self) -> &str {
        self.connection
            .get(NAME_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Active environment name (`e.name`), if any
    pub fn environment_name(&self) -> Option<&str> {
        self.environment.get(NAME_KEY).and_then(Value::as_str)
    }

    /// Look up a top-level variable
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.variables.get(key)
    }

    /// Data part of the context as one JSON object (without `f`)
    pub fn to_json(&self) -> Value {
        let mut object = self.variables.clone();
        object.insert(
            CONNECTION_KEY.to_string(),
            Value::Object(self.connection.clone()),
        );
        object.insert(
            ENVIRONMENT_KEY.to_string(),
            Value::Object(self.environment.clone()),
        );
        Value::Object(object)
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())?;
        if !self.functions.is_empty() {
            write!(f, " functions: [{}]", self.functions.names().join(", "))?;
        }
        Ok(())
    }
}

/// Builds a [`Context`] from process-wide registries and caller variables.
///
/// ```
/// use sb_core::ContextBuilder;
/// use serde_json::json;
///
/// let mut vars = sb_core::Variables::new();
/// vars.insert("from".into(), json!("2024-01-01"));
///
/// let context = ContextBuilder::new("warehouse")
///     .environment(Some("dev"))
///     .caller_variables(&vars)
///     .build()
///     .unwrap();
///
/// assert_eq!(context.connection_name(), "warehouse");
/// assert_eq!(context.environment_name(), Some("dev"));
/// assert_eq!(context.get("from"), Some(&json!("2024-01-01")));
/// ```
#[derive(Debug)]
pub struct ContextBuilder<'a> {
    connection_name: &'a str,
    environment_name: Option<&'a str>,
    connection_variables: Option<&'a BTreeMap<String, Variables>>,
    environment_variables: Option<&'a Variables>,
    functions: Option<&'a FunctionRegistry>,
    caller_variables: Option<&'a Variables>,
}

impl<'a> ContextBuilder<'a> {
    /// Start a context for the given connection
    pub fn new(connection_name: &'a str) -> Self {
        Self {
            connection_name,
            environment_name: None,
            connection_variables: None,
            environment_variables: None,
            functions: None,
            caller_variables: None,
        }
    }

    /// Active environment name
    pub fn environment(mut self, name: Option<&'a str>) -> Self {
        self.environment_name = name;
        self
    }

    /// Registry of connection variables, keyed by connection name
    pub fn connection_variables(mut self, registry: &'a BTreeMap<String, Variables>) -> Self {
        self.connection_variables = Some(registry);
        self
    }

    /// Process-wide environment variables
    pub fn environment_variables(mut self, variables: &'a Variables) -> Self {
        self.environment_variables = Some(variables);
        self
    }

    /// Helper functions exposed as `f`
    pub fn functions(mut self, registry: &'a FunctionRegistry) -> Self {
        self.functions = Some(registry);
        self
    }

    /// Variables submitted by the caller (CLI or API)
    pub fn caller_variables(mut self, variables: &'a Variables) -> Self {
        self.caller_variables = Some(variables);
        self
    }

    /// Build the context.
    ///
    /// Fails with [`CoreError::ReservedVariableName`] when a caller variable
    /// is named `c`, `e` or `f`.
    pub fn build(self) -> CoreResult<Context> {
        let mut connection = self
            .connection_variables
            .and_then(|registry| registry.get(self.connection_name))
            .cloned()
            .unwrap_or_default();
        connection.insert(
            NAME_KEY.to_string(),
            Value::String(self.connection_name.to_string()),
        );

        let mut environment = self.environment_variables.cloned().unwrap_or_default();
        environment.insert(
            NAME_KEY.to_string(),
            self.environment_name
                .map_or(Value::Null, |name| Value::String(name.to_string())),
        );

        let functions = self.functions.cloned().unwrap_or_default();

        let mut variables = Variables::new();
        if let Some(caller) = self.caller_variables {
            for (key, value) in caller {
                if RESERVED_NAMES.contains(&key.as_str()) {
                    return Err(CoreError::ReservedVariableName { name: key.clone() });
                }
                variables.insert(key.clone(), value.clone());
            }
        }

        Ok(Context {
            connection,
            environment,
            variables,
            functions,
        })
    }
}

/// Applies a project's declared overrides to a built [`Context`].
///
/// Project-declared connection and environment tables overwrite matching
/// keys inside `c` and `e`, but only when the active connection or
/// environment name is a key of that table. Flat `project_variables`
/// always overwrite matching top-level variables, including caller ones.
#[derive(Debug)]
pub struct ContextMerger<'a> {
    context: Context,
    config: &'a ProjectConfig,
}

impl<'a> ContextMerger<'a> {
    pub fn new(context: Context, config: &'a ProjectConfig) -> Self {
        Self { context, config }
    }

    /// Apply every override table and return the merged context
    pub fn merge(mut self) -> Context {
        self.overwrite_environment_variables();
        self.overwrite_connection_variables();
        self.overwrite_project_variables();
        self.context
    }

    fn overwrite_environment_variables(&mut self) {
        let Some(env_name) = self.context.environment_name().map(str::to_string) else {
            return;
        };
        if let Some(overrides) = self.config.environment_variables.get(&env_name) {
            overwrite(&mut self.context.environment, overrides);
        }
    }

    fn overwrite_connection_variables(&mut self) {
        let connection_name = self.context.connection_name().to_string();
        if let Some(overrides) = self.config.connection_variables.get(&connection_name) {
            overwrite(&mut self.context.connection, overrides);
        }
    }

    fn overwrite_project_variables(&mut self) {
        overwrite(
            &mut self.context.variables,
            &self.config.project_variables,
        );
    }
}

fn overwrite(target: &mut Variables, overrides: &Variables) {
    for (key, value) in overrides {
        target.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
