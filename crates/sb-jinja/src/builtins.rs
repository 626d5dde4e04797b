//! Built-in shared macro templates
//!
//! These ship inside the binary and form the second search root: a
//! project template with the same relative path shadows them, and they
//! shadow anything in the extra macro folder.

/// Metadata describing a built-in macro
#[derive(Debug, Clone, Copy)]
pub struct MacroMetadata {
    /// Macro name as used in templates
    pub name: &'static str,
    /// Template file defining the macro
    pub template: &'static str,
    /// Brief description of what the macro does
    pub description: &'static str,
    /// Example usage in a template
    pub example: &'static str,
}

/// Built-in templates as `(relative path, source)`
const BUILTIN_TEMPLATES: &[(&str, &str)] =
    &[("sqlbucket.sql", include_str!("../macros/sqlbucket.sql"))];

/// Source of a built-in template, if `name` is one
pub fn get_builtin_template(name: &str) -> Option<&'static str> {
    BUILTIN_TEMPLATES
        .iter()
        .find(|(path, _)| *path == name)
        .map(|(_, source)| *source)
}

/// Relative paths of all built-in templates
pub fn builtin_template_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_TEMPLATES.iter().map(|(path, _)| *path)
}

/// Metadata for every built-in macro
pub fn get_builtin_macros() -> Vec<MacroMetadata> {
    vec![
        MacroMetadata {
            name: "date_range_filter",
            template: "sqlbucket.sql",
            description: "Half-open date range predicate on a column",
            example: "{{ sb.date_range_filter('created_at', from, to) }}",
        },
        MacroMetadata {
            name: "union_all",
            template: "sqlbucket.sql",
            description: "UNION ALL of SELECT * over a list of tables",
            example: "{{ sb.union_all(['events_eu', 'events_us']) }}",
        },
    ]
}
