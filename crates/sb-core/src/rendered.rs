//! The rendered step list produced for one run

use crate::context::Context;
use serde::Serialize;

/// Rendered SQL keyed by step identifier, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedQueries {
    entries: Vec<(String, String)>,
}

impl RenderedQueries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the SQL for `step`
    pub fn insert(&mut self, step: impl Into<String>, sql: impl Into<String>) {
        let step = step.into();
        let sql = sql.into();
        match self.entries.iter_mut().find(|(name, _)| *name == step) {
            Some(entry) => entry.1 = sql,
            None => self.entries.push((step, sql)),
        }
    }

    /// Rendered SQL of `step`
    pub fn get(&self, step: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == step)
            .map(|(_, sql)| sql.as_str())
    }

    /// Step identifiers in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// `(step, sql)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, sql)| (name.as_str(), sql.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RenderedQueries {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut queries = Self::new();
        for (step, sql) in iter {
            queries.insert(step, sql);
        }
        queries
    }
}

/// Everything a runner needs for one run: ordered steps, their rendered
/// SQL, the context used to render them, and the target connection.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedConfiguration {
    /// Step identifiers in execution order
    pub order: Vec<String>,
    /// Rendered SQL per step
    pub queries: RenderedQueries,
    /// Merged context the queries were rendered with
    pub context: Context,
    /// Connection URL of the target database
    pub connection_url: String,
    /// Name of the target connection
    pub connection_name: String,
    /// Project directory name
    pub project_name: String,
    /// Rendered bootstrap query, run once per opened session
    pub connection_query: Option<String>,
}

impl RenderedConfiguration {
    /// Rendered SQL of `step`
    pub fn query(&self, step: &str) -> Option<&str> {
        self.queries.get(step)
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
