//! Registry of helper functions exposed to templates as `f.<name>(...)`

use minijinja::functions::Function;
use minijinja::value::{FunctionArgs, FunctionResult, Value};

/// Ordered registry of template helper functions.
///
/// Registering a name twice replaces the earlier function in place, so the
/// last registration wins while the original position is kept.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: Vec<(String, Value)>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a Rust function or closure under `name`.
    ///
    /// ```
    /// use sb_core::FunctionRegistry;
    ///
    /// let mut registry = FunctionRegistry::new();
    /// registry.register("nrange", |start: i64, end: i64| (start..end).collect::<Vec<_>>());
    /// assert!(registry.contains("nrange"));
    /// ```
    pub fn register<F, Rv, Args>(&mut self, name: &str, f: F)
    where
        F: Function<Rv, Args>,
        Rv: FunctionResult,
        Args: for<'a> FunctionArgs<'a>,
    {
        self.register_value(name, Value::from_function(f));
    }

    /// Register an already-callable template value under `name`
    pub fn register_value(&mut self, name: &str, function: Value) {
        match self.functions.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => {
                log::debug!("Function '{}' re-registered, replacing previous one", name);
                slot.1 = function;
            }
            None => self.functions.push((name.to_string(), function)),
        }
    }

    /// Merge every function of `other` into this registry
    pub fn extend(&mut self, other: &FunctionRegistry) {
        for (name, function) in &other.functions {
            self.register_value(name, function.clone());
        }
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.functions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f)
    }

    /// Whether a function is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.functions.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Iterate `(name, function)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.functions.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nrange(start: i64, end: i64) -> Vec<i64> {
        (start..end).collect()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.is_empty());

        registry.register("nrange", nrange);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("nrange"));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = FunctionRegistry::new();
        registry.register("first", || "a");
        registry.register("helper", || "old");
        registry.register("helper", || "new");

        assert_eq!(registry.names(), vec!["first", "helper"]);

        let helper = registry.get("helper").unwrap().clone();
        let env = minijinja::Environment::new();
        let output = env
            .render_str("{{ helper() }}", minijinja::context! { helper => helper })
            .unwrap();
        assert_eq!(output, "new");
    }

    #[test]
    fn test_extend() {
        let mut base = FunctionRegistry::new();
        base.register("a", || 1);
        let mut extra = FunctionRegistry::new();
        extra.register("b", || 2);
        extra.register("a", || 3);

        base.extend(&extra);
        assert_eq!(base.names(), vec!["a", "b"]);
    }
}
