//! Exposes a [`Context`] to minijinja, including the `f` function namespace.

use minijinja::value::{Enumerator, Object, ObjectRepr, Value};
use minijinja::{context, Error, ErrorKind, State};
use sb_core::{Context, FunctionRegistry};
use std::sync::Arc;

/// Template-side view of a [`FunctionRegistry`].
///
/// Behaves like a read-only map of callables, so both `f.nrange(1, 4)` and
/// `f['nrange'](1, 4)` work, and `f | list` yields the registered names.
#[derive(Debug)]
pub struct FunctionNamespace {
    registry: FunctionRegistry,
}

impl FunctionNamespace {
    pub fn new(registry: FunctionRegistry) -> Self {
        Self { registry }
    }
}

impl Object for FunctionNamespace {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Map
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        self.registry.get(key.as_str()?).cloned()
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Values(self.registry.names().into_iter().map(Value::from).collect())
    }

    fn call_method(
        self: &Arc<Self>,
        state: &State<'_, '_>,
        method: &str,
        args: &[Value],
    ) -> Result<Value, Error> {
        match self.registry.get(method) {
            Some(function) => function.call(state, args),
            None => Err(Error::new(
                ErrorKind::UnknownMethod,
                format!("no helper function named '{method}' is registered"),
            )),
        }
    }
}

/// Convert a context into the root value templates are rendered with.
///
/// Plain variables sit at the top level next to `c` and `e`; `f` is only
/// present when at least one function is registered.
pub fn context_value(ctx: &Context) -> Value {
    let data = Value::from_serialize(ctx);
    if ctx.functions.is_empty() {
        return data;
    }
    let namespace = Value::from_object(FunctionNamespace::new(ctx.functions.clone()));
    context! { f => namespace, ..data }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::ContextBuilder;
    use serde_json::json;

    fn render(source: &str, ctx: &Context) -> Result<String, Error> {
        minijinja::Environment::new().render_str(source, context_value(ctx))
    }

    fn context_with(functions: &FunctionRegistry) -> Context {
        let mut vars = sb_core::Variables::new();
        vars.insert("foo".into(), json!("bar"));
        ContextBuilder::new("db1")
            .environment(Some("dev"))
            .functions(functions)
            .caller_variables(&vars)
            .build()
            .unwrap()
    }

    #[test]
    fn test_namespaces_and_variables() {
        let ctx = context_with(&FunctionRegistry::new());
        let out = render("{{ foo }} {{ c.name }} {{ e.name }}", &ctx).unwrap();
        assert_eq!(out, "bar db1 dev");
    }

    #[test]
    fn test_call_registered_function() {
        let mut functions = FunctionRegistry::new();
        functions.register("nrange", |start: i64, end: i64| {
            (start..end).collect::<Vec<_>>()
        });
        let ctx = context_with(&functions);

        let out = render("select {{ f.nrange(1, 4) | join(', ') }};", &ctx).unwrap();
        assert_eq!(out, "select 1, 2, 3;");
    }

    #[test]
    fn test_unknown_function_errors() {
        let mut functions = FunctionRegistry::new();
        functions.register("one", || 1);
        let ctx = context_with(&functions);

        assert!(render("{{ f.missing() }}", &ctx).is_err());
    }

    #[test]
    fn test_function_names_enumerable() {
        let mut functions = FunctionRegistry::new();
        functions.register("a", || 1);
        functions.register("b", || 2);
        let ctx = context_with(&functions);

        let out = render("{{ f | list | join(',') }}", &ctx).unwrap();
        assert_eq!(out, "a,b");
    }
}
