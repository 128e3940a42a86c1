use crate::value::Value;
use std::collections::HashMap;

/// A registered filter: receives the accumulated value plus the literal
/// arguments from the template, in declared order, and returns the new value.
pub type FilterFn = dyn Fn(Value, &[Value]) -> Value;

/// Name → callable table owned by a [`crate::Template`].
///
/// Registration overwrites silently and performs no arity validation; a
/// lookup miss only becomes an error at render time. No filters are
/// predefined.
#[derive(Default)]
pub struct FilterRegistry {
    filters: HashMap<String, Box<FilterFn>>,
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(Value, &[Value]) -> Value + 'static,
    {
        self.filters.insert(name.into(), Box::new(filter));
    }

    pub fn lookup(&self, name: &str) -> Option<&FilterFn> {
        self.filters.get(name).map(|f| f.as_ref())
    }
}
