use crate::value::Value;

/// Scope stack for expression resolution during a render call.
///
/// The root is the context the render was invoked with; each `{% each %}`
/// iteration pushes the current item as an inner scope. Lookups never fail:
/// a path that resolves nowhere yields `Value::Null`, which renders as an
/// empty string.
pub struct Context<'a> {
    root: &'a Value,
    /// Current iteration items, innermost last. Owned because filter chains
    /// on the bound expression may produce values that outlive no borrow.
    scopes: Vec<Value>,
}

impl<'a> Context<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self {
            root,
            scopes: Vec::new(),
        }
    }

    pub fn push(&mut self, item: Value) {
        self.scopes.push(item);
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    /// The `.` self-reference: the innermost iteration item, or the root
    /// context outside any block.
    pub fn current(&self) -> Value {
        match self.scopes.last() {
            Some(item) => item.clone(),
            None => self.root.clone(),
        }
    }

    /// Resolve a dotted path: try each iteration scope from innermost
    /// outwards, then the root. A scope claims the path when it contains the
    /// first segment; remaining segments resolve within it or yield null.
    pub fn lookup(&self, segments: &[String]) -> Value {
        let head = match segments.first() {
            Some(head) => head,
            None => return Value::Null,
        };

        for scope in self.scopes.iter().rev() {
            if let Some(v) = scope.get(head) {
                return resolve_path(v, &segments[1..]);
            }
        }
        if let Some(v) = self.root.get(head) {
            return resolve_path(v, &segments[1..]);
        }

        Value::Null
    }
}

/// Walk the remaining path segments through nested maps.
fn resolve_path(mut current: &Value, segments: &[String]) -> Value {
    for segment in segments {
        match current.get(segment) {
            Some(v) => current = v,
            None => return Value::Null,
        }
    }
    current.clone()
}
