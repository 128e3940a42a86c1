use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::Result;
use crate::ast::Node;
use crate::context::Context;
use crate::filters::FilterRegistry;
use crate::serializer::ValueSerializer;
use crate::value::Value;
use crate::{parser, render};

/// A compiled template: an immutable node tree plus an owned filter
/// registry.
///
/// Compile once, render many times. Rendering never mutates the template;
/// the only mutation after compilation is explicit filter registration,
/// which affects subsequent renders. The node tree sits behind an `Arc` so
/// the [`crate::Engine`] cache can hand the same compilation to many
/// templates.
#[derive(Debug)]
pub struct Template {
    nodes: Arc<Vec<Node>>,
    registry: FilterRegistry,
    /// Source length, used as the output capacity hint.
    src_len: usize,
}

/// Compile a template string. No process-wide state is involved: all state
/// lives on the returned `Template`.
pub fn compile(source: &str) -> Result<Template> {
    debug!("compiling template ({} bytes)", source.len());
    let nodes = parser::parse(source)?;
    Ok(Template {
        nodes: Arc::new(nodes),
        registry: FilterRegistry::new(),
        src_len: source.len(),
    })
}

impl Template {
    pub(crate) fn from_cached(nodes: Arc<Vec<Node>>, src_len: usize) -> Self {
        Self {
            nodes,
            registry: FilterRegistry::new(),
            src_len,
        }
    }

    /// Register a named filter, overwriting any previous one with the same
    /// name. Effective for every render that follows.
    pub fn register_filter<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(Value, &[Value]) -> Value + 'static,
    {
        self.registry.register(name, filter);
    }

    /// Render against any serializable context.
    pub fn render<T: Serialize>(&self, context: &T) -> Result<String> {
        let value = context.serialize(ValueSerializer)?;
        self.render_value(&value)
    }

    /// Render with no context: paths resolve to null, literals still render.
    pub fn render_empty(&self) -> Result<String> {
        self.render_value(&Value::Null)
    }

    /// Render against an already-built [`Value`] tree.
    pub fn render_value(&self, root: &Value) -> Result<String> {
        let mut out = String::with_capacity(self.src_len);
        let mut ctx = Context::new(root);
        render::render(&self.nodes, &mut ctx, &self.registry, &mut out)?;
        Ok(out)
    }
}
