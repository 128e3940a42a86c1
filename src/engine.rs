use std::sync::Arc;

use dashmap::DashMap;
use log::debug;

use crate::Result;
use crate::ast::Node;
use crate::template::Template;
use crate::{parser, template};

/// A named-template cache for hosts that render the same sources
/// repeatedly.
///
/// `get` compiles on first sight and reuses the node tree afterwards; the
/// tree is shared via `Arc` while every returned [`Template`] carries its
/// own fresh filter registry. The cache is instance-level, not global, and
/// safe to share across threads.
#[derive(Default)]
pub struct Engine {
    cache: DashMap<String, Arc<Vec<Node>>>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the compiled form of `name`, compiling `source` on a cache
    /// miss. The source is only consulted when the name is not cached.
    pub fn get(&self, name: &str, source: &str) -> Result<Template> {
        if let Some(nodes) = self.cache.get(name) {
            debug!("template cache hit: {}", name);
            return Ok(Template::from_cached(nodes.clone(), source.len()));
        }

        debug!("template cache miss: {} ({} bytes)", name, source.len());
        let nodes = Arc::new(parser::parse(source)?);
        self.cache.insert(name.to_string(), nodes.clone());
        Ok(Template::from_cached(nodes, source.len()))
    }

    /// Compile without caching. Equivalent to [`template::compile`].
    pub fn compile(&self, source: &str) -> Result<Template> {
        template::compile(source)
    }

    pub fn remove(&self, name: &str) {
        self.cache.remove(name);
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}
