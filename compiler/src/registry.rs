// registry.rs — Block generator registry
//
// Maps block type tags to emission functions. Built-in generators are
// installed at startup by `Registry::builtin`; registering an existing tag
// replaces the previous entry (last write wins).

use std::collections::HashMap;

use crate::ast::Block;
use crate::codegen::{Generator, Order};
use crate::context::Feature;
use crate::{control, event, values};

// ── Emitters ────────────────────────────────────────────────────────────────

/// Renders a statement block to complete, newline-terminated lines.
pub type StatementFn = fn(&Block, &mut Generator<'_>) -> String;

/// Renders a value block to inline text and its precedence.
pub type ValueFn = fn(&Block, &mut Generator<'_>) -> (String, Order);

/// How a block type is rendered and where its text ends up.
#[derive(Debug, Clone, Copy)]
pub enum Emitter {
    /// Inline statement, emitted where it appears.
    Statement(StatementFn),
    /// Top-level definition; hoisted out of nested statement slots.
    Declaration(StatementFn),
    /// Event block whose stack is routed to the feature's dispatch handler.
    Handler(Feature, StatementFn),
    /// Expression block, only valid inside an expression slot.
    Value(ValueFn),
}

// ── Registry ────────────────────────────────────────────────────────────────

pub struct Registry {
    emitters: HashMap<String, Emitter>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Registry {
            emitters: HashMap::new(),
        }
    }

    /// A registry with every built-in block generator installed.
    pub fn builtin() -> Self {
        let mut registry = Registry::new();
        control::install(&mut registry);
        event::install(&mut registry);
        values::install(&mut registry);
        registry
    }

    /// Install `emitter` for `type_tag`, returning the entry it replaced.
    pub fn register(&mut self, type_tag: impl Into<String>, emitter: Emitter) -> Option<Emitter> {
        self.emitters.insert(type_tag.into(), emitter)
    }

    pub fn lookup(&self, type_tag: &str) -> Option<Emitter> {
        self.emitters.get(type_tag).copied()
    }

    /// Registered type tags in sorted order.
    pub fn type_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.emitters.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
