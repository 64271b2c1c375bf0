// context.rs — Per-run emission state
//
// One `EmitContext` lives for exactly one program generation. It carries the
// indentation unit, the feature-requirement set filled by `need`, the
// optional loop-trap prefix, and declarations hoisted out of nested slots.
//
// Preconditions: none.
// Postconditions: `features` only grows during a run.
// Failure modes: none.
// Side effects: none.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A runtime-support prelude that generated code may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    /// Keyboard events: key blocks are dispatched from a `handle(key)` function.
    Keyboard,
}

impl Feature {
    pub const ALL: [Feature; 1] = [Feature::Keyboard];

    pub fn name(self) -> &'static str {
        match self {
            Feature::Keyboard => "keyboard",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| format!("unknown feature '{}'", s))
    }
}

#[derive(Debug, Clone)]
pub struct EmitContext {
    indent: String,
    features: BTreeSet<Feature>,
    statement_prefix: Option<String>,
    declarations: Vec<String>,
}

impl Default for EmitContext {
    fn default() -> Self {
        Self::new("    ")
    }
}

impl EmitContext {
    pub fn new(indent: impl Into<String>) -> Self {
        EmitContext {
            indent: indent.into(),
            features: BTreeSet::new(),
            statement_prefix: None,
            declarations: Vec::new(),
        }
    }

    /// Set the loop-trap template; `%1` is replaced by the quoted block id.
    pub fn with_statement_prefix(mut self, prefix: Option<String>) -> Self {
        self.statement_prefix = prefix;
        self
    }

    pub fn indent_unit(&self) -> &str {
        &self.indent
    }

    /// Declare a feature requirement. Returns `true` on first declaration.
    pub fn need(&mut self, feature: Feature) -> bool {
        self.features.insert(feature)
    }

    pub fn features(&self) -> &BTreeSet<Feature> {
        &self.features
    }

    pub fn statement_prefix(&self) -> Option<&str> {
        self.statement_prefix.as_deref()
    }

    /// Queue a declaration to be emitted at top level.
    pub fn hoist(&mut self, code: String) {
        self.declarations.push(code);
    }

    pub fn declarations(&self) -> &[String] {
        &self.declarations
    }

    /// Consume the context, yielding the feature set and hoisted declarations.
    pub fn finish(self) -> (BTreeSet<Feature>, Vec<String>) {
        (self.features, self.declarations)
    }
}
