// ast.rs — Block tree types for editor block programs
//
// A block program is a list of top-level statement stacks. Each block carries
// a type tag selecting its generator, literal fields, expression slots holding
// one nested value block, and statement slots holding ordered child stacks.
//
// Preconditions: produced by `load` (JSON) or the builder methods below.
// Postconditions: every child block is owned by exactly one parent slot.
// Failure modes: none (data-only module).
// Side effects: none.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ── Root ──

/// A complete block program: top-level stacks in workspace order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub stacks: Vec<Vec<Block>>,
}

impl Program {
    pub fn new(stacks: Vec<Vec<Block>>) -> Self {
        Program { stacks }
    }

    /// Total number of blocks in the program, nested ones included.
    pub fn block_count(&self) -> usize {
        self.stacks
            .iter()
            .flat_map(|stack| stack.iter())
            .map(Block::subtree_size)
            .sum()
    }
}

// ── Blocks ──

/// One node of the visual program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldValue>,
    /// Expression slots. A disconnected slot has no entry.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: BTreeMap<String, Block>,
    /// Statement slots. A slot may be present with an empty stack.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub statements: BTreeMap<String, Vec<Block>>,
}

impl Block {
    pub fn new(kind: impl Into<String>) -> Self {
        Block {
            kind: kind.into(),
            id: None,
            fields: BTreeMap::new(),
            inputs: BTreeMap::new(),
            statements: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_input(mut self, slot: impl Into<String>, block: Block) -> Self {
        self.inputs.insert(slot.into(), block);
        self
    }

    pub fn with_statements(mut self, slot: impl Into<String>, stack: Vec<Block>) -> Self {
        self.statements.insert(slot.into(), stack);
        self
    }

    /// Field value as emitted text; a missing field renders as empty text.
    pub fn field_text(&self, name: &str) -> String {
        self.fields
            .get(name)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    pub fn input(&self, slot: &str) -> Option<&Block> {
        self.inputs.get(slot)
    }

    /// Statement stack of a slot. Absent and empty slots both yield `&[]`.
    pub fn statement_stack(&self, slot: &str) -> &[Block] {
        self.statements.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the slot exists on the block, independent of its contents.
    pub fn has_statement_slot(&self, slot: &str) -> bool {
        self.statements.contains_key(slot)
    }

    /// Human-readable location for diagnostics.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => format!("{} ({})", self.kind, id),
            None => self.kind.clone(),
        }
    }

    fn subtree_size(&self) -> usize {
        1 + self.inputs.values().map(Block::subtree_size).sum::<usize>()
            + self
                .statements
                .values()
                .flat_map(|stack| stack.iter())
                .map(Block::subtree_size)
                .sum::<usize>()
    }
}

// ── Field values ──

/// A literal field value. Numbers keep their textual JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(i64::from(n).into())
    }
}
