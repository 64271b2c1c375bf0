// codegen.rs — Python code generation for block programs
//
// Walks the block tree and asks the registry, block by block, for the text of
// each construct. `Generator` is the collaborator handed to every emitter: it
// renders statement slots (indented one level), expression slots (wrapped to
// the caller's precedence), and owns the per-run `EmitContext`.
//
// Preconditions: the registry holds an emitter for every block type used.
// Postconditions: returns `GenerateResult` with the assembled Python source.
// Failure modes: unknown or misplaced blocks are skipped and reported as
//                diagnostics; emission itself never fails.
// Side effects: none.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::ast::{Block, Program};
use crate::context::{EmitContext, Feature};
use crate::diag::{codes, DiagLevel, Diagnostic};
use crate::prelude::{self, Assembly};
use crate::registry::{Emitter, Registry};

// ── Public types ────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct GenerateResult {
    pub generated: GeneratedCode,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
pub struct GeneratedCode {
    /// Header, feature preludes, hoisted declarations and body.
    pub python_source: String,
    /// Top-level stacks that are not routed to a feature handler.
    pub body: String,
    pub features: BTreeSet<Feature>,
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub indent: String,
    /// Loop-trap template emitted at the top of every loop body.
    pub statement_prefix: Option<String>,
    /// Emit `import CoronaEngine` before everything else.
    pub header: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            indent: "    ".to_string(),
            statement_prefix: None,
            header: true,
        }
    }
}

/// Python operator precedence, tightest first. Mirrors the ordering used by
/// the editor's Python generator so parenthesisation matches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Order {
    Atomic,
    UnarySign,
    Relational,
    LogicalNot,
    LogicalAnd,
    LogicalOr,
    None,
}

/// Where a stack of statement blocks ends up in the generated program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Module level, part of the program body.
    TopLevel,
    /// Re-indented inside a feature's dispatch handler.
    Handler,
    /// Inside another block's statement slot.
    Nested,
}

// ── Public entry point ──────────────────────────────────────────────────────

pub fn generate(program: &Program, registry: &Registry, options: &GenerateOptions) -> GenerateResult {
    let ctx = EmitContext::new(options.indent.clone())
        .with_statement_prefix(options.statement_prefix.clone());
    let mut gen = Generator::new(registry, ctx);

    let mut body_stacks: Vec<String> = Vec::new();
    let mut handlers: BTreeMap<Feature, Vec<String>> = BTreeMap::new();

    for (i, stack) in program.stacks.iter().enumerate() {
        for segment in handler_segments(stack, registry) {
            let head = &segment[0];
            let feature = match registry.lookup(&head.kind) {
                Some(Emitter::Handler(feature, _)) => Some(feature),
                _ => None,
            };
            let placement = if feature.is_some() {
                Placement::Handler
            } else {
                Placement::TopLevel
            };
            let code = gen.stack_to_code(segment, placement);
            if code.is_empty() {
                continue;
            }
            match feature {
                Some(feature) => {
                    debug!(stack = i, head = %head.kind, feature = %feature, "routed stack to handler");
                    handlers.entry(feature).or_default().push(code);
                }
                None => {
                    debug!(stack = i, head = %head.kind, lines = code.lines().count(), "generated stack");
                    body_stacks.push(code);
                }
            }
        }
    }

    let (ctx, diagnostics) = gen.finish();
    let indent = ctx.indent_unit().to_string();
    let (features, declarations) = ctx.finish();
    let body = body_stacks.join("\n");

    let python_source = prelude::assemble(&Assembly {
        header: options.header,
        indent: &indent,
        features: &features,
        handlers: &handlers,
        declarations: &declarations,
        body: &body,
    });

    GenerateResult {
        generated: GeneratedCode {
            python_source,
            body,
            features,
        },
        diagnostics,
    }
}

// ── Generator collaborator ──────────────────────────────────────────────────

pub struct Generator<'r> {
    registry: &'r Registry,
    ctx: EmitContext,
    diagnostics: Vec<Diagnostic>,
}

impl<'r> Generator<'r> {
    pub fn new(registry: &'r Registry, ctx: EmitContext) -> Self {
        Generator {
            registry,
            ctx,
            diagnostics: Vec::new(),
        }
    }

    pub fn indent_unit(&self) -> &str {
        self.ctx.indent_unit()
    }

    /// Declare a feature requirement for the prelude assembly step.
    pub fn need(&mut self, feature: Feature) {
        self.ctx.need(feature);
    }

    pub fn context(&self) -> &EmitContext {
        &self.ctx
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn finish(self) -> (EmitContext, Vec<Diagnostic>) {
        (self.ctx, self.diagnostics)
    }

    /// One indented no-op line, used wherever a body would be empty.
    pub fn pass_line(&self) -> String {
        format!("{}pass\n", self.ctx.indent_unit())
    }

    /// Render a sequence of statement blocks. Declarations are hoisted to
    /// top level unless the stack itself is emitted at module level.
    pub fn stack_to_code(&mut self, blocks: &[Block], placement: Placement) -> String {
        let mut out = String::new();
        for block in blocks {
            match self.registry.lookup(&block.kind) {
                None => self.report(
                    Diagnostic::new(DiagLevel::Error, block.label(), "unknown block type")
                        .with_code(codes::UNKNOWN_BLOCK),
                ),
                Some(Emitter::Value(_)) => self.report(
                    Diagnostic::new(
                        DiagLevel::Error,
                        block.label(),
                        "value block cannot be used as a statement",
                    )
                    .with_code(codes::VALUE_AS_STATEMENT),
                ),
                Some(Emitter::Statement(emit)) => out.push_str(&emit(block, self)),
                Some(Emitter::Declaration(emit)) => {
                    let code = emit(block, self);
                    if placement != Placement::TopLevel {
                        self.ctx.hoist(code);
                    } else {
                        out.push_str(&code);
                    }
                }
                Some(Emitter::Handler(feature, emit)) => {
                    if placement == Placement::Nested {
                        self.report(
                            Diagnostic::new(
                                DiagLevel::Warning,
                                block.label(),
                                format!("{} event block is nested and will not be dispatched", feature),
                            )
                            .with_code(codes::NESTED_HANDLER)
                            .with_hint("place event blocks at the top of a stack"),
                        );
                    }
                    out.push_str(&emit(block, self));
                }
            }
        }
        out
    }

    /// The statements of `slot` without extra indentation. Absent and empty
    /// slots both render as empty text.
    pub fn statement_body(&mut self, block: &Block, slot: &str) -> String {
        self.stack_to_code(block.statement_stack(slot), Placement::Nested)
    }

    /// The statements of `slot`, indented one level.
    pub fn statement_to_code(&mut self, block: &Block, slot: &str) -> String {
        let body = self.statement_body(block, slot);
        prefix_lines(&body, self.ctx.indent_unit())
    }

    /// The statements of `slot`, followed by a `pass` line when they hold
    /// nothing but comments (or nothing at all).
    pub fn branch(&mut self, block: &Block, slot: &str) -> String {
        let mut branch = self.statement_to_code(block, slot);
        if !has_statement(&branch) {
            branch.push_str(&self.pass_line());
        }
        branch
    }

    /// A loop body: the slot's statements preceded by the loop trap, if set.
    pub fn loop_body(&mut self, block: &Block, slot: &str) -> String {
        let mut branch = self.statement_to_code(block, slot);
        if let Some(prefix) = self.ctx.statement_prefix() {
            let id = block.id.as_deref().unwrap_or_default();
            let mut trap = prefix.replace("%1", &format!("'{}'", id));
            if !trap.ends_with('\n') {
                trap.push('\n');
            }
            branch = prefix_lines(&trap, self.ctx.indent_unit()) + &branch;
        }
        if !has_statement(&branch) {
            branch.push_str(&self.pass_line());
        }
        branch
    }

    /// Inline text of the value block connected to `slot`, parenthesised if
    /// its precedence is looser than `outer`. `None` when disconnected.
    pub fn value_to_code(&mut self, block: &Block, slot: &str, outer: Order) -> Option<String> {
        let target = block.input(slot)?;
        match self.registry.lookup(&target.kind) {
            Some(Emitter::Value(emit)) => {
                let (code, inner) = emit(target, self);
                if code.is_empty() {
                    None
                } else {
                    Some(wrap(code, inner, outer))
                }
            }
            Some(_) => {
                self.report(
                    Diagnostic::new(
                        DiagLevel::Error,
                        target.label(),
                        format!("statement block connected to expression slot {}", slot),
                    )
                    .with_code(codes::STATEMENT_AS_VALUE),
                );
                None
            }
            None => {
                self.report(
                    Diagnostic::new(DiagLevel::Error, target.label(), "unknown block type")
                        .with_code(codes::UNKNOWN_BLOCK),
                );
                None
            }
        }
    }

    fn report(&mut self, diag: Diagnostic) {
        debug!(%diag, "diagnostic");
        self.diagnostics.push(diag);
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn wrap(code: String, inner: Order, outer: Order) -> String {
    // Equal orders group freely for atoms and the boolean operators.
    let flat = inner == outer
        && matches!(
            outer,
            Order::Atomic | Order::None | Order::LogicalNot | Order::LogicalAnd | Order::LogicalOr
        );
    if outer <= inner && !flat {
        format!("({})", code)
    } else {
        code
    }
}

/// Split a top-level stack before every handler block. Each handler block
/// heads its own segment, so it and the blocks chained after it are routed.
fn handler_segments<'b>(stack: &'b [Block], registry: &Registry) -> Vec<&'b [Block]> {
    let mut segments = Vec::new();
    let mut start = 0;
    for (i, block) in stack.iter().enumerate() {
        if i > start && matches!(registry.lookup(&block.kind), Some(Emitter::Handler(..))) {
            segments.push(&stack[start..i]);
            start = i;
        }
    }
    if start < stack.len() {
        segments.push(&stack[start..]);
    }
    segments
}

/// True if `code` holds at least one line that is neither blank nor a comment.
pub fn has_statement(code: &str) -> bool {
    code.lines().any(|l| {
        let l = l.trim();
        !l.is_empty() && !l.starts_with('#')
    })
}

/// Prefix every non-empty line of `text` with `prefix`.
pub fn prefix_lines(text: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(text.len() + prefix.len() * 4);
    for line in text.split_inclusive('\n') {
        if line != "\n" {
            out.push_str(prefix);
        }
        out.push_str(line);
    }
    out
}

/// Indent a block of text one level after dropping blank leading and
/// trailing lines. Non-empty output always ends with a newline.
pub fn indent_block(text: &str, unit: &str) -> String {
    let lines: Vec<&str> = text.lines().skip_while(|l| l.trim().is_empty()).collect();
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(0, |i| i + 1);
    let mut out = String::new();
    for line in &lines[..end] {
        if !line.is_empty() {
            out.push_str(unit);
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

// ── Tests ───────────────────────────────────────────────────────────────────
