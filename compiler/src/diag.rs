// diag.rs — Generation diagnostics
//
// Diagnostics raised by the traversal engine while walking a block program.
// Emitters themselves never report; they fall back to literal defaults.
//
// Preconditions: none (types only).
// Postconditions: none (types only).
// Failure modes: none.
// Side effects: none.

use std::fmt;

// ── Diagnostic code ──────────────────────────────────────────────────────

/// A stable diagnostic code (e.g., `E0001`, `W0001`).
///
/// Once assigned, a code must never be reassigned to a different meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagCode(pub &'static str);

impl fmt::Display for DiagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub mod codes {
    use super::DiagCode;

    /// No generator is registered for the block's type tag.
    pub const UNKNOWN_BLOCK: DiagCode = DiagCode("E0001");
    /// A value block sits in a statement stack.
    pub const VALUE_AS_STATEMENT: DiagCode = DiagCode("E0002");
    /// A statement block is connected to an expression slot.
    pub const STATEMENT_AS_VALUE: DiagCode = DiagCode("E0003");
    /// An event-handler block is nested instead of heading a stack.
    pub const NESTED_HANDLER: DiagCode = DiagCode("W0001");
}

// ── Severity level ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagLevel {
    Error,
    Warning,
}

// ── Diagnostic ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: Option<DiagCode>,
    pub level: DiagLevel,
    /// Label of the offending block (`type (id)`).
    pub block: String,
    pub message: String,
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn new(level: DiagLevel, block: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: None,
            level,
            block: block.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_code(mut self, code: DiagCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagLevel::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            DiagLevel::Error => "error",
            DiagLevel::Warning => "warning",
        };
        if let Some(code) = &self.code {
            write!(f, "{}[{}]: {}: {}", level, code, self.block, self.message)?;
        } else {
            write!(f, "{}: {}: {}", level, self.block, self.message)?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

/// True when any diagnostic is error-level.
pub fn has_errors(diags: &[Diagnostic]) -> bool {
    diags.iter().any(Diagnostic::is_error)
}
