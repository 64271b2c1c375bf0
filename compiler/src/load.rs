// load.rs — Block program loading from JSON
//
// Preconditions: none.
// Postconditions: returns a `Program` whose stacks mirror the document order.
// Failure modes: unreadable file or malformed JSON yields `LoadError`.
// Side effects: reads the file system (`load_program` only).

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ast::Program;

/// Errors that can occur while loading a block program.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed block program: {0}")]
    Json(#[from] serde_json::Error),
}

impl Program {
    /// Parse a block program from its JSON text.
    pub fn from_json(source: &str) -> Result<Program, LoadError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Serialize the block tree back to pretty JSON (used by `--emit blocks`).
    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read and parse a block program file.
pub fn load_program(path: &Path) -> Result<Program, LoadError> {
    let source = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Program::from_json(&source)
}
