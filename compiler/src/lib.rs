// cbc — Cabbage Block Compiler
//
// Library root. Block programs are loaded (`load`), walked by the generator
// (`codegen`) using the per-category emitters registered in `registry`, and
// assembled with their feature preludes (`prelude`).

pub mod ast;
pub mod codegen;
pub mod context;
pub mod control;
pub mod diag;
pub mod event;
pub mod load;
pub mod prelude;
pub mod registry;
pub mod values;

pub use codegen::{generate, GenerateOptions, GenerateResult};
pub use registry::Registry;
