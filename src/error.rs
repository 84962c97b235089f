//! Crate-wide error type unifying IO, lexing, parsing, and scope-construction
//! failures.
//!
//! Every fallible operation in this crate returns `Result<_, CompileError>`
//! (or a phase-specific error that converts into it via `From`). The binary
//! is the only place that turns an `Err` into printed output and a process
//! exit code; library code never prints.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::parse::diagnostic::Diagnostic;

/// Top-level error produced by any stage of the front-end pipeline.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CompileError {
    /// Reading the source file failed.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The lexer encountered a byte it could not classify.
    #[error("unexpected character {ch:?} at line {line}, column {column}")]
    UnknownToken { ch: char, line: u32, column: u32 },

    /// The parser stopped at its first syntax error.
    #[error("{0}")]
    Parse(#[from] Diagnostic),

    /// Scope construction found two top-level declarations with the same
    /// name and kind.
    #[error("duplicate {kind} '{name}'")]
    DuplicateSymbol { kind: SymbolKind, name: String },

    /// A malformed or unsupported CLI invocation.
    #[error("usage error: {0}")]
    Usage(String),
}

/// Which of the two disjoint top-level namespaces a duplicate was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Function,
    Variable,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Function => write!(f, "function"),
            SymbolKind::Variable => write!(f, "variable"),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CompileError>;
