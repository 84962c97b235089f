//! `langfront` is the front-end of a small statically typed imperative language:
//! a lexer, a hand-written recursive-descent parser, a type model with
//! AST-to-type lowering, and lexically scoped symbol table construction.
//!
//! The pipeline is strictly sequential: [`lexer::Lexer`] turns source text
//! into a token stream, [`parse::Parser`] turns that stream into an
//! [`ast::Program`], [`types`] lowers the AST's syntactic type expressions
//! into semantic [`types::Type`] values, and [`scope::Scope`] collects the
//! program's top-level declarations into a symbol table. Each stage either
//! succeeds completely or reports a single [`error::CompileError`] and
//! halts; there is no partial recovery.

#![deny(unsafe_code)]

pub mod ast;
pub mod collections;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parse;
pub mod scope;
pub mod token;
pub mod types;

pub use ast::Program;
pub use error::CompileError;
pub use token::{Token, TokenKind};
pub use types::Type;

/// Runs the full front-end pipeline over `source`, returning the parsed
/// [`Program`] or the first [`CompileError`] encountered.
///
/// This does not build a [`scope::Scope`]; callers that need symbol-table
/// construction should call [`scope::Scope::from_program`] on the result.
pub fn compile(source: &str) -> Result<Program, CompileError> {
    let tokens = lexer::Lexer::new(source).tokenize()?;
    parse::Parser::new(tokens).parse_program()
}
