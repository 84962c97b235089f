//! Lexically scoped symbol tables.
//!
//! Only the global scope is populated by this crate: top-level functions
//! and variables are collected into two disjoint, djb2-hashed symbol
//! tables. A `parent` pointer exists so a future phase (nested block
//! scopes) can chain further scopes off of this one without changing the
//! representation.

use log::debug;

use crate::ast::{Decl, Program};
use crate::collections::StringHashMap;
use crate::error::{CompileError, SymbolKind};
use crate::types::{lower_function_decl, lower_type_expr, Type};

/// Global scope's symbol tables default to this many buckets, larger than
/// [`StringHashMap`]'s own default since a scope is expected to hold many
/// more entries than a typical internal map.
const SCOPE_BUCKET_COUNT: usize = 128;

/// A single named binding: a resolved type, plus whether the declaration
/// that introduced it was itself `const`.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub ty: Type,
    pub is_const: bool,
}

/// A lexical scope: two disjoint symbol tables plus an optional link to an
/// enclosing scope.
#[derive(Debug)]
pub struct Scope<'parent> {
    pub functions: StringHashMap<Symbol>,
    pub variables: StringHashMap<Symbol>,
    pub parent: Option<&'parent Scope<'parent>>,
}

impl<'parent> Scope<'parent> {
    pub fn new() -> Self {
        Scope {
            functions: StringHashMap::with_bucket_count(SCOPE_BUCKET_COUNT),
            variables: StringHashMap::with_bucket_count(SCOPE_BUCKET_COUNT),
            parent: None,
        }
    }

    pub fn child(parent: &'parent Scope<'parent>) -> Self {
        Scope {
            functions: StringHashMap::with_bucket_count(SCOPE_BUCKET_COUNT),
            variables: StringHashMap::with_bucket_count(SCOPE_BUCKET_COUNT),
            parent: Some(parent),
        }
    }

    /// Builds the global scope by walking `program`'s top-level
    /// declarations in source order, lowering each one's type and
    /// inserting it into the matching table. Fails on the first duplicate
    /// name within a single table; functions and variables do not
    /// conflict with each other.
    pub fn from_program(program: &Program) -> Result<Scope<'static>, CompileError> {
        let mut scope = Scope::new();
        for decl in &program.decls {
            match decl {
                Decl::Function(f) => {
                    if scope.functions.contains_key(&f.name) {
                        return Err(CompileError::DuplicateSymbol {
                            kind: SymbolKind::Function,
                            name: f.name.clone(),
                        });
                    }
                    let ty = lower_function_decl(f);
                    debug!("binding function '{}' : {}", f.name, ty);
                    scope.functions.put(&f.name, Symbol { ty, is_const: false });
                }
                Decl::Variable(v) => {
                    if scope.variables.contains_key(&v.name) {
                        return Err(CompileError::DuplicateSymbol {
                            kind: SymbolKind::Variable,
                            name: v.name.clone(),
                        });
                    }
                    let ty = lower_type_expr(&v.type_expr);
                    debug!("binding variable '{}' : {}", v.name, ty);
                    scope.variables.put(&v.name, Symbol { ty, is_const: v.is_const });
                }
            }
        }
        Ok(scope)
    }

    /// Hierarchical debug rendering used by `--sym-table`: functions, then
    /// variables, then (if any) the parent chain.
    pub fn print(&self) -> String {
        let mut out = String::new();
        self.print_into(&mut out, "globalScope");
        out
    }

    fn print_into(&self, out: &mut String, label: &str) {
        use std::fmt::Write as _;
        writeln!(out, "{label}").unwrap();
        writeln!(out, "  Functions:").unwrap();
        self.functions.foreach(|name, sym| {
            writeln!(out, "    {name}: {}", sym.ty).unwrap();
        });
        writeln!(out, "  Variables:").unwrap();
        self.variables.foreach(|name, sym| {
            let const_tag = if sym.is_const { "const " } else { "" };
            writeln!(out, "    {name}: {const_tag}{}", sym.ty).unwrap();
        });
        if let Some(parent) = self.parent {
            writeln!(out, "Parent ->").unwrap();
            parent.print_into(out, "scope");
        }
    }
}

impl<'parent> Default for Scope<'parent> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::Lexer, parse::Parser};

    fn program(src: &str) -> Program {
        let tokens = Lexer::new(src).tokenize().unwrap();
        Parser::new(tokens).parse_program().unwrap()
    }

    #[test]
    fn function_and_variable_share_a_name_without_conflict() {
        let p = program("fn f() {} f: i32 = 1;");
        let scope = Scope::from_program(&p).unwrap();
        assert!(scope.functions.contains_key("f"));
        assert!(scope.variables.contains_key("f"));
    }

    #[test]
    fn duplicate_function_is_an_error() {
        let p = program("fn f() {} fn f() {}");
        let err = Scope::from_program(&p).unwrap_err();
        assert!(matches!(
            err,
            CompileError::DuplicateSymbol {
                kind: SymbolKind::Function,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_variable_is_an_error() {
        let p = program("x: i32 = 1; x: i32 = 2;");
        let err = Scope::from_program(&p).unwrap_err();
        assert!(matches!(
            err,
            CompileError::DuplicateSymbol {
                kind: SymbolKind::Variable,
                ..
            }
        ));
    }

    #[test]
    fn function_type_includes_params_and_return() {
        let p = program("fn add(a: i32, b: i32) -> i32 { return a + b; }");
        let scope = Scope::from_program(&p).unwrap();
        let sym = scope.functions.get("add").unwrap();
        assert_eq!(sym.ty.to_string(), "(i32, i32) -> i32");
    }
}
