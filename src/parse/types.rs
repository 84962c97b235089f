//! Type parsing: `<Type> ::= <BaseType> <Suffix> | <GroupedType> <Suffix> |
//! <FunctionType> <Suffix>`, where `<Suffix>` is the shared pre-star /
//! array-dimension / post-star envelope.
//!
//! The original grammar this is grounded on only ever parses a base-type
//! token; grouped `(Type)` and inline `fn(...) -> Type` atoms are this
//! crate's own extension of that grammar, added so the suffix envelope has
//! more than one kind of atom to wrap.

use super::diagnostic::Diagnostic;
use super::Parser;
use crate::ast::{Expr, TypeExpr};
use crate::error::CompileError;
use crate::token::TokenKind;

impl Parser {
    /// `<Type> ::= [ CONST ] ( <BaseType> | <GroupedType> | <FunctionType> )`
    pub(super) fn parse_type(&mut self) -> Result<TypeExpr, CompileError> {
        let base_is_const = self.match_token(TokenKind::Const).is_some();
        if self.check(TokenKind::LParen) {
            self.parse_grouped_type(base_is_const)
        } else if self.check(TokenKind::Fn) {
            self.parse_function_type(base_is_const)
        } else {
            self.parse_regular_type(base_is_const)
        }
    }

    fn parse_regular_type(&mut self, base_is_const: bool) -> Result<TypeExpr, CompileError> {
        let tok = self.current().clone();
        if !tok.kind.is_primitive_type() {
            return Err(CompileError::Parse(Diagnostic::new(
                "expected base type (i32, f64, etc.)",
                Some(tok),
            )));
        }
        self.advance();
        let (pre_stars, sizes, post_stars) = self.parse_suffix_envelope()?;
        Ok(TypeExpr::Regular {
            base_name: tok.lexeme.to_string(),
            base_is_const,
            pre_stars,
            sizes,
            post_stars,
        })
    }

    /// `<GroupedType> ::= LPAREN <Type> RPAREN`
    fn parse_grouped_type(&mut self, base_is_const: bool) -> Result<TypeExpr, CompileError> {
        self.expect(TokenKind::LParen, "expected '('")?;
        let inner = self.parse_type()?;
        self.expect(TokenKind::RParen, "expected ')' to close grouped type")?;
        let (pre_stars, sizes, post_stars) = self.parse_suffix_envelope()?;
        Ok(TypeExpr::Grouped {
            inner: Box::new(inner),
            base_is_const,
            pre_stars,
            sizes,
            post_stars,
        })
    }

    /// `<FunctionType> ::= FN LPAREN [ <Type> { COMMA <Type> } ] RPAREN [ ARROW <Type> ]`
    fn parse_function_type(&mut self, base_is_const: bool) -> Result<TypeExpr, CompileError> {
        self.expect(TokenKind::Fn, "expected 'fn'")?;
        self.expect(TokenKind::LParen, "expected '(' after 'fn'")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.parse_type()?);
                if self.match_token(TokenKind::Comma).is_some() {
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RParen, "expected ')' after function-type parameters")?;
        let return_type = if self.match_token(TokenKind::Arrow).is_some() {
            Some(Box::new(self.parse_type()?))
        } else {
            None
        };
        let (pre_stars, sizes, post_stars) = self.parse_suffix_envelope()?;
        Ok(TypeExpr::Function {
            base_is_const,
            params,
            return_type,
            pre_stars,
            sizes,
            post_stars,
        })
    }

    /// Pre-stars, then array dimensions in source order, then post-stars:
    /// exactly the order [`crate::types::lower_type_expr`] re-applies them
    /// in when lowering to a semantic `Type`.
    fn parse_suffix_envelope(&mut self) -> Result<(u32, Vec<Option<Expr>>, u32), CompileError> {
        let mut pre_stars = 0;
        while self.match_token(TokenKind::Star).is_some() {
            pre_stars += 1;
        }

        let mut sizes = Vec::new();
        while self.match_token(TokenKind::LBracket).is_some() {
            if self.check(TokenKind::RBracket) {
                sizes.push(None);
            } else {
                sizes.push(Some(self.parse_expression()?));
            }
            self.expect(TokenKind::RBracket, "expected ']' after array size")?;
        }

        let mut post_stars = 0;
        while self.match_token(TokenKind::Star).is_some() {
            post_stars += 1;
        }

        Ok((pre_stars, sizes, post_stars))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::TypeExpr;
    use crate::lexer::Lexer;
    use crate::parse::Parser;

    fn parse_type(src: &str) -> TypeExpr {
        let tokens = Lexer::new(src).tokenize().unwrap();
        let mut p = Parser::new(tokens);
        p.parse_type().unwrap()
    }

    #[test]
    fn pre_and_post_stars_and_array_size_all_parse() {
        let t = parse_type("*i32[10]*");
        match t {
            TypeExpr::Regular { pre_stars, post_stars, sizes, .. } => {
                assert_eq!(pre_stars, 1);
                assert_eq!(post_stars, 1);
                assert_eq!(sizes.len(), 1);
            }
            _ => panic!("expected Regular"),
        }
    }

    #[test]
    fn grouped_type_wraps_its_inner_type() {
        let t = parse_type("(i32*)[10]");
        match t {
            TypeExpr::Grouped { inner, sizes, .. } => {
                assert_eq!(sizes.len(), 1);
                assert!(matches!(*inner, TypeExpr::Regular { pre_stars: 1, .. }));
            }
            _ => panic!("expected Grouped"),
        }
    }

    #[test]
    fn function_type_parses_params_and_return() {
        let t = parse_type("fn(i32, f64) -> bool");
        match t {
            TypeExpr::Function { params, return_type, .. } => {
                assert_eq!(params.len(), 2);
                assert!(return_type.is_some());
            }
            _ => panic!("expected Function"),
        }
    }

    #[test]
    fn const_prefix_is_recorded() {
        let t = parse_type("const i32");
        assert!(crate::ast::type_expr_is_const(&t));
    }
}
