//! Expression precedence chain, lowest to highest:
//! assignment → logical-or → logical-and → equality → relational →
//! additive → multiplicative → unary → postfix → primary.
//!
//! Every level but assignment and unary is a left-associative binary chain
//! written out explicitly rather than through a shared table-driven helper:
//! one function per precedence level, each falling through to the next
//! tightest one.

use super::diagnostic::Diagnostic;
use super::Parser;
use crate::ast::{is_lvalue, Expr, ExprKind, Literal, LiteralKind, Op};
use crate::error::CompileError;
use crate::token::TokenKind;

impl Parser {
    /// `<Expression> ::= <Assignment> | <LogicalOr>`
    pub(super) fn parse_expression(&mut self) -> Result<Expr, CompileError> {
        let lhs = self.parse_logical_or()?;
        if self.current().kind.is_assignment_op() {
            return self.parse_assignment(lhs);
        }
        Ok(lhs)
    }

    fn parse_assignment(&mut self, lhs: Expr) -> Result<Expr, CompileError> {
        if !is_lvalue(&lhs) {
            return Err(CompileError::Parse(Diagnostic::new(
                "lvalue required on left side of assignment",
                Some(self.current().clone()),
            )));
        }
        let op_tok = self.advance();
        let op = match op_tok.kind {
            TokenKind::Assign => Op::Assign,
            TokenKind::PlusEq => Op::PlusEq,
            TokenKind::MinusEq => Op::MinusEq,
            TokenKind::StarEq => Op::StarEq,
            TokenKind::SlashEq => Op::SlashEq,
            TokenKind::PercentEq => Op::PercentEq,
            _ => unreachable!("caller only calls this when is_assignment_op() is true"),
        };
        let rvalue = self.parse_expression()?;
        Ok(Expr::new(ExprKind::Assignment {
            op,
            lvalue: Box::new(lhs),
            rvalue: Box::new(rvalue),
        }))
    }

    /// `<LogicalOr> ::= <LogicalAnd> { OR_OR <LogicalAnd> }`
    fn parse_logical_or(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_logical_and()?;
        while self.match_token(TokenKind::OrOr).is_some() {
            let rhs = self.parse_logical_and()?;
            lhs = binary(Op::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    /// `<LogicalAnd> ::= <Equality> { AND_AND <Equality> }`
    fn parse_logical_and(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_equality()?;
        while self.match_token(TokenKind::AndAnd).is_some() {
            let rhs = self.parse_equality()?;
            lhs = binary(Op::And, lhs, rhs);
        }
        Ok(lhs)
    }

    /// `<Equality> ::= <Relational> { ( EQ_EQ | BANG_EQ ) <Relational> }`
    fn parse_equality(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_relational()?;
        loop {
            let op = if self.match_token(TokenKind::EqEq).is_some() {
                Op::Eq
            } else if self.match_token(TokenKind::BangEq).is_some() {
                Op::Neq
            } else {
                break;
            };
            let rhs = self.parse_relational()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    /// `<Relational> ::= <Additive> { ( LT | GT | LT_EQ | GT_EQ ) <Additive> }`
    fn parse_relational(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = if self.match_token(TokenKind::Lt).is_some() {
                Op::Lt
            } else if self.match_token(TokenKind::Gt).is_some() {
                Op::Gt
            } else if self.match_token(TokenKind::LtEq).is_some() {
                Op::Le
            } else if self.match_token(TokenKind::GtEq).is_some() {
                Op::Ge
            } else {
                break;
            };
            let rhs = self.parse_additive()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    /// `<Additive> ::= <Multiplicative> { ( PLUS | MINUS ) <Multiplicative> }`
    fn parse_additive(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = if self.match_token(TokenKind::Plus).is_some() {
                Op::Add
            } else if self.match_token(TokenKind::Minus).is_some() {
                Op::Sub
            } else {
                break;
            };
            let rhs = self.parse_multiplicative()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    /// `<Multiplicative> ::= <Unary> { ( STAR | SLASH | PERCENT ) <Unary> }`
    fn parse_multiplicative(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = if self.match_token(TokenKind::Star).is_some() {
                Op::Mul
            } else if self.match_token(TokenKind::Slash).is_some() {
                Op::Div
            } else if self.match_token(TokenKind::Percent).is_some() {
                Op::Mod
            } else {
                break;
            };
            let rhs = self.parse_unary()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    /// `<Unary> ::= <PrefixOp> <Unary> | <Postfix>`
    fn parse_unary(&mut self) -> Result<Expr, CompileError> {
        let op = match self.current().kind {
            TokenKind::Plus => Op::Add,
            TokenKind::Minus => Op::Sub,
            TokenKind::Bang => Op::Not,
            TokenKind::Star => Op::Deref,
            TokenKind::Amp => Op::AddressOf,
            TokenKind::PlusPlus => Op::PreInc,
            TokenKind::MinusMinus => Op::PreDec,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::new(ExprKind::Unary {
            op,
            expr: Box::new(operand),
        }))
    }

    /// `<Postfix> ::= <Primary> { PLUS_PLUS | MINUS_MINUS | LBRACKET <Expression> RBRACKET | LPAREN <ArgList> RPAREN }`
    fn parse_postfix(&mut self) -> Result<Expr, CompileError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.current().kind {
                TokenKind::PlusPlus => {
                    self.advance();
                    expr = Expr::new(ExprKind::Postfix {
                        op: Op::PostInc,
                        expr: Box::new(expr),
                    });
                }
                TokenKind::MinusMinus => {
                    self.advance();
                    expr = Expr::new(ExprKind::Postfix {
                        op: Op::PostDec,
                        expr: Box::new(expr),
                    });
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket, "expected ']' after array index")?;
                    expr = Expr::new(ExprKind::Subscript {
                        target: Box::new(expr),
                        index: Box::new(index),
                    });
                }
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_argument_list()?;
                    self.expect(TokenKind::RParen, "expected ')' after function arguments")?;
                    expr = Expr::new(ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    });
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_argument_list(&mut self) -> Result<Vec<Expr>, CompileError> {
        let mut args = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            let arg = if self.check(TokenKind::LBrace) {
                self.parse_initializer_list()?
            } else {
                self.parse_expression()?
            };
            args.push(arg);
            if self.match_token(TokenKind::Comma).is_some() {
                continue;
            }
            break;
        }
        Ok(args)
    }

    /// `<Primary> ::= INT | FLOAT | TRUE | FALSE | IDENTIFIER | LPAREN <Expression> RPAREN`
    fn parse_primary(&mut self) -> Result<Expr, CompileError> {
        let tok = self.current().clone();
        match tok.kind {
            TokenKind::IntLiteral => {
                self.advance();
                Ok(literal(LiteralKind::Int, tok.lexeme.as_str()))
            }
            TokenKind::FloatLiteral => {
                self.advance();
                Ok(literal(LiteralKind::Float, tok.lexeme.as_str()))
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                Ok(literal(LiteralKind::Bool, tok.lexeme.as_str()))
            }
            TokenKind::Ident => {
                self.advance();
                Ok(Expr::new(ExprKind::Identifier(tok.lexeme.to_string())))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "expected ')' after parenthesized expression")?;
                Ok(expr)
            }
            _ => Err(CompileError::Parse(Diagnostic::new(
                "expected primary expression (literal, identifier, or parenthesized expression)",
                Some(tok),
            ))),
        }
    }

    /// `<InitializerList> ::= LBRACE [ <InitializerElement> { COMMA <InitializerElement> } ] RBRACE`
    ///
    /// Trailing commas are rejected: a `,` must always be followed by
    /// another element, never directly by `}`.
    pub(super) fn parse_initializer_list(&mut self) -> Result<Expr, CompileError> {
        self.expect(TokenKind::LBrace, "expected '{' to start initializer list")?;
        let mut items = Vec::new();

        if self.match_token(TokenKind::RBrace).is_some() {
            return Ok(Expr::new(ExprKind::InitializerList(items)));
        }

        loop {
            let element = if self.check(TokenKind::LBrace) {
                self.parse_initializer_list()?
            } else {
                self.parse_expression()?
            };
            items.push(element);

            if self.match_token(TokenKind::Comma).is_some() {
                if self.check(TokenKind::RBrace) {
                    return Err(CompileError::Parse(Diagnostic::new(
                        "trailing comma not allowed in initializer list",
                        Some(self.current().clone()),
                    )));
                }
                continue;
            }

            self.expect(TokenKind::RBrace, "expected ',' or '}' in initializer list")?;
            break;
        }

        Ok(Expr::new(ExprKind::InitializerList(items)))
    }
}

fn binary(op: Op, left: Expr, right: Expr) -> Expr {
    Expr::new(ExprKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn literal(kind: LiteralKind, text: &str) -> Expr {
    Expr::new(ExprKind::Literal(Literal {
        kind,
        text: text.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::ast::{is_lvalue, ExprKind};
    use crate::lexer::Lexer;
    use crate::parse::Parser;

    fn parse_expr(src: &str) -> crate::ast::Expr {
        let tokens = Lexer::new(&format!("{src};")).tokenize().unwrap();
        let mut p = Parser::new(tokens);
        p.parse_expression().unwrap()
    }

    #[test]
    fn precedence_climbs_multiplicative_over_additive() {
        let e = parse_expr("1 + 2 * 3");
        match e.kind {
            ExprKind::Binary { op: crate::ast::Op::Add, right, .. } => {
                assert!(matches!(right.kind, ExprKind::Binary { op: crate::ast::Op::Mul, .. }));
            }
            _ => panic!("expected top-level Add"),
        }
    }

    #[test]
    fn assignment_requires_lvalue_on_left() {
        let tokens = Lexer::new("1 = 2;").tokenize().unwrap();
        let mut p = Parser::new(tokens);
        assert!(p.parse_expression().is_err());
    }

    #[test]
    fn deref_is_recognized_as_lvalue_target() {
        let e = parse_expr("*p = 1");
        match &e.kind {
            ExprKind::Assignment { lvalue, .. } => assert!(is_lvalue(lvalue)),
            _ => panic!("expected assignment"),
        }
    }

    #[test]
    fn trailing_comma_in_initializer_list_is_rejected() {
        let tokens = Lexer::new("{1, 2,};").tokenize().unwrap();
        let mut p = Parser::new(tokens);
        assert!(p.parse_initializer_list().is_err());
    }

    #[test]
    fn chained_postfix_calls_and_subscripts_compose() {
        let e = parse_expr("f()[0]");
        assert!(matches!(e.kind, ExprKind::Subscript { .. }));
    }
}
