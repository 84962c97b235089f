//! Statement, block, and declaration parsing.

use super::Parser;
use crate::ast::{
    Block, ElseBranch, ForInit, ForStmt, FunctionDecl, IfStmt, Param, Stmt, VariableDecl, WhileStmt,
};
use crate::error::CompileError;
use crate::parse::diagnostic::Diagnostic;
use crate::token::TokenKind;

impl Parser {
    /// `<FunctionDeclaration> ::= FN IDENTIFIER LPAREN [ <ParamList> ] RPAREN [ ARROW <Type> ] <Block>`
    pub(super) fn parse_function_declaration(&mut self) -> Result<FunctionDecl, CompileError> {
        self.expect(TokenKind::Fn, "expected 'fn' keyword")?;
        let name_tok = self.expect(TokenKind::Ident, "expected function name")?;
        self.expect(TokenKind::LParen, "expected '(' after function name")?;
        let params = self.parse_parameter_list()?;
        self.expect(TokenKind::RParen, "expected ')' after function parameters")?;
        let return_type = if self.match_token(TokenKind::Arrow).is_some() {
            Some(self.parse_type()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(FunctionDecl {
            name: name_tok.lexeme.to_string(),
            params,
            return_type,
            body,
            sem_type: None,
        })
    }

    /// `<ParamList> ::= <Param> { COMMA <Param> }`, `<Param> ::= IDENTIFIER COLON <Type>`
    fn parse_parameter_list(&mut self) -> Result<Vec<Param>, CompileError> {
        let mut params = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(params);
        }
        loop {
            let name_tok = self.expect(TokenKind::Ident, "expected identifier for parameter name")?;
            self.expect(TokenKind::Colon, "expected ':' after parameter name")?;
            let type_expr = self.parse_type()?;
            params.push(Param {
                name: name_tok.lexeme.to_string(),
                type_expr,
            });
            if self.check(TokenKind::RParen) {
                break;
            }
            self.expect(TokenKind::Comma, "expected a ',' or ')'")?;
        }
        Ok(params)
    }

    /// `<Block> ::= LBRACE { <Statement> } RBRACE`
    pub(super) fn parse_block(&mut self) -> Result<Block, CompileError> {
        self.expect(TokenKind::LBrace, "expected '{' to start block")?;
        let mut statements = Vec::new();
        loop {
            if self.at_end() {
                return Err(CompileError::Parse(Diagnostic::new(
                    "unexpected end of input in block",
                    Some(self.current().clone()),
                )));
            }
            if self.match_token(TokenKind::RBrace).is_some() {
                break;
            }
            statements.push(self.parse_statement()?);
        }
        Ok(Block { statements })
    }

    /// A variable declaration followed by its terminating semicolon, used
    /// both for top-level declarations and for declaration statements
    /// inside a block.
    pub(super) fn parse_declaration_stmt(&mut self) -> Result<VariableDecl, CompileError> {
        let decl = self.parse_variable_declaration()?;
        self.expect_underlining_previous(TokenKind::Semicolon, "expected a semicolon at declaration end")?;
        Ok(decl)
    }

    /// `<VariableDeclaration> ::= IDENTIFIER COLON <Type> [ ASSIGN ( <Expression> | <InitializerList> ) ]`
    pub(super) fn parse_variable_declaration(&mut self) -> Result<VariableDecl, CompileError> {
        let name_tok = self.expect(TokenKind::Ident, "expected identifier in variable declaration")?;
        self.expect(TokenKind::Colon, "expected ':' after variable name")?;
        let type_expr = self.parse_type()?;
        let is_const = crate::ast::type_expr_is_const(&type_expr);

        let initializer = if self.match_token(TokenKind::Assign).is_some() {
            if self.check(TokenKind::LBrace) {
                Some(self.parse_initializer_list()?)
            } else {
                Some(self.parse_expression()?)
            }
        } else {
            None
        };

        Ok(VariableDecl {
            name: name_tok.lexeme.to_string(),
            is_const,
            type_expr,
            initializer,
            sem_type: None,
        })
    }

    fn parse_statement(&mut self) -> Result<Stmt, CompileError> {
        match self.current().kind {
            TokenKind::If => Ok(Stmt::If(self.parse_if_statement()?)),
            TokenKind::While => Ok(Stmt::While(self.parse_while_statement()?)),
            TokenKind::For => Ok(Stmt::For(self.parse_for_statement()?)),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break => self.parse_break_statement(),
            TokenKind::Continue => self.parse_continue_statement(),
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Ident if self.peek_at(1).map(|t| t.kind) == Some(TokenKind::Colon) => {
                Ok(Stmt::VariableDecl(self.parse_declaration_stmt()?))
            }
            _ => Ok(Stmt::Expr(self.parse_expression_statement()?)),
        }
    }

    fn parse_expression_statement(&mut self) -> Result<crate::ast::Expr, CompileError> {
        let expr = self.parse_expression()?;
        self.expect_underlining_previous(TokenKind::Semicolon, "expected ';' at end of expression statement")?;
        Ok(expr)
    }

    fn parse_return_statement(&mut self) -> Result<Stmt, CompileError> {
        self.expect(TokenKind::Return, "expected 'return' keyword")?;
        let expr = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_underlining_previous(TokenKind::Semicolon, "expected ';' after return")?;
        Ok(Stmt::Return(expr))
    }

    fn parse_break_statement(&mut self) -> Result<Stmt, CompileError> {
        self.expect(TokenKind::Break, "expected 'break' keyword")?;
        self.expect_underlining_previous(TokenKind::Semicolon, "expected ';' after break")?;
        Ok(Stmt::Break)
    }

    fn parse_continue_statement(&mut self) -> Result<Stmt, CompileError> {
        self.expect(TokenKind::Continue, "expected 'continue' keyword")?;
        self.expect_underlining_previous(TokenKind::Semicolon, "expected ';' after continue")?;
        Ok(Stmt::Continue)
    }

    /// `<IfStatement> ::= IF LPAREN <Expression> RPAREN <Block> [ ELSE ( <IfStatement> | <Block> ) ]`
    ///
    /// `else if` is handled by recursing into `parse_if_statement` itself
    /// rather than treating it as a distinct production, which is what
    /// makes a dangling `else` bind to the nearest open `if`.
    fn parse_if_statement(&mut self) -> Result<IfStmt, CompileError> {
        self.expect(TokenKind::If, "expected 'if' keyword")?;
        self.expect(TokenKind::LParen, "expected '(' after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen, "expected ')' after if condition")?;
        let then_branch = self.parse_block()?;

        let else_branch = if self.match_token(TokenKind::Else).is_some() {
            if self.check(TokenKind::If) {
                Some(ElseBranch::If(Box::new(self.parse_if_statement()?)))
            } else {
                Some(ElseBranch::Block(self.parse_block()?))
            }
        } else {
            None
        };

        Ok(IfStmt {
            condition,
            then_branch,
            else_branch,
        })
    }

    /// `<WhileStatement> ::= WHILE LPAREN <Expression> RPAREN <Block>`
    fn parse_while_statement(&mut self) -> Result<WhileStmt, CompileError> {
        self.expect(TokenKind::While, "expected 'while' keyword")?;
        self.expect(TokenKind::LParen, "expected '(' after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen, "expected ')' after while condition")?;
        let body = self.parse_block()?;
        Ok(WhileStmt { condition, body })
    }

    /// `<ForStatement> ::= FOR LPAREN <ForInit> SEMICOLON [ <Expression> ] SEMICOLON [ <Expression> ] RPAREN <Block>`
    ///
    /// `<ForInit>` is empty, a variable declaration (`IDENTIFIER COLON`
    /// lookahead distinguishes it from a plain expression), or an
    /// expression.
    fn parse_for_statement(&mut self) -> Result<ForStmt, CompileError> {
        self.expect(TokenKind::For, "expected 'for' keyword")?;
        self.expect(TokenKind::LParen, "expected '(' after 'for'")?;

        let init = if self.match_token(TokenKind::Semicolon).is_some() {
            None
        } else if self.check(TokenKind::Ident) && self.peek_at(1).map(|t| t.kind) == Some(TokenKind::Colon) {
            let decl = self.parse_variable_declaration()?;
            self.expect_underlining_previous(TokenKind::Semicolon, "expected ';' after for-init declaration")?;
            Some(ForInit::Decl(decl))
        } else {
            let expr = self.parse_expression()?;
            self.expect_underlining_previous(TokenKind::Semicolon, "expected ';' after for-init expression")?;
            Some(ForInit::Expr(expr))
        };

        let condition = if self.match_token(TokenKind::Semicolon).is_some() {
            None
        } else {
            let cond = self.parse_expression()?;
            self.expect_underlining_previous(TokenKind::Semicolon, "expected ';' after for-condition")?;
            Some(cond)
        };

        let post = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::RParen, "expected ')' after for-post expression")?;

        let body = self.parse_block()?;
        Ok(ForStmt {
            init,
            condition,
            post,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Decl, ElseBranch, Stmt};
    use crate::lexer::Lexer;
    use crate::parse::Parser;

    fn parse_fn(src: &str) -> crate::ast::FunctionDecl {
        let tokens = Lexer::new(src).tokenize().unwrap();
        let mut p = Parser::new(tokens);
        p.parse_function_declaration().unwrap()
    }

    #[test]
    fn dangling_else_binds_to_nearest_if() {
        let f = parse_fn("fn f() { if (1) if (2) {} else {} }");
        let Stmt::If(outer) = &f.body.statements[0] else { panic!("expected if") };
        assert!(outer.else_branch.is_none());
    }

    #[test]
    fn else_if_chain_nests_as_else_branch_if() {
        let f = parse_fn("fn f() { if (1) {} else if (2) {} else {} }");
        let Stmt::If(outer) = &f.body.statements[0] else { panic!("expected if") };
        assert!(matches!(outer.else_branch, Some(ElseBranch::If(_))));
    }

    #[test]
    fn for_loop_distinguishes_declaration_init_from_expression_init() {
        let f = parse_fn("fn f() { for (i: i32 = 0; i < 10; i++) {} }");
        let Stmt::For(for_stmt) = &f.body.statements[0] else { panic!("expected for") };
        assert!(matches!(for_stmt.init, Some(crate::ast::ForInit::Decl(_))));
    }

    #[test]
    fn for_loop_all_clauses_optional() {
        let f = parse_fn("fn f() { for (;;) { break; } }");
        let Stmt::For(for_stmt) = &f.body.statements[0] else { panic!("expected for") };
        assert!(for_stmt.init.is_none());
        assert!(for_stmt.condition.is_none());
        assert!(for_stmt.post.is_none());
    }

    #[test]
    fn missing_semicolon_is_a_parse_error() {
        let tokens = Lexer::new("x: i32 = 1").tokenize().unwrap();
        let err = Parser::new(tokens).parse_program().unwrap_err();
        assert!(matches!(err, crate::error::CompileError::Parse(_)));
    }

    #[test]
    fn top_level_variable_and_function_both_parse() {
        let tokens = Lexer::new("x: i32 = 1; fn f() {}").tokenize().unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();
        assert!(matches!(program.decls[0], Decl::Variable(_)));
        assert!(matches!(program.decls[1], Decl::Function(_)));
    }
}
