//! Whitespace/comment-skipping, longest-match tokenizer.

use crate::error::CompileError;
use crate::token::{is_ident_continue, is_ident_start, Token, TokenKind, LITERAL_TOKENS, REGEX_TOKENS};

/// Turns a source buffer into a token stream.
///
/// The lexer is single-pass: each call to [`Lexer::next_token`] advances the
/// cursor and returns exactly one token (never backtracking), terminating
/// in a single [`TokenKind::Eof`]. [`Lexer::tokenize`] drives it to
/// completion, dropping comment tokens before returning (the parser never
/// sees them).
pub struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    cursor: usize,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            bytes: source.as_bytes(),
            cursor: 0,
            line: 1,
            column: 1,
        }
    }

    fn at_end(&self) -> bool {
        self.cursor >= self.bytes.len()
    }

    fn rest(&self) -> &'src str {
        &self.source[self.cursor..]
    }

    fn advance_by(&mut self, n: usize) -> &'src str {
        let start = self.cursor;
        for &b in &self.bytes[self.cursor..self.cursor + n] {
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.cursor += n;
        &self.source[start..self.cursor]
    }

    fn skip_whitespace(&mut self) {
        while !self.at_end() {
            match self.bytes[self.cursor] {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.advance_by(1);
                }
                _ => break,
            }
        }
    }

    fn match_comment(&mut self) -> Option<Token> {
        if self.rest().starts_with("//") {
            let line = self.line;
            let column = self.column;
            let mut len = 0;
            while self.cursor + len < self.bytes.len() && self.bytes[self.cursor + len] != b'\n' {
                len += 1;
            }
            let lexeme = self.advance_by(len);
            Some(Token::new(TokenKind::Comment, lexeme, line, column))
        } else {
            None
        }
    }

    /// Longest fixed-string match at the cursor. When the matched spelling
    /// starts with an identifier byte, the match is rejected unless the
    /// following byte is not itself an identifier-continuation byte (so
    /// `if` does not match inside `ifoo`).
    fn match_literal(&self) -> Option<(TokenKind, usize)> {
        let rest = self.rest();
        let mut best: Option<(TokenKind, usize)> = None;
        for &(kind, spelling) in LITERAL_TOKENS {
            if !rest.starts_with(spelling) {
                continue;
            }
            let len = spelling.len();
            if is_ident_start(spelling.as_bytes()[0]) {
                let next = self.bytes.get(self.cursor + len).copied();
                if next.map_or(false, is_ident_continue) {
                    continue;
                }
            }
            if best.map_or(true, |(_, best_len)| len > best_len) {
                best = Some((kind, len));
            }
        }
        best
    }

    fn match_regex(&self) -> Option<(TokenKind, usize)> {
        let rest = self.rest();
        for (kind, re) in REGEX_TOKENS.iter() {
            if let Some(m) = re.find(rest) {
                if m.start() == 0 {
                    return Some((*kind, m.end()));
                }
            }
        }
        None
    }

    /// Produces the next token, or a fatal `CompileError::UnknownToken` if
    /// the byte at the cursor cannot be classified.
    pub fn next_token(&mut self) -> Result<Token, CompileError> {
        self.skip_whitespace();

        if self.at_end() {
            return Ok(Token::eof(self.line, self.column));
        }

        if let Some(tok) = self.match_comment() {
            return Ok(tok);
        }

        let line = self.line;
        let column = self.column;

        if let Some((kind, len)) = self.match_literal() {
            let lexeme = self.advance_by(len);
            return Ok(Token::new(kind, lexeme, line, column));
        }

        if let Some((kind, len)) = self.match_regex() {
            let lexeme = self.advance_by(len);
            return Ok(Token::new(kind, lexeme, line, column));
        }

        let ch = self.rest().chars().next().unwrap();
        self.advance_by(ch.len_utf8());
        Err(CompileError::UnknownToken { ch, line, column })
    }

    /// Runs the lexer to completion, returning every non-comment token up
    /// to and including a trailing `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, CompileError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = tok.kind == TokenKind::Eof;
            if tok.kind != TokenKind::Comment {
                tokens.push(tok);
            }
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn longest_match_prefers_identifier_over_keyword() {
        let toks = Lexer::new("iffy").tokenize().unwrap();
        assert_eq!(toks[0].kind, TokenKind::Ident);
        assert_eq!(toks[0].lexeme, "iffy");
    }

    #[test]
    fn keyword_is_not_swallowed_by_identifier() {
        assert_eq!(kinds("if"), vec![TokenKind::If, TokenKind::Eof]);
    }

    #[test]
    fn float_before_int_on_decimal_literal() {
        assert_eq!(kinds("3.14"), vec![TokenKind::FloatLiteral, TokenKind::Eof]);
    }

    #[test]
    fn comments_are_dropped() {
        assert_eq!(
            kinds("x // trailing comment\n;"),
            vec![TokenKind::Ident, TokenKind::Semicolon, TokenKind::Eof]
        );
    }

    #[test]
    fn arrow_is_not_two_minus_tokens() {
        assert_eq!(kinds("->"), vec![TokenKind::Arrow, TokenKind::Eof]);
    }

    #[test]
    fn line_and_column_track_newlines() {
        let toks = Lexer::new("x\ny").tokenize().unwrap();
        assert_eq!((toks[0].line, toks[0].column), (1, 1));
        assert_eq!((toks[1].line, toks[1].column), (2, 1));
    }

    #[test]
    fn string_literal_byte_is_unknown() {
        let err = Lexer::new("\"hi\"").tokenize().unwrap_err();
        assert!(matches!(err, CompileError::UnknownToken { ch: '"', .. }));
    }

    #[test]
    fn unknown_byte_reports_position() {
        let err = Lexer::new("x = @;").tokenize().unwrap_err();
        match err {
            CompileError::UnknownToken { ch, line, column } => {
                assert_eq!(ch, '@');
                assert_eq!(line, 1);
                assert_eq!(column, 5);
            }
            _ => panic!("expected UnknownToken"),
        }
    }
}
