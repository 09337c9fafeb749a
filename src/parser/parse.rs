//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: class, method, parameter and type parsing
//! - `statements`: statements (if, while, for, return, blocks, declarations)
//! - `expressions`: expressions with precedence climbing
//!
//! Parser methods are split across those files using `impl Parser` blocks.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use thiserror::Error;

/// Statements, expressions and array initializers nested deeper than this are rejected
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at line {}, column {}: {message}", location.line, location.column)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for the traced language
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    /// Open nesting levels, see [`MAX_NESTING_DEPTH`]
    pub(crate) depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            depth: 0,
        })
    }

    /// Parse the whole source: optional `package`/`import` lines, then one class
    pub fn parse_compilation_unit(&mut self) -> Result<CompilationUnit, ParseError> {
        self.skip_header_lines()?;
        let unit = self.parse_class()?;

        if !self.is_at_end() {
            return Err(self.error_here("Expected end of file after class body"));
        }

        Ok(unit)
    }

    /// `package a.b;` and `import a.b.C;` carry nothing the interpreter uses
    fn skip_header_lines(&mut self) -> Result<(), ParseError> {
        while matches!(self.peek(), Token::Ident(word, _) if word == "package" || word == "import")
        {
            while !self.check(&Token::Semicolon(self.current_location())) {
                if self.is_at_end() {
                    return Err(self.error_here("Expected ';' after header line"));
                }
                self.advance();
            }
            self.advance();
        }
        Ok(())
    }

    // ===== Helper methods =====

    pub(crate) fn is_type_keyword(&self) -> bool {
        matches!(
            self.peek(),
            Token::Int(_)
                | Token::Long(_)
                | Token::Boolean(_)
                | Token::Void(_)
                | Token::StringType(_)
        )
    }

    pub(crate) fn skip_modifiers(&mut self) {
        while self.peek().is_modifier() {
            self.advance();
        }
    }

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        // the token stream always ends with Eof and advance never moves past it
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    /// Run `parse` one nesting level deeper
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let outer = self.depth;
        self.enter_level()?;
        let result = parse(self);
        self.depth = outer;
        result
    }

    /// Open one more nesting level; the caller restores `depth` when done
    pub(crate) fn enter_level(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError {
                message: format!("Nesting exceeds {} levels", MAX_NESTING_DEPTH),
                location: self.current_location(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn error_here(&self, message: &str) -> ParseError {
        ParseError {
            message: format!("{}, found {}", message, self.peek()),
            location: self.current_location(),
        }
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_here(message))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            &format!("Expected '(' {ctx}"),
        )
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RParen(self.current_location()),
            &format!("Expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LBrace(self.current_location()),
            &format!("Expected '{{' {ctx}"),
        )
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RBrace(self.current_location()),
            &format!("Expected '}}' {ctx}"),
        )
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            &format!("Expected ';' {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error_here("Expected identifier"))
        }
    }
}

/// Convenience wrapper: source text to [`CompilationUnit`]
pub fn parse_source(source: &str) -> Result<CompilationUnit, ParseError> {
    Parser::new(source)?.parse_compilation_unit()
}
