//! Lexer (tokenizer) for traced source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Only the small Java-like subset the interpreter executes is recognised;
//! anything else is rejected here with a [`LexError`].

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    IntLiteral(i64, SourceLocation),
    StringLiteral(String, SourceLocation),
    True(SourceLocation),
    False(SourceLocation),

    // Identifiers
    Ident(String, SourceLocation),

    // Modifiers
    Class(SourceLocation),
    Public(SourceLocation),
    Private(SourceLocation),
    Protected(SourceLocation),
    Static(SourceLocation),
    Final(SourceLocation),

    // Types
    Int(SourceLocation),
    Long(SourceLocation),
    Boolean(SourceLocation),
    Void(SourceLocation),
    StringType(SourceLocation),

    // Statements
    If(SourceLocation),
    Else(SourceLocation),
    While(SourceLocation),
    For(SourceLocation),
    Return(SourceLocation),
    New(SourceLocation),

    // Arithmetic
    Plus(SourceLocation),    // +
    Minus(SourceLocation),   // -
    Star(SourceLocation),    // *
    Slash(SourceLocation),   // /
    Percent(SourceLocation), // %

    // Comparison
    EqEq(SourceLocation),  // ==
    NotEq(SourceLocation), // !=
    Lt(SourceLocation),    // <
    Le(SourceLocation),    // <=
    Gt(SourceLocation),    // >
    Ge(SourceLocation),    // >=

    Bang(SourceLocation), // !

    // Assignment
    Eq(SourceLocation),        // =
    PlusEq(SourceLocation),    // +=
    MinusEq(SourceLocation),   // -=
    StarEq(SourceLocation),    // *=
    SlashEq(SourceLocation),   // /=
    PercentEq(SourceLocation), // %=

    // Increment/Decrement
    PlusPlus(SourceLocation),   // ++
    MinusMinus(SourceLocation), // --

    // Punctuation
    Dot(SourceLocation),       // .
    LParen(SourceLocation),    // (
    RParen(SourceLocation),    // )
    LBrace(SourceLocation),    // {
    RBrace(SourceLocation),    // }
    LBracket(SourceLocation),  // [
    RBracket(SourceLocation),  // ]
    Semicolon(SourceLocation), // ;
    Comma(SourceLocation),     // ,

    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::IntLiteral(_, loc)
            | Token::StringLiteral(_, loc)
            | Token::Ident(_, loc)
            | Token::True(loc)
            | Token::False(loc)
            | Token::Class(loc)
            | Token::Public(loc)
            | Token::Private(loc)
            | Token::Protected(loc)
            | Token::Static(loc)
            | Token::Final(loc)
            | Token::Int(loc)
            | Token::Long(loc)
            | Token::Boolean(loc)
            | Token::Void(loc)
            | Token::StringType(loc)
            | Token::If(loc)
            | Token::Else(loc)
            | Token::While(loc)
            | Token::For(loc)
            | Token::Return(loc)
            | Token::New(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::Percent(loc)
            | Token::EqEq(loc)
            | Token::NotEq(loc)
            | Token::Lt(loc)
            | Token::Le(loc)
            | Token::Gt(loc)
            | Token::Ge(loc)
            | Token::Bang(loc)
            | Token::Eq(loc)
            | Token::PlusEq(loc)
            | Token::MinusEq(loc)
            | Token::StarEq(loc)
            | Token::SlashEq(loc)
            | Token::PercentEq(loc)
            | Token::PlusPlus(loc)
            | Token::MinusMinus(loc)
            | Token::Dot(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::LBracket(loc)
            | Token::RBracket(loc)
            | Token::Semicolon(loc)
            | Token::Comma(loc)
            | Token::Eof(loc) => *loc,
        }
    }

    /// Keyword tokens that may only appear in front of a declaration
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Token::Public(_)
                | Token::Private(_)
                | Token::Protected(_)
                | Token::Static(_)
                | Token::Final(_)
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IntLiteral(n, _) => write!(f, "integer '{}'", n),
            Token::StringLiteral(s, _) => write!(f, "string {:?}", s),
            Token::Ident(name, _) => write!(f, "identifier '{}'", name),
            Token::True(_) => write!(f, "'true'"),
            Token::False(_) => write!(f, "'false'"),
            Token::Class(_) => write!(f, "'class'"),
            Token::Public(_) => write!(f, "'public'"),
            Token::Private(_) => write!(f, "'private'"),
            Token::Protected(_) => write!(f, "'protected'"),
            Token::Static(_) => write!(f, "'static'"),
            Token::Final(_) => write!(f, "'final'"),
            Token::Int(_) => write!(f, "'int'"),
            Token::Long(_) => write!(f, "'long'"),
            Token::Boolean(_) => write!(f, "'boolean'"),
            Token::Void(_) => write!(f, "'void'"),
            Token::StringType(_) => write!(f, "'String'"),
            Token::If(_) => write!(f, "'if'"),
            Token::Else(_) => write!(f, "'else'"),
            Token::While(_) => write!(f, "'while'"),
            Token::For(_) => write!(f, "'for'"),
            Token::Return(_) => write!(f, "'return'"),
            Token::New(_) => write!(f, "'new'"),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::Slash(_) => write!(f, "'/'"),
            Token::Percent(_) => write!(f, "'%'"),
            Token::EqEq(_) => write!(f, "'=='"),
            Token::NotEq(_) => write!(f, "'!='"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Le(_) => write!(f, "'<='"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::Ge(_) => write!(f, "'>='"),
            Token::Bang(_) => write!(f, "'!'"),
            Token::Eq(_) => write!(f, "'='"),
            Token::PlusEq(_) => write!(f, "'+='"),
            Token::MinusEq(_) => write!(f, "'-='"),
            Token::StarEq(_) => write!(f, "'*='"),
            Token::SlashEq(_) => write!(f, "'/='"),
            Token::PercentEq(_) => write!(f, "'%='"),
            Token::PlusPlus(_) => write!(f, "'++'"),
            Token::MinusMinus(_) => write!(f, "'--'"),
            Token::Dot(_) => write!(f, "'.'"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBrace(_) => write!(f, "'{{'"),
            Token::RBrace(_) => write!(f, "'}}'"),
            Token::LBracket(_) => write!(f, "'['"),
            Token::RBracket(_) => write!(f, "']'"),
            Token::Semicolon(_) => write!(f, "';'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Eof(_) => write!(f, "end of file"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at line {}, column {}: {message}", location.line, location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl LexError {
    fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input, always ending with [`Token::Eof`]
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::Eof(self.current_location()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self
            .advance()
            .ok_or_else(|| LexError::new("Unexpected end of file", loc))?;

        let token = match ch {
            '"' => return self.string_literal(loc),
            '\'' => {
                return Err(LexError::new(
                    "Character literals are not supported",
                    loc,
                ))
            }
            '0'..='9' => return self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' | '_' | '$' => {
                return Ok(self.identifier_or_keyword(ch, loc))
            }

            '+' => self.either(
                &[('+', Token::PlusPlus(loc)), ('=', Token::PlusEq(loc))],
                Token::Plus(loc),
            ),
            '-' => self.either(
                &[('-', Token::MinusMinus(loc)), ('=', Token::MinusEq(loc))],
                Token::Minus(loc),
            ),
            '*' => self.either(&[('=', Token::StarEq(loc))], Token::Star(loc)),
            '/' => self.either(&[('=', Token::SlashEq(loc))], Token::Slash(loc)),
            '%' => self.either(&[('=', Token::PercentEq(loc))], Token::Percent(loc)),
            '=' => self.either(&[('=', Token::EqEq(loc))], Token::Eq(loc)),
            '!' => self.either(&[('=', Token::NotEq(loc))], Token::Bang(loc)),
            '<' => self.either(&[('=', Token::Le(loc))], Token::Lt(loc)),
            '>' => self.either(&[('=', Token::Ge(loc))], Token::Gt(loc)),
            '.' => Token::Dot(loc),
            '(' => Token::LParen(loc),
            ')' => Token::RParen(loc),
            '{' => Token::LBrace(loc),
            '}' => Token::RBrace(loc),
            '[' => Token::LBracket(loc),
            ']' => Token::RBracket(loc),
            ';' => Token::Semicolon(loc),
            ',' => Token::Comma(loc),

            _ => {
                return Err(LexError::new(
                    format!("Unexpected character: '{}'", ch),
                    loc,
                ))
            }
        };

        Ok(token)
    }

    /// Picks a two-character operator when the next char matches, else `single`
    fn either(&mut self, pairs: &[(char, Token)], single: Token) -> Token {
        for (next, token) in pairs {
            if self.peek() == Some(*next) {
                self.advance();
                return token.clone();
            }
        }
        single
    }

    fn string_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.advance() {
            match ch {
                '"' => return Ok(Token::StringLiteral(string, loc)),
                '\n' => break,
                '\\' => {
                    let escaped = self.advance().ok_or_else(|| {
                        LexError::new(
                            "Unexpected end of file in string literal",
                            self.current_location(),
                        )
                    })?;
                    let unescaped = match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '\\' => '\\',
                        '"' => '"',
                        '\'' => '\'',
                        '0' => '\0',
                        other => {
                            return Err(LexError::new(
                                format!("Unknown escape sequence: \\{}", other),
                                self.current_location(),
                            ))
                        }
                    };
                    string.push(unescaped);
                }
                other => string.push(other),
            }
        }

        Err(LexError::new("Unterminated string literal", loc))
    }

    /// Decimal integer literal with an optional `L` suffix
    fn number_literal(
        &mut self,
        first_digit: char,
        loc: SourceLocation,
    ) -> Result<Token, LexError> {
        let mut digits = String::new();
        digits.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else if ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        if matches!(self.peek(), Some('L') | Some('l')) {
            self.advance();
        }

        let value = digits.parse::<i64>().map_err(|_| {
            LexError::new(format!("Invalid integer literal: {}", digits), loc)
        })?;

        Ok(Token::IntLiteral(value, loc))
    }

    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "true" => Token::True(loc),
            "false" => Token::False(loc),
            "class" => Token::Class(loc),
            "public" => Token::Public(loc),
            "private" => Token::Private(loc),
            "protected" => Token::Protected(loc),
            "static" => Token::Static(loc),
            "final" => Token::Final(loc),
            "int" => Token::Int(loc),
            "long" => Token::Long(loc),
            "boolean" => Token::Boolean(loc),
            "void" => Token::Void(loc),
            "String" => Token::StringType(loc),
            "if" => Token::If(loc),
            "else" => Token::Else(loc),
            "while" => Token::While(loc),
            "for" => Token::For(loc),
            "return" => Token::Return(loc),
            "new" => Token::New(loc),
            _ => Token::Ident(ident, loc),
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('/') => {
                    while let Some(ch) = self.advance() {
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.peek_ahead(1) == Some('*') => {
                    self.skip_block_comment()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // '/'
        self.advance(); // '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError::new("Unterminated block comment", start_loc))
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}
