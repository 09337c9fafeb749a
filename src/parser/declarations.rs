//! Declaration parsing implementation
//!
//! This module handles the outer structure of a source file:
//!
//! - The container class: `public class Main { ... }`
//! - Method definitions: `static int fact(int n) { ... }`
//! - Types: `int`, `long`, `boolean`, `void`, `String` and `[]` suffixes
//! - Method parameters
//!
//! # Grammar
//!
//! ```text
//! class    ::= modifier* "class" identifier "{" method* "}"
//! method   ::= modifier* type identifier "(" params? ")" "{" statements "}"
//! params   ::= param ("," param)*
//! param    ::= "final"? type identifier ("[" "]")*
//! type     ::= base_type ("[" "]")*
//! ```

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse the single container class and every method inside it
    pub(crate) fn parse_class(&mut self) -> Result<CompilationUnit, ParseError> {
        self.skip_modifiers();
        self.expect_token(
            &Token::Class(self.current_location()),
            "Expected 'class' declaration",
        )?;
        let class_name = self.expect_identifier()?;
        self.expect_lbrace("after class name")?;

        let mut methods = Vec::new();
        while !self.check(&Token::RBrace(self.current_location())) {
            if self.is_at_end() {
                return Err(self.error_here("Expected '}' to close class body"));
            }
            methods.push(self.parse_method()?);
        }
        self.expect_rbrace("after class body")?;

        Ok(CompilationUnit {
            class_name,
            methods,
        })
    }

    /// Parse method definition: modifiers type name(params) { body }
    pub(crate) fn parse_method(&mut self) -> Result<Method, ParseError> {
        let location = self.current_location();
        self.skip_modifiers();

        let return_type = self.parse_type()?;
        let name = self.expect_identifier()?;

        if !self.check(&Token::LParen(self.current_location())) {
            return Err(ParseError {
                message: format!("Field '{}' is not supported; only methods may appear in the class body", name),
                location,
            });
        }
        self.expect_lparen("after method name")?;
        let params = self.parse_params()?;
        self.expect_rparen("after parameters")?;

        self.expect_lbrace("before method body")?;
        let body = self.parse_block_statements()?;
        self.expect_rbrace("after method body")?;

        Ok(Method {
            name,
            params,
            return_type,
            body,
            location,
        })
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();

        if self.check(&Token::RParen(self.current_location())) {
            return Ok(params);
        }

        loop {
            self.skip_modifiers();
            let base = self.parse_type()?;
            let name = self.expect_identifier()?;
            let param_type = self.parse_array_suffix(base);
            params.push(Param { name, param_type });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse type: base type followed by any number of `[]` pairs
    pub(crate) fn parse_type(&mut self) -> Result<TypeTag, ParseError> {
        let base = match self.peek() {
            Token::Int(_) | Token::Long(_) => TypeTag::Int,
            Token::Boolean(_) => TypeTag::Boolean,
            Token::Void(_) => TypeTag::Void,
            Token::StringType(_) => TypeTag::Text,
            _ => return Err(self.error_here("Expected type")),
        };
        self.advance();

        Ok(self.parse_array_suffix(base))
    }

    /// Wraps `base` once per `[]` pair; a `[` followed by anything else is left alone
    pub(crate) fn parse_array_suffix(&mut self, mut base: TypeTag) -> TypeTag {
        while self.check(&Token::LBracket(self.current_location()))
            && matches!(self.peek_ahead(1), Some(Token::RBracket(_)))
        {
            self.advance();
            self.advance();
            base = base.array_of();
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::TypeTag;
    use crate::parser::parse::parse_source;

    #[test]
    fn test_method_signature() {
        let unit = parse_source(
            "class M {\n  public static long sum(int[] arr, final int n, String s[]) { return 0; }\n}",
        )
        .unwrap();
        let method = &unit.methods[0];

        assert_eq!(method.name, "sum");
        assert_eq!(method.return_type, TypeTag::Int);
        assert_eq!(method.location.line, 2);
        assert_eq!(method.params.len(), 3);
        assert_eq!(method.params[0].param_type, TypeTag::Int.array_of());
        assert_eq!(method.params[1].name, "n");
        assert_eq!(method.params[2].param_type, TypeTag::Text.array_of());
    }

    #[test]
    fn test_multiple_methods_keep_source_order() {
        let unit = parse_source("class M { void a() {} boolean b() { return true; } void main() {} }")
            .unwrap();
        let names: Vec<&str> = unit.methods.iter().map(|m| m.name.as_str()).collect();

        assert_eq!(names, vec!["a", "b", "main"]);
        assert_eq!(unit.methods[1].return_type, TypeTag::Boolean);
    }

    #[test]
    fn test_field_rejected() {
        let err = parse_source("class M { static int counter = 0; }").unwrap_err();
        assert!(err.message.contains("Field 'counter'"));
    }

    #[test]
    fn test_missing_class_keyword() {
        let err = parse_source("int main() { return 0; }").unwrap_err();
        assert!(err.message.starts_with("Expected 'class'"));
    }
}
