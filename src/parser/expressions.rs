//! Expression parsing implementation
//!
//! Precedence climbing for binary operators, recursive descent for the rest.
//!
//! # Precedence (lowest to highest)
//!
//! 1. Assignment: `=`, `+=`, `-=`, `*=`, `/=`, `%=` (right-associative)
//! 2. Equality: `==`, `!=`
//! 3. Relational: `<`, `<=`, `>`, `>=`
//! 4. Additive: `+`, `-`
//! 5. Multiplicative: `*`, `/`, `%`
//! 6. Prefix unary: `-`, `!`, `++`, `--`
//! 7. Postfix: `[]`, `.`, `()`, `++`, `--`

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

type LevelParser = fn(&mut Parser) -> Result<Expr, ParseError>;

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::parse_assignment)
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let target = self.parse_equality()?;

        let loc = self.current_location();
        let compound = match self.peek() {
            Token::Eq(_) => None,
            Token::PlusEq(_) => Some(BinOp::Add),
            Token::MinusEq(_) => Some(BinOp::Sub),
            Token::StarEq(_) => Some(BinOp::Mul),
            Token::SlashEq(_) => Some(BinOp::Div),
            Token::PercentEq(_) => Some(BinOp::Mod),
            _ => return Ok(target),
        };
        self.advance();

        let value = if self.check(&Token::LBrace(self.current_location())) {
            Box::new(self.parse_array_initializer()?)
        } else {
            Box::new(self.nested(Self::parse_assignment)?)
        };

        Ok(match compound {
            None => Expr::Assignment {
                target: Box::new(target),
                value,
                location: loc,
            },
            Some(op) => Expr::CompoundAssignment {
                target: Box::new(target),
                op,
                value,
                location: loc,
            },
        })
    }

    /// One left-associative precedence level
    fn parse_binary_level(
        &mut self,
        operand: LevelParser,
        op_for: fn(&Token) -> Option<BinOp>,
    ) -> Result<Expr, ParseError> {
        let outer = self.depth;
        let result = self.parse_binary_chain(operand, op_for);
        self.depth = outer;
        result
    }

    /// Each operator in the chain nests the tree built so far one level deeper
    fn parse_binary_chain(
        &mut self,
        operand: LevelParser,
        op_for: fn(&Token) -> Option<BinOp>,
    ) -> Result<Expr, ParseError> {
        let mut left = operand(self)?;

        while let Some(op) = op_for(self.peek()) {
            self.enter_level()?;
            let loc = self.current_location();
            self.advance();
            let right = operand(self)?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }

        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(Parser::parse_relational, |token| match token {
            Token::EqEq(_) => Some(BinOp::Eq),
            Token::NotEq(_) => Some(BinOp::Ne),
            _ => None,
        })
    }

    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(Parser::parse_additive, |token| match token {
            Token::Lt(_) => Some(BinOp::Lt),
            Token::Le(_) => Some(BinOp::Le),
            Token::Gt(_) => Some(BinOp::Gt),
            Token::Ge(_) => Some(BinOp::Ge),
            _ => None,
        })
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(Parser::parse_multiplicative, |token| match token {
            Token::Plus(_) => Some(BinOp::Add),
            Token::Minus(_) => Some(BinOp::Sub),
            _ => None,
        })
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(Parser::parse_unary, |token| match token {
            Token::Star(_) => Some(BinOp::Mul),
            Token::Slash(_) => Some(BinOp::Div),
            Token::Percent(_) => Some(BinOp::Mod),
            _ => None,
        })
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();
        let op = match self.peek() {
            Token::Minus(_) => UnOp::Neg,
            Token::Bang(_) => UnOp::Not,
            Token::PlusPlus(_) => UnOp::PreInc,
            Token::MinusMinus(_) => UnOp::PreDec,
            Token::Plus(_) => {
                self.advance();
                return self.nested(Self::parse_unary);
            }
            _ => return self.parse_postfix(),
        };
        self.advance();

        let operand = self.nested(Self::parse_unary)?;
        Ok(Expr::UnaryOp {
            op,
            operand: Box::new(operand),
            location: loc,
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let outer = self.depth;
        let result = self.parse_postfix_chain();
        self.depth = outer;
        result
    }

    fn parse_postfix_chain(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        while self.starts_postfix() {
            self.enter_level()?;
            let loc = self.current_location();

            if self.match_token(&Token::LBracket(loc)) {
                let index = self.parse_expression()?;
                self.expect_token(
                    &Token::RBracket(self.current_location()),
                    "Expected ']' after index",
                )?;
                expr = Expr::ArrayAccess {
                    array: Box::new(expr),
                    index: Box::new(index),
                    location: loc,
                };
            } else if self.match_token(&Token::Dot(loc)) {
                let field = self.expect_identifier()?;
                expr = Expr::FieldAccess {
                    object: Box::new(expr),
                    field,
                    location: loc,
                };
            } else if self.check(&Token::LParen(loc)) {
                expr = self.finish_call(expr)?;
            } else if self.match_token(&Token::PlusPlus(loc)) {
                expr = Expr::UnaryOp {
                    op: UnOp::PostInc,
                    operand: Box::new(expr),
                    location: loc,
                };
            } else if self.match_token(&Token::MinusMinus(loc)) {
                expr = Expr::UnaryOp {
                    op: UnOp::PostDec,
                    operand: Box::new(expr),
                    location: loc,
                };
            }
        }

        Ok(expr)
    }

    fn starts_postfix(&self) -> bool {
        matches!(
            self.peek(),
            Token::LBracket(_) | Token::Dot(_) | Token::LParen(_) | Token::PlusPlus(_) | Token::MinusMinus(_)
        )
    }

    /// Turns `name` or `scope.name` followed by `(args)` into a call
    fn finish_call(&mut self, callee: Expr) -> Result<Expr, ParseError> {
        let (scope, name, location) = match callee {
            Expr::Variable(name, location) => (None, name, location),
            Expr::FieldAccess {
                object,
                field,
                location,
            } => (Some(object), field, location),
            other => {
                return Err(ParseError {
                    message: format!("Expression '{}' cannot be called", other),
                    location: other.location(),
                })
            }
        };

        self.expect_lparen("before call arguments")?;
        let mut args = Vec::new();
        if !self.check(&Token::RParen(self.current_location())) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }
        }
        self.expect_rparen("after call arguments")?;

        Ok(Expr::MethodCall {
            scope,
            name,
            args,
            location,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        let expr = match self.peek().clone() {
            Token::IntLiteral(n, _) => Expr::IntLiteral(n, loc),
            Token::True(_) => Expr::BoolLiteral(true, loc),
            Token::False(_) => Expr::BoolLiteral(false, loc),
            Token::StringLiteral(s, _) => Expr::StringLiteral(s, loc),
            Token::Ident(name, _) => Expr::Variable(name, loc),
            Token::LParen(_) => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect_rparen("after expression")?;
                return Ok(Expr::Enclosed {
                    inner: Box::new(inner),
                    location: loc,
                });
            }
            Token::LBrace(_) => return self.parse_array_initializer(),
            Token::New(_) => {
                self.advance();
                return self.parse_new_array(loc);
            }
            _ => return Err(self.error_here("Expected expression")),
        };

        self.advance();
        Ok(expr)
    }

    /// After `new`: either `T[size]` or `T[]{...}`
    fn parse_new_array(&mut self, loc: SourceLocation) -> Result<Expr, ParseError> {
        let declared = self.parse_type()?;

        if self.match_token(&Token::LBracket(self.current_location())) {
            let size = self.parse_expression()?;
            self.expect_token(
                &Token::RBracket(self.current_location()),
                "Expected ']' after array size",
            )?;
            if self.check(&Token::LBracket(self.current_location())) {
                return Err(self.error_here("Multi-dimensional array creation is not supported"));
            }
            return Ok(Expr::NewArray {
                element_type: declared,
                size: Box::new(size),
                location: loc,
            });
        }

        if declared.element_type().is_some() && self.check(&Token::LBrace(self.current_location())) {
            return self.parse_array_initializer();
        }

        Err(self.error_here("Expected '[' or array initializer after 'new'"))
    }

    /// `{ e1, e2, ... }`, nested braces allowed, trailing comma allowed
    pub(crate) fn parse_array_initializer(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        self.expect_lbrace("to open array initializer")?;

        let mut elements = Vec::new();
        while !self.check(&Token::RBrace(self.current_location())) {
            let element = if self.check(&Token::LBrace(self.current_location())) {
                self.nested(Self::parse_array_initializer)?
            } else {
                self.parse_expression()?
            };
            elements.push(element);

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }
        self.expect_rbrace("to close array initializer")?;

        Ok(Expr::ArrayLiteral { elements, location })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse_source;

    fn expr_of(text: &str) -> Expr {
        let source = format!("class T {{ static void main() {{ {}; }} }}", text);
        match parse_source(&source).unwrap().methods.remove(0).body.remove(0) {
            Statement::Expression { expr, .. } => expr,
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        let expr = expr_of("x = 1 + 2 * 3 < 10 == true");
        assert_eq!(expr.to_string(), "x = 1 + 2 * 3 < 10 == true");

        match expr {
            Expr::Assignment { value, .. } => match *value {
                Expr::BinaryOp { op: BinOp::Eq, left, .. } => {
                    assert!(matches!(*left, Expr::BinaryOp { op: BinOp::Lt, .. }));
                }
                other => panic!("Expected equality at the top, got {:?}", other),
            },
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_left_associative_subtraction() {
        match expr_of("10 - 4 - 3") {
            Expr::BinaryOp { op: BinOp::Sub, left, right, .. } => {
                assert_eq!(left.to_string(), "10 - 4");
                assert!(matches!(*right, Expr::IntLiteral(3, _)));
            }
            other => panic!("Expected subtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_qualified_call() {
        match expr_of("System.out.println(fact(n - 1))") {
            Expr::MethodCall { scope, name, args, .. } => {
                assert_eq!(name, "println");
                assert_eq!(scope.map(|s| s.to_string()), Some("System.out".to_string()));
                assert!(matches!(&args[0], Expr::MethodCall { scope: None, name, .. } if name == "fact"));
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_postfix_and_prefix() {
        assert!(matches!(expr_of("i++"), Expr::UnaryOp { op: UnOp::PostInc, .. }));
        assert!(matches!(expr_of("--i"), Expr::UnaryOp { op: UnOp::PreDec, .. }));
        assert!(matches!(expr_of("a[i] += 2"), Expr::CompoundAssignment { op: BinOp::Add, .. }));
        assert!(matches!(expr_of("arr.length"), Expr::FieldAccess { ref field, .. } if field == "length"));
    }

    #[test]
    fn test_array_creation_forms() {
        assert!(matches!(
            expr_of("a = new int[5]"),
            Expr::Assignment { value, .. } if matches!(*value, Expr::NewArray { element_type: TypeTag::Int, .. })
        ));
        assert!(matches!(
            expr_of("a = new int[]{1, 2, 3}"),
            Expr::Assignment { value, .. } if matches!(&*value, Expr::ArrayLiteral { elements, .. } if elements.len() == 3)
        ));
    }

    #[test]
    fn test_enclosed_condition_text() {
        assert_eq!(expr_of("(a + b) * c").to_string(), "(a + b) * c");
    }

    #[test]
    fn test_bad_call_target() {
        let err = parse_source("class T { void f() { 3(4); } }").unwrap_err();
        assert!(err.message.contains("cannot be called"));
    }
}
