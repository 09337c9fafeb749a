//! Statement parsing implementation
//!
//! - Variable declarations: `int x = 42, y;`, `int[] a = {1, 2};`
//! - Control flow: `if`, `while`, `for`
//! - `return`, blocks, empty statements and expression statements
//!
//! # Grammar
//!
//! ```text
//! statement ::= block | if_stmt | while_stmt | for_stmt | return_stmt
//!             | ";" | var_decl ";" | expr ";"
//! var_decl  ::= "final"? type declarator ("," declarator)*
//! declarator ::= identifier ("[" "]")* ("=" (array_init | expr))?
//! for_stmt  ::= "for" "(" (var_decl | expr_list)? ";" expr? ";" expr_list? ")" statement
//! ```

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse block statements (inside braces, excluding the braces themselves)
    pub(crate) fn parse_block_statements(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(&Token::RBrace(self.current_location())) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    pub(crate) fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        self.nested(Self::parse_statement_kind)
    }

    fn parse_statement_kind(&mut self) -> Result<Statement, ParseError> {
        let loc = self.current_location();

        if self.match_token(&Token::Return(loc)) {
            return self.parse_return_statement(loc);
        }

        if self.match_token(&Token::If(loc)) {
            return self.parse_if_statement(loc);
        }

        if self.match_token(&Token::While(loc)) {
            return self.parse_while_statement(loc);
        }

        if self.match_token(&Token::For(loc)) {
            return self.parse_for_statement(loc);
        }

        if self.match_token(&Token::Semicolon(loc)) {
            return Ok(Statement::Empty { location: loc });
        }

        if self.match_token(&Token::LBrace(loc)) {
            let statements = self.parse_block_statements()?;
            self.expect_rbrace("after block")?;
            return Ok(Statement::Block {
                statements,
                location: loc,
            });
        }

        if self.starts_variable_declaration() {
            let decl = self.parse_variable_declaration()?;
            self.expect_semicolon("after variable declaration")?;
            return Ok(decl);
        }

        let expr = self.parse_expression()?;
        self.expect_semicolon("after expression")?;
        Ok(Statement::Expression {
            expr,
            location: loc,
        })
    }

    fn starts_variable_declaration(&self) -> bool {
        self.is_type_keyword() || self.check(&Token::Final(self.current_location()))
    }

    /// Parse a declaration without its terminating `;`
    pub(crate) fn parse_variable_declaration(&mut self) -> Result<Statement, ParseError> {
        let location = self.current_location();
        self.skip_modifiers();
        let var_type = self.parse_type()?;

        let mut declarators = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            let declared = self.parse_array_suffix(var_type.clone());

            let init = if self.match_token(&Token::Eq(self.current_location())) {
                if self.check(&Token::LBrace(self.current_location())) {
                    Some(self.parse_array_initializer()?)
                } else {
                    Some(self.parse_expression()?)
                }
            } else {
                None
            };

            declarators.push(Declarator {
                name,
                var_type: declared,
                init,
            });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(Statement::VarDecl {
            var_type,
            declarators,
            location,
        })
    }

    fn parse_return_statement(&mut self, loc: SourceLocation) -> Result<Statement, ParseError> {
        let expr = if self.check(&Token::Semicolon(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect_semicolon("after return")?;

        Ok(Statement::Return {
            expr,
            location: loc,
        })
    }

    fn parse_if_statement(&mut self, loc: SourceLocation) -> Result<Statement, ParseError> {
        self.expect_lparen("after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after if condition")?;

        let then_branch = Box::new(self.parse_statement()?);

        let else_branch = if self.match_token(&Token::Else(self.current_location())) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Statement::If {
            condition,
            then_branch,
            else_branch,
            location: loc,
        })
    }

    fn parse_while_statement(&mut self, loc: SourceLocation) -> Result<Statement, ParseError> {
        self.expect_lparen("after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after while condition")?;

        let body = Box::new(self.parse_statement()?);

        Ok(Statement::While {
            condition,
            body,
            location: loc,
        })
    }

    fn parse_for_statement(&mut self, loc: SourceLocation) -> Result<Statement, ParseError> {
        self.expect_lparen("after 'for'")?;

        let init = if self.check(&Token::Semicolon(self.current_location())) {
            Vec::new()
        } else if self.starts_variable_declaration() {
            vec![self.parse_variable_declaration()?]
        } else {
            self.parse_expression_list()?
                .into_iter()
                .map(|expr| {
                    let location = expr.location();
                    Statement::Expression { expr, location }
                })
                .collect()
        };
        self.expect_semicolon("after for initializer")?;

        let condition = if self.check(&Token::Semicolon(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_semicolon("after for condition")?;

        let update = if self.check(&Token::RParen(self.current_location())) {
            Vec::new()
        } else {
            self.parse_expression_list()?
        };
        self.expect_rparen("after for clauses")?;

        let body = Box::new(self.parse_statement()?);

        Ok(Statement::For {
            init,
            condition,
            update,
            body,
            location: loc,
        })
    }

    fn parse_expression_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![self.parse_expression()?];
        while self.match_token(&Token::Comma(self.current_location())) {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse_source;

    fn body_of(stmts: &str) -> Vec<Statement> {
        let source = format!("class T {{ static void main() {{ {} }} }}", stmts);
        parse_source(&source).unwrap().methods.remove(0).body
    }

    #[test]
    fn test_declaration_with_several_declarators() {
        let body = body_of("int a = 1, b, c[] = {1, 2};");

        match &body[0] {
            Statement::VarDecl { declarators, .. } => {
                assert_eq!(declarators.len(), 3);
                assert!(declarators[1].init.is_none());
                assert_eq!(declarators[2].var_type, TypeTag::Int.array_of());
                assert!(matches!(declarators[2].init, Some(Expr::ArrayLiteral { .. })));
            }
            other => panic!("Expected declaration, got {:?}", other),
        }
        assert_eq!(body[0].to_string(), "int a = 1, b, c = {1, 2}");
    }

    #[test]
    fn test_for_loop_parts() {
        let body = body_of("for (int i = 0, j = 5; i < j; i++, j--) ;");

        match &body[0] {
            Statement::For {
                init,
                condition,
                update,
                body,
                ..
            } => {
                assert_eq!(init.len(), 1);
                assert_eq!(condition.as_ref().map(|c| c.to_string()), Some("i < j".to_string()));
                assert_eq!(update.len(), 2);
                assert!(matches!(**body, Statement::Empty { .. }));
            }
            other => panic!("Expected for loop, got {:?}", other),
        }
    }

    #[test]
    fn test_for_loop_without_clauses() {
        let body = body_of("for (;;) { }");
        assert!(matches!(
            &body[0],
            Statement::For { init, condition: None, update, .. } if init.is_empty() && update.is_empty()
        ));
    }

    #[test]
    fn test_if_else_chain() {
        let body = body_of("if (x > 0) return; else if (x < 0) { x = 1; } else x = 2;");

        match &body[0] {
            Statement::If {
                condition,
                else_branch: Some(else_branch),
                ..
            } => {
                assert_eq!(condition.to_string(), "x > 0");
                assert!(matches!(**else_branch, Statement::If { .. }));
            }
            other => panic!("Expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_statement_lines() {
        let body = body_of("int x = 0;\nwhile (x < 3)\n  x++;");
        assert_eq!(body[0].location().line, 1);
        assert_eq!(body[1].location().line, 2);
        assert_eq!(body[1].to_string(), "while (x < 3)");
    }
}
