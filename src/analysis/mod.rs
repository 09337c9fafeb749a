//! Static complexity estimate.
//!
//! A heuristic read of the source, independent of any particular run:
//!
//! - time follows the deepest loop nesting found in any method
//!   (`O(1)`, `O(n)`, `O(n^2)`, `O(n^k)`)
//! - space is `O(n)` when an array is allocated inside a loop or a method
//!   calls itself directly, `O(1)` otherwise
//!
//! Mutual recursion and loop bounds are not inspected.

use crate::parser::ast::{CompilationUnit, Expr, Method, Statement};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Complexity {
    pub time: String,
    pub space: String,
    pub max_loop_depth: usize,
    /// Methods that call themselves directly, in declaration order
    pub recursive_methods: Vec<String>,
}

impl Complexity {
    pub fn estimate(unit: &CompilationUnit) -> Self {
        let mut max_loop_depth = 0;
        let mut allocates_in_loop = false;
        let mut recursive_methods = Vec::new();

        for method in &unit.methods {
            let mut walker = Walker::new(method);
            for stmt in &method.body {
                walker.statement(stmt);
            }
            max_loop_depth = max_loop_depth.max(walker.max_loop_depth);
            allocates_in_loop |= walker.allocates_in_loop;
            if walker.self_call {
                recursive_methods.push(method.name.clone());
            }
        }

        let time = match max_loop_depth {
            0 => "O(1)".to_string(),
            1 => "O(n)".to_string(),
            k => format!("O(n^{})", k),
        };
        let space = if allocates_in_loop || !recursive_methods.is_empty() {
            "O(n)"
        } else {
            "O(1)"
        };

        Complexity {
            time,
            space: space.to_string(),
            max_loop_depth,
            recursive_methods,
        }
    }
}

struct Walker<'a> {
    method: &'a Method,
    loop_depth: usize,
    max_loop_depth: usize,
    allocates_in_loop: bool,
    self_call: bool,
}

impl<'a> Walker<'a> {
    fn new(method: &'a Method) -> Self {
        Walker {
            method,
            loop_depth: 0,
            max_loop_depth: 0,
            allocates_in_loop: false,
            self_call: false,
        }
    }

    fn enter_loop(&mut self) {
        self.loop_depth += 1;
        self.max_loop_depth = self.max_loop_depth.max(self.loop_depth);
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Block { statements, .. } => {
                for s in statements {
                    self.statement(s);
                }
            }
            Statement::VarDecl { declarators, .. } => {
                for init in declarators.iter().filter_map(|d| d.init.as_ref()) {
                    self.expr(init);
                }
            }
            Statement::Expression { expr, .. } => self.expr(expr),
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.expr(condition);
                self.statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.statement(else_branch);
                }
            }
            Statement::While {
                condition, body, ..
            } => {
                self.enter_loop();
                self.expr(condition);
                self.statement(body);
                self.loop_depth -= 1;
            }
            Statement::For {
                init,
                condition,
                update,
                body,
                ..
            } => {
                // the initializer runs once, outside the loop
                for s in init {
                    self.statement(s);
                }
                self.enter_loop();
                if let Some(condition) = condition {
                    self.expr(condition);
                }
                for e in update {
                    self.expr(e);
                }
                self.statement(body);
                self.loop_depth -= 1;
            }
            Statement::Return { expr, .. } => {
                if let Some(expr) = expr {
                    self.expr(expr);
                }
            }
            Statement::Empty { .. } => {}
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::IntLiteral(..)
            | Expr::BoolLiteral(..)
            | Expr::StringLiteral(..)
            | Expr::Variable(..) => {}
            Expr::ArrayLiteral { elements, .. } => {
                self.allocates_in_loop |= self.loop_depth > 0;
                for e in elements {
                    self.expr(e);
                }
            }
            Expr::NewArray { size, .. } => {
                self.allocates_in_loop |= self.loop_depth > 0;
                self.expr(size);
            }
            Expr::Enclosed { inner, .. } => self.expr(inner),
            Expr::ArrayAccess { array, index, .. } => {
                self.expr(array);
                self.expr(index);
            }
            Expr::FieldAccess { object, .. } => self.expr(object),
            Expr::Assignment { target, value, .. }
            | Expr::CompoundAssignment { target, value, .. } => {
                self.expr(target);
                self.expr(value);
            }
            Expr::BinaryOp { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            Expr::UnaryOp { operand, .. } => self.expr(operand),
            Expr::MethodCall { name, args, .. } => {
                self.self_call |= *name == self.method.name;
                for a in args {
                    self.expr(a);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use pretty_assertions::assert_eq;

    fn estimate(body: &str) -> Complexity {
        let source = format!("class T {{ {} }}", body);
        Complexity::estimate(&parse_source(&source).unwrap())
    }

    #[test]
    fn test_straight_line_code() {
        let c = estimate("static void main() { int x = 1; x = x + 1; }");
        assert_eq!(c.time, "O(1)");
        assert_eq!(c.space, "O(1)");
        assert!(c.recursive_methods.is_empty());
    }

    #[test]
    fn test_nested_loops() {
        let c = estimate(
            "static void main() {
                for (int i = 0; i < 3; i++) {
                    for (int j = 0; j < 3; j++) {
                        while (false) { }
                    }
                }
                while (false) { }
            }",
        );
        assert_eq!(c.time, "O(n^3)");
        assert_eq!(c.max_loop_depth, 3);
    }

    #[test]
    fn test_allocation_inside_loop() {
        let outside = estimate("static void main() { int[] a = new int[5]; for (;;) { a[0] = 1; } }");
        assert_eq!(outside.space, "O(1)");
        assert_eq!(outside.time, "O(n)");

        let inside = estimate("static void main() { while (true) { int[] a = {1, 2}; } }");
        assert_eq!(inside.space, "O(n)");
    }

    #[test]
    fn test_direct_recursion() {
        let c = estimate(
            "static int fact(int n) { if (n <= 1) return 1; return n * fact(n - 1); }
             static void main() { int r = fact(5); }",
        );
        assert_eq!(c.recursive_methods, vec!["fact".to_string()]);
        assert_eq!(c.space, "O(n)");
        assert_eq!(c.time, "O(1)");
    }
}
