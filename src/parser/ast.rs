// AST (Abstract Syntax Tree) definitions for the traced language

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Declared type of a parameter, local or method result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    Int,
    Boolean,
    Text,
    Void,
    Array(Box<TypeTag>),
}

impl TypeTag {
    pub fn array_of(self) -> Self {
        TypeTag::Array(Box::new(self))
    }

    /// Element type for array types, `None` otherwise
    pub fn element_type(&self) -> Option<&TypeTag> {
        match self {
            TypeTag::Array(inner) => Some(inner),
            _ => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Int => write!(f, "int"),
            TypeTag::Boolean => write!(f, "boolean"),
            TypeTag::Text => write!(f, "String"),
            TypeTag::Void => write!(f, "void"),
            TypeTag::Array(inner) => write!(f, "{}[]", inner),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,     // -x
    Not,     // !x
    PreInc,  // ++x
    PreDec,  // --x
    PostInc, // x++
    PostDec, // x--
}

/// Method parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub param_type: TypeTag,
}

/// One `name = init` entry of a local variable declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: String,
    pub var_type: TypeTag,
    pub init: Option<Expr>,
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block {
        statements: Vec<Statement>,
        location: SourceLocation,
    },
    VarDecl {
        var_type: TypeTag,
        declarators: Vec<Declarator>,
        location: SourceLocation,
    },
    Expression {
        expr: Expr,
        location: SourceLocation,
    },
    If {
        condition: Expr,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: Box<Statement>,
        location: SourceLocation,
    },
    For {
        /// Either a single `VarDecl` or one `Expression` per comma-separated initializer
        init: Vec<Statement>,
        condition: Option<Expr>,
        update: Vec<Expr>,
        body: Box<Statement>,
        location: SourceLocation,
    },
    Return {
        expr: Option<Expr>,
        location: SourceLocation,
    },
    Empty {
        location: SourceLocation,
    },
}

impl Statement {
    pub fn location(&self) -> SourceLocation {
        match self {
            Statement::Block { location, .. }
            | Statement::VarDecl { location, .. }
            | Statement::Expression { location, .. }
            | Statement::If { location, .. }
            | Statement::While { location, .. }
            | Statement::For { location, .. }
            | Statement::Return { location, .. }
            | Statement::Empty { location } => *location,
        }
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLiteral(i64, SourceLocation),
    BoolLiteral(bool, SourceLocation),
    StringLiteral(String, SourceLocation),
    Variable(String, SourceLocation),
    /// `{1, 2, 3}` or `new int[]{1, 2, 3}`
    ArrayLiteral {
        elements: Vec<Expr>,
        location: SourceLocation,
    },
    /// `new int[n]`
    NewArray {
        element_type: TypeTag,
        size: Box<Expr>,
        location: SourceLocation,
    },
    /// Parenthesized expression, kept so conditions render the way they were written
    Enclosed {
        inner: Box<Expr>,
        location: SourceLocation,
    },
    ArrayAccess {
        array: Box<Expr>,
        index: Box<Expr>,
        location: SourceLocation,
    },
    FieldAccess {
        object: Box<Expr>,
        field: String,
        location: SourceLocation,
    },
    Assignment {
        target: Box<Expr>,
        value: Box<Expr>,
        location: SourceLocation,
    },
    CompoundAssignment {
        target: Box<Expr>,
        op: BinOp,
        value: Box<Expr>,
        location: SourceLocation,
    },
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
    MethodCall {
        /// Qualifier such as `System.out` or `Main`; display only
        scope: Option<Box<Expr>>,
        name: String,
        args: Vec<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::IntLiteral(_, loc)
            | Expr::BoolLiteral(_, loc)
            | Expr::StringLiteral(_, loc)
            | Expr::Variable(_, loc) => *loc,
            Expr::ArrayLiteral { location, .. }
            | Expr::NewArray { location, .. }
            | Expr::Enclosed { location, .. }
            | Expr::ArrayAccess { location, .. }
            | Expr::FieldAccess { location, .. }
            | Expr::Assignment { location, .. }
            | Expr::CompoundAssignment { location, .. }
            | Expr::BinaryOp { location, .. }
            | Expr::UnaryOp { location, .. }
            | Expr::MethodCall { location, .. } => *location,
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::IntLiteral(n, _) => write!(f, "{}", n),
            Expr::BoolLiteral(b, _) => write!(f, "{}", b),
            Expr::StringLiteral(s, _) => write!(f, "{:?}", s),
            Expr::Variable(name, _) => write!(f, "{}", name),
            Expr::ArrayLiteral { elements, .. } => {
                write!(f, "{{")?;
                write_list(f, elements)?;
                write!(f, "}}")
            }
            Expr::NewArray {
                element_type, size, ..
            } => write!(f, "new {}[{}]", element_type, size),
            Expr::Enclosed { inner, .. } => write!(f, "({})", inner),
            Expr::ArrayAccess { array, index, .. } => write!(f, "{}[{}]", array, index),
            Expr::FieldAccess { object, field, .. } => write!(f, "{}.{}", object, field),
            Expr::Assignment { target, value, .. } => write!(f, "{} = {}", target, value),
            Expr::CompoundAssignment {
                target, op, value, ..
            } => write!(f, "{} {}= {}", target, op.symbol(), value),
            Expr::BinaryOp {
                op, left, right, ..
            } => write!(f, "{} {} {}", left, op.symbol(), right),
            Expr::UnaryOp { op, operand, .. } => match op {
                UnOp::Neg => write!(f, "-{}", operand),
                UnOp::Not => write!(f, "!{}", operand),
                UnOp::PreInc => write!(f, "++{}", operand),
                UnOp::PreDec => write!(f, "--{}", operand),
                UnOp::PostInc => write!(f, "{}++", operand),
                UnOp::PostDec => write!(f, "{}--", operand),
            },
            Expr::MethodCall {
                scope, name, args, ..
            } => {
                if let Some(scope) = scope {
                    write!(f, "{}.", scope)?;
                }
                write!(f, "{}(", name)?;
                write_list(f, args)?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Block { .. } => write!(f, "{{ ... }}"),
            Statement::VarDecl {
                var_type,
                declarators,
                ..
            } => {
                write!(f, "{} ", var_type)?;
                for (i, decl) in declarators.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", decl.name)?;
                    if let Some(init) = &decl.init {
                        write!(f, " = {}", init)?;
                    }
                }
                Ok(())
            }
            Statement::Expression { expr, .. } => write!(f, "{}", expr),
            Statement::If { condition, .. } => write!(f, "if ({})", condition),
            Statement::While { condition, .. } => write!(f, "while ({})", condition),
            Statement::For { condition, .. } => match condition {
                Some(cond) => write!(f, "for (...; {}; ...)", cond),
                None => write!(f, "for (...;; ...)"),
            },
            Statement::Return { expr, .. } => match expr {
                Some(expr) => write!(f, "return {}", expr),
                None => write!(f, "return"),
            },
            Statement::Empty { .. } => write!(f, ";"),
        }
    }
}

/// Method definition: the unit of the flat method namespace
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: TypeTag,
    pub body: Vec<Statement>,
    pub location: SourceLocation,
}

impl Method {
    /// Declaration line, used for the entry Step
    pub fn line(&self) -> usize {
        self.location.line
    }
}

/// Parsed source: one container class holding static methods
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompilationUnit {
    pub class_name: String,
    pub methods: Vec<Method>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new(1, 1)
    }

    #[test]
    fn test_type_display() {
        assert_eq!(TypeTag::Int.to_string(), "int");
        assert_eq!(TypeTag::Text.array_of().to_string(), "String[]");
        assert_eq!(TypeTag::Int.array_of().array_of().to_string(), "int[][]");
    }

    #[test]
    fn test_condition_renders_like_source() {
        let cond = Expr::BinaryOp {
            op: BinOp::Le,
            left: Box::new(Expr::Variable("n".to_string(), loc())),
            right: Box::new(Expr::IntLiteral(1, loc())),
            location: loc(),
        };
        assert_eq!(cond.to_string(), "n <= 1");
    }

    #[test]
    fn test_qualified_call_renders_scope() {
        let call = Expr::MethodCall {
            scope: Some(Box::new(Expr::FieldAccess {
                object: Box::new(Expr::Variable("System".to_string(), loc())),
                field: "out".to_string(),
                location: loc(),
            })),
            name: "println".to_string(),
            args: vec![Expr::StringLiteral("hi".to_string(), loc())],
            location: loc(),
        };
        assert_eq!(call.to_string(), "System.out.println(\"hi\")");
    }
}
