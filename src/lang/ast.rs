//! Wall-E syntax tree

use std::fmt;

/// Expression types
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Integer literal
    Number(i32),
    /// String literal
    Text(String),
    /// `true` / `false`
    Bool(bool),
    /// Variable reference
    Variable(String),
    /// Unary operation
    UnaryOp(UnaryOp, Box<Expr>),
    /// Binary operation
    BinaryOp(Box<Expr>, BinOp, Box<Expr>),
    /// Built-in function call
    FunctionCall(Builtin, Vec<Expr>),
}

/// Binary operators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::Eq => "==",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// Unary operators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}

/// Built-in functions callable from expressions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    GetActualX,
    GetActualY,
    GetCanvasSize,
    GetColorCount,
    IsBrushColor,
    IsBrushSize,
    IsCanvasColor,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::GetActualX => "GetActualX",
            Builtin::GetActualY => "GetActualY",
            Builtin::GetCanvasSize => "GetCanvasSize",
            Builtin::GetColorCount => "GetColorCount",
            Builtin::IsBrushColor => "IsBrushColor",
            Builtin::IsBrushSize => "IsBrushSize",
            Builtin::IsCanvasColor => "IsCanvasColor",
        }
    }

    /// Number of arguments the function takes
    pub fn arity(&self) -> usize {
        match self {
            Builtin::GetActualX | Builtin::GetActualY | Builtin::GetCanvasSize => 0,
            Builtin::IsBrushColor | Builtin::IsBrushSize => 1,
            Builtin::IsCanvasColor => 3,
            Builtin::GetColorCount => 5,
        }
    }
}

/// Statement types
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// Spawn(x, y)
    Spawn { x: Expr, y: Expr },

    /// Color(name)
    Color(Expr),

    /// Size(n)
    Size(Expr),

    /// DrawLine(dx, dy, distance)
    DrawLine { dx: Expr, dy: Expr, dist: Expr },

    /// DrawCircle(dx, dy, radius)
    DrawCircle { dx: Expr, dy: Expr, radius: Expr },

    /// DrawRectangle(dx, dy, distance, width, height)
    DrawRectangle {
        dx: Expr,
        dy: Expr,
        dist: Expr,
        width: Expr,
        height: Expr,
    },

    /// Fill()
    Fill,

    /// name <- expr
    Assignment(String, Expr),

    /// Bare identifier on its own line
    Label(String),

    /// GoTo [label] (condition); no condition means always jump
    GoTo {
        label: String,
        condition: Option<Expr>,
    },
}

impl Stmt {
    /// Statements that may change canvas pixels
    pub fn draws(&self) -> bool {
        matches!(
            self,
            Stmt::DrawLine { .. } | Stmt::DrawCircle { .. } | Stmt::DrawRectangle { .. } | Stmt::Fill
        )
    }
}

/// A parsed program: statements in execution order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Text(s) => write!(f, "\"{}\"", s),
            Expr::Bool(b) => write!(f, "{}", b),
            Expr::Variable(name) => write!(f, "{}", name),
            Expr::UnaryOp(UnaryOp::Neg, operand) => match operand.as_ref() {
                Expr::UnaryOp(..) => write!(f, "-({})", operand),
                _ => write!(f, "-{}", operand),
            },
            Expr::BinaryOp(left, op, right) => write!(f, "({} {} {})", left, op.symbol(), right),
            Expr::FunctionCall(builtin, args) => {
                write!(f, "{}(", builtin.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Spawn { x, y } => write!(f, "Spawn({}, {})", x, y),
            Stmt::Color(e) => write!(f, "Color({})", e),
            Stmt::Size(e) => write!(f, "Size({})", e),
            Stmt::DrawLine { dx, dy, dist } => write!(f, "DrawLine({}, {}, {})", dx, dy, dist),
            Stmt::DrawCircle { dx, dy, radius } => {
                write!(f, "DrawCircle({}, {}, {})", dx, dy, radius)
            }
            Stmt::DrawRectangle {
                dx,
                dy,
                dist,
                width,
                height,
            } => write!(
                f,
                "DrawRectangle({}, {}, {}, {}, {})",
                dx, dy, dist, width, height
            ),
            Stmt::Fill => write!(f, "Fill()"),
            Stmt::Assignment(name, e) => write!(f, "{} <- {}", name, e),
            Stmt::Label(name) => write!(f, "{}", name),
            Stmt::GoTo {
                label,
                condition: Some(cond),
            } => write!(f, "GoTo [{}] ({})", label, cond),
            Stmt::GoTo {
                label,
                condition: None,
            } => write!(f, "GoTo [{}]", label),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            writeln!(f, "{}", stmt)?;
        }
        Ok(())
    }
}
