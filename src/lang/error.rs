//! Runtime error taxonomy

use thiserror::Error;

/// A fatal error raised while executing a program.
///
/// Lexical and syntax problems never reach this type; they are collected as
/// plain diagnostics by the lexer and parser.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Modulo by zero")]
    ModuloByZero,

    #[error("Integer overflow in {0}")]
    Overflow(&'static str),

    #[error("Variable '{0}' is not defined")]
    UndefinedVariable(String),

    #[error("Label '{0}' does not exist")]
    UnknownLabel(String),

    #[error("Duplicate label definition for '{0}'")]
    DuplicateLabel(String),

    #[error("Unknown color '{0}'")]
    UnknownColor(String),

    #[error("{function} expects {expected} argument(s), got {got}")]
    ArgumentCount {
        function: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("The first statement of a program must be Spawn")]
    MissingSpawn,

    #[error("Wall-E has already been spawned")]
    AlreadySpawned,

    #[error("Wall-E has not been spawned")]
    NotSpawned,

    #[error("Position ({x}, {y}) is outside the canvas (size {size})")]
    OutOfCanvas { x: i32, y: i32, size: i32 },

    #[error("Step limit of {0} statements exceeded")]
    StepLimit(usize),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RuntimeError {
    /// Type mismatch for an operator applied to operand type names.
    pub fn operands(op: &str, left: &str, right: &str) -> Self {
        RuntimeError::TypeMismatch(format!(
            "operator '{}' cannot be applied to {} and {}",
            op, left, right
        ))
    }
}
