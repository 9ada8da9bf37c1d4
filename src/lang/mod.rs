//! Wall-E language: lexer, parser, interpreter and canvas

pub mod ast;
pub mod builtins;
pub mod error;
pub mod graphics;
pub mod interpreter;
pub mod lexer;
pub mod operators;
pub mod parser;
pub mod runtime;
pub mod sixel;
pub mod symbols;
pub mod value;

pub use ast::{Expr, Program, Stmt};
pub use error::RuntimeError;
pub use graphics::{Canvas, PenState, PixelCanvas};
pub use interpreter::{execute, ExecutionReport, ExecutionState, Flow, Interpreter, Observer, RunOptions, RunView, YieldReason};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse_source, Parser};
pub use sixel::SixelEncoder;
pub use value::{Color, Value};
