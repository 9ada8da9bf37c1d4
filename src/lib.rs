//! Interpreter for Wall-E, a small language that drives a robot painting
//! on a square pixel canvas.

pub mod lang;

pub use lang::{
    execute, parse_source, Canvas, Color, ExecutionReport, ExecutionState, Interpreter, PenState,
    PixelCanvas, Program, RunOptions,
};
