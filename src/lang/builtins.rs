//! Built-in functions

use crate::lang::ast::Builtin;
use crate::lang::error::RuntimeError;
use crate::lang::graphics::{count_color, Canvas, PenState};
use crate::lang::value::Value;

/// Call a built-in with already evaluated arguments
pub fn call(builtin: Builtin, args: &[Value], canvas: &dyn Canvas, pen: &PenState) -> Result<Value, RuntimeError> {
    if args.len() != builtin.arity() {
        return Err(RuntimeError::ArgumentCount {
            function: builtin.name(),
            expected: builtin.arity(),
            got: args.len(),
        });
    }

    match builtin {
        Builtin::GetActualX => Ok(Value::Int(pen.x)),
        Builtin::GetActualY => Ok(Value::Int(pen.y)),
        Builtin::GetCanvasSize => Ok(Value::Int(canvas.size())),
        Builtin::IsBrushColor => {
            let color = args[0].to_color("IsBrushColor color")?;
            Ok(flag(pen.brush_color == color))
        }
        Builtin::IsBrushSize => {
            let size = args[0].expect_int("IsBrushSize size")?;
            Ok(flag(pen.brush_size == size))
        }
        Builtin::IsCanvasColor => is_canvas_color(args, canvas, pen),
        Builtin::GetColorCount => get_color_count(args, canvas),
    }
}

fn flag(b: bool) -> Value {
    Value::Int(if b { 1 } else { 0 })
}

/// IsCanvasColor(color, dy, dx): 1 when the pixel at the pen offset by
/// (dx, dy) has that color, 0 otherwise or when off the canvas
fn is_canvas_color(args: &[Value], canvas: &dyn Canvas, pen: &PenState) -> Result<Value, RuntimeError> {
    let color = args[0].to_color("IsCanvasColor color")?;
    let dy = args[1].expect_int("IsCanvasColor vertical offset")?;
    let dx = args[2].expect_int("IsCanvasColor horizontal offset")?;

    let x = pen.x.checked_add(dx).ok_or(RuntimeError::Overflow("IsCanvasColor"))?;
    let y = pen.y.checked_add(dy).ok_or(RuntimeError::Overflow("IsCanvasColor"))?;
    if !canvas.contains(x, y) {
        return Ok(flag(false));
    }
    Ok(flag(canvas.get_pixel(x, y) == color))
}

/// GetColorCount(color, x1, y1, x2, y2). Both corners must be on the canvas.
fn get_color_count(args: &[Value], canvas: &dyn Canvas) -> Result<Value, RuntimeError> {
    let color = args[0].to_color("GetColorCount color")?;
    let x1 = args[1].expect_int("GetColorCount x1")?;
    let y1 = args[2].expect_int("GetColorCount y1")?;
    let x2 = args[3].expect_int("GetColorCount x2")?;
    let y2 = args[4].expect_int("GetColorCount y2")?;

    for (x, y) in [(x1, y1), (x2, y2)] {
        if !canvas.contains(x, y) {
            return Err(RuntimeError::OutOfCanvas {
                x,
                y,
                size: canvas.size(),
            });
        }
    }

    let count = count_color(canvas, color, (x1, y1), (x2, y2));
    let count = i32::try_from(count).map_err(|_| RuntimeError::Overflow("GetColorCount"))?;
    Ok(Value::Int(count))
}
