//! Binary and unary operator semantics

use crate::lang::ast::BinOp;
use crate::lang::error::RuntimeError;
use crate::lang::value::{Color, Value};

type BinaryHandler = fn(BinOp, &Value, &Value) -> Result<Value, RuntimeError>;

/// Dispatch table: operator kind → handler
fn handler(op: BinOp) -> BinaryHandler {
    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod | BinOp::Pow => arithmetic,
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => comparison,
        BinOp::Eq => equality,
        BinOp::And | BinOp::Or => logical,
    }
}

/// Apply a binary operator to two evaluated operands. The evaluator
/// short-circuits `&&`/`||` itself and only lands here for the rest.
pub fn apply_binary(op: BinOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    handler(op)(op, left, right)
}

pub fn negate(operand: &Value) -> Result<Value, RuntimeError> {
    match operand {
        Value::Int(n) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or(RuntimeError::Overflow("negation")),
        other => Err(RuntimeError::TypeMismatch(format!(
            "unary '-' cannot be applied to {}",
            other.type_name()
        ))),
    }
}

fn int_operands(op: BinOp, left: &Value, right: &Value) -> Result<(i32, i32), RuntimeError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok((*a, *b)),
        _ => Err(RuntimeError::operands(
            op.symbol(),
            left.type_name(),
            right.type_name(),
        )),
    }
}

fn arithmetic(op: BinOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let (a, b) = int_operands(op, left, right)?;
    let result = match op {
        BinOp::Add => a.checked_add(b).ok_or(RuntimeError::Overflow("addition"))?,
        BinOp::Sub => a.checked_sub(b).ok_or(RuntimeError::Overflow("subtraction"))?,
        BinOp::Mul => a.checked_mul(b).ok_or(RuntimeError::Overflow("multiplication"))?,
        BinOp::Div => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            a.checked_div(b).ok_or(RuntimeError::Overflow("division"))?
        }
        BinOp::Mod => {
            if b == 0 {
                return Err(RuntimeError::ModuloByZero);
            }
            a.checked_rem(b).ok_or(RuntimeError::Overflow("modulo"))?
        }
        BinOp::Pow => power(a, b)?,
        _ => {
            return Err(RuntimeError::Internal(format!(
                "'{}' is not an arithmetic operator",
                op.symbol()
            )))
        }
    };
    Ok(Value::Int(result))
}

/// Integer power. Negative exponents truncate the fractional result toward
/// zero, so only bases 1 and -1 survive; `0 ** -n` has no value.
pub fn power(base: i32, exponent: i32) -> Result<i32, RuntimeError> {
    if exponent < 0 {
        return match base {
            0 => Err(RuntimeError::DivisionByZero),
            1 => Ok(1),
            -1 => Ok(if exponent % 2 == 0 { 1 } else { -1 }),
            _ => Ok(0),
        };
    }
    base.checked_pow(exponent.unsigned_abs())
        .ok_or(RuntimeError::Overflow("power"))
}

fn comparison(op: BinOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let (a, b) = int_operands(op, left, right)?;
    let result = match op {
        BinOp::Lt => a < b,
        BinOp::Le => a <= b,
        BinOp::Gt => a > b,
        BinOp::Ge => a >= b,
        _ => {
            return Err(RuntimeError::Internal(format!(
                "'{}' is not a comparison operator",
                op.symbol()
            )))
        }
    };
    Ok(Value::Bool(result))
}

fn equality(_op: BinOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    values_equal(left, right).map(Value::Bool)
}

/// `==` semantics
pub fn values_equal(left: &Value, right: &Value) -> Result<bool, RuntimeError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(a == b),
        (Value::Text(a), Value::Text(b)) => Ok(a.to_lowercase() == b.to_lowercase()),
        (Value::Color(a), Value::Color(b)) => Ok(a == b),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::Bool(b), other) | (other, Value::Bool(b)) => Ok(other.truthy()? == *b),
        (Value::Color(c), Value::Text(name)) | (Value::Text(name), Value::Color(c)) => {
            let named = Color::from_name(name).ok_or_else(|| RuntimeError::UnknownColor(name.clone()))?;
            Ok(named == *c)
        }
        _ => Err(RuntimeError::operands(
            "==",
            left.type_name(),
            right.type_name(),
        )),
    }
}

fn logical(op: BinOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let (a, b) = (left.truthy()?, right.truthy()?);
    match op {
        BinOp::And => Ok(Value::Bool(a && b)),
        BinOp::Or => Ok(Value::Bool(a || b)),
        _ => Err(RuntimeError::Internal(format!(
            "'{}' is not a logical operator",
            op.symbol()
        ))),
    }
}
