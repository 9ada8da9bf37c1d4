//! Runtime values and the named-color palette

use std::fmt;

use crate::lang::error::RuntimeError;

/// The colors a Wall-E program can name
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Orange,
    Purple,
    Black,
    White,
    Transparent,
}

/// Name and RGBA for every color, in palette order
const COLOR_TABLE: [(Color, &str, [u8; 4]); 9] = [
    (Color::Red, "red", [255, 0, 0, 255]),
    (Color::Blue, "blue", [0, 0, 255, 255]),
    (Color::Green, "green", [0, 128, 0, 255]),
    (Color::Yellow, "yellow", [255, 255, 0, 255]),
    (Color::Orange, "orange", [255, 165, 0, 255]),
    (Color::Purple, "purple", [128, 0, 128, 255]),
    (Color::Black, "black", [0, 0, 0, 255]),
    (Color::White, "white", [255, 255, 255, 255]),
    (Color::Transparent, "transparent", [255, 255, 255, 0]),
];

impl Color {
    pub const ALL: [Color; 9] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Orange,
        Color::Purple,
        Color::Black,
        Color::White,
        Color::Transparent,
    ];

    /// Look up a color by name, ignoring case and surrounding blanks
    pub fn from_name(name: &str) -> Option<Color> {
        let wanted = name.trim();
        COLOR_TABLE
            .iter()
            .find(|(_, n, _)| n.eq_ignore_ascii_case(wanted))
            .map(|(c, _, _)| *c)
    }

    pub fn name(&self) -> &'static str {
        COLOR_TABLE[self.index()].1
    }

    pub fn rgba(&self) -> [u8; 4] {
        COLOR_TABLE[self.index()].2
    }

    /// Position in the palette (stable, used by the sixel encoder)
    pub fn index(&self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
            Color::Green => 2,
            Color::Yellow => 3,
            Color::Orange => 4,
            Color::Purple => 5,
            Color::Black => 6,
            Color::White => 7,
            Color::Transparent => 8,
        }
    }

    pub fn is_transparent(&self) -> bool {
        *self == Color::Transparent
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime value
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i32),
    Bool(bool),
    Text(String),
    Color(Color),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Bool(_) => "boolean",
            Value::Text(_) => "text",
            Value::Color(_) => "color",
        }
    }

    /// Boolean coercion used by `&&`, `||`, `==` against a boolean, and GoTo
    pub fn truthy(&self) -> Result<bool, RuntimeError> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Int(n) => Ok(*n != 0),
            Value::Text(s) => Ok(!s.is_empty()),
            Value::Color(_) => Err(RuntimeError::TypeMismatch(
                "a color cannot be used as a boolean".to_string(),
            )),
        }
    }

    /// Require an integer, naming what the value was for in the error
    pub fn expect_int(&self, what: &str) -> Result<i32, RuntimeError> {
        match self {
            Value::Int(n) => Ok(*n),
            other => Err(RuntimeError::TypeMismatch(format!(
                "{} must be an integer, got {}",
                what,
                other.type_name()
            ))),
        }
    }

    /// Require text, naming what the value was for in the error
    pub fn expect_text(&self, what: &str) -> Result<&str, RuntimeError> {
        match self {
            Value::Text(s) => Ok(s),
            other => Err(RuntimeError::TypeMismatch(format!(
                "{} must be text, got {}",
                what,
                other.type_name()
            ))),
        }
    }

    /// Resolve a text or color value to a palette color
    pub fn to_color(&self, what: &str) -> Result<Color, RuntimeError> {
        match self {
            Value::Color(c) => Ok(*c),
            Value::Text(s) => Color::from_name(s).ok_or_else(|| RuntimeError::UnknownColor(s.clone())),
            other => Err(RuntimeError::TypeMismatch(format!(
                "{} must be a color name, got {}",
                what,
                other.type_name()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "\"{}\"", s),
            Value::Color(c) => write!(f, "{}", c),
        }
    }
}
