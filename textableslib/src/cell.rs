//! Cell values and the empty-cell predicate.

use serde::{Deserialize, Serialize};

use crate::format::normalize_exponent;

/// The string rendered in place of an empty cell.
pub const BLANK: &str = " ";

/// A single table cell.
///
/// Tables of estimates are mostly floats, but labels, pre-formatted strings,
/// and missing entries travel through the same grid. The untagged
/// representation maps JSON `null`, booleans, numbers, and strings directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Missing value
    #[default]
    Null,
    /// Boolean flag
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating-point value (may be NaN)
    Float(f64),
    /// Text, possibly already formatted markup
    Str(String),
}

impl Cell {
    /// Check if this cell carries no informative value.
    ///
    /// Whitespace-only strings, `Null`, and NaN floats are empty. Every other
    /// value, including booleans and infinities, is not.
    pub fn is_empty(&self) -> bool {
        is_empty_cell(self)
    }

    /// Name of the value kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Cell::Null => "null",
            Cell::Bool(_) => "bool",
            Cell::Int(_) => "int",
            Cell::Float(_) => "float",
            Cell::Str(_) => "str",
        }
    }
}

/// Classify a cell as empty.
pub fn is_empty_cell(cell: &Cell) -> bool {
    match cell {
        Cell::Str(s) => s.trim().is_empty(),
        Cell::Null => true,
        Cell::Float(v) => v.is_nan(),
        Cell::Int(_) | Cell::Bool(_) => false,
    }
}

/// Render a float the way a plain `{}` slot would: shortest round-trip
/// digits, exponent notation below `1e-4` and from `1e16` on, and a trailing
/// `.0` on integral values in fixed notation.
pub(crate) fn float_repr(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        let inf = if v.is_sign_negative() { "-inf" } else { "inf" };
        return inf.to_string();
    }

    let shortest = format!("{:e}", v);
    let exponent: i32 = shortest
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);
    if v != 0.0 && !(-4..16).contains(&exponent) {
        return match shortest.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{}", mantissa, normalize_exponent(exp)),
            None => shortest,
        };
    }

    let fixed = format!("{}", v);
    if fixed.contains('.') {
        fixed
    } else {
        format!("{}.0", fixed)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Null => write!(f, "None"),
            Cell::Bool(true) => write!(f, "True"),
            Cell::Bool(false) => write!(f, "False"),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", float_repr(*v)),
            Cell::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Str(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Str(value.to_string())
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Null, Into::into)
    }
}
