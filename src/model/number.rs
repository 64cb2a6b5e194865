//! Numeric values taken from value cells and filter tokens

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::table::CellValue;

/// A finite integer or floating point number
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Read a number out of a cell. Nulls, non-numeric cells and
    /// non-finite floats yield `None`.
    pub fn from_cell(cell: &CellValue) -> Option<Self> {
        match cell {
            CellValue::Int(i) => Some(Number::Int(*i)),
            CellValue::Float(f) if f.is_finite() => Some(Number::Float(*f)),
            _ => None,
        }
    }

    /// Parse a filter token: integer when the token has no decimal point,
    /// float otherwise.
    pub fn parse_token(token: &str) -> Option<Self> {
        if token.contains('.') {
            token
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Number::Float)
        } else {
            token.parse::<i64>().ok().map(Number::Int)
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    /// `self - other`, staying integral when both sides are integers and the
    /// result fits. `None` when the float result overflows to infinity.
    pub fn minus(self, other: Number) -> Option<Number> {
        let diff = match (self, other) {
            (Number::Int(a), Number::Int(b)) => match a.checked_sub(b) {
                Some(d) => return Some(Number::Int(d)),
                None => a as f64 - b as f64,
            },
            (a, b) => a.as_f64() - b.as_f64(),
        };
        diff.is_finite().then_some(Number::Float(diff))
    }

    pub fn sign(self) -> Sign {
        match self {
            Number::Int(i) => match i.cmp(&0) {
                Ordering::Greater => Sign::Positive,
                Ordering::Less => Sign::Negative,
                Ordering::Equal => Sign::Zero,
            },
            Number::Float(f) if f > 0.0 => Sign::Positive,
            Number::Float(f) if f < 0.0 => Sign::Negative,
            Number::Float(_) => Sign::Zero,
        }
    }

    /// Total order used to rank diffs
    pub fn total_cmp(&self, other: &Number) -> Ordering {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a.cmp(b),
            (a, b) => a.as_f64().total_cmp(&b.as_f64()),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

/// Sign category of a diff, used to color charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Positive,
    Negative,
    Zero,
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sign::Positive => write!(f, "positive"),
            Sign::Negative => write!(f, "negative"),
            Sign::Zero => write!(f, "zero"),
        }
    }
}
