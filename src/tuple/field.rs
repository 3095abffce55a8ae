use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;

use super::schema::Type;
use crate::common::StringLen;
use crate::error::{Error, Result};

/// Comparison operators a [`Field`] can be evaluated with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEq,
    GreaterThan,
    GreaterThanOrEq,
    Like,
}

impl FromStr for CompareOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "=" => Ok(CompareOp::Equals),
            "<>" | "!=" => Ok(CompareOp::NotEquals),
            "<" => Ok(CompareOp::LessThan),
            "<=" => Ok(CompareOp::LessThanOrEq),
            ">" => Ok(CompareOp::GreaterThan),
            ">=" => Ok(CompareOp::GreaterThanOrEq),
            op if op.eq_ignore_ascii_case("like") => Ok(CompareOp::Like),
            op => Err(Error::InvalidValue {
                text: op.to_owned(),
                expected: "comparison operator".to_owned(),
            }),
        }
    }
}

impl Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            CompareOp::Equals => "=",
            CompareOp::NotEquals => "<>",
            CompareOp::LessThan => "<",
            CompareOp::LessThanOrEq => "<=",
            CompareOp::GreaterThan => ">",
            CompareOp::GreaterThanOrEq => ">=",
            CompareOp::Like => "LIKE",
        };
        write!(f, "{}", op)
    }
}

/// A typed value stored in one slot of a tuple. Fields are immutable; a tuple
/// replaces a value by storing a new field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Int(i32),
    String { value: String, max_len: StringLen },
}

impl Field {
    /// Fails with [`Error::ValueTooLong`] if `value` is longer than `max_len` bytes.
    /// Tabs and line breaks are rejected since they separate rendered fields and rows.
    pub fn string(value: impl Into<String>, max_len: StringLen) -> Result<Self> {
        let value = value.into();
        if value.len() > max_len as usize {
            return Err(Error::ValueTooLong {
                len: value.len(),
                max_len: max_len as usize,
            });
        }
        if value.contains(['\t', '\n', '\r']) {
            return Err(Error::InvalidValue {
                text: value,
                expected: "string without tabs or line breaks".to_owned(),
            });
        }
        Ok(Field::String { value, max_len })
    }

    /// Parses the textual form of a value of the given type.
    pub fn parse(text: &str, field_type: &Type) -> Result<Self> {
        match field_type {
            Type::Int => text
                .trim()
                .parse::<i32>()
                .map(Field::Int)
                .map_err(|_| Error::InvalidValue {
                    text: text.to_owned(),
                    expected: field_type.to_string(),
                }),
            Type::String(max_len) => Field::string(text, *max_len),
        }
    }

    pub fn type_of(&self) -> Type {
        match self {
            Field::Int(_) => Type::Int,
            Field::String { max_len, .. } => Type::String(*max_len),
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Field::Int(val) => Some(*val),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::String { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Evaluates `self op other`. Integers compare numerically, strings
    /// lexicographically. `Like` means containment for strings and equality
    /// for integers.
    pub fn compare(&self, op: CompareOp, other: &Field) -> Result<bool> {
        match (self, other) {
            (Field::Int(left), Field::Int(right)) => {
                Ok(evaluate(op, left.cmp(right), left == right))
            }
            (Field::String { value: left, .. }, Field::String { value: right, .. }) => Ok(
                evaluate(op, left.cmp(right), left.contains(right.as_str())),
            ),
            _ => Err(Error::Incomparable {
                left: self.type_of(),
                right: other.type_of(),
            }),
        }
    }
}

fn evaluate(op: CompareOp, ordering: Ordering, like: bool) -> bool {
    match op {
        CompareOp::Equals => ordering == Ordering::Equal,
        CompareOp::NotEquals => ordering != Ordering::Equal,
        CompareOp::LessThan => ordering == Ordering::Less,
        CompareOp::LessThanOrEq => ordering != Ordering::Greater,
        CompareOp::GreaterThan => ordering == Ordering::Greater,
        CompareOp::GreaterThanOrEq => ordering != Ordering::Less,
        CompareOp::Like => like,
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Int(val) => write!(f, "{}", val),
            Field::String { value, .. } => write!(f, "{}", value),
        }
    }
}
