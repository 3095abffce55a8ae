use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use log::trace;

use crate::common::{StringLen, CHAR_WIDTH, DEFAULT_STRING_LEN, INT_LEN};
use crate::error::{Error, Result};

/// Storage kind of a column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    /// A string column holding at most the given number of bytes.
    String(StringLen),
}

impl Type {
    /// Fixed number of bytes a value of this type occupies in a row,
    /// independent of the value actually stored.
    pub fn byte_len(&self) -> usize {
        match self {
            Type::Int => INT_LEN,
            Type::String(max_len) => *max_len as usize * CHAR_WIDTH,
        }
    }
}

impl FromStr for Type {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidValue {
            text: s.to_owned(),
            expected: "column type".to_owned(),
        };

        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "int" | "integer" => Ok(Type::Int),
            "string" | "text" => Ok(Type::String(DEFAULT_STRING_LEN)),
            _ => {
                let inner = lower
                    .strip_prefix("string(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .ok_or_else(invalid)?;
                let max_len = inner
                    .trim()
                    .parse::<StringLen>()
                    .map_err(|_| invalid())?;
                Ok(Type::String(max_len))
            }
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::String(max_len) => write!(f, "string({})", max_len),
        }
    }
}

/// A single (type, name) column entry. Anonymous columns have an empty name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TDItem {
    field_type: Type,
    field_name: String,
}

impl TDItem {
    pub fn new(field_type: Type, field_name: String) -> Self {
        Self {
            field_type,
            field_name,
        }
    }

    pub fn field_type(&self) -> Type {
        self.field_type
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }
}

impl Display for TDItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.field_type, self.field_name)
    }
}

/// The schema of a relation: an ordered, non-empty list of typed columns.
///
/// A `TupleDesc` is never mutated once built. Operations that derive a new
/// schema (merge, projection, prefixing) return a fresh instance, so a single
/// descriptor can be shared by every row of a relation and read from many
/// threads without synchronization.
///
/// Two descriptors are equal when they have the same number of fields and the
/// same type at every position. Names take no part in equality or hashing.
#[derive(Clone, Debug)]
pub struct TupleDesc {
    items: Vec<TDItem>,
}

impl TupleDesc {
    /// Creates a schema with named columns. `names` must have one entry per type.
    pub fn new<S: Into<String>>(types: Vec<Type>, names: Vec<S>) -> Result<Self> {
        if types.len() != names.len() {
            return Err(Error::Schema(format!(
                "got {} types but {} names",
                types.len(),
                names.len()
            )));
        }
        let items = types
            .into_iter()
            .zip(names)
            .map(|(field_type, name)| TDItem::new(field_type, name.into()))
            .collect();
        Self::from_items(items)
    }

    /// Creates a schema whose columns are all anonymous.
    pub fn unnamed(types: Vec<Type>) -> Result<Self> {
        let items = types
            .into_iter()
            .map(|field_type| TDItem::new(field_type, String::new()))
            .collect();
        Self::from_items(items)
    }

    /// A schema with a single column. Always valid, so it cannot fail.
    pub fn single(field_type: Type, name: impl Into<String>) -> Self {
        Self {
            items: vec![TDItem::new(field_type, name.into())],
        }
    }

    pub fn from_items(items: Vec<TDItem>) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::Schema("a schema needs at least one field".to_owned()));
        }
        let this = Self { items };
        trace!("Created schema [{}]", this);
        Ok(this)
    }

    pub fn num_fields(&self) -> usize {
        self.items.len()
    }

    pub fn field_name(&self, i: usize) -> Result<&str> {
        self.item(i).map(|item| item.field_name())
    }

    pub fn field_type(&self, i: usize) -> Result<Type> {
        self.item(i).map(|item| item.field_type())
    }

    pub fn item(&self, i: usize) -> Result<&TDItem> {
        self.items.get(i).ok_or(Error::IndexOutOfRange {
            index: i,
            len: self.items.len(),
        })
    }

    /// Index of the first field named `name`.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.items
            .iter()
            .position(|item| item.field_name() == name)
            .ok_or_else(|| Error::NotFound(name.to_owned()))
    }

    /// Size in bytes of a row of this schema. Depends on the column types only.
    /// Column widths are bounded by `StringLen`, so the sum cannot overflow.
    pub fn byte_size(&self) -> usize {
        self.items.iter().map(|item| item.field_type.byte_len()).sum()
    }

    /// Columns of `first` followed by the columns of `second`.
    pub fn merge(first: &TupleDesc, second: &TupleDesc) -> TupleDesc {
        let items = first
            .items
            .iter()
            .chain(second.items.iter())
            .cloned()
            .collect();
        Self { items }
    }

    /// A new schema made of the given columns, in the given order.
    pub fn project(&self, indices: &[usize]) -> Result<TupleDesc> {
        let items = indices
            .iter()
            .map(|&i| self.item(i).cloned())
            .collect::<Result<Vec<_>>>()?;
        Self::from_items(items)
    }

    /// Qualifies every field name, e.g. 'id' becomes 'tbl.id' for prefix 'tbl'.
    /// Anonymous fields become 'tbl.'.
    pub fn with_prefix(&self, prefix: &str) -> TupleDesc {
        let items = self
            .items
            .iter()
            .map(|item| TDItem::new(item.field_type, format!("{}.{}", prefix, item.field_name)))
            .collect();
        Self { items }
    }

    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        self.items.iter().map(|item| item.field_type)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TDItem> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a TupleDesc {
    type Item = &'a TDItem;
    type IntoIter = std::slice::Iter<'a, TDItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for TupleDesc {
    fn eq(&self, other: &Self) -> bool {
        self.num_fields() == other.num_fields() && self.types().eq(other.types())
    }
}

impl Eq for TupleDesc {}

impl Hash for TupleDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.num_fields().hash(state);
        for field_type in self.types() {
            field_type.hash(state);
        }
    }
}

impl Display for TupleDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let items = self
            .items
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "{}", items)
    }
}
