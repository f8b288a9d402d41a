//! Structured query filters.
//!
//! A [`Filter`] names a record field, a comparison [`Operator`] and a
//! [`FilterValue`]. Before a query runs, every filter is checked and lowered
//! into a [`Predicate`], the only form the persistence adapter understands.
//!
//! Supported combinations:
//!
//! | Operator | Accepted values                                  |
//! |----------|--------------------------------------------------|
//! | `EQ`     | string, integer, long, boolean                   |
//! | `IN`     | homogeneous list of string, integer or long      |
//! | `GT`     | integer, long                                    |
//! | `LT`     | integer, long                                    |
//!
//! Filters in one query are combined with AND. There is no OR, NOT or
//! grouping.
//!
//! An `IN` filter with an empty list places no constraint on the query: it is
//! dropped, so it matches everything rather than nothing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Comparison operator of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    Eq,
    In,
    Gt,
    Lt,
}

impl Operator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "EQ",
            Operator::In => "IN",
            Operator::Gt => "GT",
            Operator::Lt => "LT",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed right-hand side of a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    String(String),
    Integer(i32),
    Long(i64),
    Boolean(bool),
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// Name of the value's type as reported in errors.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            FilterValue::String(_) => "string".into(),
            FilterValue::Integer(_) => "integer".into(),
            FilterValue::Long(_) => "long".into(),
            FilterValue::Boolean(_) => "boolean".into(),
            FilterValue::List(items) => match homogeneous_type(items) {
                Some(inner) => format!("list<{inner}>"),
                None if items.is_empty() => "list".into(),
                None => "list<mixed>".into(),
            },
        }
    }
}

fn homogeneous_type(items: &[FilterValue]) -> Option<String> {
    let first = items.first()?.type_name();
    items
        .iter()
        .skip(1)
        .all(|item| item.type_name() == first)
        .then_some(first)
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::String(s) => write!(f, "{s:?}"),
            FilterValue::Integer(i) => write!(f, "{i}"),
            FilterValue::Long(l) => write!(f, "{l}"),
            FilterValue::Boolean(b) => write!(f, "{b}"),
            FilterValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Long(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Boolean(value)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        FilterValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// A single `field op value` constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: Operator,
    pub value: FilterValue,
}

impl Filter {
    #[must_use]
    pub fn new(field: impl Into<String>, op: Operator, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    #[must_use]
    pub fn is_in(field: impl Into<String>, values: impl Into<FilterValue>) -> Self {
        Self::new(field, Operator::In, values)
    }

    #[must_use]
    pub fn gt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, Operator::Gt, value)
    }

    #[must_use]
    pub fn lt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, Operator::Lt, value)
    }

    /// Check the operator/value combination and lower it to a predicate.
    ///
    /// Returns `Ok(None)` for an `IN` filter with an empty list.
    ///
    /// # Errors
    /// [`Error::UnsupportedFilterValue`] when the value type is not accepted
    /// by the operator, [`Error::InvalidFilterField`] for an unusable field.
    pub fn to_predicate(&self) -> Result<Option<Predicate>> {
        validate_field(&self.field)?;
        let field = self.field.clone();

        let predicate = match (self.op, &self.value) {
            (Operator::Eq, FilterValue::String(s)) => Predicate::Eq {
                field,
                value: Scalar::Text(s.clone()),
            },
            (Operator::Eq, FilterValue::Integer(i)) => Predicate::Eq {
                field,
                value: Scalar::Integer(i64::from(*i)),
            },
            (Operator::Eq, FilterValue::Long(l)) => Predicate::Eq {
                field,
                value: Scalar::Integer(*l),
            },
            (Operator::Eq, FilterValue::Boolean(b)) => Predicate::Eq {
                field,
                value: Scalar::Boolean(*b),
            },
            (Operator::In, FilterValue::List(items)) => {
                if items.is_empty() {
                    return Ok(None);
                }
                if homogeneous_type(items).is_none() {
                    return Err(self.unsupported());
                }
                let values = items
                    .iter()
                    .map(|item| match item {
                        FilterValue::String(s) => Ok(Scalar::Text(s.clone())),
                        FilterValue::Integer(i) => Ok(Scalar::Integer(i64::from(*i))),
                        FilterValue::Long(l) => Ok(Scalar::Integer(*l)),
                        _ => Err(self.unsupported()),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Predicate::In { field, values }
            }
            (Operator::Gt, FilterValue::Integer(i)) => Predicate::Gt {
                field,
                bound: i64::from(*i),
            },
            (Operator::Gt, FilterValue::Long(l)) => Predicate::Gt { field, bound: *l },
            (Operator::Lt, FilterValue::Integer(i)) => Predicate::Lt {
                field,
                bound: i64::from(*i),
            },
            (Operator::Lt, FilterValue::Long(l)) => Predicate::Lt { field, bound: *l },
            _ => return Err(self.unsupported()),
        };

        Ok(Some(predicate))
    }

    fn unsupported(&self) -> Error {
        Error::UnsupportedFilterValue {
            op: self.op,
            value_type: self.value.type_name(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.value)
    }
}

/// Lower a conjunctive filter list, dropping filters that place no constraint.
///
/// # Errors
/// The first filter that fails [`Filter::to_predicate`].
pub fn compile(filters: &[Filter]) -> Result<Vec<Predicate>> {
    let mut predicates = Vec::with_capacity(filters.len());
    for filter in filters {
        if let Some(predicate) = filter.to_predicate()? {
            predicates.push(predicate);
        }
    }
    Ok(predicates)
}

/// Field names are dotted paths into the stored record; each segment must be
/// non-empty and free of quotes and backslashes.
fn validate_field(field: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidFilterField {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    if field.trim().is_empty() {
        return Err(invalid("field name is blank"));
    }
    if field.split('.').any(str::is_empty) {
        return Err(invalid("empty path segment"));
    }
    if field.contains(|c| c == '"' || c == '\\') {
        return Err(invalid("quotes and backslashes are not allowed"));
    }
    Ok(())
}

/// Comparable scalar after filter lowering. Integers and longs share one
/// 64-bit representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Boolean(bool),
}

/// A validated constraint ready for query translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Eq { field: String, value: Scalar },
    In { field: String, values: Vec<Scalar> },
    Gt { field: String, bound: i64 },
    Lt { field: String, bound: i64 },
}

impl Predicate {
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Predicate::Eq { field, .. }
            | Predicate::In { field, .. }
            | Predicate::Gt { field, .. }
            | Predicate::Lt { field, .. } => field,
        }
    }
}
