use chrono::{DateTime, Utc};

/// A literal operand in a filter expression.
///
/// Record identifiers travel as `String`; coercion to the store's native
/// identifier type happens during translation, never here.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    DateTime(DateTime<Utc>),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}
impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

/// A filter expression tree.
///
/// The variant is decided when the query is built, so the store layer never
/// has to sniff shapes at run time. Composition is structure-preserving:
/// translation maps each node onto exactly one native boolean clause.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Field equals the literal value.
    Eq(String, Value),
    /// Field is a member of the value set.
    In(String, Vec<Value>),
    /// Field differs from the literal value.
    Ne(String, Value),
    /// Every child matches.
    And(Vec<Filter>),
    /// At least one child matches.
    Or(Vec<Filter>),
    /// None of the children match. This stays "none of" even with a single
    /// child; it is not plain negation.
    Not(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ne(field.into(), value.into())
    }

    pub fn is_in<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Filter::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn and(children: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(children.into_iter().collect())
    }

    pub fn none_of(children: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Not(children.into_iter().collect())
    }
}
