//! Positional parameter values shared by the generator, the batch builder,
//! and the backend adapters.

use chrono::NaiveDateTime;

/// A single SQL parameter value.
///
/// Adapters convert these into their driver's native parameter type
/// (e.g. `rusqlite::types::Value` or sqlx binds).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Timestamp(NaiveDateTime),
}

/// One generated row, in schema insert-column order (the auto id excluded).
pub type Record = Vec<Value>;

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}
