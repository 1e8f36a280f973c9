//! Conversions between core values, rusqlite parameters, and JSON rows.
//!
//! Shared by the synchronous and queued SQLite adapters.

use dbbench_core::Value;
use rusqlite::types::ValueRef;
use serde_json::{json, Value as JsonValue};

/// Converts a core value into an owned rusqlite parameter.
///
/// Booleans become 0/1 integers and timestamps become
/// `YYYY-MM-DD HH:MM:SS` text, so they compare correctly against
/// `datetime('now', ...)` in canned SQL.
pub fn to_sqlite(value: Value) -> rusqlite::types::Value {
    match value {
        Value::Int(v) => rusqlite::types::Value::Integer(v),
        Value::Real(v) => rusqlite::types::Value::Real(v),
        Value::Text(v) => rusqlite::types::Value::Text(v),
        Value::Bool(v) => rusqlite::types::Value::Integer(i64::from(v)),
        Value::Timestamp(v) => {
            rusqlite::types::Value::Text(v.format("%Y-%m-%d %H:%M:%S").to_string())
        }
    }
}

/// Converts one SQLite column value to JSON.
pub fn column_to_json(value: ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(v) => json!(v),
        ValueRef::Real(v) => json!(v),
        ValueRef::Text(v) => json!(String::from_utf8_lossy(v)),
        ValueRef::Blob(v) => json!(String::from_utf8_lossy(v)),
    }
}

/// Runs a parameterized SELECT, returning rows as JSON objects keyed by
/// column name.
pub fn run_query(
    conn: &rusqlite::Connection,
    sql: &str,
    params: Vec<Value>,
) -> rusqlite::Result<Vec<JsonValue>> {
    let mut stmt = conn.prepare(sql)?;
    let column_names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();

    let mut rows = stmt.query(rusqlite::params_from_iter(
        params.into_iter().map(to_sqlite),
    ))?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut object = serde_json::Map::new();
        for (i, name) in column_names.iter().enumerate() {
            object.insert(name.clone(), column_to_json(row.get_ref(i)?));
        }
        out.push(JsonValue::Object(object));
    }
    Ok(out)
}

/// Runs a single parameterized write, returning the last inserted rowid.
pub fn run_execute(
    conn: &rusqlite::Connection,
    sql: &str,
    params: Vec<Value>,
) -> rusqlite::Result<i64> {
    conn.execute(
        sql,
        rusqlite::params_from_iter(params.into_iter().map(to_sqlite)),
    )?;
    Ok(conn.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_to_sqlite_conversions() {
        assert_eq!(
            to_sqlite(Value::Bool(true)),
            rusqlite::types::Value::Integer(1)
        );
        assert_eq!(
            to_sqlite(Value::Bool(false)),
            rusqlite::types::Value::Integer(0)
        );

        let ts = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(
            to_sqlite(Value::Timestamp(ts)),
            rusqlite::types::Value::Text("2024-06-15 09:30:00".to_string())
        );
    }

    #[test]
    fn test_run_query_maps_columns_to_json() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let rows = run_query(
            &conn,
            "SELECT 1 AS n, 'hello' AS s, 2.5 AS r, NULL AS missing",
            Vec::new(),
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["n"], json!(1));
        assert_eq!(rows[0]["s"], json!("hello"));
        assert_eq!(rows[0]["r"], json!(2.5));
        assert_eq!(rows[0]["missing"], JsonValue::Null);
    }

    #[test]
    fn test_run_execute_reports_rowid() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, v TEXT)")
            .unwrap();

        let id = run_execute(
            &conn,
            "INSERT INTO t (v) VALUES (?1)",
            vec![Value::Text("a".to_string())],
        )
        .unwrap();
        assert_eq!(id, 1);

        let id = run_execute(
            &conn,
            "INSERT INTO t (v) VALUES (?1)",
            vec![Value::Text("b".to_string())],
        )
        .unwrap();
        assert_eq!(id, 2);
    }
}
