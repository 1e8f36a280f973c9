//! Pooled PostgreSQL adapter.
//!
//! Each operation checks a connection out of a fixed-size `sqlx` pool and
//! returns it afterwards. The pool is built lazily so an unreachable server
//! surfaces as per-request errors instead of failing startup. Bulk load
//! issues sequential awaited batch statements with no cross-batch
//! transaction, so a mid-load failure leaves a partially loaded table.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use dbbench_core::{
    schema, Backend, BackendError, BatchInsert, Dialect, ExecResult, Record, Result, TableSchema,
    Value,
};
use serde_json::{json, Value as JsonValue};
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{Column, PgPool, Postgres, Row, TypeInfo};

use crate::config::Config;

fn query_err(e: sqlx::Error) -> BackendError {
    BackendError::Query(e.to_string())
}

/// Binds one core value onto a sqlx query.
fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Int(v) => query.bind(v),
        Value::Real(v) => query.bind(v),
        Value::Text(v) => query.bind(v),
        Value::Bool(v) => query.bind(v),
        Value::Timestamp(v) => query.bind(v),
    }
}

/// Decodes one row into a JSON object keyed by column name, switching on
/// the wire type reported by the server.
fn row_to_json(row: &PgRow) -> std::result::Result<JsonValue, sqlx::Error> {
    let mut object = serde_json::Map::new();
    for (i, column) in row.columns().iter().enumerate() {
        let value = match column.type_info().name() {
            "INT2" => row
                .try_get::<Option<i16>, _>(i)?
                .map_or(JsonValue::Null, |v| json!(v)),
            "INT4" => row
                .try_get::<Option<i32>, _>(i)?
                .map_or(JsonValue::Null, |v| json!(v)),
            "INT8" => row
                .try_get::<Option<i64>, _>(i)?
                .map_or(JsonValue::Null, |v| json!(v)),
            "FLOAT4" => row
                .try_get::<Option<f32>, _>(i)?
                .map_or(JsonValue::Null, |v| json!(v)),
            "FLOAT8" => row
                .try_get::<Option<f64>, _>(i)?
                .map_or(JsonValue::Null, |v| json!(v)),
            "BOOL" => row
                .try_get::<Option<bool>, _>(i)?
                .map_or(JsonValue::Null, |v| json!(v)),
            "TIMESTAMP" => row
                .try_get::<Option<NaiveDateTime>, _>(i)?
                .map_or(JsonValue::Null, |v| json!(v.to_string())),
            "TIMESTAMPTZ" => row
                .try_get::<Option<DateTime<Utc>>, _>(i)?
                .map_or(JsonValue::Null, |v| json!(v.to_rfc3339())),
            _ => row
                .try_get::<Option<String>, _>(i)?
                .map_or(JsonValue::Null, |v| json!(v)),
        };
        object.insert(column.name().to_string(), value);
    }
    Ok(JsonValue::Object(object))
}

/// Pooled PostgreSQL backend, mounted under `/postgres`.
pub struct PostgresBackend {
    pool: PgPool,
    max_parameters: usize,
}

impl PostgresBackend {
    /// Builds the pool without connecting; the first checkout dials out.
    pub fn connect_lazy(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pg_max_connections)
            .idle_timeout(config.pg_idle_timeout())
            .acquire_timeout(config.pg_acquire_timeout())
            .connect_lazy(&config.postgres_url)
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        Ok(Self {
            pool,
            max_parameters: config.pg_max_parameters,
        })
    }
}

#[async_trait]
impl Backend for PostgresBackend {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn reset_schema(&self) -> Result<()> {
        for table in schema::ALL {
            sqlx::query(&table.drop_sql())
                .execute(&self.pool)
                .await
                .map_err(query_err)?;
            sqlx::query(&table.create_sql(Dialect::Postgres))
                .execute(&self.pool)
                .await
                .map_err(query_err)?;
            for stmt in table.index_sql() {
                sqlx::query(&stmt)
                    .execute(&self.pool)
                    .await
                    .map_err(query_err)?;
            }
        }
        Ok(())
    }

    async fn bulk_load(&self, table: &'static TableSchema, records: Vec<Record>) -> Result<usize> {
        let plan = BatchInsert::new(table, Dialect::Postgres, self.max_parameters)?;
        let mut loaded = 0;
        for batch in plan.batches(records)? {
            let dbbench_core::Batch { sql, params, rows } = batch;
            let mut query = sqlx::query(&sql);
            for value in params {
                query = bind_value(query, value);
            }
            query.execute(&self.pool).await.map_err(query_err)?;
            loaded += rows;
        }
        Ok(loaded)
    }

    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<Vec<JsonValue>> {
        let mut query = sqlx::query(sql);
        for value in params {
            query = bind_value(query, value);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(query_err)?;
        rows.iter()
            .map(row_to_json)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(query_err)
    }

    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<ExecResult> {
        let mut query = sqlx::query(sql);
        for value in params {
            query = bind_value(query, value);
        }
        // Statements ending in `RETURNING id` yield a row; plain writes
        // yield none.
        let row = query.fetch_optional(&self.pool).await.map_err(query_err)?;
        let last_insert_id = row
            .as_ref()
            .and_then(|r| r.try_get::<i32, _>("id").ok())
            .map(i64::from);
        Ok(ExecResult { last_insert_id })
    }
}
