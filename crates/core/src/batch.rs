//! Typed batch-insert builder.
//!
//! Partitions a record set into multi-row INSERT statements sized to a
//! per-backend positional-parameter ceiling, computing placeholder offsets
//! internally instead of leaving that arithmetic to callers.

use thiserror::Error;

use crate::schema::{Dialect, TableSchema};
use crate::value::{Record, Value};

/// Errors produced while planning a batch load.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("table {table}: a single row needs {fields} parameters but the backend allows {max_parameters}")]
    TooManyFields {
        table: &'static str,
        fields: usize,
        max_parameters: usize,
    },
    #[error("table {table}: record {index} has {got} values, schema expects {expected}")]
    ColumnCountMismatch {
        table: &'static str,
        index: usize,
        expected: usize,
        got: usize,
    },
}

/// One executable batch: a multi-row INSERT and its flattened parameters.
#[derive(Debug)]
pub struct Batch {
    pub sql: String,
    pub params: Vec<Value>,
    pub rows: usize,
}

/// Plans batched inserts for one table against one backend.
#[derive(Debug, Clone, Copy)]
pub struct BatchInsert {
    table: &'static TableSchema,
    dialect: Dialect,
    rows_per_batch: usize,
}

impl BatchInsert {
    /// Builds a planner, rejecting schemas whose single-row width already
    /// exceeds the backend's parameter ceiling.
    pub fn new(
        table: &'static TableSchema,
        dialect: Dialect,
        max_parameters: usize,
    ) -> Result<Self, BatchError> {
        let fields = table.fields_per_row();
        let rows_per_batch = max_parameters / fields;
        if rows_per_batch == 0 {
            return Err(BatchError::TooManyFields {
                table: table.name,
                fields,
                max_parameters,
            });
        }
        Ok(Self {
            table,
            dialect,
            rows_per_batch,
        })
    }

    /// Rows each batch holds: `floor(max_parameters / fields_per_row)`.
    pub fn rows_per_batch(&self) -> usize {
        self.rows_per_batch
    }

    /// Splits `records` into executable batches, preserving order.
    pub fn batches(&self, records: Vec<Record>) -> Result<Vec<Batch>, BatchError> {
        let fields = self.table.fields_per_row();
        for (index, record) in records.iter().enumerate() {
            if record.len() != fields {
                return Err(BatchError::ColumnCountMismatch {
                    table: self.table.name,
                    index,
                    expected: fields,
                    got: record.len(),
                });
            }
        }

        let mut batches = Vec::with_capacity(records.len().div_ceil(self.rows_per_batch).max(1));
        let mut remaining = records;
        while !remaining.is_empty() {
            let split_at = remaining.len().min(self.rows_per_batch);
            let rest = remaining.split_off(split_at);
            let chunk = std::mem::replace(&mut remaining, rest);

            let rows = chunk.len();
            let params: Vec<Value> = chunk.into_iter().flatten().collect();
            batches.push(Batch {
                sql: self.insert_sql(rows),
                params,
                rows,
            });
        }
        Ok(batches)
    }

    /// Multi-row INSERT with placeholder offsets computed per row.
    fn insert_sql(&self, rows: usize) -> String {
        let cols = self.table.insert_columns();
        let fields = cols.len();
        let groups: Vec<String> = (0..rows)
            .map(|row| {
                let offset = row * fields;
                let placeholders: Vec<String> = (1..=fields)
                    .map(|col| self.dialect.placeholder(offset + col))
                    .collect();
                format!("({})", placeholders.join(", "))
            })
            .collect();
        format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.table.name,
            cols.join(", "),
            groups.join(", ")
        )
    }
}
