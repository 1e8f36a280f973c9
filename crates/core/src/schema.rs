//! Static table schemas and SQL renderers.
//!
//! The column order declared here is the positional contract shared by the
//! record generator (`record::user` / `record::order`) and the canned
//! endpoint SQL. Adding or removing a column requires updating all three in
//! lockstep; tests in `record` pin the widths against each other.

/// SQL dialect a statement is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

impl Dialect {
    /// Renders the positional placeholder for 1-based parameter `n`.
    pub fn placeholder(&self, n: usize) -> String {
        match self {
            Dialect::Sqlite => format!("?{n}"),
            Dialect::Postgres => format!("${n}"),
        }
    }
}

/// Column type, rendered per dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Auto-assigned integer primary key.
    Serial,
    Text,
    TextNotNull,
    TextUnique,
    Integer,
    Real,
    Boolean,
    Timestamp,
}

impl ColumnType {
    fn render(&self, dialect: Dialect) -> &'static str {
        match (self, dialect) {
            (ColumnType::Serial, Dialect::Sqlite) => "INTEGER PRIMARY KEY AUTOINCREMENT",
            (ColumnType::Serial, Dialect::Postgres) => "SERIAL PRIMARY KEY",
            (ColumnType::Text, _) => "TEXT",
            (ColumnType::TextNotNull, _) => "TEXT NOT NULL",
            (ColumnType::TextUnique, _) => "TEXT NOT NULL UNIQUE",
            (ColumnType::Integer, _) => "INTEGER",
            (ColumnType::Real, _) => "REAL",
            (ColumnType::Boolean, _) => "BOOLEAN",
            // SQLite has no timestamp affinity; values are stored as
            // `YYYY-MM-DD HH:MM:SS` text so `datetime()` comparisons work.
            (ColumnType::Timestamp, Dialect::Sqlite) => "TEXT",
            (ColumnType::Timestamp, Dialect::Postgres) => "TIMESTAMP",
        }
    }
}

/// A single column definition.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
}

const fn col(name: &'static str, ty: ColumnType) -> Column {
    Column { name, ty }
}

/// Ordered column and index definitions for one table.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
    /// `(index_name, column)` pairs for secondary indexes.
    pub indexes: &'static [(&'static str, &'static str)],
}

impl TableSchema {
    /// Insert column names, in declaration order, excluding the auto id.
    pub fn insert_columns(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .filter(|c| c.ty != ColumnType::Serial)
            .map(|c| c.name)
            .collect()
    }

    /// Number of parameters a single inserted row consumes.
    pub fn fields_per_row(&self) -> usize {
        self.insert_columns().len()
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name)
    }

    pub fn create_sql(&self, dialect: Dialect) -> String {
        let defs: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.ty.render(dialect)))
            .collect();
        format!("CREATE TABLE {} ({})", self.name, defs.join(", "))
    }

    /// Secondary index creation statements (same syntax in both dialects).
    pub fn index_sql(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|(idx, column)| format!("CREATE INDEX {idx} ON {}({column})", self.name))
            .collect()
    }

    /// Single-row insert statement with dialect placeholders.
    pub fn insert_sql(&self, dialect: Dialect) -> String {
        let cols = self.insert_columns();
        let placeholders: Vec<String> = (1..=cols.len()).map(|n| dialect.placeholder(n)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name,
            cols.join(", "),
            placeholders.join(", ")
        )
    }
}

/// The `users` table: 29 insert columns after the auto id.
pub static USERS: TableSchema = TableSchema {
    name: "users",
    columns: &[
        col("id", ColumnType::Serial),
        col("username", ColumnType::TextNotNull),
        col("email", ColumnType::TextUnique),
        col("age", ColumnType::Integer),
        col("gender", ColumnType::Text),
        col("is_active", ColumnType::Boolean),
        col("login_count", ColumnType::Integer),
        col("score", ColumnType::Real),
        col("location", ColumnType::Text),
        col("status", ColumnType::Text),
        col("created_at", ColumnType::Timestamp),
        col("last_login", ColumnType::Timestamp),
        col("settings", ColumnType::Text),
        col("preferences", ColumnType::Text),
        col("field1", ColumnType::Text),
        col("field2", ColumnType::Text),
        col("field3", ColumnType::Text),
        col("field4", ColumnType::Text),
        col("field5", ColumnType::Text),
        col("field6", ColumnType::Text),
        col("field7", ColumnType::Text),
        col("field8", ColumnType::Text),
        col("field9", ColumnType::Text),
        col("field10", ColumnType::Text),
        col("field11", ColumnType::Text),
        col("field12", ColumnType::Text),
        col("field13", ColumnType::Text),
        col("field14", ColumnType::Text),
        col("field15", ColumnType::Text),
        col("field16", ColumnType::Text),
    ],
    indexes: &[
        ("idx_users_username", "username"),
        ("idx_users_email", "email"),
        ("idx_users_age", "age"),
        ("idx_users_location", "location"),
        ("idx_users_gender", "gender"),
        ("idx_users_created_at", "created_at"),
        ("idx_users_is_active", "is_active"),
        ("idx_users_status", "status"),
        ("idx_users_login_count", "login_count"),
        ("idx_users_score", "score"),
    ],
};

/// The `orders` table: 23 insert columns after the auto id.
pub static ORDERS: TableSchema = TableSchema {
    name: "orders",
    columns: &[
        col("id", ColumnType::Serial),
        col("order_number", ColumnType::TextNotNull),
        col("user_id", ColumnType::Integer),
        col("status", ColumnType::Text),
        col("amount", ColumnType::Real),
        col("created_at", ColumnType::Timestamp),
        col("updated_at", ColumnType::Timestamp),
        col("payment_info", ColumnType::Text),
        col("field1", ColumnType::Text),
        col("field2", ColumnType::Text),
        col("field3", ColumnType::Text),
        col("field4", ColumnType::Text),
        col("field5", ColumnType::Text),
        col("field6", ColumnType::Text),
        col("field7", ColumnType::Text),
        col("field8", ColumnType::Text),
        col("field9", ColumnType::Text),
        col("field10", ColumnType::Text),
        col("field11", ColumnType::Text),
        col("field12", ColumnType::Text),
        col("field13", ColumnType::Text),
        col("field14", ColumnType::Text),
        col("field15", ColumnType::Text),
        col("field16", ColumnType::Text),
    ],
    indexes: &[
        ("idx_orders_user_id", "user_id"),
        ("idx_orders_status", "status"),
        ("idx_orders_amount", "amount"),
        ("idx_orders_created_at", "created_at"),
    ],
};

/// All benchmark tables, in reset/load order.
pub static ALL: [&TableSchema; 2] = [&USERS, &ORDERS];
