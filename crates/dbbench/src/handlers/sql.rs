//! Canned benchmark SQL, one statement per query shape per dialect.
//!
//! These are the fixed statements the endpoints race across backends. The
//! dialects differ only where they must: relative-time predicates, boolean
//! literals, placeholder syntax, and `RETURNING id` for the write path.

use dbbench_core::{schema, Dialect};

/// Multi-predicate range scan, sorted, limited.
pub fn read_complicated(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Sqlite => {
            "SELECT * FROM users \
             WHERE age BETWEEN 25 AND 35 \
               AND gender = 'male' \
               AND is_active = 1 \
               AND created_at >= datetime('now', '-1 year') \
             ORDER BY last_login DESC \
             LIMIT 10"
        }
        Dialect::Postgres => {
            "SELECT * FROM users \
             WHERE age BETWEEN 25 AND 35 \
               AND gender = 'male' \
               AND is_active = true \
               AND created_at >= NOW() - INTERVAL '1 year' \
             ORDER BY last_login DESC \
             LIMIT 10"
        }
    }
}

/// Equality filter on an indexed column.
pub fn read_indexed(_dialect: Dialect) -> &'static str {
    "SELECT * FROM users WHERE age = 30 ORDER BY login_count DESC LIMIT 10"
}

/// Substring filter on an unindexed text column.
pub fn read_noindex(_dialect: Dialect) -> &'static str {
    "SELECT * FROM users WHERE preferences LIKE '%dark%' ORDER BY username DESC LIMIT 10"
}

/// Offset pagination; parameters are `(page_size, offset)`.
pub fn read_pages(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Sqlite => "SELECT * FROM users ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
        Dialect::Postgres => "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    }
}

/// Existence-subquery filter: users with at least one completed order.
pub fn read_exists_full(_dialect: Dialect) -> &'static str {
    "SELECT * FROM users u \
     WHERE EXISTS (SELECT 1 FROM orders o WHERE o.user_id = u.id AND o.status = 'completed') \
     ORDER BY u.created_at DESC \
     LIMIT 10"
}

/// Left join with a post-filter on the joined side.
pub fn read_join_full(_dialect: Dialect) -> &'static str {
    "SELECT u.id, u.username, u.email, o.order_number, o.status AS order_status, o.amount \
     FROM users u \
     LEFT JOIN orders o ON o.user_id = u.id \
     WHERE o.amount > 500 \
     ORDER BY o.amount DESC \
     LIMIT 10"
}

/// Single-row user insert; postgres variant reports the assigned id.
pub fn insert_user(dialect: Dialect) -> String {
    let sql = schema::USERS.insert_sql(dialect);
    match dialect {
        Dialect::Sqlite => sql,
        Dialect::Postgres => format!("{sql} RETURNING id"),
    }
}

/// Read-back by username for the write-then-read endpoint.
pub fn select_by_username(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Sqlite => "SELECT * FROM users WHERE username = ?1",
        Dialect::Postgres => "SELECT * FROM users WHERE username = $1",
    }
}

/// Row count, aliased so both drivers report the same column name.
pub fn count_users() -> &'static str {
    "SELECT count(*) AS c FROM users"
}
