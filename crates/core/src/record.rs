//! Synthetic record generation.
//!
//! Each generator derives every enumerated field from the row index via
//! modulo over a small fixed value set, so the shape of the data is
//! deterministic, while usernames/emails/order numbers carry a
//! wall-clock + random suffix so repeated loads never trip the unique
//! constraints.

use chrono::{Duration, NaiveDateTime, Utc};

use crate::value::{Record, Value};

const GENDERS: [&str; 3] = ["male", "female", "other"];
const LOCATIONS: [&str; 5] = ["US", "CA", "UK", "DE", "JP"];
const USER_STATUSES: [&str; 3] = ["active", "inactive", "banned"];
const ORDER_STATUSES: [&str; 3] = ["pending", "completed", "cancelled"];

/// Orders collapse their user_id into this range so they cluster heavily
/// per user, which is what makes the join/exists endpoints interesting.
const ORDER_USER_BUCKETS: u64 = 100;

/// Cap on the index used in time-offset arithmetic, to keep the
/// day-offset multiplication well away from overflow.
const SAFE_INDEX_MODULUS: u64 = 10_000_000;

fn pick(set: &[&str], index: u64) -> Value {
    Value::Text(set[(index % set.len() as u64) as usize].to_string())
}

/// Uniqueness token: raw index, current millis, and a random fraction.
fn unique_suffix(index: u64) -> String {
    let millis = Utc::now().timestamp_millis();
    let fraction = rand::random::<f64>();
    format!("{index}_{millis}_{fraction}")
}

fn backdate_days(now: NaiveDateTime, days: u64) -> NaiveDateTime {
    now - Duration::days(days as i64)
}

fn filler_fields(index: u64) -> impl Iterator<Item = Value> {
    (1..=16).map(move |n| Value::Text(format!("field{n}_{index}")))
}

/// Generates one `users` row in `schema::USERS` insert-column order.
pub fn user(index: u64) -> Record {
    let safe_index = index % SAFE_INDEX_MODULUS;
    let suffix = unique_suffix(index);
    let now = Utc::now().naive_utc();

    let mut row: Record = vec![
        Value::Text(format!("user_{suffix}")),
        Value::Text(format!("user_{suffix}@example.com")),
        Value::Int(20 + (index % 40) as i64),
        pick(&GENDERS, index),
        Value::Bool(index % 2 == 0),
        Value::Int((index % 1000) as i64),
        Value::Real((index % 100) as f64 + rand::random::<f64>()),
        pick(&LOCATIONS, index),
        pick(&USER_STATUSES, index),
        Value::Timestamp(backdate_days(now, safe_index % 3650)),
        Value::Timestamp(backdate_days(now, safe_index % 365)),
        Value::Text(r#"{"theme":"dark"}"#.to_string()),
        Value::Text(r#"{"lang":"en"}"#.to_string()),
    ];
    row.extend(filler_fields(index));
    row
}

/// Generates one `orders` row in `schema::ORDERS` insert-column order.
pub fn order(index: u64) -> Record {
    let safe_index = index % SAFE_INDEX_MODULUS;
    let suffix = unique_suffix(index);
    let now = Utc::now().naive_utc();

    let mut row: Record = vec![
        Value::Text(format!("ord_{suffix}")),
        Value::Int((index % ORDER_USER_BUCKETS) as i64),
        pick(&ORDER_STATUSES, index),
        Value::Real((index % 1000) as f64 + rand::random::<f64>()),
        Value::Timestamp(backdate_days(now, safe_index % 365)),
        Value::Timestamp(backdate_days(now, safe_index % 30)),
        Value::Text(r#"{"method":"card"}"#.to_string()),
    ];
    row.extend(filler_fields(index));
    row
}

/// The username column of a generated user record.
pub fn username(record: &Record) -> &str {
    match record.first() {
        Some(Value::Text(name)) => name,
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    #[test]
    fn test_user_width_matches_schema() {
        assert_eq!(user(0).len(), schema::USERS.fields_per_row());
    }

    #[test]
    fn test_order_width_matches_schema() {
        assert_eq!(order(0).len(), schema::ORDERS.fields_per_row());
    }

    #[test]
    fn test_enumerated_fields_bucket_by_modulo() {
        for index in 0..12u64 {
            let row = user(index);
            assert_eq!(row[2], Value::Int(20 + (index % 40) as i64), "age");
            assert_eq!(
                row[3],
                Value::Text(GENDERS[(index % 3) as usize].to_string()),
                "gender"
            );
            assert_eq!(row[4], Value::Bool(index % 2 == 0), "is_active");
            assert_eq!(row[5], Value::Int((index % 1000) as i64), "login_count");
            assert_eq!(
                row[7],
                Value::Text(LOCATIONS[(index % 5) as usize].to_string()),
                "location"
            );
            assert_eq!(
                row[8],
                Value::Text(USER_STATUSES[(index % 3) as usize].to_string()),
                "status"
            );
        }
    }

    #[test]
    fn test_order_user_id_clusters() {
        for index in [0u64, 1, 99, 100, 101, 5_000] {
            let row = order(index);
            assert_eq!(row[1], Value::Int((index % 100) as i64));
        }
    }

    #[test]
    fn test_same_index_never_collides() {
        // The random fraction alone makes back-to-back calls distinct.
        let a = user(42);
        let b = user(42);
        assert_ne!(username(&a), username(&b));
        assert_ne!(a[1], b[1], "emails must differ");
    }

    #[test]
    fn test_large_index_does_not_overflow_backdating() {
        let row = user(u64::MAX);
        assert_eq!(row.len(), schema::USERS.fields_per_row());
    }

    #[test]
    fn test_created_at_orders_by_index() {
        // Lower index => fewer days back => more recent created_at.
        let now = Utc::now().naive_utc();
        let early = match &user(1)[9] {
            Value::Timestamp(t) => *t,
            other => panic!("expected timestamp, got {other:?}"),
        };
        let late = match &user(100)[9] {
            Value::Timestamp(t) => *t,
            other => panic!("expected timestamp, got {other:?}"),
        };
        assert!(early > late);
        assert!(early <= now);
    }

    #[test]
    fn test_username_accessor() {
        let row = user(7);
        assert!(username(&row).starts_with("user_7_"));
        assert_eq!(username(&Vec::new()), "");
    }
}
