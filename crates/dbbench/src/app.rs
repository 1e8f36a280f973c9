use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{health::health, queries},
    state::{AppState, DynBackend},
};

/// Create the application router with all routes and middleware.
///
/// Every backend gets the same endpoint shape nested under its own prefix,
/// so identical queries can be raced across backends by swapping the path
/// prefix.
pub fn create_app(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .with_state(state.clone());

    for backend in &state.backends {
        app = app.nest(&format!("/{}", backend.name()), backend_routes(backend.clone()));
    }

    app.layer(TraceLayer::new_for_http())
}

/// The per-backend endpoint shape.
fn backend_routes(backend: DynBackend) -> Router {
    Router::new()
        .route("/read/complicated", get(queries::read_complicated))
        .route("/read/indexed", get(queries::read_indexed))
        .route("/read/noindex", get(queries::read_noindex))
        .route("/read/pages", get(queries::read_pages))
        .route("/read/exists/full", get(queries::read_exists_full))
        .route("/read/join/full", get(queries::read_join_full))
        .route("/write", post(queries::write))
        .route("/rw", post(queries::read_write))
        .route("/count", post(queries::count))
        .with_state(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use dbbench_core::{record, schema, Backend};

    use crate::adapters::SyncSqliteBackend;

    /// One in-memory SQLite backend, reset and loaded with `rows` users
    /// and `rows` orders.
    async fn test_state(rows: u64) -> AppState {
        let backend = SyncSqliteBackend::open_in_memory(32_000).unwrap();
        backend.reset_schema().await.unwrap();
        backend
            .bulk_load(&schema::USERS, (0..rows).map(record::user).collect())
            .await
            .unwrap();
        backend
            .bulk_load(&schema::ORDERS, (0..rows).map(record::order).collect())
            .await
            .unwrap();
        AppState::new(vec![Arc::new(backend)])
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn post_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_lists_backends() {
        let app = create_app(test_state(1).await);
        let (status, json) = get_json(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["backends"], serde_json::json!(["sqlite"]));
    }

    #[tokio::test]
    async fn test_read_indexed_filters_on_age() {
        // age = 20 + i % 40, so only index 10 has age 30 among 0..12.
        let app = create_app(test_state(12).await);
        let (status, json) = get_json(app, "/sqlite/read/indexed").await;

        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["age"], 30);
    }

    #[tokio::test]
    async fn test_read_noindex_matches_preferences_blob() {
        // Every generated user has `{"theme":"dark"}` settings but the
        // scan targets the preferences column, which has no 'dark'.
        let app = create_app(test_state(5).await);
        let (status, json) = get_json(app, "/sqlite/read/noindex").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_pages_returns_requested_window() {
        // created_at backdates by index, so DESC order is index order.
        let app = create_app(test_state(12).await);
        let (status, json) = get_json(app, "/sqlite/read/pages?page=2&pageSize=5").await;

        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 5);
        for (offset, row) in rows.iter().enumerate() {
            let expected_index = 5 + offset;
            let username = row["username"].as_str().unwrap();
            assert!(
                username.starts_with(&format!("user_{expected_index}_")),
                "row {offset} was {username}"
            );
        }
    }

    #[tokio::test]
    async fn test_read_pages_out_of_range_is_empty_not_error() {
        let app = create_app(test_state(12).await);
        let (status, json) = get_json(app, "/sqlite/read/pages?page=99&pageSize=10").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_pages_huge_page_number_is_empty_not_error() {
        // The offset saturates instead of overflowing i64.
        let app = create_app(test_state(12).await);
        let uri = format!("/sqlite/read/pages?page={}&pageSize=10", i64::MAX);
        let (status, json) = get_json(app, &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert!(json.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_pages_bad_params_fall_back_to_defaults() {
        let app = create_app(test_state(12).await);
        let (status, json) = get_json(app, "/sqlite/read/pages?page=abc&pageSize=").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_read_complicated_shape() {
        let app = create_app(test_state(20).await);
        let (status, json) = get_json(app, "/sqlite/read/complicated").await;

        assert_eq!(status, StatusCode::OK);
        for row in json.as_array().unwrap() {
            assert_eq!(row["gender"], "male");
            assert_eq!(row["is_active"], 1);
            let age = row["age"].as_i64().unwrap();
            assert!((25..=35).contains(&age));
        }
    }

    #[tokio::test]
    async fn test_read_exists_full_returns_users_with_completed_orders() {
        // Orders bucket user_id by index % 100 and status by index % 3;
        // with 12 of each loaded, some users have completed orders.
        let app = create_app(test_state(12).await);
        let (status, json) = get_json(app, "/sqlite/read/exists/full").await;

        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert!(!rows.is_empty());
        for row in rows {
            assert!(row["username"].as_str().unwrap().starts_with("user_"));
        }
    }

    #[tokio::test]
    async fn test_read_join_full_filters_on_amount() {
        // Order amounts are index % 1000 + fraction, so indices 500..510
        // clear the 500 filter; their user_id buckets (0..10) hit the
        // three loaded users.
        let backend = SyncSqliteBackend::open_in_memory(32_000).unwrap();
        backend.reset_schema().await.unwrap();
        backend
            .bulk_load(&schema::USERS, (0..3).map(record::user).collect())
            .await
            .unwrap();
        backend
            .bulk_load(&schema::ORDERS, (500..510).map(record::order).collect())
            .await
            .unwrap();
        let app = create_app(AppState::new(vec![Arc::new(backend)]));

        let (status, json) = get_json(app, "/sqlite/read/join/full").await;

        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert!(!rows.is_empty());
        for row in rows {
            assert!(row["amount"].as_f64().unwrap() > 500.0);
            assert!(row["order_number"].as_str().unwrap().starts_with("ord_"));
        }
    }

    #[tokio::test]
    async fn test_write_reports_last_id() {
        let app = create_app(test_state(3).await);
        let (status, json) = post_json(app, "/sqlite/write").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["lastID"], 4);
    }

    #[tokio::test]
    async fn test_rw_reads_back_the_inserted_row() {
        let app = create_app(test_state(3).await);
        let (status, json) = post_json(app, "/sqlite/rw").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json.is_object());
        assert!(json["username"].as_str().unwrap().starts_with("user_"));
        assert!(json["email"].as_str().unwrap().ends_with("@example.com"));
        assert_eq!(json["id"], 4);
    }

    #[tokio::test]
    async fn test_count_increases_by_one_across_a_write() {
        let state = test_state(7).await;
        let app = create_app(state);

        let (_, before) = post_json(app.clone(), "/sqlite/count").await;
        assert_eq!(before["before"], 7);

        let (status, _) = post_json(app.clone(), "/sqlite/write").await;
        assert_eq!(status, StatusCode::OK);

        let (_, after) = post_json(app, "/sqlite/count").await;
        assert_eq!(after["before"], 8);
    }

    #[tokio::test]
    async fn test_query_error_surfaces_as_500_json() {
        // A backend whose schema was never created fails at query time.
        let backend = SyncSqliteBackend::open_in_memory(32_000).unwrap();
        let app = create_app(AppState::new(vec![Arc::new(backend)]));

        let (status, json) = get_json(app, "/sqlite/read/indexed").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("users"));
    }

    #[tokio::test]
    async fn test_unknown_backend_prefix_is_404() {
        let app = create_app(test_state(1).await);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/mysql/read/indexed")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
