//! HTTP API for the salary calculator.
//!
//! Every route lives under `/api`; see [`routes`] for the list.

pub mod error;
pub mod extract;
pub mod logging;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use salary_core::PayrollService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PayrollService>,
}

impl AppState {
    pub fn new(service: PayrollService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(routes::health::root))
        .route("/api/", get(routes::health::root))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use salary_core::{PayrollConfig, PayrollService};
    use salary_db_sqlite::SqliteRepository;
    use serde_json::Value;
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;

    use crate::{AppState, create_router};

    pub async fn test_state() -> AppState {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        let repo = SqliteRepository::new_with_pool(pool);
        repo.run_migrations()
            .await
            .expect("Failed to run migrations");

        AppState::new(PayrollService::new(PayrollConfig::default(), Arc::new(repo)))
    }

    pub async fn test_app() -> Router {
        create_router(test_state().await)
    }

    /// Sends one request and returns the status with the body parsed as JSON
    /// (`Value::Null` when the body is empty or not JSON).
    pub async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}
