use axum::{
    routing::{get, post, put},
    Router,
};
use http::HeaderName;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::observability::HealthChecker;
use crate::services::TransactionService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TransactionService>,
    pub metrics_handle: Option<PrometheusHandle>,
    pub health_checker: Option<Arc<HealthChecker>>,
}

impl AppState {
    pub fn new(service: Arc<TransactionService>) -> Self {
        Self {
            service,
            metrics_handle: None,
            health_checker: None,
        }
    }

    /// Adds metrics handle to the state.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    /// Adds health checker to the state.
    pub fn with_health_checker(mut self, checker: Arc<HealthChecker>) -> Self {
        self.health_checker = Some(checker);
        self
    }
}

/// Creates the main API router with all routes.
pub fn create_router(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/health/detailed", get(handlers::detailed_health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/live", get(handlers::liveness_check))
        // Metrics endpoint
        .route("/metrics", get(handlers::metrics_endpoint))
        // Transaction endpoints
        .route("/transactions/deposit", post(handlers::deposit))
        .route("/transactions/withdrawal", post(handlers::withdraw))
        .route("/transactions/transfer", post(handlers::transfer))
        .route("/transactions/account/:account_id", get(handlers::account_history))
        .route("/transactions/me", get(handlers::my_history))
        .route("/transactions/reference/:reference", get(handlers::get_by_reference))
        .route("/transactions/stats", get(handlers::transaction_stats))
        .route("/transactions/stats/daily", get(handlers::daily_transaction_stats))
        .route("/transactions", get(handlers::search_transactions))
        .route("/transactions/:id", get(handlers::get_transaction))
        .route("/transactions/:id/cancel", put(handlers::cancel_transaction))
        // Admin endpoints
        .route("/admin/transactions/deposit", post(handlers::admin_deposit))
        .route("/admin/transactions/withdrawal", post(handlers::admin_withdrawal))
        .route("/admin/transactions/transfer", post(handlers::admin_transfer))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state)
}
