//! `CasebookServer`: Axum HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::middleware;
use axum::response::Json;
use axum::routing::{delete, get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use casebook_store::ConnectionPool;

use crate::config::ServerConfig;
use crate::health::{self, HealthResponse};
use crate::identity::IdentityProvider;
use crate::metrics::{render, track_requests};
use crate::routes::{cases, records, workflow};
use crate::shutdown::ShutdownCoordinator;

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// `SQLite` connection pool.
    pub pool: ConnectionPool,
    /// Session resolver for the identity extractor.
    pub identity: Arc<dyn IdentityProvider>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Prometheus handle for `/metrics`.
    pub metrics: PrometheusHandle,
    /// When the server started.
    pub start_time: Instant,
}

/// The casebook HTTP server.
pub struct CasebookServer {
    state: AppState,
    shutdown: Arc<ShutdownCoordinator>,
}

impl CasebookServer {
    /// Create a new server.
    pub fn new(
        config: ServerConfig,
        pool: ConnectionPool,
        identity: Arc<dyn IdentityProvider>,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            state: AppState {
                pool,
                identity,
                config: Arc::new(config),
                metrics,
                start_time: Instant::now(),
            },
            shutdown: Arc::new(ShutdownCoordinator::new()),
        }
    }

    /// Build the Axum router with all routes.
    pub fn router(&self) -> Router {
        let api = Router::new()
            .route("/cases", get(cases::list_cases).post(cases::create_case))
            .route("/cases/stats", get(cases::case_stats))
            .route("/cases/{case_id}", get(cases::get_case))
            .route("/cases/{case_id}/status", post(cases::update_status))
            .route(
                "/cases/{case_id}/workflow-steps",
                get(workflow::list_steps).post(workflow::create_step),
            )
            .route(
                "/cases/{case_id}/workflow-steps/reorder",
                post(workflow::reorder_steps),
            )
            .route(
                "/cases/{case_id}/workflow-steps/{step_id}",
                delete(workflow::delete_step),
            )
            .route(
                "/cases/{case_id}/workflow-steps/{step_id}/toggle",
                post(workflow::toggle_step),
            )
            .route("/cases/{case_id}/milestones", post(records::create_milestone))
            .route(
                "/cases/{case_id}/milestones/{milestone_id}/toggle",
                post(records::toggle_milestone),
            )
            .route("/cases/{case_id}/time-entries", post(records::log_time))
            .route("/cases/{case_id}/comments", post(records::add_comment))
            .route(
                "/cases/{case_id}/legal-references",
                post(records::add_legal_reference),
            )
            .route("/time-entries", get(records::list_time_entries))
            .route("/activities", get(cases::activity_feed))
            .route("/calendar", get(cases::calendar))
            .route("/users", get(cases::list_users));

        Router::new()
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .merge(api)
            .route_layer(middleware::from_fn(track_requests))
            .layer(TimeoutLayer::new(self.state.config.request_timeout()))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind and serve in a background task until shutdown is signalled.
    ///
    /// Returns the bound address (useful with port `0`) and the server task.
    pub async fn listen(&self) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
        let config = &self.state.config;
        let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
        let addr = listener.local_addr()?;
        let app = self.router();
        let token = self.shutdown.token();

        let handle = tokio::spawn(async move {
            let shutdown = async move { token.cancelled().await };
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!(error = %e, "server error");
            }
        });

        info!(%addr, "casebook listening");
        Ok((addr, handle))
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let pool = state.pool.clone();
    let database_ok = tokio::task::spawn_blocking(move || {
        pool.get()
            .ok()
            .and_then(|conn| conn.query_row("SELECT 1", [], |_| Ok(())).ok())
            .is_some()
    })
    .await
    .unwrap_or(false);
    Json(health::health_check(state.start_time, database_ok))
}

/// GET /metrics
async fn metrics_handler(State(state): State<AppState>) -> String {
    render(&state.metrics)
}
