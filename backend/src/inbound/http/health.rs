//! Liveness and readiness checks.
//!
//! Readiness also reports which adapters back the roster so operators can
//! tell a fixture deployment from a database-backed one.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;

/// Which adapter serves a concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Backing {
    /// In-memory fixtures.
    Fixture,
    /// PostgreSQL storage.
    Postgres,
    /// Remote parser over HTTP.
    Remote,
}

/// Readiness and liveness flags plus the adapter summary.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    storage: Backing,
    parser: Backing,
}

impl HealthState {
    /// Not ready, alive.
    pub fn new(storage: Backing, parser: Backing) -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            storage,
            parser,
        }
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness while draining.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new(Backing::Fixture, Backing::Fixture)
    }
}

/// Readiness body.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ReadinessReport {
    #[schema(example = "ready")]
    status: &'static str,
    storage: Backing,
    parser: Backing,
}

fn health_response(ok: bool) -> actix_web::HttpResponseBuilder {
    let mut response = if ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response.insert_header((header::CACHE_CONTROL, "no-store"));
    response
}

/// Readiness check.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Serving traffic", body = ReadinessReport),
        (status = 503, description = "Still starting", body = ReadinessReport)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    let ok = state.is_ready();
    health_response(ok).json(ReadinessReport {
        status: if ok { "ready" } else { "starting" },
        storage: state.storage,
        parser: state.parser,
    })
}

/// Liveness check; 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Alive"),
        (status = 503, description = "Shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    health_response(state.is_alive()).finish()
}
