use std::net::SocketAddr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info, warn};
use serde::Serialize;

use crate::data::SchedulingInput;
use crate::slots::{self, CatalogEntry};
use crate::solver::{self, SearchLimits};

#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub limits: SearchLimits,
}

#[derive(Debug, Clone, Copy)]
struct AppState {
    limits: SearchLimits,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    errors: Vec<String>,
}

fn error_response(status: StatusCode, errors: Vec<String>) -> Response {
    (status, Json(ErrorBody { errors })).into_response()
}

/// POST /v1/schedule/solve
async fn solve_handler(
    State(state): State<AppState>,
    Json(input): Json<SchedulingInput>,
) -> Response {
    let limits = state.limits;
    // each request owns its own search; keep it off the async workers
    match tokio::task::spawn_blocking(move || solver::solve(&input, &limits)).await {
        Ok(Ok(output)) => Json(output).into_response(),
        Ok(Err(invalid)) => {
            warn!("Rejected scheduling request: {invalid}");
            error_response(StatusCode::BAD_REQUEST, invalid.messages())
        }
        Err(e) => {
            error!("Solver task failed: {e}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                vec!["solver task failed".to_string()],
            )
        }
    }
}

/// GET /v1/slots
async fn slots_handler() -> Json<Vec<CatalogEntry>> {
    Json(slots::catalog().map(CatalogEntry::from).collect())
}

pub fn router(limits: SearchLimits) -> Router {
    Router::new()
        .route("/v1/schedule/solve", post(solve_handler))
        .route("/v1/slots", get(slots_handler))
        .with_state(AppState { limits })
}

pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let app = router(config.limits);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
