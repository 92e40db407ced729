use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::resilience::CircuitSnapshot;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub open_circuits: usize,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let open_circuits = state
        .breakers
        .snapshots()
        .iter()
        .filter(|s| s.state != crate::resilience::CircuitState::Closed)
        .count();

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: if open_circuits == 0 { "operational" } else { "degraded" },
        open_circuits,
    })
}

pub async fn get_circuits(State(state): State<AppState>) -> Json<Vec<CircuitSnapshot>> {
    Json(state.breakers.snapshots())
}
