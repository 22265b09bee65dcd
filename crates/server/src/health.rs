use api_types::health::Health;
use axum::{Json, extract::State};

use crate::server::ServerState;

pub async fn get(State(state): State<ServerState>) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        app: state.app_name.to_string(),
    })
}
