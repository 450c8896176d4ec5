//! Public index: what the service offers and how to authenticate

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::state::AppState;

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Load broker API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "webhook": "/webhook",
            "carriers": "/carriers",
            "carrier": "/carriers/{load_id}",
            "bookings": "/bookings",
            "closest_load": "/distance/closest?city=City, ST",
            "load_distance": "/distance/load/{load_id}",
            "health": "/health",
            "ready": "/ready"
        },
        "authentication": {
            "enabled": state.auth_enabled,
            "header": "X-API-KEY",
            "query_params": ["api_key", "key"]
        },
        "examples": {
            "list_loads": "GET /webhook",
            "get_load": "GET /webhook?load_id=LOAD001",
            "closest_via_webhook": "GET /webhook?city=Chicago, IL",
            "closest_load": "GET /distance/closest?city=Los Angeles, CA",
            "load_distance": "GET /distance/load/LOAD001",
            "book_load": {
                "method": "POST",
                "url": "/webhook",
                "payload": {
                    "mc_num": "123456",
                    "chosen_id": "LOAD001",
                    "initial_rate": "1,200.00",
                    "final_rate": 1300,
                    "duration": 184
                }
            }
        }
    }))
}
