use axum::response::Json;
use serde_json::{Value, json};

pub async fn index() -> Json<Value> {
    Json(json!({ "Quizzify": "Music Quiz API" }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
