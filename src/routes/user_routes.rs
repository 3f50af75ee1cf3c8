//! User record endpoint handlers.
//!
//! Backed by a fixture list rather than a real registry; the verbs and the
//! envelope shapes are what a persistent implementation would serve.

use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;
use crate::utils::http_helpers::{bad_request, not_found, success, ApiReply};

/// Registers user record routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/users/{id}",
        get(get_user).patch(update_user).delete(delete_user),
    )
}

/// The user records served by this template.
const FIXTURE_USERS: [(u64, &str); 2] = [(1, "John Doe"), (2, "Jane Smith")];

fn parse_id(raw: &str) -> Option<u64> {
    raw.parse().ok()
}

/// Fetch one user record by numeric id.
async fn get_user(Path(id): Path<String>) -> ApiReply<Value> {
    let Some(id) = parse_id(&id) else {
        return bad_request("Invalid user ID", None);
    };

    match FIXTURE_USERS.iter().find(|(uid, _)| *uid == id) {
        Some((uid, name)) => success(json!({ "id": uid, "name": name }), "Success"),
        None => not_found("User not found"),
    }
}

/// Shallow-merge the supplied fields into the user record.
async fn update_user(Path(id): Path<String>, Json(body): Json<Value>) -> ApiReply<Value> {
    let Some(id) = parse_id(&id) else {
        return bad_request("Invalid user ID", None);
    };

    let Some(fields) = body.as_object().filter(|fields| !fields.is_empty()) else {
        return bad_request("No data provided for update", None);
    };

    let mut updated = serde_json::Map::new();
    updated.insert("id".to_string(), json!(id));
    for (key, value) in fields {
        updated.insert(key.clone(), value.clone());
    }

    success(Value::Object(updated), "User updated successfully")
}

/// Delete a user record.
async fn delete_user(Path(id): Path<String>) -> ApiReply<Value> {
    if parse_id(&id).is_none() {
        return bad_request("Invalid user ID", None);
    }

    success(Value::Null, "User deleted successfully")
}
