use std::collections::HashMap;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// Machine-readable error classes carried in the response envelope.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    BadRequest,
    ServerError,
}

/// Uniform envelope wrapping every API response body.
#[derive(Serialize, Debug)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// A status code plus the JSON envelope, ready for axum to serve.
pub type ApiReply<T> = (StatusCode, Json<ApiResponse<T>>);

fn failure<T: Serialize>(
    status: StatusCode,
    code: ApiErrorCode,
    message: &str,
    errors: Option<HashMap<String, Vec<String>>>,
) -> ApiReply<T> {
    (
        status,
        Json(ApiResponse {
            success: false,
            message: message.to_string(),
            error: Some(code),
            errors,
            data: None,
        }),
    )
}

pub fn success<T: Serialize>(data: T, message: &str) -> ApiReply<T> {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            message: message.to_string(),
            error: None,
            errors: None,
            data: Some(data),
        }),
    )
}

pub fn created<T: Serialize>(data: T, message: &str) -> ApiReply<T> {
    (
        StatusCode::CREATED,
        Json(ApiResponse {
            success: true,
            message: message.to_string(),
            error: None,
            errors: None,
            data: Some(data),
        }),
    )
}

pub fn bad_request<T: Serialize>(
    message: &str,
    errors: Option<HashMap<String, Vec<String>>>,
) -> ApiReply<T> {
    failure(StatusCode::BAD_REQUEST, ApiErrorCode::BadRequest, message, errors)
}

pub fn unauthorized<T: Serialize>(message: &str) -> ApiReply<T> {
    failure(
        StatusCode::UNAUTHORIZED,
        ApiErrorCode::Unauthorized,
        message,
        None,
    )
}

pub fn forbidden<T: Serialize>(message: &str) -> ApiReply<T> {
    failure(StatusCode::FORBIDDEN, ApiErrorCode::Forbidden, message, None)
}

pub fn not_found<T: Serialize>(message: &str) -> ApiReply<T> {
    failure(StatusCode::NOT_FOUND, ApiErrorCode::NotFound, message, None)
}

pub fn server_error<T: Serialize>(message: &str) -> ApiReply<T> {
    failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        ApiErrorCode::ServerError,
        message,
        None,
    )
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let (status, Json(body)) = success(json!({"id": 1}), "Success");
        assert_eq!(status, StatusCode::OK);

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["id"], 1);
        assert!(value.get("error").is_none());
        assert!(value.get("errors").is_none());
    }

    #[test]
    fn test_validation_envelope_carries_field_errors() {
        let mut errors = HashMap::new();
        errors.insert(
            "password".to_string(),
            vec!["Password must be at least 6 characters".to_string()],
        );

        let (status, Json(body)): ApiReply<Value> = bad_request("Invalid login data", Some(errors));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "BAD_REQUEST");
        assert_eq!(value["errors"]["password"][0], "Password must be at least 6 characters");
    }

    #[test]
    fn test_unauthorized_envelope() {
        let (status, Json(body)): ApiReply<Value> = unauthorized("Incorrect username or password");
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["error"], "UNAUTHORIZED");
        assert_eq!(value["message"], "Incorrect username or password");
    }
}
