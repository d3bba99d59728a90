use crate::{errors::ServiceError, ApiResponse};
use axum::{http::StatusCode, Json};
use serde::Serialize;
use validator::Validate;

pub type JsonResult<T> = Result<Json<ApiResponse<T>>, ServiceError>;
pub type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ServiceError>;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input
        .validate()
        .map_err(|e| ServiceError::ValidationError(format!("Validation failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Input {
        #[validate(length(min = 1))]
        name: String,
    }

    #[test]
    fn validation_failures_become_bad_requests() {
        let err = validate_input(&Input { name: String::new() }).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(validate_input(&Input { name: "x".into() }).is_ok());
    }

    #[test]
    fn created_uses_201() {
        let (status, Json(body)) = created_response(5);
        assert_eq!(status, StatusCode::CREATED);
        assert!(body.success);
    }
}
