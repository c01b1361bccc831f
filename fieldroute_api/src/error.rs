use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::route::planner::RouteError;

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Wire-level error: a `{message, error?}` JSON body at the mapped status.
pub enum ApiError {
    BadRequest(String),
    Unauthenticated {
        message: String,
        error: Option<String>,
    },
    Upstream {
        message: String,
        error: String,
    },
}

impl ApiError {
    pub fn unauthenticated(message: &str, error: Option<String>) -> Self {
        ApiError::Unauthenticated {
            message: String::from(message),
            error,
        }
    }
}

impl From<RouteError> for ApiError {
    fn from(error: RouteError) -> Self {
        match error {
            RouteError::InvalidInput(message) | RouteError::NotFound(message) => {
                ApiError::BadRequest(message)
            }
            RouteError::UpstreamUnavailable(source) => ApiError::Upstream {
                message: String::from("Failed to contact routing service"),
                error: source.to_string(),
            },
            RouteError::UpstreamContractViolation(detail) => ApiError::Upstream {
                message: String::from("Unexpected routing service response"),
                error: detail,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message,
                    error: None,
                },
            ),
            ApiError::Unauthenticated { message, error } => {
                (StatusCode::UNAUTHORIZED, ErrorBody { message, error })
            }
            ApiError::Upstream { message, error } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    message,
                    error: Some(error),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldroute_ors::error::OrsError;

    #[test]
    fn route_errors_map_to_the_documented_statuses() {
        let bad = ApiError::from(RouteError::InvalidInput(String::from("too few stops")));
        assert!(matches!(bad, ApiError::BadRequest(_)));

        let missing = ApiError::from(RouteError::NotFound(String::from("unknown stop")));
        assert!(matches!(missing, ApiError::BadRequest(_)));

        let unavailable = ApiError::from(RouteError::UpstreamUnavailable(OrsError::Api {
            status: 503,
            message: String::from("down"),
        }));
        assert!(matches!(unavailable, ApiError::Upstream { .. }));

        let violation = ApiError::from(RouteError::UpstreamContractViolation(String::from(
            "bad cardinality",
        )));
        assert!(matches!(violation, ApiError::Upstream { .. }));
    }

    #[test]
    fn upstream_detail_is_carried_in_the_error_field() {
        let error = ApiError::from(RouteError::UpstreamUnavailable(OrsError::Api {
            status: 503,
            message: String::from("service unavailable"),
        }));

        match error {
            ApiError::Upstream { error, .. } => assert!(error.contains("503")),
            _ => panic!("expected upstream error"),
        }
    }
}
