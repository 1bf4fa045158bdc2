//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};

use smartcity_domain::error::SmartCityError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<Value>,
}

/// Everything a handler can fail with, mapped to a status code on the way out.
#[derive(Debug)]
pub enum ApiError {
    /// A failure reported by an application service.
    Domain(SmartCityError),
    /// The request body was not valid JSON for the expected shape.
    MalformedBody(JsonRejection),
}

impl From<SmartCityError> for ApiError {
    fn from(err: SmartCityError) -> Self {
        Self::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MalformedBody(_)
            | Self::Domain(SmartCityError::Validation(_) | SmartCityError::MissingReference(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Domain(SmartCityError::NotFound(_) | SmartCityError::InvalidId(_)) => {
                StatusCode::NOT_FOUND
            }
            Self::Domain(SmartCityError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Domain(SmartCityError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::MalformedBody(rejection) => ErrorBody {
                message: "malformed request body".to_string(),
                detail: Some(Value::String(rejection.body_text())),
            },
            Self::Domain(SmartCityError::Validation(err)) => ErrorBody {
                message: err.to_string(),
                detail: Some(json!({ "field": err.field() })),
            },
            Self::Domain(SmartCityError::Storage(_)) => ErrorBody {
                message: "internal server error".to_string(),
                detail: None,
            },
            Self::Domain(err) => ErrorBody {
                message: err.to_string(),
                detail: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Domain(SmartCityError::Storage(err)) = &self {
            tracing::error!(error = ?err, "storage error");
        }
        (self.status(), Json(self.body())).into_response()
    }
}
