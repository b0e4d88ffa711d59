use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::JsonResponse;

#[derive(Debug)]
pub enum RequestError {
    BadRequest(&'static str),
    NotAuthorized(&'static str),
    Forbidden(&'static str),
    NotFound(&'static str),
    ServerError,
    DatabaseError(sqlx::Error),
}

#[derive(serde::Serialize)]
pub struct RequestErrorJson {
    error: String,
}

impl RequestErrorJson {
    pub fn new(error: &str) -> RequestErrorJson {
        RequestErrorJson {
            error: error.to_string(),
        }
    }
}

impl From<sqlx::Error> for RequestError {
    fn from(value: sqlx::Error) -> Self {
        Self::DatabaseError(value)
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJson> {
        let (status_code, json) = match self {
            RequestError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, RequestErrorJson::new(message))
            }
            RequestError::NotAuthorized(message) => {
                (StatusCode::UNAUTHORIZED, RequestErrorJson::new(message))
            }
            RequestError::Forbidden(message) => {
                (StatusCode::FORBIDDEN, RequestErrorJson::new(message))
            }
            RequestError::NotFound(message) => {
                (StatusCode::NOT_FOUND, RequestErrorJson::new(message))
            }
            RequestError::ServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                RequestErrorJson::new("Server error"),
            ),
            RequestError::DatabaseError(e) => {
                // detail stays in the log, the body is generic
                tracing::error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RequestErrorJson::new("Server error"),
                )
            }
        };
        (status_code, Json(json))
    }
}
