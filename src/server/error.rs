//! Mapping of broker errors and bad request bodies to HTTP responses.

use crate::error::BrokerError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// An error on its way out of a handler.
#[derive(Debug)]
pub enum ApiError {
    /// The broker refused the operation.
    Broker(BrokerError),

    /// The request body was missing, not JSON, or the wrong shape.
    InvalidBody(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Broker(BrokerError::DuplicateMessage(_)) => StatusCode::CONFLICT,
            ApiError::Broker(BrokerError::TopicNotFound(_))
            | ApiError::Broker(BrokerError::MessageNotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Broker(BrokerError::ConflictingPosition) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<BrokerError> for ApiError {
    fn from(e: BrokerError) -> Self {
        ApiError::Broker(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Broker(e) => e.to_string(),
            ApiError::InvalidBody(reason) => format!("Unable to unmarshal request: {reason}"),
        };
        (status, body).into_response()
    }
}

/// JSON body extractor whose every rejection is a 400.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                tracing::warn!(error = %rejection.body_text(), "rejected request body");
                Err(rejection.into())
            }
        }
    }
}
