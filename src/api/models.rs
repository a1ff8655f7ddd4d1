use crate::error::TodoError;
use crate::suggestions::SuggestionError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{de::DeserializeOwned, Serialize};

/// JSON body extractor whose rejections use the `{"error","code"}` shape
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = TodoError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(TodoError::InvalidInput(rejection.body_text())),
        }
    }
}

/// Path parameter extractor; a segment that does not parse is a 400 in the
/// same `{"error","code"}` shape
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = TodoError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(TodoError::InvalidInput(rejection.body_text())),
        }
    }
}

/// `{"message": ...}` body used for informational non-200 replies
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `{"error": ...}` body returned when suggestions cannot be produced
#[derive(Serialize)]
pub struct SuggestionErrorBody {
    pub error: String,
    pub code: String,
}

impl From<&SuggestionError> for SuggestionErrorBody {
    fn from(err: &SuggestionError) -> Self {
        Self {
            error: err.to_string(),
            code: err.to_error_code().to_string(),
        }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub llm_configured: bool,
}

pub fn status_for(err: &TodoError) -> StatusCode {
    match err {
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        TodoError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        TodoError::Duplicate(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(self.to_error_response())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&TodoError::TaskNotFound(1)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&TodoError::ContextNotFound(1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&TodoError::InvalidInput("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&TodoError::Duplicate("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&TodoError::IoError(std::io::Error::other("disk"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_suggestion_error_body() {
        let body = SuggestionErrorBody::from(&SuggestionError::Configuration);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["error"], "LLM service credential not configured.");
        assert_eq!(json["code"], "LLM_NOT_CONFIGURED");
    }

    #[test]
    fn test_message_response_serialization() {
        let json = serde_json::to_string(&MessageResponse {
            message: "No tasks found to analyze.".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"message":"No tasks found to analyze."}"#);
    }
}
