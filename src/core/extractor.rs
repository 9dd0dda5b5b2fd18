use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        FromRequestParts, Path, Query,
    },
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;

/// Query-string extractor that renders rejections as the site's error page
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppQueryRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppQueryRejection(rejection)),
        }
    }
}

pub struct AppQueryRejection(QueryRejection);

impl IntoResponse for AppQueryRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            QueryRejection::FailedToDeserializeQueryString(err) => {
                format!("Parameter pencarian tidak valid: {}", err.body_text())
            }
            _ => "Parameter pencarian tidak valid".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// Path-segment extractor that renders rejections as the site's error page
pub struct AppPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppPathRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppPathRejection(rejection)),
        }
    }
}

pub struct AppPathRejection(PathRejection);

impl IntoResponse for AppPathRejection {
    fn into_response(self) -> Response {
        match self.0 {
            PathRejection::FailedToDeserializePathParams(err) => {
                tracing::debug!("Rejected path parameters: {}", err.body_text());
                AppError::BadRequest("Alamat halaman tidak valid".to_string()).into_response()
            }
            PathRejection::MissingPathParams(err) => {
                AppError::Internal(err.body_text()).into_response()
            }
            _ => AppError::Internal("Failed to read path parameters".to_string()).into_response(),
        }
    }
}
