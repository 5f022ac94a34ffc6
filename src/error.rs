use axum::{Json, http::StatusCode, response::IntoResponse};
use oauth2::basic::BasicErrorResponseType;
use oauth2::reqwest::Error as ReqwestClientError;
use oauth2::{HttpClientError, RequestTokenError, StandardErrorResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use std::fmt::Display;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ForgeError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email not verified by the identity provider")]
    UnverifiedEmail,

    #[error("authentication required")]
    Unauthenticated,

    #[error("email already registered")]
    EmailTaken,

    #[error("unknown quote tag: {0}")]
    UnknownTag(String),

    #[error("{provider} provider unavailable: {reason}")]
    Upstream {
        provider: &'static str,
        reason: String,
    },

    #[error("not found")]
    NotFound,

    #[error("OAuth flow error: {0}")]
    OauthFlow(String),

    #[error("password hash error: {0}")]
    PasswordHash(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] SqlxError),
}

impl ForgeError {
    /// Network failure or malformed payload from a content provider.
    pub fn upstream(provider: &'static str, reason: impl Display) -> Self {
        Self::Upstream {
            provider,
            reason: reason.to_string(),
        }
    }
}

impl
    From<
        RequestTokenError<
            HttpClientError<ReqwestClientError>,
            StandardErrorResponse<BasicErrorResponseType>,
        >,
    > for ForgeError
{
    fn from(
        e: RequestTokenError<
            HttpClientError<ReqwestClientError>,
            StandardErrorResponse<BasicErrorResponseType>,
        >,
    ) -> Self {
        match e {
            RequestTokenError::ServerResponse(err) => {
                ForgeError::OauthFlow(format!("token endpoint error: {}", err.error()))
            }
            RequestTokenError::Request(req_e) => {
                ForgeError::OauthFlow(format!("token request failed: {}", req_e))
            }
            RequestTokenError::Parse(parse_err, _body) => ForgeError::Json(parse_err.into_inner()),
            RequestTokenError::Other(s) => ForgeError::OauthFlow(s),
        }
    }
}

impl IntoResponse for ForgeError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            ForgeError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid email or password.".to_string(),
                },
            ),
            ForgeError::UnverifiedEmail => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "UNVERIFIED_EMAIL".to_string(),
                    message: "User email not available or not verified by the provider."
                        .to_string(),
                },
            ),
            ForgeError::Unauthenticated => (
                StatusCode::FORBIDDEN,
                ApiErrorBody {
                    code: "UNAUTHENTICATED".to_string(),
                    message: "You must be logged in to access this content.".to_string(),
                },
            ),
            ForgeError::EmailTaken => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "EMAIL_TAKEN".to_string(),
                    message: "An account with this email already exists.".to_string(),
                },
            ),
            ForgeError::UnknownTag(tag) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "UNKNOWN_TAG".to_string(),
                    message: format!("Unknown quote tag: {tag}"),
                },
            ),
            ForgeError::Upstream { .. } | ForgeError::Reqwest(_) => (
                StatusCode::BAD_GATEWAY,
                ApiErrorBody {
                    code: "UPSTREAM_UNAVAILABLE".to_string(),
                    message: "An upstream provider is unavailable. Please try again.".to_string(),
                },
            ),
            ForgeError::NotFound => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: "The requested resource does not exist.".to_string(),
                },
            ),
            ForgeError::OauthFlow(_) | ForgeError::Json(_) => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "UNAUTHORIZED".to_string(),
                    message: "Authentication error.".to_string(),
                },
            ),
            ForgeError::Database(_) | ForgeError::PasswordHash(_) | ForgeError::UrlParse(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                },
            ),
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
