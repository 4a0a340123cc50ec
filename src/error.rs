use std::collections::BTreeMap;
use std::fmt;

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};

use serde::Serialize;

use thiserror::Error;

pub type RestResult<T> = Result<T, RestError>;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Parse Error: {0}")]
    ParseError(String),

    #[error("Validation Error: {0}")]
    Validation(ValidationErrors),

    #[error("Not found.")]
    NotFound,

    #[error("Invalid page.")]
    InvalidPage,

    #[error("Failed to authenticate")]
    FailedToAuthenticate(#[source] anyhow::Error),

    #[error("Internal Server Error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RestError {
    /// Shorthand for a validation error on a single field
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(ValidationErrors::single(field, message))
    }
}

impl From<ValidationErrors> for RestError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<sqlx::Error> for RestError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Self::NotFound,
            e => {
                tracing::error!(error.cause_chain = ?e, "Database error");
                Self::InternalError("Database error".into())
            }
        }
    }
}

impl From<tokio::task::JoinError> for RestError {
    fn from(e: tokio::task::JoinError) -> Self {
        tracing::error!(error.cause_chain = ?e, "Blocking task failed");
        Self::InternalError("Blocking task failed".into())
    }
}

#[derive(Debug, Serialize)]
struct Detail<'a> {
    detail: &'a str,
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ParseError(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::InvalidPage => StatusCode::NOT_FOUND,
            Self::FailedToAuthenticate(_) => StatusCode::UNAUTHORIZED,
            Self::InternalError(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = HttpResponse::build(self.status_code());
        match self {
            Self::Validation(errors) => res.json(errors),
            Self::ParseError(msg) => res.json(Detail { detail: msg }),
            Self::NotFound => res.json(Detail {
                detail: "Not found.",
            }),
            Self::InvalidPage => res.json(Detail {
                detail: "Invalid page.",
            }),
            Self::FailedToAuthenticate(e) => {
                tracing::warn!(error.cause_chain = ?e, "Rejected administrator request");
                res.insert_header((header::WWW_AUTHENTICATE, r#"Basic realm="admin""#))
                    .json(Detail {
                        detail: "Invalid or missing credentials.",
                    })
            }
            Self::Other(e) => {
                tracing::error!(error.cause_chain = ?e, "Unhandled error");
                res.json(Detail {
                    detail: "Internal Server Error",
                })
            }
            Self::InternalError(_) => res.json(Detail {
                detail: "Internal Server Error",
            }),
        }
    }
}

/// Field-level validation failures, serialized as `{"field": ["message", ...]}`
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Record the error of a parse result under `field`, returning the value on success
    pub fn check<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }

    /// `Ok(())` when nothing was recorded
    pub fn finish(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Name of the violated unique constraint, if `e` is a unique violation
pub fn unique_violation(e: &sqlx::Error) -> Option<String> {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            Some(db.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

/// Whether `e` is a foreign key violation
pub fn foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_foreign_key_violation())
        .unwrap_or(false)
}
