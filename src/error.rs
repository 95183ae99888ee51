use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use serde_json::json;

/// Business rules a check-in or check-out request can break.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[display(fmt = "Employee not found")]
    UnknownEmployee,
    #[display(fmt = "Already checked in today")]
    AlreadyCheckedIn,
    #[display(fmt = "Not checked in today")]
    NotCheckedIn,
    #[display(fmt = "Found {} open check-ins for today, refusing to check out", _0)]
    MultipleOpenRecords(usize),
}

#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "{}", _0)]
    Rejected(Rejection),
    #[display(fmt = "Database error: {}", _0)]
    Database(sqlx::Error),
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Rejected(_) => None,
            AppError::Database(e) => Some(e),
        }
    }
}

impl From<Rejection> for AppError {
    fn from(r: Rejection) -> Self {
        AppError::Rejected(r)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e)
    }
}

#[cfg(test)]
impl AppError {
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            AppError::Rejected(r) => Some(*r),
            AppError::Database(_) => None,
        }
    }
}

// Rule violations are ordinary answers for the client, not HTTP failures.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Rejected(_) => StatusCode::OK,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Rejected(r) => HttpResponse::Ok().json(json!({
                "success": false,
                "message": r.to_string()
            })),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Request failed");
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}
