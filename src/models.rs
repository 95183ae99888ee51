use crate::service::attendance::CheckIn;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckInReq {
    #[schema(example = 1)]
    pub employee_id: i64,
    /// Defaults to `Present`
    #[schema(example = "Present")]
    pub status: Option<String>,
    #[schema(example = "Client visit in the afternoon")]
    pub note: Option<String>,
    /// Defaults to `Office`
    #[schema(example = "Office")]
    pub location: Option<String>,
}

impl From<CheckInReq> for CheckIn {
    fn from(req: CheckInReq) -> Self {
        CheckIn {
            employee_id: req.employee_id,
            status: req.status,
            note: req.note,
            location: req.location,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckOutReq {
    #[schema(example = 1)]
    pub employee_id: i64,
}

/// Outcome of check-in and check-out. Business rule violations come back
/// with `success = false` and HTTP 200.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActionResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Check-in recorded")]
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
