use crate::model::attendance::{AttendanceStats, HistoryEntry};
use crate::models::{ActionResponse, CheckInReq, CheckOutReq};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Presensi API",
        version = "0.1.0",
        description = r#"
## Employee Attendance

Daily check-in and check-out per employee, with history and dashboard
statistics.

### Response format
- Check-in and check-out answer `{ "success": bool, "message": string }`.
  Business rule violations (already checked in, not checked in yet,
  unknown employee) come back with `success = false` and HTTP 200.
- Unknown endpoints answer 404 and server failures 500, both as
  `{ "error": string }`.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::history,
        crate::api::attendance::dashboard_stats,
    ),
    components(
        schemas(
            CheckInReq,
            CheckOutReq,
            ActionResponse,
            HistoryEntry,
            AttendanceStats
        )
    ),
    tags(
        (name = "Attendance", description = "Check-in, check-out and history"),
        (name = "Dashboard", description = "Attendance statistics"),
    )
)]
pub struct ApiDoc;
