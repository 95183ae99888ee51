use crate::utils::db_utils::try_get_nullable;
use serde::{Deserialize, Serialize};
use sqlx::any::AnyRow;
use sqlx::{FromRow, Row};
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Statuses offered by the check-in form. The API itself stores whatever
/// text it is given.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter,
)]
pub enum AttendanceStatus {
    #[default]
    Present,
    Permission,
    Sick,
    Leave,
}

impl AttendanceStatus {
    /// Badge colours used by the dashboard table.
    pub fn badge_class(status: &str) -> &'static str {
        match status.parse::<AttendanceStatus>() {
            Ok(AttendanceStatus::Present) => "badge-present",
            Ok(AttendanceStatus::Permission) => "badge-permission",
            Ok(AttendanceStatus::Sick) => "badge-sick",
            Ok(AttendanceStatus::Leave) => "badge-leave",
            Err(_) => "badge-other",
        }
    }
}

pub const DEFAULT_LOCATION: &str = "Office";

/// One row of `attendance`. Dates and times are read back as text
/// (`YYYY-MM-DD`, `HH:MM:SS`) so both backends produce the same values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = "2026-01-05", format = "date")]
    pub date: String,
    #[schema(example = "08:00:00", nullable = true)]
    pub check_in: Option<String>,
    #[schema(example = "17:00:00", nullable = true)]
    pub check_out: Option<String>,
    #[schema(example = "Present")]
    pub status: String,
    #[schema(example = "", nullable = true)]
    pub note: Option<String>,
    #[schema(example = "Office", nullable = true)]
    pub location: Option<String>,
}

/// Entry returned by the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "date": "2026-01-05",
    "check_in": "08:00:00",
    "check_out": "17:00:00",
    "status": "Present"
}))]
pub struct HistoryEntry {
    pub date: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub status: String,
}

/// Today's attendance row as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayAttendance {
    pub name: String,
    pub division: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub status: String,
    pub note: Option<String>,
}

// Nullable columns go through `try_get_nullable`: an open record has no
// check_out yet.
impl<'r> FromRow<'r, AnyRow> for AttendanceRecord {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            employee_id: row.try_get("employee_id")?,
            date: row.try_get("date")?,
            check_in: try_get_nullable(row, "check_in")?,
            check_out: try_get_nullable(row, "check_out")?,
            status: row.try_get("status")?,
            note: try_get_nullable(row, "note")?,
            location: try_get_nullable(row, "location")?,
        })
    }
}

impl<'r> FromRow<'r, AnyRow> for HistoryEntry {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            date: row.try_get("date")?,
            check_in: try_get_nullable(row, "check_in")?,
            check_out: try_get_nullable(row, "check_out")?,
            status: row.try_get("status")?,
        })
    }
}

impl<'r> FromRow<'r, AnyRow> for TodayAttendance {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            name: row.try_get("name")?,
            division: try_get_nullable(row, "division")?,
            check_in: try_get_nullable(row, "check_in")?,
            check_out: try_get_nullable(row, "check_out")?,
            status: row.try_get("status")?,
            note: try_get_nullable(row, "note")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "total_employees": 5,
    "present_today": 2,
    "total_records": 48,
    "attendance_rate": 40
}))]
pub struct AttendanceStats {
    pub total_employees: i64,
    pub present_today: i64,
    pub total_records: i64,
    pub attendance_rate: i64,
}

/// Counters rendered at the top of the dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, sqlx::FromRow)]
pub struct DashboardSummary {
    pub total_present: i64,
    pub total_employees: i64,
    pub total_absent_variant: i64,
}

/// Percentage of employees present, rounded half to even. Zero when there
/// are no employees.
pub fn attendance_rate(present: i64, total_employees: i64) -> i64 {
    if total_employees <= 0 {
        return 0;
    }
    (present as f64 / total_employees as f64 * 100.0).round_ties_even() as i64
}
