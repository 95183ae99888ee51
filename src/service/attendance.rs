use crate::db::Store;
use crate::error::{AppError, Rejection};
use crate::model::attendance::{
    AttendanceRecord, AttendanceStats, AttendanceStatus, DEFAULT_LOCATION, DashboardSummary,
    HistoryEntry, TodayAttendance, attendance_rate,
};
use crate::model::employee::Employee;
use crate::utils::db_utils::{DATE_FORMAT, TIME_FORMAT};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::{debug, info, warn};

pub const HISTORY_LIMIT: i64 = 10;

const RECORD_COLUMNS: &str = r#"
    a.id, a.employee_id,
    CAST(a.date AS TEXT) AS date,
    CAST(a.check_in AS TEXT) AS check_in,
    CAST(a.check_out AS TEXT) AS check_out,
    a.status, a.note, a.location
"#;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckIn {
    pub employee_id: i64,
    pub status: Option<String>,
    pub note: Option<String>,
    pub location: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn clock_time(now: NaiveDateTime) -> NaiveTime {
    now.time().with_nanosecond(0).unwrap_or_else(|| now.time())
}

/// Records today's arrival for an employee.
///
/// The insert is a single statement that only writes when the employee
/// exists and has no record for `now`'s date. A concurrent duplicate that
/// still reaches the unique index is also reported as
/// [`Rejection::AlreadyCheckedIn`].
pub async fn check_in(
    store: &Store,
    request: CheckIn,
    now: NaiveDateTime,
) -> Result<AttendanceRecord, AppError> {
    let employee_id = request.employee_id;
    let today = now.date();

    let status =
        non_blank(request.status).unwrap_or_else(|| AttendanceStatus::default().to_string());
    let location = non_blank(request.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string());
    let note = request.note.unwrap_or_default();
    let check_in = clock_time(now);

    let insert = store
        .sql()
        .push(
            "INSERT INTO attendance (employee_id, date, check_in, status, note, location) SELECT e.id, ",
        )
        .push_bind(today)
        .push(", ")
        .push_bind(check_in)
        .push(", ")
        .push_bind_list([status.as_str(), note.as_str(), location.as_str()])
        .push(" FROM employees e WHERE e.id = ")
        .push_bind(employee_id)
        .push(" AND NOT EXISTS (SELECT 1 FROM attendance a WHERE a.employee_id = e.id AND a.date = ")
        .push_bind(today)
        .push(") RETURNING id")
        .build();

    let inserted = insert
        .query_scalar::<i64>()
        .fetch_optional(store.pool())
        .await
        .map_err(|e| duplicate_as_rejection(e, employee_id))?;

    let Some(id) = inserted else {
        if !employee_exists(store, employee_id).await? {
            return Err(Rejection::UnknownEmployee.into());
        }
        debug!(employee_id, %today, "Duplicate check-in rejected");
        return Err(Rejection::AlreadyCheckedIn.into());
    };

    info!(employee_id, id, %check_in, %status, "Checked in");

    Ok(AttendanceRecord {
        id,
        employee_id,
        date: today.format(DATE_FORMAT).to_string(),
        check_in: Some(check_in.format(TIME_FORMAT).to_string()),
        check_out: None,
        status,
        note: Some(note),
        location: Some(location),
    })
}

fn duplicate_as_rejection(err: sqlx::Error, employee_id: i64) -> AppError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            warn!(employee_id, "Concurrent check-in lost the race");
            Rejection::AlreadyCheckedIn.into()
        }
        other => other.into(),
    }
}

/// Closes today's open record for an employee.
///
/// Exactly one open record must exist; none gives
/// [`Rejection::NotCheckedIn`], several give
/// [`Rejection::MultipleOpenRecords`] and nothing is changed. The count is
/// part of the update itself.
pub async fn check_out(
    store: &Store,
    employee_id: i64,
    now: NaiveDateTime,
) -> Result<AttendanceRecord, AppError> {
    let today = now.date();
    let check_out = clock_time(now);

    let update = store
        .sql()
        .push("UPDATE attendance SET check_out = ")
        .push_bind(check_out)
        .push(" WHERE employee_id = ")
        .push_bind(employee_id)
        .push(" AND date = ")
        .push_bind(today)
        .push(" AND check_out IS NULL AND (SELECT COUNT(*) FROM attendance o WHERE o.employee_id = ")
        .push_bind(employee_id)
        .push(" AND o.date = ")
        .push_bind(today)
        .push(" AND o.check_out IS NULL) = 1 RETURNING id")
        .build();

    let Some(id) = update
        .query_scalar::<i64>()
        .fetch_optional(store.pool())
        .await?
    else {
        let open = count_open(store, employee_id, today).await?;
        if open > 1 {
            warn!(employee_id, %today, open, "Ambiguous check-out refused");
            return Err(Rejection::MultipleOpenRecords(open as usize).into());
        }
        return Err(Rejection::NotCheckedIn.into());
    };

    let record = fetch_record(store, id).await?;
    info!(employee_id, id, %check_out, "Checked out");

    Ok(record)
}

/// Latest records of an employee, newest date first.
pub async fn history(store: &Store, employee_id: i64) -> Result<Vec<HistoryEntry>, AppError> {
    let stmt = store
        .sql()
        .push(
            r#"
            SELECT CAST(a.date AS TEXT) AS date,
                   CAST(a.check_in AS TEXT) AS check_in,
                   CAST(a.check_out AS TEXT) AS check_out,
                   a.status
            FROM attendance a
            WHERE a.employee_id = "#,
        )
        .push_bind(employee_id)
        .push(" ORDER BY a.date DESC LIMIT ")
        .push_bind(HISTORY_LIMIT)
        .build();

    Ok(stmt.query_as().fetch_all(store.pool()).await?)
}

#[cfg(test)]
pub async fn find_record(
    store: &Store,
    employee_id: i64,
    date: NaiveDate,
) -> Result<Option<AttendanceRecord>, AppError> {
    let stmt = store
        .sql()
        .push(&format!("SELECT {RECORD_COLUMNS} FROM attendance a WHERE a.employee_id = "))
        .push_bind(employee_id)
        .push(" AND a.date = ")
        .push_bind(date)
        .build();

    Ok(stmt.query_as().fetch_optional(store.pool()).await?)
}

/// Figures served by the stats endpoint.
pub async fn stats(store: &Store, today: NaiveDate) -> Result<AttendanceStats, AppError> {
    let total_employees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
        .fetch_one(store.pool())
        .await?;

    let present = store
        .sql()
        .push("SELECT COUNT(DISTINCT a.employee_id) FROM attendance a WHERE a.date = ")
        .push_bind(today)
        .push(" AND a.status = ")
        .push_bind(AttendanceStatus::Present.to_string())
        .build();
    let present_today: i64 = present.query_scalar().fetch_one(store.pool()).await?;

    let total_records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance")
        .fetch_one(store.pool())
        .await?;

    Ok(AttendanceStats {
        total_employees,
        present_today,
        total_records,
        attendance_rate: attendance_rate(present_today, total_employees),
    })
}

/// Counters for the dashboard page. Anyone with a record today counts as
/// present; records with a status other than `Present` are counted apart.
pub async fn dashboard_summary(
    store: &Store,
    today: NaiveDate,
) -> Result<DashboardSummary, AppError> {
    let stmt = store
        .sql()
        .push(
            r#"
            SELECT
                COUNT(DISTINCT a.employee_id) AS total_present,
                (SELECT COUNT(*) FROM employees) AS total_employees,
                COUNT(CASE WHEN a.status <> "#,
        )
        .push_bind(AttendanceStatus::Present.to_string())
        .push(
            r#" THEN 1 END) AS total_absent_variant
            FROM attendance a
            WHERE a.date = "#,
        )
        .push_bind(today)
        .build();

    Ok(stmt.query_as().fetch_one(store.pool()).await?)
}

pub async fn todays_attendance(
    store: &Store,
    today: NaiveDate,
) -> Result<Vec<TodayAttendance>, AppError> {
    let stmt = store
        .sql()
        .push(
            r#"
            SELECT e.name, e.division,
                   CAST(a.check_in AS TEXT) AS check_in,
                   CAST(a.check_out AS TEXT) AS check_out,
                   a.status, a.note
            FROM attendance a
            JOIN employees e ON a.employee_id = e.id
            WHERE a.date = "#,
        )
        .push_bind(today)
        .push(" ORDER BY a.check_in DESC")
        .build();

    Ok(stmt.query_as().fetch_all(store.pool()).await?)
}

pub async fn list_employees(store: &Store) -> Result<Vec<Employee>, AppError> {
    Ok(
        sqlx::query_as("SELECT id, name, email, division FROM employees ORDER BY name")
            .fetch_all(store.pool())
            .await?,
    )
}

async fn employee_exists(store: &Store, employee_id: i64) -> Result<bool, sqlx::Error> {
    let stmt = store
        .sql()
        .push("SELECT id FROM employees WHERE id = ")
        .push_bind(employee_id)
        .build();
    Ok(stmt
        .query_scalar::<i64>()
        .fetch_optional(store.pool())
        .await?
        .is_some())
}

async fn count_open(store: &Store, employee_id: i64, today: NaiveDate) -> Result<i64, sqlx::Error> {
    let stmt = store
        .sql()
        .push("SELECT COUNT(*) FROM attendance a WHERE a.employee_id = ")
        .push_bind(employee_id)
        .push(" AND a.date = ")
        .push_bind(today)
        .push(" AND a.check_out IS NULL")
        .build();
    stmt.query_scalar().fetch_one(store.pool()).await
}

async fn fetch_record(store: &Store, id: i64) -> Result<AttendanceRecord, sqlx::Error> {
    let stmt = store
        .sql()
        .push(&format!("SELECT {RECORD_COLUMNS} FROM attendance a WHERE a.id = "))
        .push_bind(id)
        .build();
    stmt.query_as().fetch_one(store.pool()).await
}
