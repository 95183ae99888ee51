use crate::db::Store;
use crate::error::AppError;
use crate::model::attendance::AttendanceStats;
use crate::models::{ActionResponse, CheckInReq, CheckOutReq};
use crate::service::attendance;
use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use tracing::error;

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/checkin",
    request_body = CheckInReq,
    responses(
        (status = 200, description = "Check-in recorded, or refused by a business rule", body = ActionResponse, example = json!({
            "success": false,
            "message": "Already checked in today"
        })),
        (status = 400, description = "Malformed request body"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    store: web::Data<Store>,
    payload: web::Json<CheckInReq>,
) -> Result<impl Responder, AppError> {
    let now = Local::now().naive_local();
    attendance::check_in(store.get_ref(), payload.into_inner().into(), now).await?;

    Ok(HttpResponse::Ok().json(ActionResponse::ok("Check-in recorded")))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CheckOutReq,
    responses(
        (status = 200, description = "Check-out recorded, or refused by a business rule", body = ActionResponse, example = json!({
            "success": true,
            "message": "Check-out recorded"
        })),
        (status = 400, description = "Malformed request body"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    store: web::Data<Store>,
    payload: web::Json<CheckOutReq>,
) -> Result<impl Responder, AppError> {
    let now = Local::now().naive_local();
    attendance::check_out(store.get_ref(), payload.employee_id, now).await?;

    Ok(HttpResponse::Ok().json(ActionResponse::ok("Check-out recorded")))
}

/// Last 10 attendance records of an employee
#[utoipa::path(
    get,
    path = "/api/presensi/{employee_id}",
    params(
        ("employee_id" = i64, Path, description = "Employee id")
    ),
    responses(
        (status = 200, description = "Newest first, empty when there is nothing to show", body = [HistoryEntry])
    ),
    tag = "Attendance"
)]
pub async fn history(store: web::Data<Store>, path: web::Path<i64>) -> impl Responder {
    let employee_id = path.into_inner();

    let entries = match attendance::history(store.get_ref(), employee_id).await {
        Ok(entries) => entries,
        Err(e) => {
            error!(error = %e, employee_id, "Failed to load attendance history");
            Vec::new()
        }
    };

    HttpResponse::Ok().json(entries)
}

/// Dashboard statistics for today
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Zeroed when the database cannot be read", body = AttendanceStats)
    ),
    tag = "Dashboard"
)]
pub async fn dashboard_stats(store: web::Data<Store>) -> impl Responder {
    let today = Local::now().date_naive();

    let stats = attendance::stats(store.get_ref(), today)
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "Failed to compute dashboard stats");
            AttendanceStats::default()
        });

    HttpResponse::Ok().json(stats)
}
