use crate::db::Store;
use crate::service::attendance;
use crate::views;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use tracing::error;

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(body)
}

pub async fn index() -> impl Responder {
    html(views::index())
}

pub async fn presensi(store: web::Data<Store>) -> impl Responder {
    let employees = attendance::list_employees(store.get_ref())
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "Failed to load employees");
            Vec::new()
        });

    html(views::presensi(&employees))
}

pub async fn dashboard(store: web::Data<Store>) -> impl Responder {
    let today = Local::now().date_naive();

    let summary = attendance::dashboard_summary(store.get_ref(), today)
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "Failed to load dashboard summary");
            Default::default()
        });
    let rows = attendance::todays_attendance(store.get_ref(), today)
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "Failed to load today's attendance");
            Vec::new()
        });

    html(views::dashboard(&summary, &rows, today))
}
