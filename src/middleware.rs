use crate::db::Store;
use crate::schema;
use actix_web::middleware::Next;
use actix_web::{
    Error,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use tracing::{error, warn};

/// Makes sure tables and seed rows exist before every request. Failures are
/// logged and the request goes on; a broken schema shows up in the queries
/// that depend on it.
pub async fn ensure_schema(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    match req.app_data::<Data<Store>>().cloned() {
        Some(store) => {
            if let Err(e) = schema::initialize(store.get_ref()).await {
                error!(error = %e, path = req.path(), "Schema initialization failed");
            }
        }
        None => warn!(path = req.path(), "Store missing from app data, schema not checked"),
    }

    next.call(req).await
}
