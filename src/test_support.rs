use crate::db::{DatabaseTarget, Store};
use crate::schema;
use chrono::{NaiveDate, NaiveDateTime};

/// Private in-memory SQLite database. A single connection, since every
/// new SQLite connection to `:memory:` opens a fresh database.
pub fn memory_store() -> Store {
    Store::connect_lazy(&DatabaseTarget::sqlite("sqlite::memory:"), 1).unwrap()
}

pub async fn seeded_store() -> Store {
    let store = memory_store();
    schema::initialize(&store).await.unwrap();
    store
}

/// Seeded database in a file under `dir`, shared by several connections.
pub async fn file_store(dir: &tempfile::TempDir) -> Store {
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("presensi.db").display());
    let store = Store::connect_lazy(&DatabaseTarget::sqlite(url), 5).unwrap();
    schema::initialize(&store).await.unwrap();
    store
}

pub fn at(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}
