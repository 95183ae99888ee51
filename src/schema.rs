use crate::db::Store;
use crate::model::employee::SEED_EMPLOYEES;
use tracing::{debug, warn};

const UNIQUE_DAY_INDEX: &str = r#"
    CREATE UNIQUE INDEX IF NOT EXISTS attendance_employee_date_key
    ON attendance (employee_id, date)
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaReport {
    /// Seed employees inserted by this run.
    pub seeded: u64,
    /// False when existing duplicate rows keep the daily index from being built.
    pub unique_index: bool,
}

/// Creates the tables, the daily uniqueness index and the seed employees if
/// any of them are missing. Safe to call any number of times.
///
/// Every statement commits on its own. A failed index creation is logged and
/// does not stop the seeding.
pub async fn initialize(store: &Store) -> Result<SchemaReport, sqlx::Error> {
    let dialect = store.dialect();
    let id_column = dialect.id_column();

    let tables = [
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS employees (
                id {id_column},
                name VARCHAR(100) NOT NULL,
                email VARCHAR(100) UNIQUE NOT NULL,
                division VARCHAR(50),
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS attendance (
                id {id_column},
                employee_id BIGINT NOT NULL REFERENCES employees(id),
                date DATE NOT NULL DEFAULT CURRENT_DATE,
                check_in TIME,
                check_out TIME,
                status VARCHAR(20) NOT NULL DEFAULT 'Present',
                note TEXT,
                location VARCHAR(100),
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#
        ),
    ];

    for ddl in &tables {
        sqlx::query(ddl).execute(store.pool()).await?;
    }

    let unique_index = match sqlx::query(UNIQUE_DAY_INDEX).execute(store.pool()).await {
        Ok(_) => true,
        Err(e) => {
            warn!(error = %e, "Daily uniqueness index not created");
            false
        }
    };

    let mut sql = store.sql();
    sql.push(&dialect.insert_ignore_head("employees", &["name", "email", "division"]));
    for (i, (name, email, division)) in SEED_EMPLOYEES.iter().enumerate() {
        if i > 0 {
            sql.push(", ");
        }
        sql.push("(").push_bind_list([*name, *email, *division]).push(")");
    }
    sql.push(&dialect.insert_ignore_tail("email"));
    let seed = sql.build();

    let seeded = seed.query().execute(store.pool()).await?.rows_affected();

    debug!(seeded, unique_index, "Schema initialized");
    Ok(SchemaReport {
        seeded,
        unique_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_store;

    #[actix_web::test]
    async fn first_run_seeds_five_employees() {
        let store = memory_store();
        let report = initialize(&store).await.unwrap();
        assert_eq!(report.seeded, 5);
        assert!(report.unique_index);
    }

    #[actix_web::test]
    async fn repeated_runs_are_noops() {
        let store = memory_store();
        initialize(&store).await.unwrap();
        let second = initialize(&store).await.unwrap();
        let third = initialize(&store).await.unwrap();
        assert_eq!(second.seeded, 0);
        assert_eq!(third.seeded, 0);

        let employees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(employees, 5);
    }

    #[actix_web::test]
    async fn daily_uniqueness_is_enforced_by_the_database() {
        let store = memory_store();
        initialize(&store).await.unwrap();

        let insert = "INSERT INTO attendance (employee_id, date, check_in) VALUES (1, '2026-02-02', '08:00:00')";
        sqlx::query(insert).execute(store.pool()).await.unwrap();
        let err = sqlx::query(insert).execute(store.pool()).await.unwrap_err();

        match err {
            sqlx::Error::Database(db) => assert!(db.is_unique_violation()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[actix_web::test]
    async fn existing_duplicates_only_skip_the_index() {
        let store = memory_store();
        let legacy = [
            "CREATE TABLE employees (id INTEGER PRIMARY KEY AUTOINCREMENT, name VARCHAR(100) NOT NULL, email VARCHAR(100) UNIQUE NOT NULL, division VARCHAR(50), created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP)",
            "CREATE TABLE attendance (id INTEGER PRIMARY KEY AUTOINCREMENT, employee_id BIGINT NOT NULL, date DATE NOT NULL, check_in TIME, check_out TIME, status VARCHAR(20) NOT NULL DEFAULT 'Present', note TEXT, location VARCHAR(100), created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP)",
            "INSERT INTO attendance (employee_id, date, check_in) VALUES (1, '2026-02-02', '08:00:00')",
            "INSERT INTO attendance (employee_id, date, check_in) VALUES (1, '2026-02-02', '08:10:00')",
        ];
        for sql in legacy {
            sqlx::query(sql).execute(store.pool()).await.unwrap();
        }

        let report = initialize(&store).await.unwrap();
        assert_eq!(
            report,
            SchemaReport {
                seeded: 5,
                unique_index: false,
            }
        );
    }
}
