use crate::utils::db_utils::SqlBuilder;
use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use tracing::{info, warn};

pub const DEFAULT_SQLITE_URL: &str = "sqlite://presensi.db?mode=rwc";

/// SQL dialect of the selected backend.
///
/// Everything that differs between PostgreSQL and SQLite is answered here so
/// call sites build a single statement for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

/// How a bound parameter has to be presented to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Plain,
    Date,
    Time,
}

impl Dialect {
    /// Placeholder for the `n`-th (1-based) bound parameter.
    pub fn placeholder(self, n: usize, kind: ParamKind) -> String {
        match self {
            Dialect::Sqlite => "?".to_string(),
            Dialect::Postgres => match kind {
                ParamKind::Plain => format!("${n}"),
                ParamKind::Date => format!("${n}::date"),
                ParamKind::Time => format!("${n}::time"),
            },
        }
    }

    pub fn id_column(self) -> &'static str {
        match self {
            Dialect::Postgres => "BIGSERIAL PRIMARY KEY",
            Dialect::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
        }
    }

    /// Start of an insert that silently skips rows hitting a unique key.
    pub fn insert_ignore_head(self, table: &str, columns: &[&str]) -> String {
        let verb = match self {
            Dialect::Postgres => "INSERT INTO",
            Dialect::Sqlite => "INSERT OR IGNORE INTO",
        };
        format!("{verb} {table} ({}) VALUES ", columns.join(", "))
    }

    /// Trailer matching [`Dialect::insert_ignore_head`].
    pub fn insert_ignore_tail(self, conflict_column: &str) -> String {
        match self {
            Dialect::Postgres => format!(" ON CONFLICT ({conflict_column}) DO NOTHING"),
            Dialect::Sqlite => String::new(),
        }
    }
}

/// Backend chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseTarget {
    pub dialect: Dialect,
    pub url: String,
}

impl DatabaseTarget {
    pub fn sqlite(url: impl Into<String>) -> Self {
        Self {
            dialect: Dialect::Sqlite,
            url: url.into(),
        }
    }

    pub fn resolve(database_url: Option<&str>) -> Self {
        let Some(url) = database_url.map(str::trim).filter(|u| !u.is_empty()) else {
            info!(url = DEFAULT_SQLITE_URL, "DATABASE_URL not set, using embedded SQLite");
            return Self::sqlite(DEFAULT_SQLITE_URL);
        };

        if is_postgres_url(url) {
            if cfg!(feature = "postgres") {
                info!("Using PostgreSQL backend");
                return Self {
                    dialect: Dialect::Postgres,
                    url: url.to_string(),
                };
            }
            warn!(
                fallback = DEFAULT_SQLITE_URL,
                "PostgreSQL driver not available in this build, falling back to embedded SQLite"
            );
            return Self::sqlite(DEFAULT_SQLITE_URL);
        }

        if url.starts_with("sqlite:") {
            info!(url, "Using SQLite backend");
            return Self::sqlite(url);
        }

        warn!(
            fallback = DEFAULT_SQLITE_URL,
            "Unsupported DATABASE_URL scheme, falling back to embedded SQLite"
        );
        Self::sqlite(DEFAULT_SQLITE_URL)
    }
}

fn is_postgres_url(url: &str) -> bool {
    url.starts_with("postgres://") || url.starts_with("postgresql://")
}

/// Pool plus the dialect its statements must be written in.
#[derive(Clone, Debug)]
pub struct Store {
    pool: AnyPool,
    dialect: Dialect,
}

impl Store {
    /// Connections are opened on first use, so an unreachable server only
    /// fails the requests that need it.
    pub fn connect_lazy(target: &DatabaseTarget, max_connections: u32) -> Result<Self, sqlx::Error> {
        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_lazy(&target.url)?;

        Ok(Self {
            pool,
            dialect: target.dialect,
        })
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn sql(&self) -> SqlBuilder {
        SqlBuilder::new(self.dialect)
    }
}
