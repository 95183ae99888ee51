use crate::db::{Dialect, ParamKind};
use chrono::{NaiveDate, NaiveTime};
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::query::{Query, QueryAs, QueryScalar};
use sqlx::{Any, Decode, FromRow, Row, Type, TypeInfo, ValueRef};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    I64(i64),
    Date(NaiveDate),
    Time(NaiveTime),
    Null,
}

impl SqlValue {
    fn kind(&self) -> ParamKind {
        match self {
            SqlValue::Date(_) => ParamKind::Date,
            SqlValue::Time(_) => ParamKind::Time,
            _ => ParamKind::Plain,
        }
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::String(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::String(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::I64(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<NaiveTime> for SqlValue {
    fn from(v: NaiveTime) -> Self {
        SqlValue::Time(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// ===============================
/// Dialect aware statement builder
/// ===============================
#[derive(Debug)]
pub struct SqlBuilder {
    dialect: Dialect,
    sql: String,
    values: Vec<SqlValue>,
}

impl SqlBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            values: Vec::new(),
        }
    }

    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    pub fn push_bind(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        let value = value.into();
        let placeholder = self.dialect.placeholder(self.values.len() + 1, value.kind());
        self.sql.push_str(&placeholder);
        self.values.push(value);
        self
    }

    /// Comma separated binds, e.g. the inside of a `VALUES (...)` tuple.
    pub fn push_bind_list<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.push_bind(value);
        }
        self
    }

    pub fn build(&mut self) -> Statement {
        Statement {
            sql: std::mem::take(&mut self.sql),
            values: std::mem::take(&mut self.values),
        }
    }
}

/// ===============================
/// Rendered SQL + values
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

// Dates and times travel as text; the dialect placeholder casts them where
// the server needs a typed parameter.
macro_rules! bind_values {
    ($query:expr, $values:expr) => {{
        let mut query = $query;
        for value in $values {
            query = match value {
                SqlValue::String(v) => query.bind(v.clone()),
                SqlValue::I64(v) => query.bind(*v),
                SqlValue::Date(v) => query.bind(v.format(DATE_FORMAT).to_string()),
                SqlValue::Time(v) => query.bind(v.format(TIME_FORMAT).to_string()),
                SqlValue::Null => query.bind(None::<String>),
            };
        }
        query
    }};
}

impl Statement {
    pub fn query(&self) -> Query<'_, Any, AnyArguments<'_>> {
        bind_values!(sqlx::query(&self.sql), &self.values)
    }

    pub fn query_as<T>(&self) -> QueryAs<'_, Any, T, AnyArguments<'_>>
    where
        T: for<'r> FromRow<'r, AnyRow>,
    {
        bind_values!(sqlx::query_as(&self.sql), &self.values)
    }

    pub fn query_scalar<T>(&self) -> QueryScalar<'_, Any, T, AnyArguments<'_>>
    where
        (T,): for<'r> FromRow<'r, AnyRow>,
    {
        bind_values!(sqlx::query_scalar(&self.sql), &self.values)
    }
}

/// Reads a column that may hold SQL NULL.
///
/// Any rows never report NULL through `is_null`; a NULL only shows up as a
/// value whose type is named `NULL`, which `Option<T>` refuses to decode.
pub fn try_get_nullable<'r, T>(row: &'r AnyRow, column: &str) -> Result<Option<T>, sqlx::Error>
where
    T: Decode<'r, Any> + Type<Any>,
{
    if row.try_get_raw(column)?.type_info().name() == "NULL" {
        return Ok(None);
    }
    row.try_get(column).map(Some)
}
