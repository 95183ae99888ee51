use crate::utils::db_utils::try_get_nullable;
use serde::{Deserialize, Serialize};
use sqlx::any::AnyRow;
use sqlx::{FromRow, Row};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Ahmad Rizki",
        "email": "ahmad@company.com",
        "division": "IT"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "Ahmad Rizki")]
    pub name: String,

    #[schema(example = "ahmad@company.com")]
    pub email: String,

    #[schema(example = "IT", nullable = true)]
    pub division: Option<String>,
}

impl<'r> FromRow<'r, AnyRow> for Employee {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            division: try_get_nullable(row, "division")?,
        })
    }
}

/// Fixed reference employees inserted by the schema initializer.
pub const SEED_EMPLOYEES: [(&str, &str, &str); 5] = [
    ("Ahmad Rizki", "ahmad@company.com", "IT"),
    ("Sari Dewi", "sari@company.com", "HR"),
    ("Budi Santoso", "budi@company.com", "Marketing"),
    ("Dewi Lestari", "dewi@company.com", "Finance"),
    ("Rizky Pratama", "rizky@company.com", "Operations"),
];
