use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Persisted contact row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Request body for create and update.
///
/// Missing fields decode as empty strings so that validation, not the
/// decoder, reports which field is absent. Any `id` in the body is
/// ignored: create assigns one and update takes it from the path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContactInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl ContactInput {
    pub fn into_contact(self, id: i64) -> Contact {
        Contact {
            id,
            name: self.name,
            email: self.email,
        }
    }
}
