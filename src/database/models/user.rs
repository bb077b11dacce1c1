use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row from the users table. Only the columns needed to resolve a caller.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub username: String,
    pub name: String,
}
