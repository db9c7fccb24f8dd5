use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub is_staff: bool,
}
