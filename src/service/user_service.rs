use crate::config::db::DB;
use crate::errors::{bad_request, not_found, AppResult};
use crate::model::user::User;

impl User {
    pub async fn create(db: &DB, username: &str, is_staff: bool) -> AppResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(bad_request("username can not be empty"));
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, is_staff)
            VALUES (?, ?)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(is_staff)
        .fetch_one(db.conn())
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(db: &DB, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(db.conn())
            .await?;

        Ok(user)
    }

    /// Removing a user removes their posts, comments and likes as well.
    pub async fn delete(db: &DB, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(db.conn())
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("user not found"));
        }
        Ok(())
    }
}
