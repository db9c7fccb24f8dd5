use crate::config::db::DB;
use crate::errors::AppResult;
use crate::model::comment::{Comment, CommentWithAuthor, NewComment};
use validator::Validate;

impl Comment {
    pub async fn create(db: &DB, comment: &NewComment) -> AppResult<Comment> {
        comment.validate()?;

        let row = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, author_id, text, published_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.text)
        .bind(comment.published_at)
        .fetch_one(db.conn())
        .await?;

        Ok(row)
    }
}

impl CommentWithAuthor {
    /// Comments under a post, oldest first.
    pub async fn for_post(db: &DB, post_id: i64) -> AppResult<Vec<CommentWithAuthor>> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.*, u.username AS author_name
            FROM comments c
            INNER JOIN users u ON u.id = c.author_id
            WHERE c.post_id = ?
            ORDER BY c.published_at ASC, c.id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(db.conn())
        .await?;

        Ok(comments)
    }
}
