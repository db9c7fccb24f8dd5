use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, FromRow, Clone)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub text: String,
    pub published_at: i64,
}

/// A comment joined with its author's display name.
#[derive(Debug, FromRow, Clone)]
pub struct CommentWithAuthor {
    #[sqlx(flatten)]
    pub comment: Comment,
    pub author_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewComment {
    pub post_id: i64,
    pub author_id: i64,
    #[validate(length(min = 1, message = "can not be empty"))]
    pub text: String,
    pub published_at: i64,
}
