use crate::model::tag::TagWithPostCount;
use crate::model::validator::validate_slug;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// which Rust types correspond to which sqlite column types:
// https://docs.rs/sqlx/latest/sqlx/sqlite/types/index.html
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub image: Option<String>,
    pub published_at: i64,
    pub author_id: i64,
}

/// Raw shape of a composed post query. The count columns are only present when the
/// query asked for them.
#[derive(Debug, FromRow)]
pub struct AnnotatedPostRow {
    #[sqlx(flatten)]
    pub row: PostRow,
    pub author_name: String,
    #[sqlx(default)]
    pub likes_count: Option<i64>,
    #[sqlx(default)]
    pub comments_count: Option<i64>,
}

/// A post decorated with the values derived for the current read.
///
/// Counts start at zero and are filled in by the query that loaded the post or by
/// [`Post::attach_comments_count`](crate::model::post::Post::attach_comments_count).
#[derive(Debug, Serialize, Clone)]
pub struct Post {
    #[serde(flatten)]
    pub row: PostRow,

    pub author_name: String,
    pub likes_count: i64,
    pub comments_count: i64,
    pub tags: Vec<TagWithPostCount>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            row,
            author_name: String::new(),
            likes_count: 0,
            comments_count: 0,
            tags: vec![],
        }
    }
}

impl From<AnnotatedPostRow> for Post {
    fn from(annotated: AnnotatedPostRow) -> Self {
        Self {
            author_name: annotated.author_name,
            likes_count: annotated.likes_count.unwrap_or(0),
            comments_count: annotated.comments_count.unwrap_or(0),
            ..Post::from(annotated.row)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum PostOrdering {
    #[default]
    #[display("p.published_at DESC, p.id DESC")]
    Fresh,
    #[display("likes_count DESC, p.published_at DESC")]
    Popular,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewPost {
    #[validate(length(min = 1, max = 200, message = "must be 1 to 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "can not be empty"))]
    pub text: String,
    #[validate(
        length(min = 1, max = 200, message = "must be 1 to 200 characters"),
        custom(function = "validate_slug")
    )]
    pub slug: String,
    pub image: Option<String>,
    pub published_at: i64,
    pub author_id: i64,
}
