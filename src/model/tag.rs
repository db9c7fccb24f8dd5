use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Serialize, FromRow, Clone, PartialEq)]
pub struct Tag {
    pub id: i64,
    pub title: String,
}

/// A tag together with the number of posts referencing it.
/// The count is computed per query and never stored.
#[derive(Debug, Serialize, FromRow, Clone, PartialEq)]
pub struct TagWithPostCount {
    pub id: i64,
    pub title: String,
    pub posts_count: i64,
}

/// One tag of one post, as returned by the batched tag lookup for a post listing.
#[derive(Debug, FromRow)]
pub struct PostTagRow {
    pub post_id: i64,
    #[sqlx(flatten)]
    pub tag: TagWithPostCount,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewTag {
    #[validate(length(min = 1, max = 20, message = "must be 1 to 20 characters"))]
    pub title: String,
}

impl NewTag {
    /// Tag titles are stored trimmed and lowercased.
    pub fn normalized(title: &str) -> Self {
        NewTag {
            title: normalize_title(title),
        }
    }
}

pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}
