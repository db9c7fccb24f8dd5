use crate::config::db::DB;
use crate::errors::{not_found, AppResult};
use crate::model::tag::{normalize_title, NewTag, Tag, TagWithPostCount};
use derive_more::Display;
use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum TagOrdering {
    #[default]
    #[display("t.title ASC")]
    Title,
    #[display("posts_count DESC, t.title ASC")]
    Popular,
}

/// Read query over tags; every row carries the number of posts referencing it.
#[derive(Debug, Clone, Default)]
pub struct TagQuery {
    ordering: TagOrdering,
    limit: Option<i64>,
}

impl TagQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most used tags first. Unused tags sort last with a count of zero.
    pub fn popular(mut self) -> Self {
        self.ordering = TagOrdering::Popular;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub async fn fetch(&self, db: &DB) -> AppResult<Vec<TagWithPostCount>> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT t.id, t.title,
                   (SELECT COUNT(*) FROM post_tags pt WHERE pt.tag_id = t.id) AS posts_count
            FROM tags t
            "#,
        );

        builder.push(format!(" ORDER BY {}", self.ordering));

        if let Some(limit) = self.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        debug!("tag query: {}", builder.sql());

        let tags = builder
            .build_query_as::<TagWithPostCount>()
            .fetch_all(db.conn())
            .await?;

        Ok(tags)
    }
}

impl Tag {
    /// Inserts a tag under its normalized title. A title that is already taken is
    /// rejected by the UNIQUE constraint and surfaces as the original sqlx error.
    pub async fn create(db: &DB, title: &str) -> AppResult<Tag> {
        let new_tag = NewTag::normalized(title);
        new_tag.validate()?;

        let tag = sqlx::query_as::<_, Tag>("INSERT INTO tags (title) VALUES (?) RETURNING *")
            .bind(&new_tag.title)
            .fetch_one(db.conn())
            .await?;

        Ok(tag)
    }

    pub async fn find_by_title(db: &DB, title: &str) -> AppResult<Tag> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE title = ?")
            .bind(normalize_title(title))
            .fetch_optional(db.conn())
            .await?
            .ok_or_else(|| not_found("tag not found"))
    }
}
