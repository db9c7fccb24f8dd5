use crate::config::db::DB;
use crate::errors::{bad_request, not_found, AppError, AppResult};
use crate::model::post::{AnnotatedPostRow, NewPost, Post, PostOrdering, PostRow};
use crate::model::tag::{PostTagRow, TagWithPostCount};
use crate::model::user::User;
use crate::util::time::year_bounds;
use sqlx::{QueryBuilder, Sqlite};
use std::collections::HashMap;
use tracing::debug;
use validator::Validate;

/// Composable read query over posts.
///
/// Derived counts are computed with correlated subqueries, one scalar per post row,
/// so filters and the author join never multiply the rows being counted.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    slug: Option<String>,
    tag_id: Option<i64>,
    year: Option<i32>,
    likes_count: bool,
    comments_count: bool,
    ordering: PostOrdering,
    limit: Option<i64>,
}

impl PostQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the number of distinct users who liked each post.
    pub fn with_likes_count(mut self) -> Self {
        self.likes_count = true;
        self
    }

    /// Attach the number of comments under each post.
    pub fn with_comments_count(mut self) -> Self {
        self.comments_count = true;
        self
    }

    /// Most liked first.
    pub fn popular(self) -> Self {
        let mut query = self.with_likes_count();
        query.ordering = PostOrdering::Popular;
        query
    }

    /// Newest first, the default.
    pub fn fresh(mut self) -> Self {
        self.ordering = PostOrdering::Fresh;
        self
    }

    /// Only posts published within the given UTC calendar year.
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn tagged(mut self, tag_id: i64) -> Self {
        self.tag_id = Some(tag_id);
        self
    }

    pub fn slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    fn build(&self) -> AppResult<QueryBuilder<'static, Sqlite>> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT p.*, u.username AS author_name");

        if self.likes_count {
            builder.push(
                r#",
                (SELECT COUNT(DISTINCT pl.user_id)
                 FROM post_likes pl
                 WHERE pl.post_id = p.id) AS likes_count"#,
            );
        }

        if self.comments_count {
            builder.push(
                r#",
                (SELECT COUNT(*)
                 FROM comments c
                 WHERE c.post_id = p.id) AS comments_count"#,
            );
        }

        builder.push(" FROM posts p INNER JOIN users u ON u.id = p.author_id WHERE 1 = 1 ");

        if let Some(ref slug) = self.slug {
            builder.push(" AND p.slug = ").push_bind(slug.clone());
        }

        if let Some(tag_id) = self.tag_id {
            builder
                .push(" AND EXISTS (SELECT 1 FROM post_tags pt WHERE pt.post_id = p.id AND pt.tag_id = ")
                .push_bind(tag_id)
                .push(") ");
        }

        if let Some(year) = self.year {
            let (start, end) =
                year_bounds(year).ok_or_else(|| bad_request(&format!("invalid year: {}", year)))?;
            builder.push(" AND p.published_at >= ").push_bind(start);
            builder.push(" AND p.published_at < ").push_bind(end);
        }

        builder.push(format!(" ORDER BY {}", self.ordering));

        if let Some(limit) = self.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        Ok(builder)
    }

    /// Runs the query, then loads the tags of every returned post in one more query.
    pub async fn fetch(&self, db: &DB) -> AppResult<Vec<Post>> {
        let mut builder = self.build()?;
        debug!("post query: {}", builder.sql());

        let mut posts = builder
            .build_query_as::<AnnotatedPostRow>()
            .fetch_all(db.conn())
            .await?
            .into_iter()
            .map(Post::from)
            .collect::<Vec<_>>();

        Post::attach_tags(db, &mut posts).await?;

        Ok(posts)
    }

    pub async fn fetch_one(&self, db: &DB) -> AppResult<Option<Post>> {
        let posts = self.clone().limit(1).fetch(db).await?;
        Ok(posts.into_iter().next())
    }
}

impl Post {
    /// Full post for the detail page, with both counts attached.
    pub async fn find_by_slug(db: &DB, slug: &str) -> AppResult<Post> {
        PostQuery::new()
            .slug(slug)
            .with_likes_count()
            .with_comments_count()
            .fetch_one(db)
            .await?
            .ok_or_else(post_not_found)
    }

    /// Fills `comments_count` for posts already in hand.
    ///
    /// Costs exactly one query for any non-empty slice and none for an empty one.
    pub async fn attach_comments_count<'a>(
        db: &DB,
        posts: &'a mut [Post],
    ) -> AppResult<&'a mut [Post]> {
        if posts.is_empty() {
            return Ok(posts);
        }

        let post_ids = json_ids(posts.iter().map(|post| post.row.id))?;

        let counts: HashMap<i64, i64> = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT post_id, COUNT(*) AS comments_count
            FROM comments
            WHERE post_id IN (SELECT value FROM json_each(?1))
            GROUP BY post_id
            "#,
        )
        .bind(post_ids)
        .fetch_all(db.conn())
        .await?
        .into_iter()
        .collect();

        for post in posts.iter_mut() {
            post.comments_count = counts.get(&post.row.id).copied().unwrap_or(0);
        }

        Ok(posts)
    }

    pub async fn create(db: &DB, post: &NewPost) -> AppResult<PostRow> {
        post.validate()?;

        let author = User::find_by_id(db, post.author_id)
            .await?
            .ok_or_else(|| bad_request("author does not exist"))?;
        if !author.is_staff {
            return Err(bad_request("only staff users can author posts"));
        }

        let image = post.image.as_deref().filter(|image| !image.is_empty());

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, text, slug, image, published_at, author_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&post.title)
        .bind(&post.text)
        .bind(&post.slug)
        .bind(image)
        .bind(post.published_at)
        .bind(post.author_id)
        .fetch_one(db.conn())
        .await?;

        debug!("created post {} ({})", row.id, row.slug);
        Ok(row)
    }

    /// Links tags to a post; links that already exist are kept as they are.
    pub async fn add_tags(db: &DB, post_id: i64, tag_ids: &[i64]) -> AppResult<()> {
        if tag_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT OR IGNORE INTO post_tags (post_id, tag_id)
            SELECT ?1, value FROM json_each(?2)
            "#,
        )
        .bind(post_id)
        .bind(json_ids(tag_ids.iter().copied())?)
        .execute(db.conn())
        .await?;

        Ok(())
    }

    /// A user likes a post at most once, repeated likes are no-ops.
    pub async fn like(db: &DB, post_id: i64, user_id: i64) -> AppResult<()> {
        sqlx::query("INSERT OR IGNORE INTO post_likes (post_id, user_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(user_id)
            .execute(db.conn())
            .await?;

        Ok(())
    }

    /// Deletes a post together with its comments, likes and tag links.
    pub async fn delete(db: &DB, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(db.conn())
            .await?;

        if result.rows_affected() == 0 {
            return Err(post_not_found());
        }
        Ok(())
    }

    async fn attach_tags(db: &DB, posts: &mut [Post]) -> AppResult<()> {
        if posts.is_empty() {
            return Ok(());
        }

        let post_ids = json_ids(posts.iter().map(|post| post.row.id))?;

        let rows = sqlx::query_as::<_, PostTagRow>(
            r#"
            SELECT pt.post_id, t.id, t.title,
                   (SELECT COUNT(*) FROM post_tags x WHERE x.tag_id = t.id) AS posts_count
            FROM post_tags pt
            INNER JOIN tags t ON t.id = pt.tag_id
            WHERE pt.post_id IN (SELECT value FROM json_each(?1))
            ORDER BY t.title
            "#,
        )
        .bind(post_ids)
        .fetch_all(db.conn())
        .await?;

        let mut tags: HashMap<i64, Vec<TagWithPostCount>> = HashMap::new();
        for row in rows {
            tags.entry(row.post_id).or_default().push(row.tag);
        }

        for post in posts.iter_mut() {
            post.tags = tags.remove(&post.row.id).unwrap_or_default();
        }

        Ok(())
    }
}

// SQLite takes id sets as a JSON array expanded with json_each.
pub(crate) fn json_ids(ids: impl Iterator<Item = i64>) -> AppResult<String> {
    serde_json::to_string(&ids.collect::<Vec<_>>()).map_err(|err| AppError::Anyhow(err.into()))
}

fn post_not_found() -> AppError {
    not_found("post not found")
}
