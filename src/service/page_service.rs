use crate::config::db::DB;
use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::model::comment::CommentWithAuthor;
use crate::model::post::Post;
use crate::model::tag::Tag;
use crate::presenter::{present_post, present_post_detail, present_tag, PostCard, PostDetail, TagCard};
use crate::service::post_service::PostQuery;
use crate::service::tag_service::TagQuery;
use serde::Serialize;
use tracing::debug;

/// Blocks rendered on every page.
#[derive(Debug, Serialize)]
pub struct Sidebar {
    pub most_popular_posts: Vec<PostCard>,
    pub popular_tags: Vec<TagCard>,
}

#[derive(Debug, Serialize)]
pub struct IndexPage {
    #[serde(flatten)]
    pub sidebar: Sidebar,
    pub page_posts: Vec<PostCard>,
}

#[derive(Debug, Serialize)]
pub struct PostDetailPage {
    #[serde(flatten)]
    pub sidebar: Sidebar,
    pub post: PostDetail,
}

#[derive(Debug, Serialize)]
pub struct TagFilterPage {
    #[serde(flatten)]
    pub sidebar: Sidebar,
    pub tag: String,
    pub posts: Vec<PostCard>,
}

pub async fn sidebar(db: &DB, config: &AppConfig) -> AppResult<Sidebar> {
    let mut popular_posts = PostQuery::new()
        .popular()
        .limit(config.site.popular_posts)
        .fetch(db)
        .await?;
    Post::attach_comments_count(db, &mut popular_posts).await?;

    let popular_tags = TagQuery::new()
        .popular()
        .limit(config.site.popular_tags)
        .fetch(db)
        .await?;

    Ok(Sidebar {
        most_popular_posts: present_posts(&popular_posts, config),
        popular_tags: popular_tags.iter().map(present_tag).collect(),
    })
}

pub async fn index_page(db: &DB, config: &AppConfig) -> AppResult<IndexPage> {
    let mut fresh_posts = PostQuery::new()
        .fresh()
        .with_likes_count()
        .limit(config.site.fresh_posts)
        .fetch(db)
        .await?;
    Post::attach_comments_count(db, &mut fresh_posts).await?;

    Ok(IndexPage {
        sidebar: sidebar(db, config).await?,
        page_posts: present_posts(&fresh_posts, config),
    })
}

pub async fn post_detail_page(db: &DB, config: &AppConfig, slug: &str) -> AppResult<PostDetailPage> {
    let post = Post::find_by_slug(db, slug).await?;
    let comments = CommentWithAuthor::for_post(db, post.row.id).await?;
    debug!("post {} has {} comments", post.row.slug, comments.len());

    Ok(PostDetailPage {
        post: present_post_detail(&post, &comments, &config.media.base_url),
        sidebar: sidebar(db, config).await?,
    })
}

/// Fails with Not Found when no tag has this title.
pub async fn tag_filter_page(db: &DB, config: &AppConfig, tag_title: &str) -> AppResult<TagFilterPage> {
    let tag = Tag::find_by_title(db, tag_title).await?;

    let mut related_posts = PostQuery::new()
        .tagged(tag.id)
        .popular()
        .limit(config.site.tag_posts)
        .fetch(db)
        .await?;
    Post::attach_comments_count(db, &mut related_posts).await?;

    Ok(TagFilterPage {
        sidebar: sidebar(db, config).await?,
        tag: tag.title,
        posts: present_posts(&related_posts, config),
    })
}

fn present_posts(posts: &[Post], config: &AppConfig) -> Vec<PostCard> {
    posts
        .iter()
        .map(|post| present_post(post, &config.media.base_url))
        .collect()
}
