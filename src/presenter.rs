//! Shapes decorated entities into plain, template-ready records.
//!
//! Everything here is pure: the database has already been queried and the derived
//! counts are already attached to the values passed in.

use crate::model::comment::CommentWithAuthor;
use crate::model::post::Post;
use crate::model::tag::TagWithPostCount;
use crate::util::time::from_millis;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of characters kept in a post teaser.
pub const TEASER_LENGTH: usize = 200;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TagCard {
    pub title: String,
    pub posts_with_tag: i64,
}

/// A post as shown in listings.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PostCard {
    pub title: String,
    pub teaser_text: String,
    pub author: String,
    pub comments_amount: i64,
    pub likes_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<TagCard>,
    pub first_tag_title: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CommentCard {
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
}

/// A post as shown on its own page, with the full text and its comments inlined.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PostDetail {
    pub title: String,
    pub text: String,
    pub author: String,
    pub comments: Vec<CommentCard>,
    pub comments_amount: i64,
    pub likes_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<TagCard>,
}

pub fn present_tag(tag: &TagWithPostCount) -> TagCard {
    TagCard {
        title: tag.title.clone(),
        posts_with_tag: tag.posts_count,
    }
}

pub fn present_post(post: &Post, media_url: &str) -> PostCard {
    PostCard {
        title: post.row.title.clone(),
        teaser_text: teaser(&post.row.text),
        author: post.author_name.clone(),
        comments_amount: post.comments_count,
        likes_amount: post.likes_count,
        image_url: image_url(post.row.image.as_deref(), media_url),
        published_at: from_millis(post.row.published_at),
        slug: post.row.slug.clone(),
        tags: post.tags.iter().map(present_tag).collect(),
        first_tag_title: post.tags.first().map(|tag| tag.title.clone()),
    }
}

pub fn present_comment(comment: &CommentWithAuthor) -> CommentCard {
    CommentCard {
        text: comment.comment.text.clone(),
        published_at: from_millis(comment.comment.published_at),
        author: comment.author_name.clone(),
    }
}

pub fn present_post_detail(
    post: &Post,
    comments: &[CommentWithAuthor],
    media_url: &str,
) -> PostDetail {
    PostDetail {
        title: post.row.title.clone(),
        text: post.row.text.clone(),
        author: post.author_name.clone(),
        comments: comments.iter().map(present_comment).collect(),
        comments_amount: post.comments_count,
        likes_amount: post.likes_count,
        image_url: image_url(post.row.image.as_deref(), media_url),
        published_at: from_millis(post.row.published_at),
        slug: post.row.slug.clone(),
        tags: post.tags.iter().map(present_tag).collect(),
    }
}

/// First [`TEASER_LENGTH`] characters of the text. The cut ignores word boundaries.
pub fn teaser(text: &str) -> String {
    match text.char_indices().nth(TEASER_LENGTH) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

fn image_url(image: Option<&str>, media_url: &str) -> Option<String> {
    let image = image.filter(|image| !image.is_empty())?;
    Some(format!(
        "{}/{}",
        media_url.trim_end_matches('/'),
        image.trim_start_matches('/')
    ))
}
