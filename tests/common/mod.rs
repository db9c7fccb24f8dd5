#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use inkpost::config::db::DB;
use inkpost::model::comment::{Comment, NewComment};
use inkpost::model::post::{NewPost, Post, PostRow};
use inkpost::model::tag::Tag;
use inkpost::model::user::User;

pub const BASE_TS: i64 = 1_700_000_000_000;

pub async fn setup_db() -> DB {
    let db = DB::new("sqlite::memory:", 1).await.unwrap();
    db.migrate().await.unwrap();
    db
}

pub async fn staff(db: &DB, username: &str) -> User {
    User::create(db, username, true).await.unwrap()
}

pub async fn readers(db: &DB, prefix: &str, n: usize) -> Vec<User> {
    let mut users = Vec::with_capacity(n);
    for i in 0..n {
        users.push(User::create(db, &format!("{}{}", prefix, i), false).await.unwrap());
    }
    users
}

pub fn new_post(author: &User, slug: &str, published_at: i64) -> NewPost {
    NewPost {
        title: format!("Title of {}", slug),
        text: format!("Body of {}", slug),
        slug: slug.to_string(),
        image: None,
        published_at,
        author_id: author.id,
    }
}

pub async fn post(db: &DB, author: &User, slug: &str, published_at: i64) -> PostRow {
    Post::create(db, &new_post(author, slug, published_at)).await.unwrap()
}

pub async fn post_in_year(db: &DB, author: &User, slug: &str, year: i32) -> PostRow {
    let ts = Utc.with_ymd_and_hms(year, 6, 1, 12, 0, 0).unwrap().timestamp_millis();
    post(db, author, slug, ts).await
}

pub async fn like_by(db: &DB, post: &PostRow, users: &[User]) {
    for user in users {
        Post::like(db, post.id, user.id).await.unwrap();
    }
}

pub async fn comment_n(db: &DB, post: &PostRow, author: &User, n: usize) {
    for i in 0..n {
        Comment::create(
            db,
            &NewComment {
                post_id: post.id,
                author_id: author.id,
                text: format!("comment {}", i),
                published_at: post.published_at + 1000 * (i as i64 + 1),
            },
        )
        .await
        .unwrap();
    }
}

pub async fn tag(db: &DB, title: &str) -> Tag {
    Tag::create(db, title).await.unwrap()
}

pub async fn tag_post(db: &DB, post: &PostRow, tags: &[&Tag]) {
    let ids: Vec<i64> = tags.iter().map(|tag| tag.id).collect();
    Post::add_tags(db, post.id, &ids).await.unwrap();
}
