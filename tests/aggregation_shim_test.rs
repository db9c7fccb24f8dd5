mod common;

use common::*;
use inkpost::config::db::DB;
use inkpost::model::post::Post;
use inkpost::service::post_service::PostQuery;

async fn seed_posts(db: &DB, n: usize) {
    let author = staff(db, "admin").await;
    let commenter = staff(db, "commenter").await;
    for i in 0..n {
        let p = post(db, &author, &format!("post-{}", i), BASE_TS + i as i64).await;
        if i % 3 == 0 {
            comment_n(db, &p, &commenter, 2).await;
        }
    }
}

async fn queries_for_comment_counts(n: usize) -> (u64, Vec<Post>) {
    let db = setup_db().await;
    seed_posts(&db, n).await;

    let mut posts = PostQuery::new().fetch(&db).await.unwrap();
    assert_eq!(posts.len(), n);

    let before = db.query_count();
    Post::attach_comments_count(&db, &mut posts).await.unwrap();
    (db.query_count() - before, posts)
}

#[tokio::test]
async fn test_single_post_costs_one_query() {
    let (queries, posts) = queries_for_comment_counts(1).await;
    assert_eq!(queries, 1);
    assert_eq!(posts[0].comments_count, 2);
}

#[tokio::test]
async fn test_thousand_posts_cost_one_query() {
    let (queries, posts) = queries_for_comment_counts(1000).await;
    assert_eq!(queries, 1);

    for post in &posts {
        let index: usize = post.row.slug.trim_start_matches("post-").parse().unwrap();
        let expected = if index % 3 == 0 { 2 } else { 0 };
        assert_eq!(post.comments_count, expected, "{}", post.row.slug);
    }
}

#[tokio::test]
async fn test_empty_slice_costs_nothing() {
    let db = setup_db().await;
    let mut posts: Vec<Post> = vec![];

    let before = db.query_count();
    let attached = Post::attach_comments_count(&db, &mut posts).await.unwrap();
    assert!(attached.is_empty());
    assert_eq!(db.query_count(), before);
}

#[tokio::test]
async fn test_returns_same_posts_in_same_order() {
    let db = setup_db().await;
    seed_posts(&db, 4).await;

    let mut posts = PostQuery::new().fetch(&db).await.unwrap();
    let slugs: Vec<String> = posts.iter().map(|p| p.row.slug.clone()).collect();

    let attached = Post::attach_comments_count(&db, &mut posts).await.unwrap();
    let attached_slugs: Vec<String> = attached.iter().map(|p| p.row.slug.clone()).collect();
    assert_eq!(attached_slugs, slugs);
}

#[tokio::test]
async fn test_listing_cost_does_not_grow_with_size() {
    let db = setup_db().await;
    seed_posts(&db, 50).await;

    let before = db.query_count();
    let posts = PostQuery::new()
        .popular()
        .with_comments_count()
        .fetch(&db)
        .await
        .unwrap();

    assert_eq!(posts.len(), 50);
    // the post rows plus one batched lookup of their tags
    assert_eq!(db.query_count() - before, 2);
}

#[tokio::test]
async fn test_overrides_counts_from_earlier_reads() {
    let db = setup_db().await;
    seed_posts(&db, 1).await;

    let mut posts = PostQuery::new().fetch(&db).await.unwrap();
    posts[0].comments_count = 42;
    Post::attach_comments_count(&db, &mut posts).await.unwrap();
    assert_eq!(posts[0].comments_count, 2);
}
