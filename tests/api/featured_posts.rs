use sqlx::PgPool;

use crate::helpers::{TestApp, TestPost};

#[sqlx::test]
async fn only_published_featured_posts_are_listed(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    app.create_post(TestPost {
        is_featured: true,
        ..TestPost::published("Featured")
    })
    .await;
    app.create_post(TestPost {
        is_featured: true,
        ..TestPost::draft("Featured Draft")
    })
    .await;
    app.create_post(TestPost::published("Regular")).await;

    let body = app.get_json("api/v1/featured-posts/").await;

    assert_eq!(1, body["count"]);
    assert_eq!("Featured", body["results"][0]["title"]);
    assert_eq!(true, body["results"][0]["is_featured"]);

    Ok(())
}

#[sqlx::test]
async fn featured_posts_filter_by_category(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let rust = app.create_category("Rust").await;
    let go = app.create_category("Go").await;

    for (title, category) in [("Rust Pick", rust), ("Go Pick", go)] {
        app.create_post(TestPost {
            is_featured: true,
            categories: vec![category],
            ..TestPost::published(title)
        })
        .await;
    }

    let body = app.get_json("api/v1/featured-posts/?category=go").await;
    assert_eq!(1, body["count"]);
    assert_eq!("Go Pick", body["results"][0]["title"]);

    let body = app.get_json("api/v1/featured-posts/?category=").await;
    assert_eq!(2, body["count"]);

    Ok(())
}
