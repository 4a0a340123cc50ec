use chrono::{Duration, Utc};

use reqwest::StatusCode;

use sqlx::PgPool;

use quill::media::FALLBACK_PLACEHOLDER;

use crate::helpers::{TestApp, TestPost};

#[sqlx::test]
async fn list_only_contains_published_posts(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    app.create_post(TestPost::published("Visible")).await;
    app.create_post(TestPost::draft("Hidden")).await;

    let body = app.get_json("api/v1/posts/").await;

    assert_eq!(1, body["count"]);
    assert!(body["next"].is_null());
    assert!(body["previous"].is_null());
    assert_eq!("Visible", body["results"][0]["title"]);

    Ok(())
}

#[sqlx::test]
async fn list_items_have_the_expected_fields(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let category = app.create_category("Rust").await;

    app.create_post(TestPost {
        categories: vec![category],
        tags: vec!["async".into()],
        content: "word ".repeat(500),
        ..TestPost::published("Fields")
    })
    .await;

    let body = app.get_json("api/v1/posts/").await;
    let post = &body["results"][0];

    for field in [
        "id",
        "title",
        "slug",
        "excerpt",
        "featured_image",
        "blur_data_url",
        "published_at",
        "categories",
        "tags",
        "reading_time",
        "is_featured",
    ] {
        assert!(post.get(field).is_some(), "Missing field {}", field);
    }
    assert!(post.get("content").is_none());

    assert_eq!("fields", post["slug"]);
    assert_eq!(2, post["reading_time"]);
    assert_eq!(FALLBACK_PLACEHOLDER, post["blur_data_url"]);
    assert_eq!(
        serde_json::json!([{
            "id": category,
            "name": "Rust",
            "slug": "rust",
            "description": "All about Rust",
        }]),
        post["categories"]
    );
    assert_eq!(serde_json::json!(["async"]), post["tags"]);

    Ok(())
}

#[sqlx::test]
async fn list_is_paginated_by_ten(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    for i in 0..12 {
        app.create_post(TestPost {
            published_at: Utc::now() - Duration::minutes(i),
            ..TestPost::published(&format!("Post {}", i))
        })
        .await;
    }

    let first = app.get_json("api/v1/posts/").await;
    assert_eq!(12, first["count"]);
    assert_eq!(10, first["results"].as_array().unwrap().len());
    assert_eq!("Post 0", first["results"][0]["title"]);
    assert!(first["next"]
        .as_str()
        .unwrap()
        .ends_with("/api/v1/posts/?page=2"));

    let second = app.get_json("api/v1/posts/?page=2").await;
    assert_eq!(2, second["results"].as_array().unwrap().len());
    assert!(second["next"].is_null());
    assert!(second["previous"]
        .as_str()
        .unwrap()
        .ends_with("/api/v1/posts/"));

    Ok(())
}

#[sqlx::test]
async fn invalid_pages_are_not_found(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    app.create_post(TestPost::published("Only")).await;

    for page in ["0", "2", "abc", "-1"] {
        let res = app
            .get(&format!("api/v1/posts/?page={}", page))
            .await
            .expect("Failed to execute request");

        assert_eq!(StatusCode::NOT_FOUND, res.status(), "page={}", page);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!("Invalid page.", body["detail"]);
    }

    Ok(())
}

#[sqlx::test]
async fn list_filters_by_category_tag_and_featured(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let rust = app.create_category("Rust").await;
    let go = app.create_category("Go").await;

    app.create_post(TestPost {
        categories: vec![rust],
        tags: vec!["async".into()],
        is_featured: true,
        ..TestPost::published("Rust Async")
    })
    .await;
    app.create_post(TestPost {
        categories: vec![go],
        tags: vec!["async".into()],
        ..TestPost::published("Go Routines")
    })
    .await;

    let by_category = app.get_json("api/v1/posts/?category=rust").await;
    assert_eq!(1, by_category["count"]);
    assert_eq!("Rust Async", by_category["results"][0]["title"]);

    let by_slug = app.get_json("api/v1/posts/?categories__slug=go").await;
    assert_eq!("Go Routines", by_slug["results"][0]["title"]);

    let by_tag = app.get_json("api/v1/posts/?tags__name=async").await;
    assert_eq!(2, by_tag["count"]);

    let featured = app.get_json("api/v1/posts/?is_featured=True").await;
    assert_eq!(1, featured["count"]);

    let ignored = app.get_json("api/v1/posts/?is_featured=maybe").await;
    assert_eq!(2, ignored["count"]);

    Ok(())
}

#[sqlx::test]
async fn list_search_and_ordering(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    app.create_post(TestPost {
        content: "Ownership and borrowing".into(),
        ..TestPost::published("Beta")
    })
    .await;
    app.create_post(TestPost {
        content: "Garbage collection".into(),
        ..TestPost::published("Alpha")
    })
    .await;

    let search = app.get_json("api/v1/posts/?search=OWNERSHIP").await;
    assert_eq!(1, search["count"]);
    assert_eq!("Beta", search["results"][0]["title"]);

    let both_terms = app.get_json("api/v1/posts/?search=beta,garbage").await;
    assert_eq!(0, both_terms["count"]);

    let ordered = app.get_json("api/v1/posts/?ordering=title").await;
    assert_eq!("Alpha", ordered["results"][0]["title"]);
    assert_eq!("Beta", ordered["results"][1]["title"]);

    let reversed = app.get_json("api/v1/posts/?ordering=-title").await;
    assert_eq!("Beta", reversed["results"][0]["title"]);

    Ok(())
}

#[sqlx::test]
async fn detail_returns_published_post_by_slug(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    app.write_image("posts/cover.png");

    app.create_post(TestPost {
        featured_image: Some("posts/cover.png".into()),
        ..TestPost::published("Hello World")
    })
    .await;

    let post = app.get_json("api/v1/posts/hello-world/").await;

    assert_eq!("Hello World", post["title"]);
    assert_eq!("The body of Hello World", post["content"]);
    assert!(post["featured_image"]
        .as_str()
        .unwrap()
        .ends_with("/media/posts/cover.png"));
    assert!(post["blur_data_url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));
    assert_eq!(FALLBACK_PLACEHOLDER, post["side_image_1_blur_data_url"]);
    assert!(post["created_at"].is_string());
    assert!(post["updated_at"].is_string());

    Ok(())
}

#[sqlx::test]
async fn detail_of_draft_or_missing_post_is_not_found(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    app.create_post(TestPost::draft("Secret Draft")).await;

    for slug in ["secret-draft", "does-not-exist"] {
        let res = app
            .get(&format!("api/v1/posts/{}/", slug))
            .await
            .expect("Failed to execute request");
        assert_eq!(StatusCode::NOT_FOUND, res.status());
    }

    Ok(())
}

#[sqlx::test]
async fn external_images_are_passed_through(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    app.create_post(TestPost {
        featured_image: Some("https%3A/picsum.photos/seed/x/800/600".into()),
        ..TestPost::published("Remote")
    })
    .await;

    let post = app.get_json("api/v1/posts/remote/").await;
    assert_eq!("https://picsum.photos/seed/x/800/600", post["featured_image"]);
    assert_eq!(FALLBACK_PLACEHOLDER, post["blur_data_url"]);

    Ok(())
}
