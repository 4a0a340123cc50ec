use reqwest::StatusCode;

use sqlx::PgPool;

use crate::helpers::TestApp;

#[sqlx::test]
async fn list_is_ordered_by_name(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let rust = app.create_category("Rust").await;
    app.create_category("Databases").await;

    let body = app.get_json("api/v1/categories/").await;

    assert_eq!(2, body["count"]);
    assert!(body["next"].is_null());
    assert_eq!("Databases", body["results"][0]["name"]);
    assert_eq!(
        serde_json::json!({
            "id": rust,
            "name": "Rust",
            "slug": "rust",
            "description": "All about Rust",
        }),
        body["results"][1]
    );

    Ok(())
}

#[sqlx::test]
async fn empty_list_has_a_first_page(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let body = app.get_json("api/v1/categories/").await;
    assert_eq!(0, body["count"]);
    assert_eq!(serde_json::json!([]), body["results"]);

    let res = app
        .get("api/v1/categories/?page=2")
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::NOT_FOUND, res.status());

    Ok(())
}

#[sqlx::test]
async fn detail_is_looked_up_by_slug(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    app.create_category("Web Development").await;

    let body = app.get_json("api/v1/categories/web-development/").await;
    assert_eq!("Web Development", body["name"]);

    let res = app
        .get("api/v1/categories/missing/")
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::NOT_FOUND, res.status());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!("Not found.", body["detail"]);

    Ok(())
}
