use reqwest::StatusCode;

use sqlx::PgPool;

use crate::helpers::TestApp;

#[sqlx::test]
async fn subscribe_returns_201_for_valid_data(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let body = serde_json::json!({
        "email": "Ursula_Le_Guin@Gmail.com",
        "name": "Ursula Le Guin",
    });
    let res = app.subscribe(&body).await.expect("Failed to execute request");

    assert_eq!(StatusCode::CREATED, res.status());
    let created: serde_json::Value = res.json().await.unwrap();
    assert!(created["id"].is_i64());
    assert_eq!("ursula_le_guin@gmail.com", created["email"]);
    assert_eq!("Ursula Le Guin", created["name"]);

    let (email, is_active): (String, bool) =
        sqlx::query_as("select email, is_active from subscribers")
            .fetch_one(&pool)
            .await?;
    assert_eq!("ursula_le_guin@gmail.com", email);
    assert!(is_active);

    Ok(())
}

#[sqlx::test]
async fn subscribe_without_name_is_accepted(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .subscribe(&serde_json::json!({ "email": "reader@example.com" }))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::CREATED, res.status());
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!("", created["name"]);

    Ok(())
}

#[sqlx::test]
async fn subscribe_twice_is_rejected(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let body = serde_json::json!({ "email": "reader@example.com" });

    let res = app.subscribe(&body).await.expect("Failed to execute request");
    assert_eq!(StatusCode::CREATED, res.status());

    let res = app
        .subscribe(&serde_json::json!({ "email": "READER@example.com" }))
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::BAD_REQUEST, res.status());

    let errors: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        serde_json::json!(["subscriber with this email already exists."]),
        errors["email"]
    );

    let count: i64 = sqlx::query_scalar("select count(*) from subscribers")
        .fetch_one(&pool)
        .await?;
    assert_eq!(1, count);

    Ok(())
}

#[sqlx::test]
async fn subscribe_returns_400_for_invalid_data(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let cases = [
        (serde_json::json!({ "name": "le guin" }), "email"),
        (serde_json::json!({ "email": "" }), "email"),
        (serde_json::json!({ "email": "definitely-not-an-email" }), "email"),
        (
            serde_json::json!({ "email": "reader@example.com", "name": "a".repeat(300) }),
            "name",
        ),
    ];

    for (body, field) in cases {
        let res = app.subscribe(&body).await.expect("Failed to execute request");

        assert_eq!(
            StatusCode::BAD_REQUEST,
            res.status(),
            "The API did not fail with 400 Bad Request for {}",
            body
        );
        let errors: serde_json::Value = res.json().await.unwrap();
        assert!(errors[field].is_array(), "No error for {} in {}", field, errors);
    }

    Ok(())
}

#[sqlx::test]
async fn names_over_the_column_limit_are_field_errors(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    // 200 visible letters, 400 characters with their combining accents
    let accented = "e\u{301}".repeat(200);
    let cases = [
        (
            serde_json::json!({ "email": "reader@example.com", "name": &accented }),
            "name",
        ),
        (
            serde_json::json!({ "email": format!("{}@example.com", accented) }),
            "email",
        ),
    ];

    for (body, field) in cases {
        let res = app.subscribe(&body).await.expect("Failed to execute request");

        assert_eq!(StatusCode::BAD_REQUEST, res.status());
        let errors: serde_json::Value = res.json().await.unwrap();
        assert!(errors[field].is_array(), "No error for {} in {}", field, errors);
    }

    Ok(())
}

#[sqlx::test]
async fn names_with_punctuation_are_accepted(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .subscribe(&serde_json::json!({
            "email": "ann@example.com",
            "name": "Ann (Editor) <ann/blog>",
        }))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::CREATED, res.status());
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!("Ann (Editor) <ann/blog>", created["name"]);

    Ok(())
}
