use sqlx::PgPool;

use quill::media::FALLBACK_PLACEHOLDER;

use crate::helpers::TestApp;

#[sqlx::test]
async fn no_active_theme_is_null(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    app.create_theme("Dormant", false).await;

    let body = app.get_json("api/v1/theme/").await;
    assert!(body.is_null());

    Ok(())
}

#[sqlx::test]
async fn active_theme_is_returned_without_admin_fields(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    app.create_theme("Old", true).await;
    let id = app.create_theme("Current", true).await;

    let body = app.get_json("api/v1/theme/").await;

    assert_eq!(
        serde_json::json!({
            "id": id,
            "theme_name": "Current",
            "hero_image": null,
            "hero_blur_data_url": FALLBACK_PLACEHOLDER,
            "hero_image_alt": "",
            "hero_box_color": "#FFFFFF",
            "show_navbar": true,
        }),
        body
    );

    Ok(())
}
