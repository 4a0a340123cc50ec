use chrono::{DateTime, Utc};

use serde::Serialize;

use crate::error::RestResult;
use crate::media::ImageResolver;
use crate::model::Theme;
use crate::telemetry::spawn_blocking_with_tracing;

/// Hero-section fields of a theme
#[derive(Debug, Serialize)]
pub struct ThemeView {
    pub id: i64,
    pub theme_name: String,
    pub hero_image: Option<String>,
    pub hero_blur_data_url: String,
    pub hero_image_alt: String,
    pub hero_box_color: String,
    pub show_navbar: bool,

    /// Only present in the administrative listing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ThemeView {
    fn new(theme: Theme, images: &ImageResolver, admin: bool) -> Self {
        let hero = theme.hero_image.as_deref();
        Self {
            id: theme.id,
            hero_image: images.url(hero),
            hero_blur_data_url: images.placeholder(hero),
            theme_name: theme.name,
            hero_image_alt: theme.hero_image_alt,
            hero_box_color: theme.hero_box_color,
            show_navbar: theme.show_navbar,
            active: admin.then_some(theme.active),
            title: admin.then_some(theme.title),
            created_at: admin.then_some(theme.created_at),
        }
    }
}

/// Representations of `themes`, with the administrative fields when `admin` is set
pub async fn theme_view(
    themes: Vec<Theme>,
    images: ImageResolver,
    admin: bool,
) -> RestResult<Vec<ThemeView>> {
    let views = spawn_blocking_with_tracing(move || {
        themes
            .into_iter()
            .map(|theme| ThemeView::new(theme, &images, admin))
            .collect::<Vec<_>>()
    })
    .await?;
    Ok(views)
}
