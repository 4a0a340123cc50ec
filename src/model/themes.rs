use chrono::{DateTime, Utc};

use crate::domain::HexColor;

/// Stored theme joined with its extended hero-section record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Theme {
    pub id: i64,
    pub name: String,
    /// At most one theme is active
    pub active: bool,
    pub title: String,
    pub created_at: DateTime<Utc>,

    pub hero_image: Option<String>,
    pub hero_image_alt: String,
    pub hero_box_color: String,
    pub show_navbar: bool,
}

/// New admin theme, its extended record is created alongside with defaults
#[derive(Debug, Clone)]
pub struct NewTheme {
    pub name: String,
    pub title: String,
    pub active: bool,
}

/// Validated hero-section fields
#[derive(Debug, Clone)]
pub struct ExtendedThemeForm {
    pub hero_image: Option<String>,
    pub hero_image_alt: String,
    pub hero_box_color: HexColor,
    pub show_navbar: bool,
}

impl From<&Theme> for ExtendedThemeForm {
    fn from(theme: &Theme) -> Self {
        Self {
            hero_image: theme.hero_image.clone(),
            hero_image_alt: theme.hero_image_alt.clone(),
            hero_box_color: theme.hero_box_color.parse().unwrap_or_default(),
            show_navbar: theme.show_navbar,
        }
    }
}
