use serde::Serialize;

use crate::domain::Slug;

/// Stored Category record
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
}

/// Validated category fields written by editors
#[derive(Debug, Clone)]
pub struct CategoryForm {
    pub name: String,
    pub slug: Slug,
    pub description: String,
}
