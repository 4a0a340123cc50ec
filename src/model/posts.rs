use chrono::{DateTime, Utc};

use regex::Regex;

use crate::domain::{PostStatus, Slug};
use crate::model::Category;

const WORDS_PER_MINUTE: f64 = 200.0;

/// Stored Post record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    /// Markdown source
    pub content: String,
    pub excerpt: String,
    /// Image references, either storage-relative paths or absolute URLs
    pub featured_image: Option<String>,
    pub side_image_1: Option<String>,
    pub side_image_2: Option<String>,
    pub status: PostStatus,
    pub is_featured: bool,
    pub published_at: DateTime<Utc>,
    /// NOTE: `updated_at` is maintained by a database trigger
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[sqlx(skip)]
    pub categories: Vec<Category>,
    #[sqlx(skip)]
    pub tags: Vec<String>,
}

impl Post {
    /// Estimated reading time in whole minutes, never less than one
    pub fn reading_time(&self) -> i64 {
        reading_time(&self.content)
    }

    /// Every image reference the post carries
    pub fn images(&self) -> impl Iterator<Item = &str> {
        [&self.featured_image, &self.side_image_1, &self.side_image_2]
            .into_iter()
            .filter_map(|image| image.as_deref())
    }
}

fn reading_time(content: &str) -> i64 {
    let word_count = content.split_whitespace().count() as f64;
    let minutes = (word_count / WORDS_PER_MINUTE).round_ties_even() as i64;
    minutes.max(1)
}

/// Validated post fields written by editors
#[derive(Debug, Clone)]
pub struct PostForm {
    pub title: String,
    pub slug: Slug,
    pub content: String,
    pub excerpt: String,
    pub featured_image: Option<String>,
    pub side_image_1: Option<String>,
    pub side_image_2: Option<String>,
    pub status: PostStatus,
    pub is_featured: bool,
    pub published_at: DateTime<Utc>,
    /// Category IDs
    pub categories: Vec<i64>,
    /// Tag names
    pub tags: Vec<String>,
}

/// Post that the publisher promoted from draft
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PublishedPost {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    PublishedAt,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostOrdering {
    pub field: OrderField,
    pub descending: bool,
}

impl PostOrdering {
    pub const NEWEST_FIRST: Self = Self {
        field: OrderField::PublishedAt,
        descending: true,
    };

    /// Parse a comma separated `ordering` parameter, unknown fields are ignored
    pub fn parse_list(value: &str) -> Vec<Self> {
        value
            .split(',')
            .map(str::trim)
            .filter_map(|term| {
                let (descending, name) = match term.strip_prefix('-') {
                    Some(name) => (true, name),
                    None => (false, term),
                };
                let field = match name {
                    "published_at" => OrderField::PublishedAt,
                    "title" => OrderField::Title,
                    _ => return None,
                };
                Some(Self { field, descending })
            })
            .collect()
    }
}

/// Filters for listing posts
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub status: Option<PostStatus>,
    /// Category slugs, a post must belong to every one of them
    pub categories: Vec<String>,
    /// Tag name
    pub tag: Option<String>,
    pub is_featured: Option<bool>,
    /// Every term must match one of title, content or excerpt
    pub search_terms: Vec<String>,
    /// Empty means newest first
    pub ordering: Vec<PostOrdering>,
}

impl PostQuery {
    /// Only posts visible to readers
    pub fn published() -> Self {
        Self {
            status: Some(PostStatus::Published),
            ..Default::default()
        }
    }

    /// Split a search string into terms on whitespace and commas
    pub fn with_search(mut self, search: Option<&str>) -> Self {
        lazy_static::lazy_static! {
            static ref TERM_SPLIT: Regex = Regex::new(r"[\s,]+").unwrap();
        }

        self.search_terms = search
            .map(|search| {
                TERM_SPLIT
                    .split(&search.replace('\0', ""))
                    .filter(|term| !term.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        self
    }

    pub fn orderings(&self) -> Vec<PostOrdering> {
        if self.ordering.is_empty() {
            vec![PostOrdering::NEWEST_FIRST]
        } else {
            self.ordering.clone()
        }
    }
}
