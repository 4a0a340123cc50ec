use chrono::{DateTime, Utc};

use serde::Serialize;

use crate::error::RestResult;
use crate::media::ImageResolver;
use crate::model::{Category, Post};
use crate::telemetry::spawn_blocking_with_tracing;

/// Post as it appears in list endpoints
#[derive(Debug, Serialize)]
pub struct PostListItem {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub featured_image: Option<String>,
    pub blur_data_url: String,
    pub published_at: DateTime<Utc>,
    pub categories: Vec<Category>,
    pub tags: Vec<String>,
    pub reading_time: i64,
    pub is_featured: bool,
}

impl PostListItem {
    /// NOTE: Builds placeholders from disk, run on the blocking pool
    fn new(post: Post, images: &ImageResolver) -> Self {
        Self {
            id: post.id,
            featured_image: images.url(post.featured_image.as_deref()),
            blur_data_url: images.placeholder(post.featured_image.as_deref()),
            reading_time: post.reading_time(),
            title: post.title,
            slug: post.slug,
            excerpt: post.excerpt,
            published_at: post.published_at,
            categories: post.categories,
            tags: post.tags,
            is_featured: post.is_featured,
        }
    }
}

/// Post as it appears on its own page
#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub status: &'static str,
    pub featured_image: Option<String>,
    pub blur_data_url: String,
    pub side_image_1: Option<String>,
    pub side_image_1_blur_data_url: String,
    pub side_image_2: Option<String>,
    pub side_image_2_blur_data_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
    pub categories: Vec<Category>,
    pub tags: Vec<String>,
    pub reading_time: i64,
    pub is_featured: bool,
}

impl PostDetail {
    /// NOTE: Builds placeholders from disk, run on the blocking pool
    fn new(post: Post, images: &ImageResolver) -> Self {
        let featured = post.featured_image.as_deref();
        let side_1 = post.side_image_1.as_deref();
        let side_2 = post.side_image_2.as_deref();

        Self {
            id: post.id,
            status: post.status.as_str(),
            featured_image: images.url(featured),
            blur_data_url: images.placeholder(featured),
            side_image_1: images.url(side_1),
            side_image_1_blur_data_url: images.placeholder(side_1),
            side_image_2: images.url(side_2),
            side_image_2_blur_data_url: images.placeholder(side_2),
            reading_time: post.reading_time(),
            title: post.title,
            slug: post.slug,
            content: post.content,
            excerpt: post.excerpt,
            created_at: post.created_at,
            updated_at: post.updated_at,
            published_at: post.published_at,
            categories: post.categories,
            tags: post.tags,
            is_featured: post.is_featured,
        }
    }
}

/// List representations of `posts`, placeholders are generated on the blocking pool
pub async fn post_list_items(
    posts: Vec<Post>,
    images: ImageResolver,
) -> RestResult<Vec<PostListItem>> {
    let items = spawn_blocking_with_tracing(move || {
        posts
            .into_iter()
            .map(|post| PostListItem::new(post, &images))
            .collect::<Vec<_>>()
    })
    .await?;
    Ok(items)
}

/// Detail representations of `posts`, placeholders are generated on the blocking pool
pub async fn post_details(posts: Vec<Post>, images: ImageResolver) -> RestResult<Vec<PostDetail>> {
    let details = spawn_blocking_with_tracing(move || {
        posts
            .into_iter()
            .map(|post| PostDetail::new(post, &images))
            .collect::<Vec<_>>()
    })
    .await?;
    Ok(details)
}
