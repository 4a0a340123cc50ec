mod categories;
mod featured_posts;
mod helpers;
mod posts;
mod subscribe;
mod theme;
