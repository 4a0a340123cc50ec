mod pagination;
mod posts;
mod subscribers;
mod themes;

pub use pagination::{Page, Pager, PAGE_SIZE};
pub use posts::{post_details, post_list_items, PostDetail, PostListItem};
pub use subscribers::SubscriberCreated;
pub use themes::{theme_view, ThemeView};
