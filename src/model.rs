mod categories;
mod posts;
mod subscribers;
mod themes;

pub use categories::{Category, CategoryForm};
pub use posts::{OrderField, Post, PostForm, PostOrdering, PostQuery, PublishedPost};
pub use subscribers::{NewSubscriber, Subscriber, SubscriberQuery};
pub use themes::{ExtendedThemeForm, NewTheme, Theme};
