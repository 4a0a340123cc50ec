mod categories;
mod posts;
mod subscribers;
mod themes;
mod users;

pub use categories::CategoryRepo;
pub use posts::PostRepo;
pub use subscribers::SubscriberRepo;
pub use themes::ThemeRepo;
pub use users::{NewUser, UserCredentials, UsersRepo};

/// Escape `%`, `_` and `\` so `value` matches literally inside a `like` pattern
pub(crate) fn like_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
