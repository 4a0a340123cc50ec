mod admin_guard;
mod credentials;

pub use admin_guard::Administrator;
pub use credentials::Credentials;
