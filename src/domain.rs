mod email_address;
mod hex_color;
mod person_name;
mod post_status;
mod slug;

pub use email_address::EmailAddress;
pub use hex_color::HexColor;
pub use person_name::PersonName;
pub use post_status::PostStatus;
pub use slug::Slug;
