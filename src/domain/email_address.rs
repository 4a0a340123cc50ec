use std::fmt;
use std::str::FromStr;

use regex::Regex;

const MAX_LEN: usize = 254;

/// A subscriber or administrator email address, normalized to lowercase
#[derive(Debug, PartialEq, Clone)]
pub struct EmailAddress(String);

impl FromStr for EmailAddress {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        lazy_static::lazy_static! {
            static ref EMAIL_REGEX: Regex =
                Regex::new(r"^[\w.+-]+@[\w-]+(\.[\w-]+)+$").unwrap();
        }

        let value = value.trim().to_lowercase();

        if value.is_empty() {
            return Err("This field may not be blank.".into());
        }
        // Counted like the `varchar` column counts, after lowercasing
        if value.chars().count() > MAX_LEN {
            return Err(format!(
                "Ensure this field has no more than {} characters.",
                MAX_LEN
            ));
        }
        if !EMAIL_REGEX.is_match(&value) {
            return Err("Enter a valid email address.".into());
        }

        Ok(Self(value))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
