use std::fmt;
use std::str::FromStr;

use regex::Regex;

use unicode_normalization::UnicodeNormalization;

/// URL-safe identifier of a post, category or tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from free text such as a title or a name.
    ///
    /// The text is decomposed (NFKD) so accented letters keep their base letter. ASCII
    /// letters and digits are lowercased and kept, whitespace and hyphen runs collapse
    /// to a single `-`, everything else is dropped.
    pub fn derive(text: &str) -> Result<Self, String> {
        let mut slug = String::with_capacity(text.len());
        let mut pending_dash = false;

        for c in text.nfkd() {
            if c.is_ascii_alphanumeric() || c == '_' {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c.to_ascii_lowercase());
            } else if c.is_ascii_whitespace() || c == '-' {
                pending_dash = true;
            }
        }

        let slug = slug.trim_matches(|c| c == '-' || c == '_');
        if slug.is_empty() {
            return Err(format!("Cannot derive a slug from {:?}", text));
        }
        Ok(Self(slug.to_string()))
    }

    /// Use `explicit` when given and not blank, otherwise derive from `source`
    pub fn explicit_or_derive(explicit: Option<&str>, source: &str) -> Result<Self, String> {
        match explicit.map(str::trim) {
            Some(explicit) if !explicit.is_empty() => explicit.parse(),
            _ => Self::derive(source),
        }
    }

    /// Reject slugs longer than `max` characters
    pub fn within(self, max: usize) -> Result<Self, String> {
        if self.0.len() > max {
            Err(format!(
                "Ensure this field has no more than {} characters.",
                max
            ))
        } else {
            Ok(self)
        }
    }
}

impl FromStr for Slug {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        lazy_static::lazy_static! {
            static ref SLUG_REGEX: Regex = Regex::new(r"^[-a-zA-Z0-9_]+$").unwrap();
        }

        if !SLUG_REGEX.is_match(value) {
            return Err(
                "Enter a valid \"slug\" consisting of letters, numbers, underscores or hyphens."
                    .into(),
            );
        }
        Ok(Self(value.to_string()))
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
