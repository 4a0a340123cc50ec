use std::fmt;
use std::str::FromStr;

use regex::Regex;

/// `#RRGGBB` color of the hero box, stored uppercase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexColor(String);

impl Default for HexColor {
    fn default() -> Self {
        Self("#FFFFFF".into())
    }
}

impl FromStr for HexColor {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        lazy_static::lazy_static! {
            static ref HEX_REGEX: Regex = Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap();
        }

        let value = value.trim();
        if value.is_empty() {
            return Ok(Self::default());
        }
        if !HEX_REGEX.is_match(value) {
            return Err(format!("{:?} is not a valid hex color.", value));
        }

        // Expand the short `#RGB` form
        let digits = &value[1..];
        let digits = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect()
        } else {
            digits.to_string()
        };

        Ok(Self(format!("#{}", digits.to_uppercase())))
    }
}

impl AsRef<str> for HexColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
