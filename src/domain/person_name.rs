use std::str::FromStr;

const MAX_LEN: usize = 256;

/// Optional display name of a subscriber
#[derive(Debug, Clone, PartialEq)]
pub struct PersonName(String);

impl PersonName {
    /// Parse a name that may be left blank, blank input yields `None`
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>, String> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some),
        }
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PersonName {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err("Name cannot be empty".into());
        }
        // Counted like the `varchar` column counts
        if value.chars().count() > MAX_LEN {
            return Err(format!(
                "Ensure this field has no more than {} characters.",
                MAX_LEN
            ));
        }
        Ok(Self(value.to_string()))
    }
}
