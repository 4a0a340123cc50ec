use actix_web::http::header::{self, HeaderMap};

use anyhow::Context;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use secrecy::Secret;

const BASIC_AUTH_PREFIX: &str = "Basic ";

/// Email and password sent by an administrator
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: Secret<String>,
}

impl Credentials {
    /// Extract credentials from the `Authorization` header of a request
    pub fn from_headers(headers: &HeaderMap) -> anyhow::Result<Self> {
        let header_value = headers
            .get(header::AUTHORIZATION)
            .context("Missing authorization in header")?
            .to_str()?;

        if header_value.starts_with(BASIC_AUTH_PREFIX) {
            Self::from_basic(header_value)
        } else {
            anyhow::bail!("Missing or unknown Authorization scheme")
        }
    }

    /// Extract credentials from a string formatted as 'Basic <base64 email:password>'
    pub fn from_basic(header_value: &str) -> anyhow::Result<Self> {
        let encoded = header_value
            .strip_prefix(BASIC_AUTH_PREFIX)
            .context("Authorization scheme not basic")?;

        let decoded = STANDARD
            .decode(encoded.trim())
            .context("Failed to decode authorization header")?;
        let decoded = String::from_utf8(decoded).context("Authorization header is not UTF-8")?;

        // Passwords may contain colons, emails may not
        let (email, password) = decoded
            .split_once(':')
            .context("Missing password in authorization")?;
        if email.is_empty() {
            anyhow::bail!("Missing email in authorization");
        }

        Ok(Self {
            email: email.into(),
            password: Secret::new(password.into()),
        })
    }
}
