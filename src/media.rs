use std::path::{Component, Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::settings::MediaSettings;

mod external;
mod placeholder;
mod variants;

pub use external::{classify, ImageSource};
pub use placeholder::{blur_placeholder, PlaceholderError, FALLBACK_PLACEHOLDER};
pub use variants::{generate_webp_sibling, negotiate_webp, WebpError};

/// Characters left untouched when a storage path becomes part of a URL
const PATH_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'*')
    .remove(b'(')
    .remove(b')')
    .remove(b'\'');

/// Resolve a storage-relative path inside `root`.
///
/// Returns `None` for paths that are empty, absolute after trimming the leading slash, or
/// that step outside the root.
pub fn storage_path(root: &Path, name: &str) -> Option<PathBuf> {
    let name = name.trim_start_matches('/');
    if name.is_empty() {
        return None;
    }

    let mut path = root.to_path_buf();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(path)
}

/// Resolves stored image references for one request.
///
/// Local images become absolute URLs on the request origin, external images are passed
/// through or decoded, and every image can be turned into a blur placeholder.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    settings: MediaSettings,
    scheme: String,
    host: String,
}

impl ImageResolver {
    pub fn new(settings: MediaSettings, scheme: &str, host: &str) -> Self {
        Self {
            settings,
            scheme: scheme.to_string(),
            host: host.to_string(),
        }
    }

    /// Host names that point back at this application
    fn local_hosts(&self) -> Vec<&str> {
        let mut hosts: Vec<&str> = self
            .settings
            .local_hosts()
            .iter()
            .map(|host| strip_port(host))
            .collect();
        hosts.push(strip_port(&self.host));
        hosts
    }

    pub fn classify<'a>(&self, reference: &'a str) -> ImageSource<'a> {
        classify(reference, &self.settings.url(), &self.local_hosts())
    }

    /// Public URL of an image reference, `None` when there is no image
    pub fn url(&self, reference: Option<&str>) -> Option<String> {
        let reference = reference.map(str::trim).filter(|r| !r.is_empty())?;

        let url = match self.classify(reference) {
            ImageSource::External(url) => url,
            ImageSource::Local(name) => format!(
                "{}://{}{}{}",
                self.scheme,
                self.host,
                self.settings.url(),
                utf8_percent_encode(name.trim_start_matches('/'), PATH_SAFE)
            ),
        };
        Some(url)
    }

    /// Inline blur placeholder of an image reference.
    /// NOTE: Reads and decodes the file synchronously, call from a blocking context
    pub fn placeholder(&self, reference: Option<&str>) -> String {
        let reference = match reference.map(str::trim).filter(|r| !r.is_empty()) {
            Some(reference) => reference,
            None => return FALLBACK_PLACEHOLDER.to_string(),
        };

        match self.classify(reference) {
            ImageSource::External(_) => FALLBACK_PLACEHOLDER.to_string(),
            ImageSource::Local(name) => match storage_path(self.settings.root(), name) {
                Some(path) => blur_placeholder(&path),
                None => FALLBACK_PLACEHOLDER.to_string(),
            },
        }
    }

    /// Create missing `.webp` siblings for the local images among `references`
    pub fn generate_webp(&self, references: &[String]) {
        for reference in references {
            let name = match self.classify(reference) {
                ImageSource::Local(name) => name,
                ImageSource::External(_) => continue,
            };
            let Some(path) = storage_path(self.settings.root(), name) else {
                continue;
            };
            match generate_webp_sibling(&path) {
                Ok(Some(webp_path)) => {
                    tracing::info!("Generated WebP image {}", webp_path.display())
                }
                Ok(None) => {}
                Err(error) => tracing::warn!(
                    error.cause_chain = ?error,
                    "Failed to generate WebP image for {}",
                    path.display()
                ),
            }
        }
    }
}

fn strip_port(host: &str) -> &str {
    // Bracketed IPv6 literals keep their brackets, the port follows the closing bracket
    if let Some(end) = host.find(']') {
        return &host[..=end];
    }
    host.split(':').next().unwrap_or(host)
}
