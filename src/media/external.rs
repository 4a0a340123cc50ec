use percent_encoding::percent_decode_str;

use regex::Regex;

use url::Url;

/// Provider whose URLs lose a slash when stored as a local file name
const DOUBLE_ENCODED_PROVIDER: &str = "picsum.photos";

/// Where an image reference points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// Absolute URL on another host
    External(String),
    /// Path relative to the media root
    Local(&'a str),
}

/// Classify an image reference as external or local.
///
/// A reference is external when it is an absolute `http(s)` URL whose host is not one of
/// `local_hosts`, or when its media path embeds a percent-encoded URL
/// (`{media_url}https%3A/...`), which is decoded.
pub fn classify<'a>(reference: &'a str, media_url: &str, local_hosts: &[&str]) -> ImageSource<'a> {
    let reference = reference.trim();

    let path = if is_absolute_http(reference) {
        match Url::parse(reference) {
            Ok(url) if is_local(&url, local_hosts) => raw_path(reference),
            _ => return ImageSource::External(reference.to_string()),
        }
    } else {
        reference
    };

    let media_path = if path.starts_with(media_url) {
        path.to_string()
    } else {
        format!("{}{}", media_url, path.trim_start_matches('/'))
    };

    if let Some(url) = embedded_url(&media_path, media_url) {
        return ImageSource::External(url);
    }

    ImageSource::Local(path.strip_prefix(media_url).unwrap_or(path).trim_start_matches('/'))
}

fn is_absolute_http(reference: &str) -> bool {
    let lowercase = reference.to_ascii_lowercase();
    lowercase.starts_with("http://") || lowercase.starts_with("https://")
}

/// Path of an absolute URL as written, without query or fragment
fn raw_path(reference: &str) -> &str {
    let authority = reference.find("://").map(|i| i + 3).unwrap_or(0);
    let start = reference[authority..]
        .find('/')
        .map(|i| authority + i)
        .unwrap_or(reference.len());
    let end = reference[start..]
        .find(|c| c == '?' || c == '#')
        .map(|i| start + i)
        .unwrap_or(reference.len());
    &reference[start..end]
}

fn is_local(url: &Url, local_hosts: &[&str]) -> bool {
    match url.host_str() {
        Some(host) => local_hosts.iter().any(|local| local.eq_ignore_ascii_case(host)),
        None => false,
    }
}

/// Decode a URL embedded as `{media_url}https%3A/...` in a media path.
/// The media URL prefix is matched case-insensitively, wherever it occurs.
fn embedded_url(media_path: &str, media_url: &str) -> Option<String> {
    lazy_static::lazy_static! {
        static ref EMBEDDED_URL: Regex = Regex::new(r"(?i)^https?(%3A|:).+").unwrap();
    }

    // ASCII lowercasing keeps byte offsets aligned with `media_path`
    let haystack = media_path.to_ascii_lowercase();
    let needle = media_url.to_ascii_lowercase();
    if needle.is_empty() {
        return None;
    }

    // Occurrences may overlap, e.g. `/media/media/https%3A/...`
    let encoded = haystack
        .char_indices()
        .filter(|&(start, _)| haystack[start..].starts_with(&needle))
        .find_map(|(start, _)| EMBEDDED_URL.find(&media_path[start + needle.len()..]))?
        .as_str();
    let decoded = percent_decode_str(encoded).decode_utf8_lossy().into_owned();

    Some(repair_collapsed_slash(decoded))
}

/// Turn `https:/picsum.photos/...` back into `https://picsum.photos/...`
fn repair_collapsed_slash(url: String) -> String {
    for scheme in ["https:/", "http:/"] {
        let collapsed = format!("{}{}", scheme, DOUBLE_ENCODED_PROVIDER);
        if url.starts_with(&collapsed) {
            return format!("{}/{}", scheme, &url[scheme.len()..]);
        }
    }
    url
}
