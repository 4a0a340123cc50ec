use actix_web::HttpRequest;

use serde::Serialize;

use url::Url;

use crate::error::{RestError, RestResult};

/// Number of results on every page of a list endpoint
pub const PAGE_SIZE: i64 = 10;

const PAGE_PARAM: &str = "page";

/// Paginated list envelope
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Validated position inside a list of `count` results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    number: i64,
    count: i64,
}

impl Pager {
    /// Validate the raw `page` query parameter against the number of results.
    ///
    /// Missing means the first page, `last` means the last page. Anything that is not a
    /// positive page number up to the last page is an invalid page, except that the first
    /// page of an empty list is valid.
    pub fn new(page: Option<&str>, count: i64) -> RestResult<Self> {
        let pages = page_count(count);

        let number = match page.map(str::trim) {
            None | Some("") => 1,
            Some("last") => pages,
            Some(raw) => raw.parse::<i64>().map_err(|_| RestError::InvalidPage)?,
        };

        if number < 1 || number > pages {
            return Err(RestError::InvalidPage);
        }
        Ok(Self { number, count })
    }

    pub fn number(&self) -> i64 {
        self.number
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * PAGE_SIZE
    }

    fn has_next(&self) -> bool {
        self.number < page_count(self.count)
    }

    /// Wrap `results` in the envelope, with links relative to the request URL
    pub fn page<T>(&self, req: &HttpRequest, results: Vec<T>) -> Page<T> {
        let url = req.full_url();

        let next = self
            .has_next()
            .then(|| with_page(url.clone(), Some(self.number + 1)));
        let previous = match self.number {
            1 => None,
            2 => Some(with_page(url, None)),
            n => Some(with_page(url, Some(n - 1))),
        };

        Page {
            count: self.count,
            next,
            previous,
            results,
        }
    }
}

fn page_count(count: i64) -> i64 {
    ((count + PAGE_SIZE - 1) / PAGE_SIZE).max(1)
}

/// Replace the `page` query parameter, removing it entirely for `None`
fn with_page(mut url: Url, page: Option<i64>) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if let Some(page) = page {
        pairs.push((PAGE_PARAM.to_string(), page.to_string()));
    }

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    url.to_string()
}
