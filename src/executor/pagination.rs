//! Page arithmetic for result listings

use super::result::Paginator;

/// Parse the `page` parameter; missing, malformed or non-positive pages are page 1.
/// Leading digits are honored (`"3abc"` is page 3).
pub fn parse_page(raw: Option<&str>) -> u64 {
    let digits: String = raw
        .unwrap_or_default()
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse::<u64>().ok().filter(|p| *p >= 1).unwrap_or(1)
}

/// Number of documents to skip for a page
pub fn skip_for(page: u64, page_size: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(page_size)
}

impl Paginator {
    /// Page links for `count` documents around `page`.
    ///
    /// The total is `count / page_size + 1`, so an exact multiple of the page
    /// size yields a trailing empty page.
    pub fn new(page: u64, count: u64, page_size: u64, window: u64, request_url: &str) -> Self {
        let total = count / page_size.max(1) + 1;

        Self {
            page,
            first: page.saturating_sub(window).max(1),
            last: page.saturating_add(window).min(total),
            total,
            url: page_link_prefix(request_url),
        }
    }
}

/// Strip the first `page=` parameter and append a fresh one, without a value
pub fn page_link_prefix(url: &str) -> String {
    let mut base = url.to_string();

    let found = ["?page=", "&page="]
        .iter()
        .filter_map(|needle| url.find(needle))
        .min();

    if let Some(start) = found {
        let value_start = start + "?page=".len();
        let value_end = url[value_start..]
            .find(|c: char| !c.is_ascii_digit())
            .map(|i| value_start + i)
            .unwrap_or(url.len());

        let rest = &url[value_end..];
        base = if url[start..].starts_with('?') {
            match rest.strip_prefix('&') {
                Some(tail) => format!("{}?{}", &url[..start], tail),
                None => format!("{}{}", &url[..start], rest),
            }
        } else {
            format!("{}{}", &url[..start], rest)
        };
    }

    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}page=")
}
