//! `__NEXT_DATA__` extraction.
//!
//! MakerWorld is a Next.js site: every page ships its complete data graph as
//! JSON inside `<script id="__NEXT_DATA__">`. Reading that script is far more
//! stable than scraping the rendered markup.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;

use crate::config::NEXT_DATA_SELECTOR_STR;
use crate::error_handling::FetchError;
use crate::utils::parse_selector_unsafe;

static NEXT_DATA_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(NEXT_DATA_SELECTOR_STR, "__NEXT_DATA__ extraction"));

/// Parses the `__NEXT_DATA__` payload out of a page's HTML.
///
/// # Errors
///
/// - `FetchError::MissingNextData` if the script is absent or has no text
/// - `FetchError::InvalidNextData` if the text is not valid JSON
pub fn extract_next_data(html: &str, url: &str) -> Result<Value, FetchError> {
    // Html is not Send; keep it inside this synchronous scope.
    let text: String = {
        let document = Html::parse_document(html);
        document
            .select(&NEXT_DATA_SELECTOR)
            .next()
            .map(|script| script.text().collect())
            .unwrap_or_default()
    };

    if text.trim().is_empty() {
        return Err(FetchError::MissingNextData {
            url: url.to_string(),
        });
    }

    serde_json::from_str(&text).map_err(|source| FetchError::InvalidNextData {
        url: url.to_string(),
        source,
    })
}
