//! Utilities for sanitizing credentials and log output.
//!
//! The cookie is the only secret this crate handles. It is normalized once per
//! refresh and never logged verbatim: logs get a short fingerprint instead.

const COOKIE_PREFIX: &str = "cookie:";

/// Normalizes a raw Cookie header value into a transport-ready string.
///
/// A leading `Cookie:` prefix (any case) is removed, the result is trimmed, and
/// embedded CR, LF, and TAB characters are dropped. Never fails; empty input
/// yields an empty string.
///
/// # Examples
///
/// ```
/// use makerworld_stats::normalize_cookie;
///
/// assert_eq!(normalize_cookie("Cookie: a=b\r\n"), "a=b");
/// assert_eq!(normalize_cookie("a=b; c=d"), "a=b; c=d");
/// ```
pub fn normalize_cookie(raw: &str) -> String {
    let without_prefix = match raw.get(..COOKIE_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(COOKIE_PREFIX) => &raw[COOKIE_PREFIX.len()..],
        _ => raw,
    };

    without_prefix
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\t'))
        .collect()
}

/// Short, non-reversible cookie identifier for debug logs.
pub fn cookie_fingerprint(cookie: &str) -> String {
    if cookie.is_empty() {
        return "empty".to_string();
    }
    let chars: Vec<char> = cookie.chars().collect();
    let prefix: String = chars.iter().take(8).collect();
    let suffix: String = chars[chars.len().saturating_sub(8)..].iter().collect();
    format!(
        "len={} prefix={:?} suffix={:?}",
        cookie.len(),
        prefix,
        suffix
    )
}

/// Collapses whitespace runs and truncates to `max_len` characters.
///
/// Used to quote response bodies in warnings without flooding the log.
pub fn compact_snippet(text: &str, max_len: usize) -> String {
    let compact = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.chars().count() <= max_len {
        return compact;
    }
    let truncated: String = compact.chars().take(max_len).collect();
    format!("{}...(truncated)", truncated)
}
