//! Configuration constants.
//!
//! Defaults, network limits, and the fixed names the scraper looks for in
//! MakerWorld pages.

/// Default upstream origin. Overridable through `Config::base_url`.
pub const DEFAULT_BASE_URL: &str = "https://makerworld.com";

/// Default User-Agent string for HTTP requests.
///
/// MakerWorld serves its Next.js pages to desktop browsers; a Chrome-like string
/// avoids the stripped-down responses sent to unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Upper bound for `Config::model_concurrency`
pub const MAX_MODEL_CONCURRENCY: usize = 16;

/// Maximum response body size in bytes (8MB)
/// Profile pages embed the full data graph, so this is larger than a typical page.
pub const MAX_RESPONSE_BODY_SIZE: usize = 8 * 1024 * 1024;

/// Maximum characters of a response body echoed into a warning log
pub const BODY_SNIPPET_MAX_LEN: usize = 300;

/// Environment variable consulted for the cookie when `--cookie` is not given
pub const COOKIE_ENV_VAR: &str = "MAKERWORLD_COOKIE";

// Page structure
pub const NEXT_DATA_SELECTOR_STR: &str = "script#__NEXT_DATA__";
pub const ANCHOR_SELECTOR_STR: &str = "a[href]";
pub const MODEL_HREF_PATTERN: &str = r"^/en/models/(\d+)-([^/?#]+)$";

/// Path of the user-info record inside the profile payload.
pub const USER_INFO_PATH: &str = "props.pageProps.userInfo";

/// Last-resort location of the points counter inside the profile payload.
pub const SUMMARY_POINTS_PATH: &str = "props.pageProps.summary.Points";

/// User-info fields tried, in order, for the points counter.
pub const POINTS_FIELDS: &[&str] = &["point", "points", "pointCount"];

// Model metric keys
pub const METRIC_LIKES: &str = "likeCount";
pub const METRIC_DOWNLOADS: &str = "downloadCount";
pub const METRIC_PRINTS: &str = "printCount";
pub const METRIC_BOOSTS: &str = "boost";

/// Metric keys read from a model's best record, in output order.
pub const MODEL_METRIC_KEYS: &[&str] = &[METRIC_LIKES, METRIC_DOWNLOADS, METRIC_PRINTS, METRIC_BOOSTS];

/// Sub-fields of `bannedPermission` surfaced as flags.
pub const BANNED_PERMISSION_KEYS: &[&str] = &[
    "comment",
    "community",
    "designNotify",
    "privateMsg",
    "redeem",
    "upload",
    "whole",
];

// HTTP statuses that advance candidate-URL fallback instead of aborting it
pub const HTTP_STATUS_FORBIDDEN: u16 = 403;
pub const HTTP_STATUS_NOT_FOUND: u16 = 404;
