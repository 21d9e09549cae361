// Shared test helpers for mock MakerWorld pages.
//
// This module provides page builders and a refresher wired to an httptest server.

use std::sync::Arc;

use httptest::{matchers::*, responders::*, Expectation, Server};
use serde_json::Value;

use makerworld_stats::{Config, RefreshStats, Refresher};

/// Renders a Next.js-style page embedding `payload`, with `body` markup before it.
pub fn page(payload: &Value, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>MakerWorld</title></head><body>
<div id="__next">{}</div>
<script id="__NEXT_DATA__" type="application/json">{}</script>
</body></html>"#,
        body, payload
    )
}

/// Origin of the mock server, usable as `Config::base_url`.
pub fn origin(server: &Server) -> String {
    format!("http://{}", server.addr())
}

/// A config pointed at the mock server.
pub fn config_for(server: &Server, user: &str) -> Config {
    Config {
        user: user.to_string(),
        cookie: "Cookie: session=abc\r\n".to_string(),
        timeout_seconds: 5,
        base_url: origin(server),
        ..Default::default()
    }
}

pub fn refresher(config: Config) -> (Refresher, Arc<RefreshStats>) {
    let stats = Arc::new(RefreshStats::new());
    let refresher =
        Refresher::from_config(config, Arc::clone(&stats)).expect("Failed to build refresher");
    (refresher, stats)
}

/// Serves `body` as HTML at `path`, exactly `times` times.
#[allow(dead_code)] // Used by other test files
pub fn serve_html(server: &Server, path: &'static str, body: String, times: usize) {
    server.expect(
        Expectation::matching(request::method_path("GET", path))
            .times(times)
            .respond_with(
                status_code(200)
                    .append_header("Content-Type", "text/html; charset=utf-8")
                    .body(body),
            ),
    );
}

/// Answers `path` with a bare status, exactly `times` times.
#[allow(dead_code)] // Used by other test files
pub fn serve_status(server: &Server, path: &'static str, status: u16, times: usize) {
    server.expect(
        Expectation::matching(request::method_path("GET", path))
            .times(times)
            .respond_with(status_code(status).body("denied")),
    );
}
