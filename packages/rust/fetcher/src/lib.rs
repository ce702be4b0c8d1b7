//! Job-posting fetcher.
//!
//! This crate provides:
//! - [`Fetcher`] — "give me the text of this URL, or tell me I was blocked"
//! - [`HttpFetcher`] — reqwest + scraper implementation with bot-block detection
//! - [`text`] — `innerText`-style rendering of parsed HTML

pub mod text;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

use upskill_shared::{FetchConfig, Result, UpskillError};

/// User-Agent string for fetch requests.
const USER_AGENT: &str = concat!("upskill/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects to follow for a posting.
const MAX_REDIRECTS: usize = 5;

/// Retrieves the readable text of a job posting.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` and return its rendered text.
    ///
    /// Fails with [`UpskillError::BotBlock`] when the site served a challenge
    /// page, and with [`UpskillError::Network`] for any other failure.
    async fn fetch(&self, url: &Url) -> Result<String>;
}

// ---------------------------------------------------------------------------
// HttpFetcher
// ---------------------------------------------------------------------------

/// Static-HTML fetcher: GET, parse, and render the posting body as text.
pub struct HttpFetcher {
    client: Client,
    /// Validated in [`HttpFetcher::new`]; `None` means always use the body.
    content_selector: Option<String>,
    block_markers: Vec<String>,
    preview_chars: usize,
}

impl HttpFetcher {
    /// Create a fetcher from the `[fetch]` config section.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UpskillError::Network(format!("failed to build HTTP client: {e}")))?;

        let content_selector = match config.content_selector.trim() {
            "" => None,
            css => {
                parse_selector(css)?;
                Some(css.to_string())
            }
        };

        Ok(Self {
            client,
            content_selector,
            block_markers: config.block_markers.clone(),
            preview_chars: config.preview_chars,
        })
    }

    /// Whether `text` contains any configured block marker.
    fn is_blocked(&self, text: &str) -> bool {
        self.block_markers
            .iter()
            .any(|m| !m.is_empty() && text.contains(m.as_str()))
    }

    /// Render the posting: the content selector's element when present,
    /// otherwise the whole page.
    fn render(&self, doc: &Html) -> String {
        if let Some(sel) = self.content_selector.as_deref().and_then(|css| parse_selector(css).ok()) {
            if let Some(el) = doc.select(&sel).next() {
                let rendered = text::inner_text(el);
                if !rendered.trim().is_empty() {
                    return rendered;
                }
            }
            debug!("content selector not found, falling back to page body");
        }
        text::page_text(doc)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip_all, fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<String> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UpskillError::validation(format!(
                "unsupported URL scheme: {url}"
            )));
        }

        info!("fetching posting");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| UpskillError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpskillError::Network(format!("{url}: body read failed: {e}")))?;

        let doc = Html::parse_document(&body);
        let page = text::page_text(&doc);

        // Challenge pages usually come back as 403/503, but some return 200
        if self.is_blocked(&page) {
            warn!(status = status.as_u16(), "bot protection detected");
            return Err(UpskillError::bot_block(url.as_str()));
        }

        if !status.is_success() {
            return Err(UpskillError::Network(format!("{url}: HTTP {status}")));
        }

        let rendered = self.render(&doc);
        debug!(
            chars = rendered.chars().count(),
            preview = %preview(&rendered, self.preview_chars),
            "fetched text"
        );

        Ok(rendered)
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| UpskillError::validation(format!("invalid content selector '{css}': {e}")))
}

/// First `max` characters of `text` on a single line.
fn preview(text: &str, max: usize) -> String {
    text.chars()
        .take(max)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&FetchConfig::default()).expect("build fetcher")
    }

    async fn serve(status: u16, body: &str) -> (wiremock::MockServer, Url) {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/jobs/1"))
            .respond_with(
                wiremock::ResponseTemplate::new(status)
                    .set_body_string(body)
                    .insert_header("content-type", "text/html"),
            )
            .mount(&server)
            .await;
        let url = Url::parse(&format!("{}/jobs/1", server.uri())).unwrap();
        (server, url)
    }

    #[test]
    fn invalid_selector_is_rejected() {
        let config = FetchConfig {
            content_selector: "div[".into(),
            ..FetchConfig::default()
        };
        assert!(HttpFetcher::new(&config).is_err());
    }

    #[test]
    fn preview_is_single_line_and_bounded() {
        assert_eq!(preview("ab\ncd\nef", 4), "ab c");
    }

    #[tokio::test]
    async fn uses_content_selector_when_present() {
        let html = r#"<html><body>
            <nav>Home Jobs Login</nav>
            <div class="job-description">
                <h2>Requirements</h2>
                <ul><li>SQL</li><li>Python</li></ul>
            </div>
            <footer>Copyright</footer>
        </body></html>"#;
        let (_server, url) = serve(200, html).await;

        let text = fetcher().fetch(&url).await.unwrap();
        assert_eq!(text, "Requirements\nSQL\nPython");
    }

    #[tokio::test]
    async fn falls_back_to_body_text() {
        let html = r#"<html><head><title>Job</title><script>var x = 1;</script></head>
            <body><h1>Data Analyst</h1><p>Must know <b>SQL</b>.</p></body></html>"#;
        let (_server, url) = serve(200, html).await;

        let text = fetcher().fetch(&url).await.unwrap();
        assert_eq!(text, "Data Analyst\nMust know SQL.");
    }

    #[tokio::test]
    async fn challenge_page_is_bot_block() {
        let html = "<html><body><p>Please confirm you are a human</p></body></html>";
        let (_server, url) = serve(200, html).await;

        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(err.is_bot_block());
    }

    #[tokio::test]
    async fn forbidden_with_marker_is_bot_block() {
        let html = "<html><body><h1>Access Denied</h1></body></html>";
        let (_server, url) = serve(403, html).await;

        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(err.is_bot_block());
    }

    #[tokio::test]
    async fn server_error_is_network_failure() {
        let (_server, url) = serve(500, "<html><body>oops</body></html>").await;

        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, UpskillError::Network(_)));
    }

    #[tokio::test]
    async fn non_http_scheme_is_rejected() {
        let url = Url::parse("file:///etc/passwd").unwrap();
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, UpskillError::Validation { .. }));
    }
}
