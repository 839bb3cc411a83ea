//! Link preview collaborator
//!
//! Fetches a course page and pulls out its `<title>` and meta description.
//! Strictly best-effort: every failure turns into the sentinel preview, so
//! callers never see an error from this module.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client as HttpClient;
use std::time::Duration;

use crate::{
    db::{Cache, CacheKey},
    error::AppResult,
    models::LinkPreview,
};

/// Pages are read up to this many bytes; the head is all that is parsed
const MAX_PAGE_BYTES: usize = 256 * 1024;

static TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("hardcoded title regex is invalid")
});

static META_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("hardcoded meta regex is invalid"));

static ATTRIBUTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)([a-z][a-z0-9_:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("hardcoded attribute regex is invalid")
});

/// Source of page previews for course URLs
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LinkPreviewer: Send + Sync {
    /// Preview for `url`; sentinel strings on any failure
    async fn preview(&self, url: &str) -> LinkPreview;
}

/// Fetches previews over HTTP, optionally through the Redis cache
#[derive(Clone)]
pub struct HttpLinkPreviewer {
    http_client: HttpClient,
    timeout: Duration,
    cache: Option<Cache>,
    cache_ttl: u64,
}

impl HttpLinkPreviewer {
    /// Each preview, cache lookup included, is bounded by `timeout`
    pub fn new(timeout: Duration, cache: Option<Cache>, cache_ttl: u64) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .user_agent(concat!("saarthi-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            timeout,
            cache,
            cache_ttl,
        })
    }

    async fn fetch(&self, url: &str) -> AppResult<LinkPreview> {
        let mut response = self.http_client.get(url).send().await?;
        // Non-2xx bodies are parsed as well
        let status = response.status();

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if append_capped(&mut body, &chunk, MAX_PAGE_BYTES) {
                break;
            }
        }

        tracing::debug!(url = %url, status = %status, bytes = body.len(), "Fetched preview page");
        Ok(parse_preview(url, &String::from_utf8_lossy(&body)))
    }

    async fn lookup(&self, url: &str) -> LinkPreview {
        if let Some(hit) = self.cached_preview(url).await {
            tracing::debug!(url = %url, "Preview cache hit");
            return hit;
        }

        match self.fetch(url).await {
            Ok(preview) => {
                if let Some(cache) = &self.cache {
                    if !preview.is_unavailable() {
                        cache.set_in_background(
                            &CacheKey::LinkPreview(url.to_string()),
                            &preview,
                            self.cache_ttl,
                        );
                    }
                }
                preview
            }
            Err(e) => {
                tracing::warn!(error = %e, url = %url, "Link preview fetch failed");
                LinkPreview::unavailable(url)
            }
        }
    }

    async fn cached_preview(&self, url: &str) -> Option<LinkPreview> {
        let cache = self.cache.as_ref()?;
        match cache
            .get_from_cache::<LinkPreview>(&CacheKey::LinkPreview(url.to_string()))
            .await
        {
            Ok(hit) => hit,
            Err(e) => {
                tracing::error!(error = %e, url = %url, "Preview cache read failed");
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl LinkPreviewer for HttpLinkPreviewer {
    async fn preview(&self, url: &str) -> LinkPreview {
        match tokio::time::timeout(self.timeout, self.lookup(url)).await {
            Ok(preview) => preview,
            Err(_) => {
                tracing::warn!(
                    url = %url,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Link preview timed out"
                );
                LinkPreview::unavailable(url)
            }
        }
    }
}

/// Appends as much of `chunk` as fits under `limit`; true once the buffer is full
fn append_capped(body: &mut Vec<u8>, chunk: &[u8], limit: usize) -> bool {
    let room = limit.saturating_sub(body.len());
    body.extend_from_slice(&chunk[..chunk.len().min(room)]);
    body.len() >= limit
}

/// Extracts title and meta description from an HTML document
pub fn parse_preview(url: &str, html: &str) -> LinkPreview {
    let title = TITLE_REGEX
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|t| !t.is_empty());

    LinkPreview::new(url, title, meta_description(html))
}

fn meta_description(html: &str) -> Option<String> {
    META_TAG_REGEX.find_iter(html).find_map(|tag| {
        let mut is_description = false;
        let mut content = None;

        for caps in ATTRIBUTE_REGEX.captures_iter(tag.as_str()) {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str())
                .unwrap_or("");
            match caps[1].to_ascii_lowercase().as_str() {
                "name" => is_description = value.trim().eq_ignore_ascii_case("description"),
                "content" => content = Some(clean_text(value)),
                _ => {}
            }
        }

        if is_description {
            content.filter(|c| !c.is_empty())
        } else {
            None
        }
    })
}

/// Decodes the common entities and collapses whitespace
fn clean_text(raw: &str) -> String {
    let decoded = raw
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NO_DESCRIPTION, NO_TITLE};

    #[test]
    fn test_parse_title_and_description() {
        let html = r#"<html><head>
            <TITLE>
              Learn Python &amp; SQL
            </TITLE>
            <meta charset="utf-8">
            <meta name="Description" content="Hands-on   data course">
        </head></html>"#;

        let preview = parse_preview("https://example.com", html);
        assert_eq!(preview.title, "Learn Python & SQL");
        assert_eq!(preview.description, "Hands-on data course");
        assert_eq!(preview.url, "https://example.com");
    }

    #[test]
    fn test_parse_description_with_reversed_attributes() {
        let html = r#"<head><meta content='Build dashboards' name='description' /></head>"#;
        let preview = parse_preview("https://example.com", html);
        assert_eq!(preview.title, NO_TITLE);
        assert_eq!(preview.description, "Build dashboards");
    }

    #[test]
    fn test_other_meta_tags_are_ignored() {
        let html = r#"<title>Course</title><meta property="og:description" content="og text">"#;
        let preview = parse_preview("https://example.com", html);
        assert_eq!(preview.title, "Course");
        assert_eq!(preview.description, NO_DESCRIPTION);
    }

    #[test]
    fn test_empty_document_uses_sentinels() {
        let preview = parse_preview("https://example.com", "");
        assert!(preview.is_unavailable());

        let preview = parse_preview("https://example.com", "<title>   </title>");
        assert_eq!(preview.title, NO_TITLE);
    }

    #[test]
    fn test_append_capped_stops_at_limit() {
        let mut body = Vec::new();
        assert!(!append_capped(&mut body, b"<title>", 10));
        assert!(append_capped(&mut body, b"Course</title>", 10));
        assert_eq!(body, b"<title>Cou");
        assert!(append_capped(&mut body, b"more", 10));
        assert_eq!(body.len(), 10);
    }

    /// Listener that accepts connections and never writes a byte
    async fn silent_listener() -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        address
    }

    #[tokio::test]
    async fn test_unresponsive_cache_does_not_stall_preview() {
        let redis = silent_listener().await;
        let client = crate::db::create_redis_client(&format!("redis://{}", redis)).unwrap();
        // cache operations alone would wait far longer than the preview timeout
        let (cache, _handle) = Cache::spawn(client, Duration::from_secs(60));
        let previewer =
            HttpLinkPreviewer::new(Duration::from_millis(500), Some(cache), 60).unwrap();

        let preview = tokio::time::timeout(
            Duration::from_secs(5),
            previewer.preview("http://127.0.0.1:9/course"),
        )
        .await
        .expect("preview was not bounded by its timeout");

        assert!(preview.is_unavailable());
        assert_eq!(preview.url, "http://127.0.0.1:9/course");
    }

    #[tokio::test]
    async fn test_endless_page_is_read_up_to_cap() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let head = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n\
                        <html><head><title>Endless Course</title></head><body>";
            if socket.write_all(head.as_bytes()).await.is_err() {
                return;
            }
            let filler = [b'x'; 8192];
            while socket.write_all(&filler).await.is_ok() {}
        });

        let previewer = HttpLinkPreviewer::new(Duration::from_secs(10), None, 60).unwrap();
        let url = format!("http://{}/endless", address);
        let preview = tokio::time::timeout(Duration::from_secs(5), previewer.preview(&url))
            .await
            .expect("body read was not capped");

        assert_eq!(preview.title, "Endless Course");
        assert_eq!(preview.description, NO_DESCRIPTION);
    }

    #[tokio::test]
    async fn test_unreachable_host_yields_sentinels() {
        let previewer = HttpLinkPreviewer::new(Duration::from_millis(500), None, 60).unwrap();
        let preview = previewer.preview("http://127.0.0.1:9/course").await;
        assert!(preview.is_unavailable());
        assert_eq!(preview.url, "http://127.0.0.1:9/course");
    }

    #[tokio::test]
    async fn test_invalid_url_yields_sentinels() {
        let previewer = HttpLinkPreviewer::new(Duration::from_secs(1), None, 60).unwrap();
        let preview = previewer.preview("not a url").await;
        assert!(preview.is_unavailable());
    }
}
