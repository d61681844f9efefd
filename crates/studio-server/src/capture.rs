//! Best-effort capture of a social media post: fetch the page, pull its
//! preview image and guess whether the post is a video. Misclassification is
//! acceptable; the result only seeds the vision prompt.

use base64::Engine as _;
use regex::Regex;
use reqwest::Url;
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("unsupported host '{0}': only Instagram and TikTok posts can be captured")]
    UnsupportedHost(String),

    #[error("page fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("page returned HTTP {0}")]
    Status(u16),

    #[error("no preview image found on page")]
    NoPreview,

    #[error("preview image url '{0}' is not http(s)")]
    BadImageUrl(String),

    #[error("response larger than {0} bytes")]
    TooLarge(usize),
}

impl CaptureError {
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CaptureError::InvalidUrl(_)
                | CaptureError::UnsupportedHost(_)
                | CaptureError::NoPreview
                | CaptureError::BadImageUrl(_)
                | CaptureError::TooLarge(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    Tiktok,
}

/// What the HTML alone tells us about a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageInfo {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub is_video: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Capture {
    pub url: String,
    pub platform: Platform,
    pub title: Option<String>,
    pub image_url: String,
    pub media_type: String,
    #[serde(skip)]
    pub image_base64: String,
    pub is_video: bool,
}

/// Cap on the post page and on the preview image, each.
pub const MAX_DOWNLOAD_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct PageCapture {
    http: reqwest::Client,
    timeout: Duration,
    user_agent: String,
    max_bytes: usize,
}

impl PageCapture {
    pub fn new(http: reqwest::Client, timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            http,
            timeout,
            user_agent: user_agent.into(),
            max_bytes: MAX_DOWNLOAD_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub async fn capture(&self, raw_url: &str) -> Result<Capture, CaptureError> {
        let url = Url::parse(raw_url).map_err(|_| CaptureError::InvalidUrl(raw_url.to_string()))?;
        let platform = detect_platform(&url)?;

        tracing::info!(url = %url, ?platform, "capturing post");
        let resp = self
            .http
            .get(url.clone())
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .timeout(self.timeout)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(CaptureError::Status(resp.status().as_u16()));
        }
        let html = read_capped(resp, self.max_bytes).await?;
        let info = inspect_html(&url, &String::from_utf8_lossy(&html));

        let raw_image = info.image_url.ok_or(CaptureError::NoPreview)?;
        let image_url = resolve_image_url(&url, &raw_image)?;
        let image = self
            .http
            .get(image_url.clone())
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .timeout(self.timeout)
            .send()
            .await?;
        if !image.status().is_success() {
            return Err(CaptureError::Status(image.status().as_u16()));
        }
        let media_type = image
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| v.starts_with("image/"))
            .unwrap_or_else(|| "image/jpeg".to_string());
        let bytes = read_capped(image, self.max_bytes).await?;

        Ok(Capture {
            url: url.to_string(),
            platform,
            title: info.title,
            image_url: image_url.to_string(),
            media_type,
            image_base64: base64::engine::general_purpose::STANDARD.encode(&bytes),
            is_video: info.is_video,
        })
    }
}

/// Read a body, refusing anything over `limit` bytes.
pub async fn read_capped(mut resp: reqwest::Response, limit: usize) -> Result<Vec<u8>, CaptureError> {
    if resp.content_length().is_some_and(|len| len > limit as u64) {
        return Err(CaptureError::TooLarge(limit));
    }
    let mut body = Vec::new();
    while let Some(chunk) = resp.chunk().await? {
        if body.len() + chunk.len() > limit {
            return Err(CaptureError::TooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Resolve the scraped preview URL against the page; only http(s) is fetched.
pub fn resolve_image_url(page: &Url, raw: &str) -> Result<Url, CaptureError> {
    let url = page
        .join(raw)
        .map_err(|_| CaptureError::BadImageUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(CaptureError::BadImageUrl(raw.to_string())),
    }
}

pub fn detect_platform(url: &Url) -> Result<Platform, CaptureError> {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let matches = |domain: &str| host == domain || host.ends_with(&format!(".{domain}"));
    if matches("instagram.com") {
        Ok(Platform::Instagram)
    } else if matches("tiktok.com") {
        Ok(Platform::Tiktok)
    } else {
        Err(CaptureError::UnsupportedHost(host))
    }
}

static VIDEO_PATH_RE: OnceLock<Regex> = OnceLock::new();

fn video_path_re() -> &'static Regex {
    VIDEO_PATH_RE.get_or_init(|| Regex::new(r"/(reel|reels|video|tv)/").unwrap())
}

/// Extract the preview image and title and apply the video heuristic.
///
/// Kept synchronous: `scraper::Html` is not `Send`.
pub fn inspect_html(url: &Url, html: &str) -> PageInfo {
    let doc = scraper::Html::parse_document(html);
    let meta = |property: &str| -> Option<String> {
        let selector = scraper::Selector::parse(&format!(
            "meta[property=\"{property}\"], meta[name=\"{property}\"]"
        ))
        .ok()?;
        doc.select(&selector)
            .filter_map(|el| el.value().attr("content"))
            .map(str::trim)
            .find(|c| !c.is_empty())
            .map(str::to_string)
    };

    let title = meta("og:title").or_else(|| {
        let selector = scraper::Selector::parse("title").ok()?;
        doc.select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    });
    let image_url = meta("og:image").or_else(|| meta("twitter:image"));
    let og_video = meta("og:video").is_some()
        || meta("og:type").is_some_and(|t| t.starts_with("video"));

    let has_video_element = scraper::Selector::parse("video")
        .map(|s| doc.select(&s).next().is_some())
        .unwrap_or(false);
    let has_play_label = scraper::Selector::parse("[aria-label]")
        .map(|s| {
            doc.select(&s).any(|el| {
                el.value()
                    .attr("aria-label")
                    .is_some_and(|l| {
                        l.to_ascii_lowercase()
                            .split(|c: char| !c.is_ascii_alphanumeric())
                            .any(|w| w == "play")
                    })
            })
        })
        .unwrap_or(false);
    let path = url.path();
    let video_path = video_path_re().is_match(path) || path.contains("/p/");

    PageInfo {
        title,
        image_url,
        is_video: has_video_element || has_play_label || video_path || og_video,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
