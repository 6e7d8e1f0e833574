use crate::config::{ScreenshotService, Settings};
use tracing::debug;
use url::Url;

const PLACEHOLDER_BACKGROUND: &str = "cccccc";
const PLACEHOLDER_TEXT: &str = "666666";

/// Hosts and schemes a screenshot service cannot reach.
const UNREACHABLE_MARKERS: [&str; 4] = ["localhost", "127.0.0.1", "192.168.", "10.0."];
const UNREACHABLE_SCHEMES: [&str; 3] = ["file://", "chrome://", "about:"];

/// Builds preview image URLs for bookmarks.
pub struct ScreenshotLinks<'a> {
    service: &'a ScreenshotService,
    width: u32,
    height: u32,
}

impl<'a> ScreenshotLinks<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            service: &settings.screenshot_service,
            width: settings.screenshot_width,
            height: settings.screenshot_height,
        }
    }

    pub fn screenshot_url(&self, url: &str) -> String {
        if url.is_empty() || *self.service == ScreenshotService::None || !Self::is_capturable(url) {
            return self.placeholder_url();
        }

        match self.service {
            // thum.io takes the target verbatim in its path
            ScreenshotService::ThumIo => format!(
                "https://image.thum.io/get/width/{}/crop/{}/{}",
                self.width, self.height, url
            ),
            ScreenshotService::ThumbnailWs => format!(
                "https://api.thumbnail.ws/api/free/thumbnail/get?url={}&width={}&height={}",
                urlencoding::encode(url),
                self.width,
                self.height
            ),
            ScreenshotService::None | ScreenshotService::Other(_) => {
                debug!("No screenshot backend for service '{}'", self.service);
                self.placeholder_url()
            }
        }
    }

    pub fn placeholder_url(&self) -> String {
        format!(
            "https://via.placeholder.com/{}x{}/{}/{}?text=Website+Preview",
            self.width, self.height, PLACEHOLDER_BACKGROUND, PLACEHOLDER_TEXT
        )
    }

    fn is_capturable(url: &str) -> bool {
        if UNREACHABLE_MARKERS.iter().any(|marker| url.contains(marker)) {
            return false;
        }
        if UNREACHABLE_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
            return false;
        }
        url.starts_with("http")
    }
}

/// Hostname of `url` without its `www.` prefix, for card captions.
pub fn domain_of(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    match Url::parse(url) {
        Ok(parsed) => parsed.host_str().unwrap_or_default().replacen("www.", "", 1),
        Err(_) => match url.split('/').nth(2) {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => url.to_string(),
        },
    }
}

/// Escapes a title for embedding in a table cell or card heading.
pub fn escape_markdown(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
