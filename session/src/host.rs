//! One-way host actions and their configuration.
//!
//! The mobile hand-off and the extension-store fallback both leave the
//! client's process: a redirect into a wallet app's in-app browser, or a
//! new tab on a store page. No response channel exists for either, so
//! they are modeled as fire-and-forget signals through [`HostActions`]
//! rather than as calls with a synthesized success state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::detect::BrowserFamily;

/// Outward actions the host performs on the client's behalf.
#[async_trait]
pub trait HostActions: Send + Sync {
    /// Navigate the current context to `uri` (deep-link hand-off).
    async fn redirect(&self, uri: &str);

    /// Open `uri` in a new context (store fallback pages).
    async fn open_uri(&self, uri: &str);
}

/// Mobile deep-link hand-off configuration.
///
/// Two sequential redirects: a primary universal link into one wallet
/// app's in-app browser, then after `fallback_delay_ms` a custom-scheme
/// link for the second app. Templates carry a `{url}` placeholder for the
/// current page URL.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HandoffConfig {
    #[serde(default = "default_primary_template")]
    pub primary_template: String,

    #[serde(default = "default_fallback_template")]
    pub fallback_template: String,

    #[serde(default = "default_fallback_delay_ms")]
    pub fallback_delay_ms: u64,
}

fn default_primary_template() -> String {
    "https://phantom.app/ul/browse/{url}".to_string()
}

fn default_fallback_template() -> String {
    "solflare://browse/{url}".to_string()
}

fn default_fallback_delay_ms() -> u64 {
    500
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            primary_template: default_primary_template(),
            fallback_template: default_fallback_template(),
            fallback_delay_ms: default_fallback_delay_ms(),
        }
    }
}

impl HandoffConfig {
    /// Fill a deep-link template with the percent-encoded page URL.
    pub fn primary_link(&self, page_url: &str) -> String {
        fill_template(&self.primary_template, page_url)
    }

    pub fn fallback_link(&self, page_url: &str) -> String {
        fill_template(&self.fallback_template, page_url)
    }
}

fn fill_template(template: &str, page_url: &str) -> String {
    template.replace("{url}", &percent_encode(page_url))
}

/// RFC 3986 component encoding: everything but unreserved characters is
/// escaped, so the page URL survives embedding in a deep link.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Extension-store fallback pages, per browser family.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_firefox_stores")]
    pub firefox: Vec<String>,

    #[serde(default = "default_chromium_stores")]
    pub chromium: Vec<String>,
}

fn default_firefox_stores() -> Vec<String> {
    vec![
        "https://addons.mozilla.org/en-US/firefox/addon/phantom-app/".to_string(),
        "https://addons.mozilla.org/en-US/firefox/addon/solflare-wallet/".to_string(),
    ]
}

fn default_chromium_stores() -> Vec<String> {
    vec![
        "https://chrome.google.com/webstore/detail/phantom/bfnaelmomeimhlpmgjnjophhpkkoljpa"
            .to_string(),
        "https://chromewebstore.google.com/detail/solflare-wallet/bhhhlbepdkbapadjdnnojkbgioiodbic"
            .to_string(),
    ]
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            firefox: default_firefox_stores(),
            chromium: default_chromium_stores(),
        }
    }
}

impl StoreConfig {
    /// Store pages to open for a browser family; empty for unknown
    /// browsers, which get a notification instead.
    pub fn pages_for(&self, browser: BrowserFamily) -> &[String] {
        match browser {
            BrowserFamily::Firefox => &self.firefox,
            BrowserFamily::Chromium => &self.chromium,
            BrowserFamily::Other => &[],
        }
    }
}

/// Session-level configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub handoff: HandoffConfig,

    #[serde(default)]
    pub stores: StoreConfig,
}
