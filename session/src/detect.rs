//! Provider and device detection.
//!
//! The host hands the client an explicit [`HostEnvironment`] describing
//! what is installed and where the page is running; [`ProviderDetector`]
//! classifies it into a [`Capabilities`] descriptor. Detection is pure
//! and idempotent — no side effects, safe to call repeatedly.

use std::sync::Arc;

use crate::provider::WalletProvider;

/// User-agent fragments that classify the device as mobile.
const MOBILE_MARKERS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Browser family, used to pick extension-store fallback pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrowserFamily {
    Firefox,
    Chromium,
    Other,
}

impl BrowserFamily {
    /// Classify from a user-agent string.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if ua.contains("firefox") {
            return BrowserFamily::Firefox;
        }
        if ua.contains("chrome") || ua.contains("chromium") || ua.contains("edg") {
            return BrowserFamily::Chromium;
        }
        BrowserFamily::Other
    }
}

/// What the host environment exposes to the client.
pub struct HostEnvironment {
    /// The host's user-agent string.
    pub user_agent: String,
    /// URL of the page the client is running in, used for deep links.
    pub current_url: String,
    /// Provider adapters the host found installed.
    pub providers: Vec<Arc<dyn WalletProvider>>,
}

/// Capability descriptor produced by detection.
#[derive(Clone)]
pub struct Capabilities {
    /// Available provider handles, in host order.
    pub providers: Vec<Arc<dyn WalletProvider>>,
    pub is_mobile: bool,
    pub browser: BrowserFamily,
    /// Carried through for the mobile hand-off deep links.
    pub current_url: String,
}

impl Capabilities {
    pub fn has_provider(&self) -> bool {
        !self.providers.is_empty()
    }
}

/// Inspects the host environment for wallet providers and device class.
pub struct ProviderDetector;

impl ProviderDetector {
    pub fn detect(env: &HostEnvironment) -> Capabilities {
        let ua = env.user_agent.to_ascii_lowercase();
        let is_mobile = MOBILE_MARKERS.iter().any(|marker| ua.contains(marker));
        let browser = BrowserFamily::from_user_agent(&env.user_agent);
        tracing::debug!(
            providers = env.providers.len(),
            is_mobile,
            ?browser,
            "host capabilities detected"
        );
        Capabilities {
            providers: env.providers.clone(),
            is_mobile,
            browser,
            current_url: env.current_url.clone(),
        }
    }
}
