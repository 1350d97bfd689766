//! Nullable host — records outward one-way actions.

use std::sync::Mutex;

use async_trait::async_trait;

use solbridge_session::HostActions;

/// A [`HostActions`] implementation that records every redirect and
/// opened URI instead of leaving the process.
#[derive(Default)]
pub struct NullHost {
    redirects: Mutex<Vec<String>>,
    opened: Mutex<Vec<String>>,
}

impl NullHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostActions for NullHost {
    async fn redirect(&self, uri: &str) {
        self.redirects.lock().unwrap().push(uri.to_string());
    }

    async fn open_uri(&self, uri: &str) {
        self.opened.lock().unwrap().push(uri.to_string());
    }
}
