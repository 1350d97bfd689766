//! The wallet session lifecycle.
//!
//! States: `Disconnected → Connecting → Connected → (Disconnected)`.
//! On mobile the connect is an out-of-band hand-off: the session emits
//! two deep-link redirects and stays `Connecting`, because no response
//! channel exists and the outcome only becomes visible after the page
//! reloads inside the wallet app. This asymmetry is inherited from the
//! hand-off contract, not something the session papers over.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use solbridge_feed::{ActivityEntry, ActivityLog, NotificationCenter, Severity};
use solbridge_gateway::LedgerRpc;
use solbridge_types::{AccountAddress, BalanceSnapshot, Timestamp};

use crate::detect::{BrowserFamily, Capabilities};
use crate::error::SessionError;
use crate::host::{HostActions, SessionConfig};
use crate::provider::WalletProvider;

/// Lifecycle state of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
}

/// The authenticated identity, live only while connected.
#[derive(Clone)]
pub struct WalletIdentity {
    pub address: AccountAddress,
    pub provider: Arc<dyn WalletProvider>,
}

/// What a successful `connect` produced.
#[derive(Debug)]
pub enum ConnectOutcome {
    /// Desktop handshake completed; the wallet is attached.
    Connected {
        address: AccountAddress,
        balance: Option<BalanceSnapshot>,
    },
    /// Mobile hand-off emitted; outcome unobservable in-process.
    MobileHandoff,
}

struct Inner {
    state: SessionState,
    identity: Option<WalletIdentity>,
    balance: Option<BalanceSnapshot>,
}

/// Owns the connect/disconnect lifecycle and the authenticated identity.
pub struct WalletSession {
    inner: Mutex<Inner>,
    ledger: Arc<dyn LedgerRpc>,
    host: Arc<dyn HostActions>,
    notifications: Arc<NotificationCenter>,
    activity: Arc<ActivityLog>,
    config: SessionConfig,
}

impl WalletSession {
    pub fn new(
        ledger: Arc<dyn LedgerRpc>,
        host: Arc<dyn HostActions>,
        notifications: Arc<NotificationCenter>,
        activity: Arc<ActivityLog>,
        config: SessionConfig,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: SessionState::Disconnected,
                identity: None,
                balance: None,
            }),
            ledger,
            host,
            notifications,
            activity,
            config,
        }
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    /// The live identity, if a wallet is attached.
    pub async fn identity(&self) -> Option<WalletIdentity> {
        self.inner.lock().await.identity.clone()
    }

    /// The most recent balance reading, if any.
    pub async fn balance_snapshot(&self) -> Option<BalanceSnapshot> {
        self.inner.lock().await.balance
    }

    /// Request a connection per the detected capabilities.
    ///
    /// A second call while one is in flight is rejected; only one
    /// identity is ever established per session.
    pub async fn connect(&self, caps: &Capabilities) -> Result<ConnectOutcome, SessionError> {
        {
            let mut inner = self.inner.lock().await;
            match inner.state {
                SessionState::Disconnected => inner.state = SessionState::Connecting,
                SessionState::Connecting => return Err(SessionError::ConnectInProgress),
                SessionState::Connected => return Err(SessionError::AlreadyConnected),
            }
        }

        if caps.is_mobile {
            self.emit_mobile_handoff(&caps.current_url).await;
            return Ok(ConnectOutcome::MobileHandoff);
        }

        let provider = match select_provider(caps) {
            Some(p) => p,
            None => {
                self.revert_to_disconnected().await;
                self.store_fallback(caps.browser).await;
                return Err(SessionError::NoProviderFound);
            }
        };

        tracing::info!(provider = provider.kind().name(), "starting wallet handshake");
        let address = match provider.connect().await {
            Ok(address) => address,
            Err(e) => {
                self.revert_to_disconnected().await;
                tracing::warn!(provider = provider.kind().name(), error = %e, "handshake rejected");
                self.notify("Wallet connection was rejected.", Severity::Error)
                    .await;
                return Err(SessionError::HandshakeRejected(e.to_string()));
            }
        };

        let balance = match self.ledger.get_balance(&address).await {
            Ok(lamports) => Some(BalanceSnapshot::new(lamports, Timestamp::now())),
            Err(e) => {
                tracing::warn!(error = %e, "balance refresh failed after connect");
                self.notify("Failed to fetch wallet balance.", Severity::Error)
                    .await;
                None
            }
        };

        {
            let mut inner = self.inner.lock().await;
            inner.state = SessionState::Connected;
            inner.identity = Some(WalletIdentity {
                address: address.clone(),
                provider,
            });
            inner.balance = balance;
        }
        tracing::info!(address = %address.truncated(), "wallet connected");

        self.notify("Wallet connected successfully!", Severity::Success)
            .await;
        self.activity
            .record(ActivityEntry::wallet_connected(
                address.truncated(),
                Timestamp::now(),
            ))
            .await;
        self.notify("Wallet connection activity added!", Severity::Info)
            .await;

        if let Some(snapshot) = balance {
            match self.ledger.get_minimum_rent_exempt_balance().await {
                Ok(min_rent) if snapshot.lamports < min_rent => {
                    self.notify("Insufficient funds for rent.", Severity::Error)
                        .await;
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "rent floor lookup failed"),
            }
        }

        Ok(ConnectOutcome::Connected { address, balance })
    }

    /// Fetch a fresh balance reading for the attached wallet.
    pub async fn refresh_balance(&self) -> Result<BalanceSnapshot, SessionError> {
        let address = match self.identity().await {
            Some(identity) => identity.address,
            None => return Err(SessionError::NotConnected),
        };
        let lamports = self.ledger.get_balance(&address).await?;
        let snapshot = BalanceSnapshot::new(lamports, Timestamp::now());
        self.inner.lock().await.balance = Some(snapshot);
        Ok(snapshot)
    }

    /// Delegate a signing request to the attached provider.
    ///
    /// Valid only while `Connected`; performs no I/O otherwise.
    pub async fn request_signature(&self, payload: &[u8]) -> Result<Vec<u8>, SessionError> {
        let provider = {
            let inner = self.inner.lock().await;
            match (&inner.state, &inner.identity) {
                (SessionState::Connected, Some(identity)) => Arc::clone(&identity.provider),
                _ => return Err(SessionError::NotConnected),
            }
        };
        provider.sign_transfer(payload).await.map_err(|e| {
            tracing::warn!(error = %e, "signature request declined");
            SessionError::SigningRejected(e.to_string())
        })
    }

    /// Clear the identity and return to `Disconnected`; idempotent.
    pub async fn disconnect(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state != SessionState::Disconnected {
            tracing::info!("wallet disconnected");
        }
        inner.state = SessionState::Disconnected;
        inner.identity = None;
        inner.balance = None;
    }

    async fn emit_mobile_handoff(&self, page_url: &str) {
        let handoff = &self.config.handoff;
        tracing::info!("emitting mobile wallet hand-off (outcome unobservable in-process)");
        self.host.redirect(&handoff.primary_link(page_url)).await;
        tokio::time::sleep(Duration::from_millis(handoff.fallback_delay_ms)).await;
        self.host.redirect(&handoff.fallback_link(page_url)).await;
    }

    async fn store_fallback(&self, browser: BrowserFamily) {
        self.notify("Phantom or Solflare extension not found.", Severity::Error)
            .await;
        let pages = self.config.stores.pages_for(browser);
        if pages.is_empty() {
            self.notify(
                "Please download the Phantom or Solflare extension for your browser.",
                Severity::Info,
            )
            .await;
            return;
        }
        for page in pages {
            self.host.open_uri(page).await;
        }
    }

    async fn revert_to_disconnected(&self) {
        let mut inner = self.inner.lock().await;
        inner.state = SessionState::Disconnected;
        inner.identity = None;
    }

    async fn notify(&self, message: &str, severity: Severity) {
        self.notifications
            .push(message, severity, Timestamp::now())
            .await;
    }
}

/// Pick the provider to target: the first self-identified primary one,
/// else the first available.
fn select_provider(caps: &Capabilities) -> Option<Arc<dyn WalletProvider>> {
    caps.providers
        .iter()
        .find(|p| p.kind().is_primary())
        .or_else(|| caps.providers.first())
        .map(Arc::clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use solbridge_gateway::{ConfirmStatus, GatewayError};
    use solbridge_types::{Blockhash, Lamports, TxSignature};

    use crate::provider::{ProviderError, ProviderKind};

    struct StubProvider {
        kind: ProviderKind,
        address: &'static str,
        reject_connect: bool,
        gate: Option<Arc<Notify>>,
        connects: AtomicUsize,
        signs: AtomicUsize,
    }

    impl StubProvider {
        fn new(kind: ProviderKind, address: &'static str) -> Self {
            Self {
                kind,
                address,
                reject_connect: false,
                gate: None,
                connects: AtomicUsize::new(0),
                signs: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl WalletProvider for StubProvider {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        async fn connect(&self) -> Result<AccountAddress, ProviderError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.reject_connect {
                return Err(ProviderError::Declined("user closed the popup".into()));
            }
            Ok(AccountAddress::parse(self.address).unwrap())
        }

        async fn sign_transfer(&self, payload: &[u8]) -> Result<Vec<u8>, ProviderError> {
            self.signs.fetch_add(1, Ordering::SeqCst);
            Ok(payload.to_vec())
        }
    }

    struct StubLedger {
        balance: u64,
        min_rent: u64,
        calls: AtomicUsize,
    }

    impl StubLedger {
        fn new(balance: u64, min_rent: u64) -> Self {
            Self {
                balance,
                min_rent,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LedgerRpc for StubLedger {
        async fn get_balance(&self, _address: &AccountAddress) -> Result<Lamports, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Lamports::new(self.balance))
        }

        async fn get_minimum_rent_exempt_balance(&self) -> Result<Lamports, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Lamports::new(self.min_rent))
        }

        async fn get_recent_anchor(&self) -> Result<Blockhash, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Blockhash::new("anchor"))
        }

        async fn broadcast(&self, _signed_tx: &[u8]) -> Result<TxSignature, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(TxSignature::new("sig"))
        }

        async fn confirm(
            &self,
            _signature: &TxSignature,
            _timeout: Duration,
        ) -> Result<ConfirmStatus, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ConfirmStatus::Confirmed)
        }
    }

    #[derive(Default)]
    struct StubHost {
        redirects: std::sync::Mutex<Vec<String>>,
        opened: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HostActions for StubHost {
        async fn redirect(&self, uri: &str) {
            self.redirects.lock().unwrap().push(uri.to_string());
        }

        async fn open_uri(&self, uri: &str) {
            self.opened.lock().unwrap().push(uri.to_string());
        }
    }

    const ADDR: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";

    struct Fixture {
        session: WalletSession,
        ledger: Arc<StubLedger>,
        host: Arc<StubHost>,
        notifications: Arc<NotificationCenter>,
        activity: Arc<ActivityLog>,
    }

    fn fixture(ledger: StubLedger) -> Fixture {
        let ledger = Arc::new(ledger);
        let host = Arc::new(StubHost::default());
        let notifications = Arc::new(NotificationCenter::default());
        let activity = Arc::new(ActivityLog::default());
        let session = WalletSession::new(
            Arc::clone(&ledger) as Arc<dyn LedgerRpc>,
            Arc::clone(&host) as Arc<dyn HostActions>,
            Arc::clone(&notifications),
            Arc::clone(&activity),
            SessionConfig::default(),
        );
        Fixture {
            session,
            ledger,
            host,
            notifications,
            activity,
        }
    }

    fn desktop_caps(providers: Vec<Arc<dyn WalletProvider>>) -> Capabilities {
        Capabilities {
            providers,
            is_mobile: false,
            browser: BrowserFamily::Chromium,
            current_url: "https://app.example.org/".to_string(),
        }
    }

    #[tokio::test]
    async fn connect_attaches_identity_and_records_activity() {
        let fx = fixture(StubLedger::new(2_000_000_000, 10_000));
        let provider = Arc::new(StubProvider::new(ProviderKind::Phantom, ADDR));
        let caps = desktop_caps(vec![provider]);

        let outcome = fx.session.connect(&caps).await.unwrap();
        match outcome {
            ConnectOutcome::Connected { address, balance } => {
                assert_eq!(address.as_str(), ADDR);
                assert_eq!(balance.unwrap().lamports, Lamports::new(2_000_000_000));
            }
            ConnectOutcome::MobileHandoff => panic!("unexpected hand-off"),
        }
        assert_eq!(fx.session.state().await, SessionState::Connected);

        let entries = fx.activity.entries().await;
        assert_eq!(entries[0].kind, solbridge_feed::ActivityKind::WalletConnected);
        assert_eq!(entries[0].hash, "4Nd1mBQt...DB4T");

        let messages: Vec<String> = fx
            .notifications
            .active(Timestamp::now())
            .await
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert!(messages.contains(&"Wallet connected successfully!".to_string()));
    }

    #[tokio::test]
    async fn primary_provider_preferred_over_first() {
        let fx = fixture(StubLedger::new(1, 0));
        let solflare = Arc::new(StubProvider::new(ProviderKind::Solflare, ADDR));
        let phantom = Arc::new(StubProvider::new(ProviderKind::Phantom, ADDR));
        let caps = desktop_caps(vec![
            Arc::clone(&solflare) as Arc<dyn WalletProvider>,
            Arc::clone(&phantom) as Arc<dyn WalletProvider>,
        ]);

        fx.session.connect(&caps).await.unwrap();
        assert_eq!(phantom.connects.load(Ordering::SeqCst), 1);
        assert_eq!(solflare.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_provider_opens_store_pages() {
        let fx = fixture(StubLedger::new(0, 0));
        let caps = desktop_caps(Vec::new());

        let err = fx.session.connect(&caps).await.unwrap_err();
        assert!(matches!(err, SessionError::NoProviderFound));
        assert_eq!(fx.session.state().await, SessionState::Disconnected);

        let opened = fx.host.opened.lock().unwrap().clone();
        assert_eq!(opened.len(), 2);
        assert!(opened[0].contains("chrome"));
        // No network traffic without a handshake.
        assert_eq!(fx.ledger.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_browser_gets_notification_instead_of_store_pages() {
        let fx = fixture(StubLedger::new(0, 0));
        let mut caps = desktop_caps(Vec::new());
        caps.browser = BrowserFamily::Other;

        let _ = fx.session.connect(&caps).await.unwrap_err();
        assert!(fx.host.opened.lock().unwrap().is_empty());
        let messages: Vec<String> = fx
            .notifications
            .active(Timestamp::now())
            .await
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert!(messages.iter().any(|m| m.contains("download")));
    }

    #[tokio::test]
    async fn handshake_rejection_reverts_to_disconnected() {
        let fx = fixture(StubLedger::new(0, 0));
        let mut provider = StubProvider::new(ProviderKind::Phantom, ADDR);
        provider.reject_connect = true;
        let caps = desktop_caps(vec![Arc::new(provider)]);

        let err = fx.session.connect(&caps).await.unwrap_err();
        assert!(matches!(err, SessionError::HandshakeRejected(_)));
        assert_eq!(fx.session.state().await, SessionState::Disconnected);
        assert!(fx.session.identity().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn mobile_handoff_emits_two_redirects_and_stays_connecting() {
        let fx = fixture(StubLedger::new(0, 0));
        let provider = Arc::new(StubProvider::new(ProviderKind::Phantom, ADDR));
        let mut caps = desktop_caps(vec![Arc::clone(&provider) as Arc<dyn WalletProvider>]);
        caps.is_mobile = true;

        let outcome = fx.session.connect(&caps).await.unwrap();
        assert!(matches!(outcome, ConnectOutcome::MobileHandoff));

        let redirects = fx.host.redirects.lock().unwrap().clone();
        assert_eq!(redirects.len(), 2);
        assert!(redirects[0].starts_with("https://phantom.app/ul/browse/"));
        assert!(redirects[1].starts_with("solflare://browse/"));

        // The hand-off is out-of-band: no in-process handshake runs, and
        // the session stays Connecting until the page reloads.
        assert_eq!(provider.connects.load(Ordering::SeqCst), 0);
        assert_eq!(fx.session.state().await, SessionState::Connecting);
    }

    #[tokio::test]
    async fn second_connect_while_connecting_is_rejected() {
        let fx = Arc::new(fixture(StubLedger::new(1, 0)));
        let gate = Arc::new(Notify::new());
        let mut provider = StubProvider::new(ProviderKind::Phantom, ADDR);
        provider.gate = Some(Arc::clone(&gate));
        let caps = desktop_caps(vec![Arc::new(provider)]);

        let first = {
            let fx = Arc::clone(&fx);
            let caps = caps.clone();
            tokio::spawn(async move { fx.session.connect(&caps).await.map(|_| ()) })
        };
        // Let the first attempt reach the gated handshake.
        tokio::task::yield_now().await;

        let err = fx.session.connect(&caps).await.unwrap_err();
        assert!(matches!(err, SessionError::ConnectInProgress));

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(fx.session.state().await, SessionState::Connected);
        assert!(fx.session.identity().await.is_some());
    }

    #[tokio::test]
    async fn connect_while_connected_is_rejected() {
        let fx = fixture(StubLedger::new(1, 0));
        let caps = desktop_caps(vec![Arc::new(StubProvider::new(ProviderKind::Phantom, ADDR))]);
        fx.session.connect(&caps).await.unwrap();
        let err = fx.session.connect(&caps).await.unwrap_err();
        assert!(matches!(err, SessionError::AlreadyConnected));
    }

    #[tokio::test]
    async fn signature_request_without_session_does_no_io() {
        let fx = fixture(StubLedger::new(1, 0));
        let err = fx.session.request_signature(b"payload").await.unwrap_err();
        assert!(matches!(err, SessionError::NotConnected));
        assert_eq!(fx.ledger.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rent_shortfall_raises_error_notification() {
        let fx = fixture(StubLedger::new(5_000, 10_000));
        let caps = desktop_caps(vec![Arc::new(StubProvider::new(ProviderKind::Phantom, ADDR))]);
        fx.session.connect(&caps).await.unwrap();

        let messages: Vec<String> = fx
            .notifications
            .active(Timestamp::now())
            .await
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert!(messages.contains(&"Insufficient funds for rent.".to_string()));
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let fx = fixture(StubLedger::new(1, 0));
        let caps = desktop_caps(vec![Arc::new(StubProvider::new(ProviderKind::Phantom, ADDR))]);
        fx.session.connect(&caps).await.unwrap();

        fx.session.disconnect().await;
        assert_eq!(fx.session.state().await, SessionState::Disconnected);
        assert!(fx.session.identity().await.is_none());

        fx.session.disconnect().await;
        assert_eq!(fx.session.state().await, SessionState::Disconnected);
    }
}
