//! Top-level wiring: one struct owning the whole client.

use std::sync::Arc;
use std::time::Duration;

use solbridge_feed::{ActivityLog, NotificationCenter};
use solbridge_gateway::{GatewayError, LedgerGateway, LedgerRpc};
use solbridge_session::{
    Capabilities, ConnectOutcome, HostActions, HostEnvironment, ProviderDetector, SessionError,
    WalletSession,
};
use solbridge_types::Timestamp;
use tokio::task::JoinHandle;

use crate::config::BridgeConfig;
use crate::error::TransferError;
use crate::orchestrator::{TransferOrchestrator, TransferOutcome};

/// The assembled client: feeds, session, and orchestrator, built from one
/// [`BridgeConfig`].
pub struct Bridge {
    notifications: Arc<NotificationCenter>,
    activity: Arc<ActivityLog>,
    session: Arc<WalletSession>,
    orchestrator: TransferOrchestrator,
    expiry_interval: Duration,
}

impl Bridge {
    /// Build the client against the configured ledger endpoint.
    pub fn new(config: BridgeConfig, host: Arc<dyn HostActions>) -> Result<Self, GatewayError> {
        let gateway = Arc::new(LedgerGateway::new(config.rpc.clone())?);
        Ok(Self::with_ledger(config, host, gateway))
    }

    /// Build the client around an externally supplied ledger seam.
    pub fn with_ledger(
        config: BridgeConfig,
        host: Arc<dyn HostActions>,
        ledger: Arc<dyn LedgerRpc>,
    ) -> Self {
        let notifications = Arc::new(NotificationCenter::new(config.feed.notification_ttl_ms));
        let activity = Arc::new(ActivityLog::seeded(
            config.feed.activity_capacity,
            Timestamp::now(),
        ));
        let session = Arc::new(WalletSession::new(
            Arc::clone(&ledger),
            host,
            Arc::clone(&notifications),
            Arc::clone(&activity),
            config.session.clone(),
        ));
        let orchestrator = TransferOrchestrator::new(
            Arc::clone(&session),
            ledger,
            Arc::clone(&notifications),
            Arc::clone(&activity),
            config.transfer.clone(),
        );
        Self {
            notifications,
            activity,
            session,
            orchestrator,
            expiry_interval: Duration::from_millis(config.feed.notification_ttl_ms.max(1_000) / 5),
        }
    }

    /// Detect host capabilities and request a wallet connection.
    pub async fn connect(&self, env: &HostEnvironment) -> Result<ConnectOutcome, SessionError> {
        let caps = self.detect(env);
        self.session.connect(&caps).await
    }

    /// Inspect the host without side effects.
    pub fn detect(&self, env: &HostEnvironment) -> Capabilities {
        ProviderDetector::detect(env)
    }

    /// Run one transfer attempt against the attached wallet.
    pub async fn transfer(&self) -> Result<TransferOutcome, TransferError> {
        self.orchestrator.execute().await
    }

    /// Start the periodic notification-expiry task.
    pub fn spawn_notification_expiry(&self) -> JoinHandle<()> {
        self.notifications.spawn_expiry(self.expiry_interval)
    }

    pub fn session(&self) -> &Arc<WalletSession> {
        &self.session
    }

    pub fn orchestrator(&self) -> &TransferOrchestrator {
        &self.orchestrator
    }

    pub fn notifications(&self) -> &Arc<NotificationCenter> {
        &self.notifications
    }

    pub fn activity(&self) -> &Arc<ActivityLog> {
        &self.activity
    }
}
