//! The per-attempt transfer state machine.
//!
//! `Idle → Sizing → Building → AwaitingSignature → Broadcasting →
//! Confirming → Settled | Failed`. Each stage has exactly one failure
//! reason class — resource (funds), authorization (signature), or network
//! (broadcast/confirm) — so the user always gets an actionable message
//! instead of a generic error. A confirmation timeout is not a failure:
//! the transaction may still land, so the attempt ends with an *unknown*
//! outcome and is never resubmitted automatically.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};

use solbridge_feed::{ActivityEntry, ActivityKind, ActivityLog, AmountSign, NotificationCenter, Severity};
use solbridge_gateway::{ConfirmStatus, LedgerRpc};
use solbridge_session::{SessionError, WalletSession};
use solbridge_types::{AccountAddress, Lamports, Timestamp, TxSignature};

use crate::error::TransferError;
use crate::intent::{self, TransferIntent, DEFAULT_SPEND_FRACTION_BPS};

/// Observable stage of the current (or last) attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Sizing,
    Building,
    AwaitingSignature,
    Broadcasting,
    Confirming,
    Settled,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Sizing => "sizing",
            Stage::Building => "building",
            Stage::AwaitingSignature => "awaiting signature",
            Stage::Broadcasting => "broadcasting",
            Stage::Confirming => "confirming",
            Stage::Settled => "settled",
            Stage::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// Terminal result of one attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Confirmed at the target commitment.
    Settled {
        signature: TxSignature,
        amount: Lamports,
    },
    /// Broadcast but not confirmed before the deadline — outcome unknown,
    /// check the signature later. Not recorded in the activity log.
    Unsettled {
        signature: TxSignature,
        amount: Lamports,
    },
}

/// Orchestrator configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Account every transfer is sized against and sent to.
    pub destination: AccountAddress,

    /// Fraction of the spendable balance to move, in basis points.
    #[serde(default = "default_spend_fraction_bps")]
    pub spend_fraction_bps: u32,

    /// How long to wait for confirmation before reporting unknown.
    #[serde(default = "default_confirm_timeout_ms")]
    pub confirm_timeout_ms: u64,
}

fn default_spend_fraction_bps() -> u32 {
    DEFAULT_SPEND_FRACTION_BPS
}

fn default_confirm_timeout_ms() -> u64 {
    30_000
}

/// Runs one transfer attempt at a time against a wallet session.
pub struct TransferOrchestrator {
    session: Arc<WalletSession>,
    ledger: Arc<dyn LedgerRpc>,
    notifications: Arc<NotificationCenter>,
    activity: Arc<ActivityLog>,
    config: TransferConfig,
    in_flight: Mutex<()>,
    stage: watch::Sender<Stage>,
}

impl TransferOrchestrator {
    pub fn new(
        session: Arc<WalletSession>,
        ledger: Arc<dyn LedgerRpc>,
        notifications: Arc<NotificationCenter>,
        activity: Arc<ActivityLog>,
        config: TransferConfig,
    ) -> Self {
        let (stage, _) = watch::channel(Stage::Idle);
        Self {
            session,
            ledger,
            notifications,
            activity,
            config,
            in_flight: Mutex::new(()),
            stage,
        }
    }

    /// The stage the current (or last) attempt reached.
    pub fn stage(&self) -> Stage {
        *self.stage.borrow()
    }

    /// Watch stage transitions as they happen.
    pub fn subscribe_stage(&self) -> watch::Receiver<Stage> {
        self.stage.subscribe()
    }

    /// Run one attempt end to end.
    ///
    /// A second invocation while one is in flight is rejected — both would
    /// read and spend the same balance.
    pub async fn execute(&self) -> Result<TransferOutcome, TransferError> {
        let _guard = match self.in_flight.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::warn!("transfer attempt rejected: one already in flight");
                self.notify("A transfer is already in progress.", Severity::Error)
                    .await;
                return Err(TransferError::TransferInFlight);
            }
        };

        let result = self.run().await;
        match &result {
            Ok(TransferOutcome::Settled { signature, amount }) => {
                self.record_settled(signature, *amount).await;
            }
            Ok(TransferOutcome::Unsettled { signature, .. }) => {
                tracing::warn!(signature = %signature, "confirmation timed out; outcome unknown");
                self.notify(
                    "Transaction not confirmed in time — outcome unknown, check again later.",
                    Severity::Info,
                )
                .await;
            }
            Err(e) => {
                self.set_stage(Stage::Failed);
                tracing::warn!(error = %e, "transfer attempt failed");
                self.notify(&e.user_message(), Severity::Error).await;
            }
        }
        result
    }

    async fn run(&self) -> Result<TransferOutcome, TransferError> {
        self.set_stage(Stage::Idle);

        // Sizing: a fresh balance reading per attempt; a reused snapshot
        // would corrupt the rent-exemption check.
        self.set_stage(Stage::Sizing);
        let identity = self
            .session
            .identity()
            .await
            .ok_or(SessionError::NotConnected)?;
        let balance = self
            .ledger
            .get_balance(&identity.address)
            .await
            .map_err(|e| TransferError::Rpc {
                stage: Stage::Sizing,
                source: e,
            })?;
        let min_rent = self
            .ledger
            .get_minimum_rent_exempt_balance()
            .await
            .map_err(|e| TransferError::Rpc {
                stage: Stage::Sizing,
                source: e,
            })?;
        let spendable = intent::spendable(balance, min_rent);
        if spendable.is_zero() {
            return Err(TransferError::InsufficientFunds { balance, min_rent });
        }

        // Building: bind amount, fee payer and a fresh anchor.
        self.set_stage(Stage::Building);
        let amount = intent::sized_amount(spendable, self.config.spend_fraction_bps);
        let anchor = self
            .ledger
            .get_recent_anchor()
            .await
            .map_err(|e| TransferError::Rpc {
                stage: Stage::Building,
                source: e,
            })?;
        let intent = TransferIntent {
            source: identity.address.clone(),
            destination: self.config.destination.clone(),
            amount,
            fee_payer: identity.address.clone(),
            anchor,
        };
        tracing::info!(amount = %amount, destination = %intent.destination.truncated(), "transfer intent built");

        // Signature hand-off: the provider (and the user behind it) may
        // decline; there is no retry.
        self.set_stage(Stage::AwaitingSignature);
        let signed = self.session.request_signature(&intent.payload()).await?;

        self.set_stage(Stage::Broadcasting);
        let signature = self
            .ledger
            .broadcast(&signed)
            .await
            .map_err(TransferError::BroadcastRejected)?;

        self.set_stage(Stage::Confirming);
        let status = self
            .ledger
            .confirm(
                &signature,
                Duration::from_millis(self.config.confirm_timeout_ms),
            )
            .await
            .map_err(|e| TransferError::Rpc {
                stage: Stage::Confirming,
                source: e,
            })?;

        match status {
            ConfirmStatus::Confirmed => {
                self.set_stage(Stage::Settled);
                Ok(TransferOutcome::Settled { signature, amount })
            }
            // Stage stays Confirming: that is the truth of the attempt.
            ConfirmStatus::TimedOut => Ok(TransferOutcome::Unsettled { signature, amount }),
        }
    }

    async fn record_settled(&self, signature: &TxSignature, amount: Lamports) {
        let now = Timestamp::now();
        self.notify("Transfer transaction successful!", Severity::Success)
            .await;
        self.activity
            .record(ActivityEntry::new(
                ActivityKind::VoteTransfer,
                signature.truncated(),
                format!("-{}", amount.to_sol_string()),
                AmountSign::Negative,
                now,
            ))
            .await;
        self.notify("New activity added to recent transactions!", Severity::Info)
            .await;
    }

    fn set_stage(&self, stage: Stage) {
        tracing::debug!(%stage, "transfer stage");
        let _ = self.stage.send(stage);
    }

    async fn notify(&self, message: &str, severity: Severity) {
        self.notifications
            .push(message, severity, Timestamp::now())
            .await;
    }
}
