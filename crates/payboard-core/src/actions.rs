//! Confirmation cycle for the per-row transaction actions
//!
//! Each transaction runs `Idle -> DialogOpen(kind) -> Confirming(kind) -> Idle`.
//! Which kind is offered depends on the status: failed rows can be retried,
//! pending rows marked paid, completed rows refunded. "View details" is always
//! on the menu and never touches this state machine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{CoreError, CoreResult};
use crate::gateway::TransactionActionGateway;
use crate::models::Transaction;
use crate::types::TransactionStatus;

/// A state-changing action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    MarkPaid,
    Retry,
    Refund,
}

impl ActionKind {
    /// The single action a transaction in `status` offers, if any
    pub fn for_status(status: TransactionStatus) -> Option<Self> {
        match status {
            TransactionStatus::Failed => Some(ActionKind::Retry),
            TransactionStatus::Pending => Some(ActionKind::MarkPaid),
            TransactionStatus::Completed => Some(ActionKind::Refund),
            TransactionStatus::Refunded | TransactionStatus::Unknown => None,
        }
    }

    /// Dialog title
    pub fn title(&self) -> &'static str {
        match self {
            ActionKind::MarkPaid => "Mark as Paid",
            ActionKind::Retry => "Retry Charge",
            ActionKind::Refund => "Issue Refund",
        }
    }

    /// Label of the confirm button
    pub fn confirm_label(&self) -> &'static str {
        match self {
            ActionKind::MarkPaid => "Confirm",
            ActionKind::Retry => "Retry",
            ActionKind::Refund => "Confirm Refund",
        }
    }

    /// Question shown in the confirmation dialog
    pub fn prompt(&self, tx: &Transaction) -> String {
        match self {
            ActionKind::MarkPaid => format!("Are you sure you want to mark transaction #{} as paid?", tx.id),
            ActionKind::Retry => format!("Retry failed transaction #{}?", tx.id),
            ActionKind::Refund => match tx.amount {
                Some(amount) => format!("Refund transaction #{} for {}?", tx.id, amount),
                None => format!("Refund transaction #{}?", tx.id),
            },
        }
    }

    /// Call the matching gateway operation
    pub async fn execute<G>(&self, gateway: &G, id: &str) -> CoreResult<Transaction>
    where
        G: TransactionActionGateway + ?Sized,
    {
        match self {
            ActionKind::MarkPaid => gateway.mark_as_paid(id).await,
            ActionKind::Retry => gateway.retry_charge(id).await,
            ActionKind::Refund => gateway.refund_transaction(id).await,
        }
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mark-paid" | "mark_paid" => Ok(ActionKind::MarkPaid),
            "retry" => Ok(ActionKind::Retry),
            "refund" => Ok(ActionKind::Refund),
            _ => Err(format!("Invalid action: {}", s)),
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::MarkPaid => write!(f, "mark-paid"),
            ActionKind::Retry => write!(f, "retry"),
            ActionKind::Refund => write!(f, "refund"),
        }
    }
}

/// Entries of a row's action menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ViewDetails,
    Perform(ActionKind),
}

impl MenuAction {
    /// Menu for a transaction in `status`: view details plus at most one action
    pub fn menu_for(status: TransactionStatus) -> Vec<MenuAction> {
        let mut menu = vec![MenuAction::ViewDetails];
        if let Some(kind) = ActionKind::for_status(status) {
            menu.push(MenuAction::Perform(kind));
        }
        menu
    }
}

impl std::fmt::Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuAction::ViewDetails => write!(f, "view-details"),
            MenuAction::Perform(kind) => write!(f, "{}", kind),
        }
    }
}

impl Serialize for MenuAction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Where a transaction's confirmation cycle stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "action", rename_all = "camelCase")]
pub enum ActionPhase {
    Idle,
    DialogOpen(ActionKind),
    Confirming(ActionKind),
}

/// Snapshot of an open action, as the dialog needs it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub target_id: String,
    pub dialog_open: bool,
    /// True while the gateway call is outstanding; confirm and cancel are disabled
    pub in_flight: bool,
}

/// Confirmation state machine for one transaction
#[derive(Debug, Clone)]
pub struct ActionController {
    transaction_id: String,
    status: TransactionStatus,
    phase: ActionPhase,
}

impl ActionController {
    pub fn new(tx: &Transaction) -> Self {
        Self {
            transaction_id: tx.id.clone(),
            status: tx.status,
            phase: ActionPhase::Idle,
        }
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    pub fn menu(&self) -> Vec<MenuAction> {
        MenuAction::menu_for(self.status)
    }

    /// Loading flag: set for exactly the span of the gateway call
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, ActionPhase::Confirming(_))
    }

    pub fn request(&self) -> Option<ActionRequest> {
        let (kind, in_flight) = match self.phase {
            ActionPhase::Idle => return None,
            ActionPhase::DialogOpen(kind) => (kind, false),
            ActionPhase::Confirming(kind) => (kind, true),
        };
        Some(ActionRequest {
            kind,
            target_id: self.transaction_id.clone(),
            dialog_open: true,
            in_flight,
        })
    }

    /// Refresh the status the menu is gated on. Ignored mid-flight.
    pub fn sync_status(&mut self, status: TransactionStatus) {
        if !self.is_loading() {
            self.status = status;
        }
    }

    /// Open the confirmation dialog for `kind`
    pub fn open(&mut self, kind: ActionKind) -> CoreResult<ActionRequest> {
        if self.is_loading() {
            return Err(self.in_flight_error());
        }
        if ActionKind::for_status(self.status) != Some(kind) {
            return Err(CoreError::ActionNotAllowed {
                id: self.transaction_id.clone(),
                action: kind.to_string(),
                status: self.status.to_string(),
            });
        }
        self.phase = ActionPhase::DialogOpen(kind);
        self.request().ok_or_else(|| CoreError::InternalError {
            message: "dialog opened without a request".to_string(),
        })
    }

    /// Dismiss the dialog. Not possible while the action is in flight.
    pub fn cancel(&mut self) -> CoreResult<()> {
        if self.is_loading() {
            return Err(self.in_flight_error());
        }
        self.phase = ActionPhase::Idle;
        Ok(())
    }

    /// Move an open dialog for `kind` into `Confirming`
    pub fn begin(&mut self, kind: ActionKind) -> CoreResult<ActionRequest> {
        match self.phase {
            ActionPhase::Confirming(_) => Err(self.in_flight_error()),
            ActionPhase::DialogOpen(open) if open == kind => {
                self.phase = ActionPhase::Confirming(kind);
                self.request().ok_or_else(|| CoreError::InternalError {
                    message: "confirming without a request".to_string(),
                })
            }
            _ => Err(CoreError::NoOpenDialog {
                id: self.transaction_id.clone(),
                action: kind.to_string(),
            }),
        }
    }

    /// Single completion path: back to `Idle` with the dialog closed, whatever
    /// the outcome. A successful outcome also refreshes the status.
    pub fn settle(&mut self, outcome: &CoreResult<Transaction>) {
        let kind = match self.phase {
            ActionPhase::Confirming(kind) => kind,
            _ => return,
        };
        self.phase = ActionPhase::Idle;
        match outcome {
            Ok(tx) => {
                log::info!(
                    target: "payboard::actions",
                    "{} on {} settled, status {} -> {}",
                    kind, self.transaction_id, self.status, tx.status
                );
                self.status = tx.status;
            }
            Err(e) => log::warn!(
                target: "payboard::actions",
                "{} on {} failed: {}",
                kind, self.transaction_id, e
            ),
        }
    }

    /// Run the confirmation: exactly one gateway call, then settle
    pub async fn confirm<G>(&mut self, kind: ActionKind, gateway: &G) -> CoreResult<Transaction>
    where
        G: TransactionActionGateway + ?Sized,
    {
        self.begin(kind)?;
        let outcome = kind.execute(gateway, &self.transaction_id).await;
        self.settle(&outcome);
        outcome
    }

    fn in_flight_error(&self) -> CoreError {
        CoreError::ActionInFlight {
            id: self.transaction_id.clone(),
        }
    }
}

/// Controllers for every transaction with an open dialog or an action in
/// flight, shared between request handlers.
///
/// The lock covers state transitions only and is never held across the
/// gateway call, so actions on different transactions run concurrently while
/// a second confirm for the same transaction is rejected.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    controllers: Mutex<HashMap<String, ActionController>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ActionController>> {
        self.controllers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self, id: &str) -> ActionPhase {
        self.lock().get(id).map_or(ActionPhase::Idle, |c| c.phase())
    }

    pub fn is_loading(&self, id: &str) -> bool {
        self.lock().get(id).map_or(false, |c| c.is_loading())
    }

    pub fn request(&self, id: &str) -> Option<ActionRequest> {
        self.lock().get(id).and_then(|c| c.request())
    }

    /// Open the dialog for `kind` on `tx`
    pub fn open(&self, tx: &Transaction, kind: ActionKind) -> CoreResult<ActionRequest> {
        let mut controllers = self.lock();
        let controller = controllers
            .entry(tx.id.clone())
            .or_insert_with(|| ActionController::new(tx));
        controller.sync_status(tx.status);
        let result = controller.open(kind);
        if controller.phase() == ActionPhase::Idle {
            controllers.remove(&tx.id);
        }
        result
    }

    /// Dismiss the dialog on `id`; a no-op when nothing is open
    pub fn cancel(&self, id: &str) -> CoreResult<()> {
        let mut controllers = self.lock();
        if let Some(controller) = controllers.get_mut(id) {
            controller.cancel()?;
            controllers.remove(id);
        }
        Ok(())
    }

    /// Confirm the open `kind` dialog on `id` through `gateway`
    pub async fn confirm<G>(&self, id: &str, kind: ActionKind, gateway: &G) -> CoreResult<Transaction>
    where
        G: TransactionActionGateway + ?Sized,
    {
        self.begin(id, kind)?;
        let mut in_flight = InFlight {
            registry: self,
            id,
            kind,
            armed: true,
        };
        let outcome = kind.execute(gateway, id).await;
        in_flight.armed = false;
        self.settle(id, &outcome);
        outcome
    }

    fn begin(&self, id: &str, kind: ActionKind) -> CoreResult<ActionRequest> {
        let mut controllers = self.lock();
        match controllers.get_mut(id) {
            Some(controller) => controller.begin(kind),
            None => Err(CoreError::NoOpenDialog {
                id: id.to_string(),
                action: kind.to_string(),
            }),
        }
    }

    fn settle(&self, id: &str, outcome: &CoreResult<Transaction>) {
        let mut controllers = self.lock();
        if let Some(mut controller) = controllers.remove(id) {
            controller.settle(outcome);
        }
    }
}

/// Releases a confirm whose future was dropped before the gateway answered,
/// so the transaction does not stay loading forever.
struct InFlight<'a> {
    registry: &'a ActionRegistry,
    id: &'a str,
    kind: ActionKind,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        log::warn!(
            target: "payboard::actions",
            "{} on {} abandoned before the backend answered; outcome unknown",
            self.kind,
            self.id
        );
        self.registry.lock().remove(self.id);
    }
}
