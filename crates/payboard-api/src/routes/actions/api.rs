//! Action endpoints
//!
//! The view-model lock is never held across the backend call: the registry
//! guards the confirmation cycle, and the confirmed record is written back
//! into the table afterwards.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use payboard_core::{
    ActionKind, ActionPhase, ActionRequest, CoreError, MenuAction, Transaction, TransactionStatus, ViewAction,
};
use serde::Serialize;

/// Dialog copy for an open action
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogView {
    pub title: &'static str,
    pub prompt: String,
    pub confirm_label: &'static str,
    pub request: ActionRequest,
}

/// Menu and dialog state for one transaction
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionsView {
    pub transaction_id: String,
    pub status: TransactionStatus,
    pub menu: Vec<MenuAction>,
    pub state: ActionPhase,
    pub dialog: Option<DialogView>,
}

impl ActionsView {
    fn build(state: &AppState, tx: &Transaction) -> Self {
        let dialog = state.actions.request(&tx.id).map(|request| DialogView {
            title: request.kind.title(),
            prompt: request.kind.prompt(tx),
            confirm_label: request.kind.confirm_label(),
            request,
        });
        Self {
            transaction_id: tx.id.clone(),
            status: tx.status,
            menu: MenuAction::menu_for(tx.status),
            state: state.actions.phase(&tx.id),
            dialog,
        }
    }
}

/// Result of a confirmed action
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    pub transaction: Transaction,
    pub actions: ActionsView,
}

async fn find_transaction(state: &AppState, id: &str, operation: &str) -> Result<Transaction, ApiError> {
    let vm = state.view_model.read().await;
    vm.state().find(id).cloned().ok_or_else(|| {
        ApiError::new(CoreError::TransactionNotFound { id: id.to_string() }, operation).for_transaction(id)
    })
}

fn parse_kind(kind: &str) -> Result<ActionKind, ApiError> {
    kind.parse().map_err(ApiError::bad_request)
}

/// Menu and dialog state for a transaction
pub async fn api_actions(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<ActionsView>, ApiError> {
    let tx = find_transaction(&state, &id, "list actions").await?;
    Ok(Json(ActionsView::build(&state, &tx)))
}

/// Choose an action from the menu: opens its confirmation dialog
pub async fn api_action_open(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, String)>,
) -> Result<Json<ActionsView>, ApiError> {
    let kind = parse_kind(&kind)?;
    let tx = find_transaction(&state, &id, "open action").await?;
    state
        .actions
        .open(&tx, kind)
        .map_err(|e| ApiError::new(e, "open action").for_transaction(&id))?;
    Ok(Json(ActionsView::build(&state, &tx)))
}

/// Dismiss the dialog without calling the backend
pub async fn api_action_cancel(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, String)>,
) -> Result<Json<ActionsView>, ApiError> {
    parse_kind(&kind)?;
    let tx = find_transaction(&state, &id, "cancel action").await?;
    state
        .actions
        .cancel(&id)
        .map_err(|e| ApiError::new(e, "cancel action").for_transaction(&id))?;
    Ok(Json(ActionsView::build(&state, &tx)))
}

/// Confirm the open dialog: one backend call, then the row is updated.
/// On failure the table is left as it was and the dialog is closed.
pub async fn api_action_confirm(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, String)>,
) -> Result<Json<ActionOutcome>, ApiError> {
    let kind = parse_kind(&kind)?;
    let updated = state
        .actions
        .confirm(&id, kind, state.gateway.as_ref())
        .await
        .map_err(|e| ApiError::new(e, "confirm action").for_transaction(&id))?;

    state
        .view_model
        .write()
        .await
        .dispatch(ViewAction::ReplaceTransaction(updated.clone()));

    let actions = ActionsView::build(&state, &updated);
    Ok(Json(ActionOutcome { transaction: updated, actions }))
}
