//! Action routes - row action menu and the confirm/cancel dialog cycle

pub mod api;

pub use api::{api_action_cancel, api_action_confirm, api_action_open, api_actions, ActionsView};
