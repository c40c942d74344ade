//! Route modules for the API server
//!
//! Each module follows the same structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON endpoints
//! - page.rs: projections of core state into response bodies, where needed

pub mod actions;
pub mod auth;
pub mod transactions;
