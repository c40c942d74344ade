//! Transaction routes - table page, search and filters, pagination, selection
//!
//! Structure:
//! - api.rs: JSON endpoints
//! - page.rs: table page and row projections

pub mod api;
pub mod page;

pub use api::{
    api_clear_selection,
    api_export,
    api_refresh,
    api_select,
    api_set_filters,
    api_set_page,
    api_stats,
    api_transactions,
};

pub use page::{TransactionPage, TransactionRow};
