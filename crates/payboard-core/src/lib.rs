//! Transaction dashboard business logic
//!
//! - `view_model`: search, filters, pagination and selection for the table
//! - `actions`: confirmation cycle for mark-paid, retry and refund
//! - `password` / `forms`: registration and login form rules
//! - `stats`: figures for the stat cards
//! - `gateway`: contracts for the backend collaborators

pub mod actions;
pub mod error;
pub mod filter;
pub mod forms;
pub mod gateway;
pub mod models;
pub mod pagination;
pub mod password;
pub mod stats;
pub mod types;
pub mod view_model;

pub use actions::{ActionController, ActionKind, ActionPhase, ActionRegistry, ActionRequest, MenuAction};
pub use error::{CoreError, CoreResult, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorDetails, ErrorLogger, ErrorSeverity};
pub use filter::{apply_filters, FilterCriteria};
pub use forms::{FieldError, LoginForm, RegisterForm};
pub use gateway::{AuthGateway, DashboardGateway, TransactionActionGateway, TransactionSource};
pub use models::{Account, Credentials, Registration, Session, Transaction};
pub use pagination::{page_count, paginate, PageRange, DEFAULT_PAGE_SIZE};
pub use password::{PasswordStrength, StrengthLabel};
pub use stats::{compare_periods, percent_change, summarize, Change, PeriodComparison, TransactionSummary, MAX_PERIOD_DAYS};
pub use types::{AmountRange, Filter, PaymentMethod, TransactionStatus};
pub use view_model::{reduce, TransactionListViewModel, ViewAction, ViewMode, ViewState};

use payboard_config::Config;

/// Build an empty view-model sized by the pagination settings
pub fn view_model_from_config(config: &Config) -> TransactionListViewModel {
    TransactionListViewModel::new(Vec::new(), config.pagination.page_size)
}
