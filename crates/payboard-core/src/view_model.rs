//! Transaction list view-model
//!
//! Holds the source collection, the filter criteria, the page cursor and the
//! selection, and derives what the table shows from them. All mutation goes
//! through [`reduce`], which consumes the state and returns the next one.
//!
//! Page policy: any change to the search text or a filter resets the page to
//! 1; replacing the source or asking for an explicit page clamps it into the
//! valid range.

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::filter::{apply_filters, FilterCriteria};
use crate::models::Transaction;
use crate::pagination::{clamp_page, page_count, paginate, PageRange, DEFAULT_PAGE_SIZE};
use crate::types::{AmountRange, Filter, PaymentMethod, TransactionStatus};

/// Whether the table or a single transaction is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    List,
    Detail,
}

/// State transitions accepted by the view-model
#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    SetSearch(String),
    SetStatusFilter(Filter<TransactionStatus>),
    SetPaymentMethodFilter(Filter<PaymentMethod>),
    SetAmountRangeFilter(Filter<AmountRange>),
    /// Replace all criteria at once
    SetCriteria(FilterCriteria),
    SetPage(usize),
    NextPage,
    PreviousPage,
    Select(String),
    ClearSelection,
    /// New snapshot of the source collection
    ReplaceSource(Vec<Transaction>),
    /// A single record confirmed by the gateway after an action
    ReplaceTransaction(Transaction),
}

/// Complete view-model state
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    source: Vec<Transaction>,
    criteria: FilterCriteria,
    page: usize,
    page_size: usize,
    selection: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    /// Fresh state on page 1 with no filters and no selection.
    /// A `page_size` of 0 falls back to the default.
    pub fn new(source: Vec<Transaction>, page_size: usize) -> Self {
        let page_size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };
        Self {
            source,
            criteria: FilterCriteria::default(),
            page: 1,
            page_size,
            selection: None,
        }
    }

    pub fn source(&self) -> &[Transaction] {
        &self.source
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Transactions passing the current criteria, in source order
    pub fn filtered(&self) -> Vec<&Transaction> {
        apply_filters(&self.source, &self.criteria)
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered_count(), self.page_size)
    }

    /// The rows of the current page
    pub fn visible_page(&self) -> Vec<&Transaction> {
        let filtered = self.filtered();
        paginate(&filtered, self.page, self.page_size).to_vec()
    }

    pub fn page_range(&self) -> PageRange {
        PageRange::new(self.page, self.page_size, self.filtered_count())
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    pub fn mode(&self) -> ViewMode {
        if self.selection.is_some() {
            ViewMode::Detail
        } else {
            ViewMode::List
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn selected(&self) -> Option<&Transaction> {
        let id = self.selection.as_deref()?;
        self.find(id)
    }

    pub fn find(&self, id: &str) -> Option<&Transaction> {
        self.source.iter().find(|t| t.id == id)
    }

    /// The set handed to the CSV export: every filtered row, not just the page
    pub fn export_set(&self) -> Vec<Transaction> {
        self.filtered().into_iter().cloned().collect()
    }

    fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        if criteria != self.criteria {
            log::debug!(target: "payboard::view", "criteria changed, page reset to 1");
            self.criteria = criteria;
            self.page = 1;
        }
        self
    }

    fn clamped(mut self) -> Self {
        self.page = clamp_page(self.page, self.filtered_count(), self.page_size);
        self
    }
}

/// Apply one action to the state and return the next state.
pub fn reduce(state: ViewState, action: ViewAction) -> ViewState {
    match action {
        ViewAction::SetSearch(query) => {
            let criteria = FilterCriteria { search_query: query, ..state.criteria.clone() };
            state.with_criteria(criteria)
        }
        ViewAction::SetStatusFilter(filter) => {
            let criteria = FilterCriteria { status_filter: filter, ..state.criteria.clone() };
            state.with_criteria(criteria)
        }
        ViewAction::SetPaymentMethodFilter(filter) => {
            let criteria = FilterCriteria { payment_method_filter: filter, ..state.criteria.clone() };
            state.with_criteria(criteria)
        }
        ViewAction::SetAmountRangeFilter(filter) => {
            let criteria = FilterCriteria { amount_range_filter: filter, ..state.criteria.clone() };
            state.with_criteria(criteria)
        }
        ViewAction::SetCriteria(criteria) => state.with_criteria(criteria),
        ViewAction::SetPage(page) => ViewState { page, ..state }.clamped(),
        ViewAction::NextPage => {
            let page = state.page.saturating_add(1);
            ViewState { page, ..state }.clamped()
        }
        ViewAction::PreviousPage => {
            let page = state.page.saturating_sub(1);
            ViewState { page, ..state }.clamped()
        }
        ViewAction::Select(id) => {
            if state.find(&id).is_some() {
                ViewState { selection: Some(id), ..state }
            } else {
                log::warn!(target: "payboard::view", "select ignored, transaction {} not in source", id);
                ViewState { selection: None, ..state }
            }
        }
        ViewAction::ClearSelection => ViewState { selection: None, ..state },
        ViewAction::ReplaceSource(source) => {
            let mut next = ViewState { source, ..state };
            if let Some(id) = next.selection.take() {
                if next.find(&id).is_some() {
                    next.selection = Some(id);
                } else {
                    log::warn!(target: "payboard::view", "selected transaction {} left the source, back to list", id);
                }
            }
            next.clamped()
        }
        ViewAction::ReplaceTransaction(updated) => {
            let mut next = state;
            match next.source.iter_mut().find(|t| t.id == updated.id) {
                Some(slot) => *slot = updated,
                None => log::debug!(target: "payboard::view", "update for unknown transaction {} dropped", updated.id),
            }
            next.clamped()
        }
    }
}

/// Owner of a [`ViewState`]; the handle the host application mutates.
#[derive(Debug, Clone, Default)]
pub struct TransactionListViewModel {
    state: ViewState,
}

impl TransactionListViewModel {
    pub fn new(source: Vec<Transaction>, page_size: usize) -> Self {
        Self {
            state: ViewState::new(source, page_size),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Run one action through [`reduce`]
    pub fn dispatch(&mut self, action: ViewAction) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    /// Select a transaction by id and switch to detail mode.
    ///
    /// An unknown id is a `TransactionNotFound` and leaves the view in list mode.
    pub fn select(&mut self, id: &str) -> CoreResult<&Transaction> {
        self.dispatch(ViewAction::Select(id.to_string()));
        self.state
            .selected()
            .ok_or_else(|| CoreError::TransactionNotFound { id: id.to_string() })
    }

    pub fn clear_selection(&mut self) {
        self.dispatch(ViewAction::ClearSelection);
    }

    /// Settle the selection against the current source. If the selected
    /// transaction is gone the selection is cleared and `TransactionNotFound`
    /// is returned.
    pub fn selected(&mut self) -> CoreResult<Option<&Transaction>> {
        match self.state.selection.clone() {
            None => Ok(None),
            Some(id) if self.state.find(&id).is_some() => Ok(self.state.selected()),
            Some(id) => {
                self.clear_selection();
                Err(CoreError::TransactionNotFound { id })
            }
        }
    }
}
