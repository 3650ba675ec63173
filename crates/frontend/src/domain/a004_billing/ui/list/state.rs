use contracts::domain::a004_billing::Billing;
use leptos::prelude::*;

use crate::config::config;

#[derive(Clone, Debug)]
pub struct BillingListState {
    pub items: Vec<Billing>,
    pub search_query: String,
    /// `BillingStatus::code()`, empty for all
    pub status_filter: String,
    pub overdue_only: bool,
    pub sort_field: String,
    pub sort_ascending: bool,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub is_loaded: bool,
}

impl Default for BillingListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            search_query: String::new(),
            status_filter: String::new(),
            overdue_only: false,
            sort_field: "due_date".to_string(),
            sort_ascending: true,
            page: 0,
            page_size: config().default_page_size,
            total_count: 0,
            total_pages: 1,
            is_loaded: false,
        }
    }
}

pub fn create_state() -> RwSignal<BillingListState> {
    RwSignal::new(BillingListState::default())
}
