use contracts::domain::a005_workload::Workload;
use leptos::prelude::*;

use crate::config::config;

#[derive(Clone, Debug)]
pub struct WorkloadListState {
    pub items: Vec<Workload>,
    pub search_query: String,
    /// `WorkloadStatus::code()`, empty for all
    pub status_filter: String,
    pub hide_completed: bool,
    pub sort_field: String,
    pub sort_ascending: bool,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub is_loaded: bool,
}

impl Default for WorkloadListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            search_query: String::new(),
            status_filter: String::new(),
            hide_completed: true,
            sort_field: "event_date".to_string(),
            sort_ascending: true,
            page: 0,
            page_size: config().default_page_size,
            total_count: 0,
            total_pages: 1,
            is_loaded: false,
        }
    }
}

pub fn create_state() -> RwSignal<WorkloadListState> {
    RwSignal::new(WorkloadListState::default())
}
