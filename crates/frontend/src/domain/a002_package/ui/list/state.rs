use contracts::domain::a002_package::Package;
use leptos::prelude::*;

use crate::config::config;

#[derive(Clone, Debug)]
pub struct PackageListState {
    pub items: Vec<Package>,
    pub search_query: String,
    pub show_inactive: bool,
    pub sort_field: String,
    pub sort_ascending: bool,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub is_loaded: bool,
}

impl Default for PackageListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            search_query: String::new(),
            show_inactive: false,
            sort_field: "price".to_string(),
            sort_ascending: true,
            page: 0,
            page_size: config().default_page_size,
            total_count: 0,
            total_pages: 1,
            is_loaded: false,
        }
    }
}

pub fn create_state() -> RwSignal<PackageListState> {
    RwSignal::new(PackageListState::default())
}
