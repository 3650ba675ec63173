use contracts::domain::a001_booking::Booking;
use leptos::prelude::*;

use crate::config::config;

#[derive(Clone, Debug)]
pub struct BookingListState {
    pub items: Vec<Booking>,
    pub search_query: String,
    /// `BookingStatus::code()`, empty for all
    pub status_filter: String,
    pub sort_field: String,
    pub sort_ascending: bool,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub is_loaded: bool,
}

impl Default for BookingListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            search_query: String::new(),
            status_filter: String::new(),
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

pub fn create_state() -> RwSignal<BookingListState> {
    RwSignal::new(BookingListState::default())
}
