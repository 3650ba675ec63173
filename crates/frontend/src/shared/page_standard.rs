//! Page categories used by `PageFrame`.
//!
//! Every tab page carries an `id` of the form `{entity}--{category}`
//! (e.g. `"a001_booking--list"`) and a `data-page-category` attribute.

/// Table of records with filters and paging
pub const PAGE_CAT_LIST: &str = "list";

/// Form or detail view of one record
pub const PAGE_CAT_DETAIL: &str = "detail";

pub const PAGE_CAT_DASHBOARD: &str = "dashboard";

/// Account and profile pages
pub const PAGE_CAT_SYSTEM: &str = "system";

pub fn is_valid_page_id(id: &str) -> bool {
    matches!(id.split_once("--"), Some((entity, cat)) if !entity.is_empty() && !cat.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_ids() {
        assert!(is_valid_page_id("a001_booking--list"));
        assert!(is_valid_page_id("a001_booking--calendar"));
        assert!(!is_valid_page_id("a001_booking"));
        assert!(!is_valid_page_id("--list"));
    }
}
