//! Tabbed workspace
//!
//! - `page` wraps one tab's content and hides it when inactive
//! - `registry` maps a tab key to its view
//! - `tab_labels` turns tab keys into titles

pub mod page;
pub mod registry;
pub mod tab_labels;

pub use page::TabPage;
pub use tab_labels::{detail_tab_label, tab_label_for_key, title_for_key};
