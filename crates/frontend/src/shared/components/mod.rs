pub mod confirm_dialog;
pub mod date_input;
pub mod pagination_controls;
pub mod stat_card;
pub mod table_totals_row;

pub use confirm_dialog::ConfirmDialog;
pub use date_input::DateInput;
pub use pagination_controls::PaginationControls;
pub use stat_card::{StatCard, StatTone};
pub use table_totals_row::TableTotalsRow;
