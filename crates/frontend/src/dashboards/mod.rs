pub mod d400_reports;

pub use d400_reports::ui::ReportsDashboard;
