pub mod actions;
pub mod calendar;
pub mod details;
pub mod list;
