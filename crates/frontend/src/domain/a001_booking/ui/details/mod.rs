//! Booking form
//!
//! - view_model.rs: form state, catalog lookups and the save command
//! - page.rs: Leptos component

mod page;
mod view_model;

pub use page::BookingDetails;
pub use view_model::BookingDetailsVm;
