//! Wire types and client-side rules shared by the studio dashboard.
//!
//! Everything here is plain data plus pure functions: no browser, no I/O.

pub mod dashboards;
pub mod domain;
pub mod shared;
pub mod system;
