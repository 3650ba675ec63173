pub mod a001_booking;
pub mod a002_package;
pub mod a003_add_on;
pub mod a004_billing;
pub mod a005_workload;
pub mod a006_feedback;
