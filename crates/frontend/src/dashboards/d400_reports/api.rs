use contracts::domain::a001_booking::Booking;
use contracts::domain::a004_billing::Billing;
use contracts::domain::a005_workload::Workload;
use contracts::domain::a006_feedback::Feedback;

use crate::domain::{a001_booking, a004_billing, a005_workload, a006_feedback};

/// Lists the report is aggregated from
#[derive(Debug, Clone, Default)]
pub struct ReportSources {
    pub bookings: Vec<Booking>,
    pub billings: Vec<Billing>,
    pub workloads: Vec<Workload>,
    pub feedback: Vec<Feedback>,
}

pub async fn fetch_sources() -> Result<ReportSources, String> {
    let bookings = a001_booking::api::fetch_bookings().await?;
    let billings = a004_billing::api::fetch_billings().await?;
    let workloads = a005_workload::api::fetch_workloads().await?;
    let feedback = a006_feedback::api::fetch_feedback().await?;
    log::debug!(
        "report sources: {} bookings, {} billings, {} workloads, {} feedback",
        bookings.len(),
        billings.len(),
        workloads.len(),
        feedback.len()
    );
    Ok(ReportSources {
        bookings,
        billings,
        workloads,
        feedback,
    })
}
