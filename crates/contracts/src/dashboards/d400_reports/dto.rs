//! Studio performance report, aggregated from the lists the dashboard
//! already loads (bookings, billings, workloads, feedback).

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::a001_booking::{Booking, BookingStatus};
use crate::domain::a004_billing::Billing;
use crate::domain::a005_workload::{Workload, WorkloadStatus};
use crate::domain::a006_feedback::{average_rating, Feedback, FeedbackStatus};
use crate::shared::money::round_money;

const TOP_PACKAGES: usize = 5;

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportPeriod {
    pub fn current_month(today: NaiveDate) -> Self {
        let from = today.with_day(1).unwrap_or(today);
        let to = last_day_of_month(today.year(), today.month()).unwrap_or(today);
        Self { from, to }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.from > self.to {
            return Err("Start date must not be after end date".into());
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// (year, month) pairs touched by the period, in order
    pub fn months(&self) -> Vec<(i32, u32)> {
        let mut out = Vec::new();
        let (mut y, mut m) = (self.from.year(), self.from.month());
        while (y, m) <= (self.to.year(), self.to.month()) {
            out.push((y, m));
            if m == 12 {
                y += 1;
                m = 1;
            } else {
                m += 1;
            }
        }
        out
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()
}

/// Payments collected in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRow {
    /// "YYYY-MM"
    pub month: String,
    /// "Oct 2026"
    pub label: String,
    pub payments: usize,
    pub collected: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRow {
    pub package_name: String,
    pub bookings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub period: ReportPeriod,
    pub bookings_total: usize,
    /// Every status, zero counts included
    pub bookings_by_status: Vec<(BookingStatus, usize)>,
    pub revenue_collected: f64,
    pub outstanding_balance: f64,
    pub workloads_by_status: Vec<(WorkloadStatus, usize)>,
    /// Workloads of events in the period that are not completed yet
    pub pending_deliverables: usize,
    pub average_rating: Option<f64>,
    pub posted_reviews: usize,
    pub top_packages: Vec<PackageRow>,
    pub revenue_by_month: Vec<RevenueRow>,
}

impl ReportSummary {
    pub fn compute(
        period: ReportPeriod,
        bookings: &[Booking],
        billings: &[Billing],
        workloads: &[Workload],
        feedback: &[Feedback],
    ) -> Self {
        let in_period: Vec<&Booking> = bookings
            .iter()
            .filter(|b| period.contains(b.event_date))
            .collect();

        let bookings_by_status = BookingStatus::all()
            .into_iter()
            .map(|s| (s, in_period.iter().filter(|b| b.status == s).count()))
            .collect();

        // revenue by payment month
        let mut by_month: HashMap<(i32, u32), (usize, f64)> = HashMap::new();
        for p in billings.iter().flat_map(|b| b.payments.iter()) {
            let day = p.paid_at.date_naive();
            if period.contains(day) {
                let entry = by_month.entry((day.year(), day.month())).or_insert((0, 0.0));
                entry.0 += 1;
                entry.1 += p.amount;
            }
        }
        let revenue_by_month: Vec<RevenueRow> = period
            .months()
            .into_iter()
            .map(|(y, m)| {
                let (payments, collected) = by_month.get(&(y, m)).copied().unwrap_or((0, 0.0));
                RevenueRow {
                    month: format!("{:04}-{:02}", y, m),
                    label: NaiveDate::from_ymd_opt(y, m, 1)
                        .map(|d| d.format("%b %Y").to_string())
                        .unwrap_or_default(),
                    payments,
                    collected: round_money(collected),
                }
            })
            .collect();
        let revenue_collected = round_money(revenue_by_month.iter().map(|r| r.collected).sum());

        let outstanding_balance = round_money(
            billings
                .iter()
                .filter(|b| period.contains(b.event_date))
                .map(|b| b.balance())
                .sum(),
        );

        let period_workloads: Vec<&Workload> = workloads
            .iter()
            .filter(|w| period.contains(w.event_date))
            .collect();
        let workloads_by_status = WorkloadStatus::all()
            .into_iter()
            .map(|s| (s, period_workloads.iter().filter(|w| w.status == s).count()))
            .collect();
        let pending_deliverables = period_workloads
            .iter()
            .filter(|w| w.status != WorkloadStatus::Completed)
            .count();

        let period_feedback: Vec<Feedback> = feedback
            .iter()
            .filter(|f| period.contains(f.created_at.date_naive()))
            .cloned()
            .collect();
        let posted_reviews = period_feedback
            .iter()
            .filter(|f| f.status == FeedbackStatus::Posted)
            .count();

        Self {
            period,
            bookings_total: in_period.len(),
            bookings_by_status,
            revenue_collected,
            outstanding_balance,
            workloads_by_status,
            pending_deliverables,
            average_rating: average_rating(&period_feedback),
            posted_reviews,
            top_packages: top_packages(&in_period),
            revenue_by_month,
        }
    }

    pub fn bookings_with(&self, status: BookingStatus) -> usize {
        self.bookings_by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }
}

/// Packages ranked by booking count; declined and cancelled requests do not count
fn top_packages(bookings: &[&Booking]) -> Vec<PackageRow> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for b in bookings.iter().filter(|b| {
        !matches!(b.status, BookingStatus::Cancelled | BookingStatus::Unavailable)
    }) {
        *counts.entry(b.package_name.as_str()).or_insert(0) += 1;
    }
    let mut rows: Vec<PackageRow> = counts
        .into_iter()
        .map(|(name, bookings)| PackageRow {
            package_name: name.to_string(),
            bookings,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.bookings
            .cmp(&a.bookings)
            .then_with(|| a.package_name.cmp(&b.package_name))
    });
    rows.truncate(TOP_PACKAGES);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a004_billing::{Discount, Payment, PaymentMethod};
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn booking(id: &str, on: NaiveDate, package: &str, status: BookingStatus) -> Booking {
        Booking {
            id: id.into(),
            code: id.to_uppercase(),
            client_id: "c1".into(),
            client_name: "Ana".into(),
            client_email: None,
            client_phone: None,
            event_type: "Wedding".into(),
            event_date: on,
            event_time: None,
            venue: "Venue".into(),
            package_id: package.to_lowercase(),
            package_name: package.into(),
            add_on_ids: vec![],
            guest_count: None,
            notes: None,
            status,
            status_reason: None,
            created_at: Utc::now(),
        }
    }

    fn billing(id: &str, on: NaiveDate, price: f64, paid: &[(f64, NaiveDate)]) -> Billing {
        Billing {
            id: id.into(),
            booking_id: id.into(),
            booking_code: id.to_uppercase(),
            client_id: "c1".into(),
            client_name: "Ana".into(),
            event_date: on,
            package_name: "Gold".into(),
            package_price: price,
            add_ons: vec![],
            discount: Discount::None,
            payments: paid
                .iter()
                .enumerate()
                .map(|(i, (amount, day))| Payment {
                    id: format!("{}-{}", id, i),
                    amount: *amount,
                    method: PaymentMethod::Cash,
                    reference: None,
                    paid_at: Utc
                        .with_ymd_and_hms(day.year(), day.month(), day.day(), 10, 0, 0)
                        .unwrap(),
                    received_by: None,
                })
                .collect(),
            due_date: None,
        }
    }

    fn workload(id: &str, on: NaiveDate, status: WorkloadStatus) -> Workload {
        Workload {
            id: id.into(),
            booking_id: id.into(),
            booking_code: id.to_uppercase(),
            client_name: "Ana".into(),
            event_date: on,
            event_type: "Wedding".into(),
            photographer_id: Some("p1".into()),
            photographer_name: Some("Paulo".into()),
            editor_id: None,
            editor_name: None,
            status,
            deliverable_link: None,
            deadline: None,
            updated_at: Utc::now(),
        }
    }

    fn feedback(id: &str, on: NaiveDate, rating: u8, status: FeedbackStatus) -> Feedback {
        Feedback {
            id: id.into(),
            booking_id: id.into(),
            booking_code: id.to_uppercase(),
            client_name: "Ana".into(),
            rating,
            message: "Thanks".into(),
            status,
            created_at: Utc
                .with_ymd_and_hms(on.year(), on.month(), on.day(), 23, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn current_month_period() {
        let p = ReportPeriod::current_month(date(2026, 2, 10));
        assert_eq!(p.from, date(2026, 2, 1));
        assert_eq!(p.to, date(2026, 2, 28));
        let dec = ReportPeriod::current_month(date(2026, 12, 31));
        assert_eq!(dec.to, date(2026, 12, 31));
        assert!(ReportPeriod {
            from: date(2026, 3, 1),
            to: date(2026, 2, 1)
        }
        .validate()
        .is_err());
    }

    #[test]
    fn months_span_year_end() {
        let p = ReportPeriod {
            from: date(2026, 11, 20),
            to: date(2027, 1, 5),
        };
        assert_eq!(p.months(), vec![(2026, 11), (2026, 12), (2027, 1)]);
    }

    #[test]
    fn summary_figures() {
        let period = ReportPeriod {
            from: date(2026, 9, 1),
            to: date(2026, 10, 31),
        };
        let bookings = vec![
            booking("b1", date(2026, 9, 12), "Gold", BookingStatus::Completed),
            booking("b2", date(2026, 10, 3), "Gold", BookingStatus::Approved),
            booking("b3", date(2026, 10, 10), "Silver", BookingStatus::Pending),
            booking("b4", date(2026, 10, 11), "Silver", BookingStatus::Cancelled),
            booking("b5", date(2026, 12, 1), "Gold", BookingStatus::Approved),
        ];
        let billings = vec![
            billing("b1", date(2026, 9, 12), 30_000.0, &[(30_000.0, date(2026, 8, 30))]),
            billing(
                "b2",
                date(2026, 10, 3),
                40_000.0,
                &[(10_000.0, date(2026, 9, 15)), (5_000.0, date(2026, 10, 1))],
            ),
            billing("b5", date(2026, 12, 1), 40_000.0, &[(8_000.0, date(2026, 10, 20))]),
        ];

        let s = ReportSummary::compute(period, &bookings, &billings, &[], &[]);

        assert_eq!(s.bookings_total, 4);
        assert_eq!(s.bookings_with(BookingStatus::Approved), 1);
        assert_eq!(s.bookings_with(BookingStatus::Unavailable), 0);
        // Aug 30 payment is outside the period
        assert_eq!(s.revenue_collected, 23_000.0);
        assert_eq!(s.revenue_by_month.len(), 2);
        assert_eq!(s.revenue_by_month[0].month, "2026-09");
        assert_eq!(s.revenue_by_month[0].collected, 10_000.0);
        assert_eq!(s.revenue_by_month[1].label, "Oct 2026");
        assert_eq!(s.revenue_by_month[1].payments, 2);
        // only events in the period: b1 paid, b2 owes 25k
        assert_eq!(s.outstanding_balance, 25_000.0);
        assert_eq!(
            s.top_packages,
            vec![
                PackageRow {
                    package_name: "Gold".into(),
                    bookings: 2
                },
                PackageRow {
                    package_name: "Silver".into(),
                    bookings: 1
                },
            ]
        );
        assert_eq!(s.average_rating, None);
        assert_eq!(s.workloads_by_status.len(), 7);
    }

    #[test]
    fn workload_and_feedback_figures() {
        let period = ReportPeriod {
            from: date(2026, 9, 1),
            to: date(2026, 10, 31),
        };
        let workloads = vec![
            workload("w1", date(2026, 9, 12), WorkloadStatus::Completed),
            workload("w2", date(2026, 10, 3), WorkloadStatus::Editing),
            workload("w3", date(2026, 10, 10), WorkloadStatus::Editing),
            workload("w4", date(2026, 10, 31), WorkloadStatus::Unassigned),
            workload("w5", date(2026, 8, 31), WorkloadStatus::Scheduled),
            workload("w6", date(2026, 11, 1), WorkloadStatus::Completed),
        ];
        let reviews = vec![
            feedback("f1", date(2026, 9, 1), 5, FeedbackStatus::Posted),
            feedback("f2", date(2026, 10, 20), 4, FeedbackStatus::Posted),
            feedback("f3", date(2026, 10, 21), 1, FeedbackStatus::Unposted),
            feedback("f4", date(2026, 10, 22), 2, FeedbackStatus::Pending),
            feedback("f5", date(2026, 8, 31), 1, FeedbackStatus::Posted),
            feedback("f6", date(2026, 11, 1), 1, FeedbackStatus::Posted),
        ];

        let s = ReportSummary::compute(period, &[], &[], &workloads, &reviews);

        let count = |status: WorkloadStatus| {
            s.workloads_by_status
                .iter()
                .find(|(st, _)| *st == status)
                .map(|(_, c)| *c)
        };
        assert_eq!(count(WorkloadStatus::Completed), Some(1));
        assert_eq!(count(WorkloadStatus::Editing), Some(2));
        assert_eq!(count(WorkloadStatus::Unassigned), Some(1));
        // w5 falls before the period
        assert_eq!(count(WorkloadStatus::Scheduled), Some(0));
        assert_eq!(count(WorkloadStatus::ForRelease), Some(0));
        assert_eq!(s.pending_deliverables, 3);
        // f5 and f6 are outside the period, f3 and f4 are not posted
        assert_eq!(s.posted_reviews, 2);
        assert_eq!(s.average_rating, Some(4.5));
    }
}
