//! Booking calendar: which dates can still take a booking.
//!
//! The API remains the authority on conflicts; these checks let the UI
//! colour the month grid and refuse an obviously conflicting approve or
//! reschedule before a request is sent.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::aggregate::{Booking, BookingStatus, DisabledDate};

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const GRID_DAYS: i64 = 42;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayAvailability {
    Past,
    Disabled { reason: Option<String> },
    FullyBooked,
    Available,
    /// Slot counts for the date are not loaded
    Unknown,
}

impl DayAvailability {
    pub fn is_bookable(&self) -> bool {
        matches!(self, DayAvailability::Available)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayAvailability::Past => "Past",
            DayAvailability::Disabled { .. } => "Unavailable",
            DayAvailability::FullyBooked => "Fully booked",
            DayAvailability::Available => "Available",
            DayAvailability::Unknown => "Checking availability",
        }
    }

    pub fn css_modifier(&self) -> &'static str {
        match self {
            DayAvailability::Past => "calendar__cell--past",
            DayAvailability::Disabled { .. } => "calendar__cell--disabled",
            DayAvailability::FullyBooked => "calendar__cell--booked",
            DayAvailability::Available => "calendar__cell--available",
            DayAvailability::Unknown => "calendar__cell--unknown",
        }
    }
}

/// Why a date cannot take (another) approved booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotConflict {
    InPast,
    Disabled(Option<String>),
    FullyBooked { date: NaiveDate, count: usize },
}

impl std::fmt::Display for SlotConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotConflict::InPast => write!(f, "The date is already in the past"),
            SlotConflict::Disabled(Some(reason)) => {
                write!(f, "The date is closed for bookings: {}", reason)
            }
            SlotConflict::Disabled(None) => write!(f, "The date is closed for bookings"),
            SlotConflict::FullyBooked { date, count } => write!(
                f,
                "{} already has {} approved booking{}",
                date.format("%b %-d, %Y"),
                count,
                if *count == 1 { "" } else { "s" }
            ),
        }
    }
}

impl std::error::Error for SlotConflict {}

/// Approved bookings on `date`
pub fn approved_on<'a>(
    date: NaiveDate,
    bookings: &'a [Booking],
) -> impl Iterator<Item = &'a Booking> + 'a {
    bookings
        .iter()
        .filter(move |b| b.event_date == date && b.occupies_slot())
}

/// Approved bookings held on one date, across every client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOccupancy {
    pub date: NaiveDate,
    pub approved: usize,
}

/// Inclusive date range of an occupancy request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Per-date approved counts of `bookings`, ordered by date
pub fn occupancy_of(bookings: &[Booking]) -> Vec<DayOccupancy> {
    let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for b in bookings.iter().filter(|b| b.occupies_slot()) {
        *by_date.entry(b.event_date).or_insert(0) += 1;
    }
    by_date
        .into_iter()
        .map(|(date, approved)| DayOccupancy { date, approved })
        .collect()
}

/// Where the approved count of a date comes from when building the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotCounts<'a> {
    /// The loaded bookings cover every client
    FromBookings,
    /// Counts reported by the API for the visible range
    Reported(&'a [DayOccupancy]),
    /// Nothing trustworthy is loaded yet
    Unknown,
}

impl SlotCounts<'_> {
    fn approved_on(&self, date: NaiveDate, bookings: &[Booking]) -> Option<usize> {
        match self {
            SlotCounts::FromBookings => Some(approved_on(date, bookings).count()),
            SlotCounts::Reported(days) => Some(
                days.iter()
                    .find(|d| d.date == date)
                    .map(|d| d.approved)
                    .unwrap_or(0),
            ),
            SlotCounts::Unknown => None,
        }
    }
}

pub fn disabled_entry(date: NaiveDate, disabled: &[DisabledDate]) -> Option<&DisabledDate> {
    disabled.iter().find(|d| d.date == date)
}

pub fn availability_on(
    date: NaiveDate,
    today: NaiveDate,
    bookings: &[Booking],
    disabled: &[DisabledDate],
    max_per_day: usize,
) -> DayAvailability {
    availability_for_count(
        date,
        today,
        Some(approved_on(date, bookings).count()),
        disabled,
        max_per_day,
    )
}

/// Availability from an already known approved count; `None` when it is not known
pub fn availability_for_count(
    date: NaiveDate,
    today: NaiveDate,
    approved: Option<usize>,
    disabled: &[DisabledDate],
    max_per_day: usize,
) -> DayAvailability {
    if date < today {
        return DayAvailability::Past;
    }
    if let Some(entry) = disabled_entry(date, disabled) {
        return DayAvailability::Disabled {
            reason: entry.reason.clone(),
        };
    }
    match approved {
        None => DayAvailability::Unknown,
        Some(count) if count >= max_per_day => DayAvailability::FullyBooked,
        Some(_) => DayAvailability::Available,
    }
}

/// Check that `date` can hold one more approved booking.
///
/// `exclude_id` is the booking being approved or moved; it never conflicts
/// with itself.
pub fn check_slot(
    date: NaiveDate,
    today: NaiveDate,
    bookings: &[Booking],
    disabled: &[DisabledDate],
    max_per_day: usize,
    exclude_id: Option<&str>,
) -> Result<(), SlotConflict> {
    if date < today {
        return Err(SlotConflict::InPast);
    }
    if let Some(entry) = disabled_entry(date, disabled) {
        return Err(SlotConflict::Disabled(entry.reason.clone()));
    }
    let count = approved_on(date, bookings)
        .filter(|b| Some(b.id.as_str()) != exclude_id)
        .count();
    if count >= max_per_day {
        return Err(SlotConflict::FullyBooked { date, count });
    }
    Ok(())
}

/// Whether the studio may close `date`
pub fn can_disable(
    date: NaiveDate,
    today: NaiveDate,
    bookings: &[Booking],
    disabled: &[DisabledDate],
) -> Result<(), String> {
    if date < today {
        return Err("Past dates cannot be closed".into());
    }
    if disabled_entry(date, disabled).is_some() {
        return Err("The date is already closed".into());
    }
    let approved = approved_on(date, bookings).count();
    if approved > 0 {
        return Err(format!(
            "The date has {} approved booking{}; reschedule or cancel first",
            approved,
            if approved == 1 { "" } else { "s" }
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub availability: DayAvailability,
    pub approved: Vec<Booking>,
    pub pending: Vec<Booking>,
}

impl CalendarCell {
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn has_bookings(&self) -> bool {
        !self.approved.is_empty() || !self.pending.is_empty()
    }
}

/// Month grid: six full weeks starting on the Sunday on or before the 1st
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<CalendarCell>,
}

impl CalendarMonth {
    /// `None` when `month` is not 1..=12
    pub fn build(
        year: i32,
        month: u32,
        today: NaiveDate,
        bookings: &[Booking],
        disabled: &[DisabledDate],
        max_per_day: usize,
    ) -> Option<Self> {
        Self::build_with(
            year,
            month,
            today,
            bookings,
            SlotCounts::FromBookings,
            disabled,
            max_per_day,
        )
    }

    /// Grid whose cells list `bookings` but take approved counts from `counts`
    pub fn build_with(
        year: i32,
        month: u32,
        today: NaiveDate,
        bookings: &[Booking],
        counts: SlotCounts<'_>,
        disabled: &[DisabledDate],
        max_per_day: usize,
    ) -> Option<Self> {
        let (start, _) = grid_range(year, month)?;

        let cells = (0..GRID_DAYS)
            .map(|i| {
                let date = start + Duration::days(i);
                let on_day = |status: BookingStatus| {
                    bookings
                        .iter()
                        .filter(|b| b.event_date == date && b.status == status)
                        .cloned()
                        .collect::<Vec<_>>()
                };
                CalendarCell {
                    date,
                    in_month: date.month() == month && date.year() == year,
                    is_today: date == today,
                    availability: availability_for_count(
                        date,
                        today,
                        counts.approved_on(date, bookings),
                        disabled,
                        max_per_day,
                    ),
                    approved: on_day(BookingStatus::Approved),
                    pending: on_day(BookingStatus::Pending),
                }
            })
            .collect();

        Some(Self { year, month, cells })
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// "October 2026"
    pub fn title(&self) -> String {
        self.first_day()
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default()
    }

    /// (year, month) of the previous month
    pub fn prev(&self) -> (i32, u32) {
        prev_month(self.year, self.month)
    }

    pub fn next(&self) -> (i32, u32) {
        next_month(self.year, self.month)
    }

    pub fn weeks(&self) -> std::slice::Chunks<'_, CalendarCell> {
        self.cells.chunks(7)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarCell> {
        self.cells.iter().find(|c| c.date == date)
    }

    /// First and last date visible in the grid, for range queries
    pub fn visible_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.cells.first()?.date, self.cells.last()?.date))
    }
}

/// First and last date of the six-week grid shown for a month
pub fn grid_range(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = first.weekday().num_days_from_sunday() as i64;
    let start = first - Duration::days(offset);
    Some((start, start + Duration::days(GRID_DAYS - 1)))
}

pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn booking(id: &str, on: NaiveDate, status: BookingStatus) -> Booking {
        Booking {
            id: id.into(),
            code: format!("BK-{}", id),
            client_id: "c1".into(),
            client_name: "Client".into(),
            client_email: None,
            client_phone: None,
            event_type: "Birthday".into(),
            event_date: on,
            event_time: None,
            venue: "Studio".into(),
            package_id: "p1".into(),
            package_name: "Basic".into(),
            add_on_ids: vec![],
            guest_count: None,
            notes: None,
            status,
            status_reason: None,
            created_at: Utc::now(),
        }
    }

    fn closed(on: NaiveDate, reason: &str) -> DisabledDate {
        DisabledDate {
            id: format!("d-{}", on),
            date: on,
            reason: Some(reason.into()),
        }
    }

    #[test]
    fn availability_precedence() {
        let today = date(2026, 10, 16);
        let nov7 = date(2026, 11, 7);
        let bookings = vec![
            booking("1", nov7, BookingStatus::Approved),
            booking("2", date(2026, 11, 8), BookingStatus::Pending),
        ];
        let disabled = vec![closed(date(2026, 11, 1), "All Saints")];

        assert_eq!(
            availability_on(date(2026, 10, 15), today, &bookings, &disabled, 1),
            DayAvailability::Past
        );
        assert_eq!(
            availability_on(date(2026, 11, 1), today, &bookings, &disabled, 1),
            DayAvailability::Disabled {
                reason: Some("All Saints".into())
            }
        );
        assert_eq!(
            availability_on(nov7, today, &bookings, &disabled, 1),
            DayAvailability::FullyBooked
        );
        assert_eq!(
            availability_on(nov7, today, &bookings, &disabled, 2),
            DayAvailability::Available
        );
        // pending requests do not hold the slot
        assert!(availability_on(date(2026, 11, 8), today, &bookings, &disabled, 1).is_bookable());
    }

    #[test]
    fn slot_check_ignores_the_booking_itself() {
        let today = date(2026, 10, 16);
        let day = date(2026, 12, 12);
        let bookings = vec![booking("7", day, BookingStatus::Approved)];

        assert_eq!(
            check_slot(day, today, &bookings, &[], 1, None),
            Err(SlotConflict::FullyBooked { date: day, count: 1 })
        );
        assert!(check_slot(day, today, &bookings, &[], 1, Some("7")).is_ok());
        assert_eq!(
            check_slot(date(2026, 1, 1), today, &bookings, &[], 1, None),
            Err(SlotConflict::InPast)
        );
    }

    #[test]
    fn conflict_messages() {
        let msg = SlotConflict::FullyBooked {
            date: date(2026, 12, 12),
            count: 2,
        }
        .to_string();
        assert_eq!(msg, "Dec 12, 2026 already has 2 approved bookings");
        assert_eq!(
            SlotConflict::Disabled(Some("Studio maintenance".into())).to_string(),
            "The date is closed for bookings: Studio maintenance"
        );
    }

    #[test]
    fn disabling_dates() {
        let today = date(2026, 10, 16);
        let day = date(2026, 10, 20);
        let bookings = vec![booking("1", day, BookingStatus::Approved)];
        assert!(can_disable(day, today, &bookings, &[]).is_err());
        assert!(can_disable(date(2026, 10, 21), today, &bookings, &[]).is_ok());
        assert!(can_disable(date(2026, 10, 10), today, &bookings, &[]).is_err());
        let disabled = vec![closed(date(2026, 10, 21), "Team outing")];
        assert_eq!(
            can_disable(date(2026, 10, 21), today, &bookings, &disabled),
            Err("The date is already closed".to_string())
        );
    }

    #[test]
    fn month_grid_layout() {
        let today = date(2026, 10, 16);
        let bookings = vec![
            booking("1", date(2026, 10, 24), BookingStatus::Approved),
            booking("2", date(2026, 10, 24), BookingStatus::Pending),
            booking("3", date(2026, 10, 24), BookingStatus::Cancelled),
        ];
        let month = CalendarMonth::build(2026, 10, today, &bookings, &[], 1).unwrap();

        assert_eq!(month.cells.len(), 42);
        // October 1st 2026 is a Thursday: the grid starts on Sunday Sep 27
        assert_eq!(month.cells[0].date, date(2026, 9, 27));
        assert!(!month.cells[0].in_month);
        assert_eq!(month.weeks().count(), 6);
        assert_eq!(month.title(), "October 2026");

        let cell = month.cell(date(2026, 10, 24)).unwrap();
        assert_eq!(cell.approved.len(), 1);
        assert_eq!(cell.pending.len(), 1);
        assert_eq!(cell.availability, DayAvailability::FullyBooked);
        assert!(month.cell(today).unwrap().is_today);

        assert_eq!(
            month.visible_range(),
            Some((date(2026, 9, 27), date(2026, 11, 7)))
        );
        assert_eq!(month.prev(), (2026, 9));
        assert_eq!(month.next(), (2026, 11));
        assert!(CalendarMonth::build(2026, 13, today, &[], &[], 1).is_none());
    }

    #[test]
    fn reported_counts_drive_availability() {
        let today = date(2026, 10, 16);
        // the caller only sees their own pending request on Oct 24
        let own = vec![booking("9", date(2026, 10, 24), BookingStatus::Pending)];
        let reported = vec![
            DayOccupancy {
                date: date(2026, 10, 24),
                approved: 1,
            },
            DayOccupancy {
                date: date(2026, 10, 30),
                approved: 2,
            },
        ];

        let scoped = CalendarMonth::build(2026, 10, today, &own, &[], 1).unwrap();
        assert!(scoped.cell(date(2026, 10, 24)).unwrap().availability.is_bookable());

        let month = CalendarMonth::build_with(
            2026,
            10,
            today,
            &own,
            SlotCounts::Reported(&reported),
            &[],
            2,
        )
        .unwrap();
        assert_eq!(
            month.cell(date(2026, 10, 24)).unwrap().availability,
            DayAvailability::Available
        );
        assert_eq!(
            month.cell(date(2026, 10, 30)).unwrap().availability,
            DayAvailability::FullyBooked
        );
        // the cell still lists the caller's own request
        assert_eq!(month.cell(date(2026, 10, 24)).unwrap().pending.len(), 1);

        let full = CalendarMonth::build_with(
            2026,
            10,
            today,
            &own,
            SlotCounts::Reported(&reported),
            &[],
            1,
        )
        .unwrap();
        assert_eq!(
            full.cell(date(2026, 10, 24)).unwrap().availability,
            DayAvailability::FullyBooked
        );
    }

    #[test]
    fn unknown_counts_leave_open_dates_uncoloured() {
        let today = date(2026, 10, 16);
        let disabled = vec![closed(date(2026, 10, 20), "Studio maintenance")];
        let month =
            CalendarMonth::build_with(2026, 10, today, &[], SlotCounts::Unknown, &disabled, 1)
                .unwrap();

        assert_eq!(
            month.cell(date(2026, 10, 22)).unwrap().availability,
            DayAvailability::Unknown
        );
        assert!(!DayAvailability::Unknown.is_bookable());
        // past and closed dates are known without counts
        assert_eq!(
            month.cell(date(2026, 10, 1)).unwrap().availability,
            DayAvailability::Past
        );
        assert!(matches!(
            month.cell(date(2026, 10, 20)).unwrap().availability,
            DayAvailability::Disabled { .. }
        ));
    }

    #[test]
    fn occupancy_counts_approved_bookings_per_date() {
        let day = date(2026, 11, 14);
        let bookings = vec![
            booking("1", day, BookingStatus::Approved),
            booking("2", day, BookingStatus::Approved),
            booking("3", day, BookingStatus::Pending),
            booking("4", date(2026, 11, 2), BookingStatus::Approved),
            booking("5", date(2026, 11, 3), BookingStatus::Cancelled),
        ];
        assert_eq!(
            occupancy_of(&bookings),
            vec![
                DayOccupancy {
                    date: date(2026, 11, 2),
                    approved: 1
                },
                DayOccupancy {
                    date: day,
                    approved: 2
                },
            ]
        );
        assert_eq!(
            grid_range(2026, 11),
            Some((date(2026, 11, 1), date(2026, 12, 12)))
        );
    }

    #[test]
    fn month_navigation_wraps_years() {
        assert_eq!(prev_month(2026, 1), (2025, 12));
        assert_eq!(next_month(2026, 12), (2027, 1));
        assert_eq!(next_month(2026, 6), (2026, 7));
    }
}
