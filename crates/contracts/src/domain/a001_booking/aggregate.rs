use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::AggregateRoot;
use crate::shared::validation::validate_required;

// ============================================================================
// Status
// ============================================================================

/// Lifecycle of a booking request.
///
/// A rejected request becomes `Unavailable`: the studio cannot serve the
/// requested date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Approved,
    Unavailable,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn all() -> Vec<BookingStatus> {
        vec![
            BookingStatus::Pending,
            BookingStatus::Approved,
            BookingStatus::Unavailable,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Unavailable => "unavailable",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|s| s.code() == code)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Approved => "Approved",
            BookingStatus::Unavailable => "Unavailable",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Completed => "Completed",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "badge badge--warning",
            BookingStatus::Approved => "badge badge--success",
            BookingStatus::Unavailable => "badge badge--error",
            BookingStatus::Cancelled => "badge badge--neutral",
            BookingStatus::Completed => "badge badge--info",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Unavailable | BookingStatus::Cancelled | BookingStatus::Completed
        )
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Approved)
                | (Pending, Unavailable)
                | (Pending, Cancelled)
                | (Approved, Completed)
                | (Approved, Cancelled)
        )
    }

    pub fn can_reschedule(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Approved)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Event types offered in the booking form
pub const EVENT_TYPES: &[&str] = &[
    "Wedding",
    "Prenup",
    "Debut",
    "Birthday",
    "Christening",
    "Corporate",
    "Other",
];

// ============================================================================
// Aggregate
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub code: String,
    pub client_id: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub event_type: String,
    pub event_date: NaiveDate,
    /// Start time as entered, "HH:MM"
    pub event_time: Option<String>,
    pub venue: String,
    pub package_id: String,
    pub package_name: String,
    #[serde(default)]
    pub add_on_ids: Vec<String>,
    pub guest_count: Option<u32>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    /// Reason given on reject, cancel or reschedule
    pub status_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Only approved bookings hold a calendar slot
    pub fn occupies_slot(&self) -> bool {
        self.status == BookingStatus::Approved
    }

    pub fn can_receive_feedback(&self) -> bool {
        self.status == BookingStatus::Completed
    }

    pub fn check_transition(&self, next: BookingStatus) -> Result<(), String> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(format!(
                "Booking {} is {} and cannot become {}",
                self.code,
                self.status.label().to_lowercase(),
                next.label().to_lowercase()
            ))
        }
    }

    pub fn matches_filter(&self, filter: &str) -> bool {
        let needle = filter.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            self.code.as_str(),
            self.client_name.as_str(),
            self.event_type.as_str(),
            self.venue.as_str(),
            self.package_name.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl AggregateRoot for Booking {
    fn id(&self) -> &str {
        &self.id
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn entity_key() -> &'static str {
        "booking"
    }

    fn collection_name() -> &'static str {
        "bookings"
    }

    fn element_name() -> &'static str {
        "Booking"
    }

    fn list_name() -> &'static str {
        "Bookings"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Create/update form for a booking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDto {
    pub id: Option<String>,
    /// Set by staff when booking on behalf of a client; the API fills it for clients
    pub client_id: Option<String>,
    pub event_type: String,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub venue: String,
    pub package_id: String,
    #[serde(default)]
    pub add_on_ids: Vec<String>,
    pub guest_count: Option<u32>,
    pub notes: Option<String>,
}

impl BookingDto {
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            id: Some(booking.id.clone()),
            client_id: Some(booking.client_id.clone()),
            event_type: booking.event_type.clone(),
            event_date: Some(booking.event_date),
            event_time: booking.event_time.clone(),
            venue: booking.venue.clone(),
            package_id: booking.package_id.clone(),
            add_on_ids: booking.add_on_ids.clone(),
            guest_count: booking.guest_count,
            notes: booking.notes.clone(),
        }
    }

    pub fn validate(&self, today: NaiveDate) -> Result<(), String> {
        validate_required(&self.event_type, "Event type")?;
        let date = self.event_date.ok_or_else(|| "Event date is required".to_string())?;
        if date < today {
            return Err("Event date cannot be in the past".into());
        }
        if let Some(time) = &self.event_time {
            if !time.is_empty() && !is_valid_time(time) {
                return Err("Event time must be HH:MM".into());
            }
        }
        validate_required(&self.venue, "Venue")?;
        validate_required(&self.package_id, "Package")?;
        if self.guest_count == Some(0) {
            return Err("Guest count must be greater than zero".into());
        }
        Ok(())
    }

    pub fn toggle_add_on(&mut self, add_on_id: &str) {
        if let Some(pos) = self.add_on_ids.iter().position(|id| id == add_on_id) {
            self.add_on_ids.remove(pos);
        } else {
            self.add_on_ids.push(add_on_id.to_string());
        }
    }
}

fn is_valid_time(value: &str) -> bool {
    chrono::NaiveTime::parse_from_str(value, "%H:%M").is_ok()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApproveBookingRequest {
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RejectBookingRequest {
    pub reason: String,
}

impl RejectBookingRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_required(&self.reason, "Reason")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    pub reason: String,
}

impl CancelBookingRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_required(&self.reason, "Reason")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleBookingRequest {
    pub new_date: NaiveDate,
    pub reason: Option<String>,
}

impl RescheduleBookingRequest {
    /// Status and date checks; slot availability is checked by the calendar
    pub fn validate(&self, booking: &Booking, today: NaiveDate) -> Result<(), String> {
        if !booking.status.can_reschedule() {
            return Err(format!(
                "A {} booking cannot be rescheduled",
                booking.status.label().to_lowercase()
            ));
        }
        if self.new_date == booking.event_date {
            return Err("Pick a date different from the current one".into());
        }
        if self.new_date < today {
            return Err("New date cannot be in the past".into());
        }
        Ok(())
    }
}

/// A date closed for bookings by the studio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisabledDate {
    pub id: String,
    pub date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisableDateRequest {
    pub date: NaiveDate,
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: "b1".into(),
            code: "BK-0001".into(),
            client_id: "c1".into(),
            client_name: "Ana Cruz".into(),
            client_email: None,
            client_phone: None,
            event_type: "Wedding".into(),
            event_date: date(2026, 11, 14),
            event_time: Some("15:00".into()),
            venue: "Manila Cathedral".into(),
            package_id: "p1".into(),
            package_name: "Gold".into(),
            add_on_ids: vec![],
            guest_count: Some(120),
            notes: None,
            status,
            status_reason: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn status_transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Unavailable));
        assert!(Approved.can_transition_to(Completed));
        assert!(!Approved.can_transition_to(Pending));
        assert!(!Unavailable.can_transition_to(Approved));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(Cancelled.is_terminal());
        assert!(!Approved.is_terminal());
    }

    #[test]
    fn check_transition_explains_refusal() {
        let b = booking(BookingStatus::Completed);
        assert_eq!(
            b.check_transition(BookingStatus::Approved),
            Err("Booking BK-0001 is completed and cannot become approved".to_string())
        );
        assert!(booking(BookingStatus::Pending)
            .check_transition(BookingStatus::Approved)
            .is_ok());
    }

    #[test]
    fn form_validation() {
        let today = date(2026, 10, 16);
        let mut dto = BookingDto::from_booking(&booking(BookingStatus::Pending));
        assert!(dto.validate(today).is_ok());

        dto.event_date = Some(date(2026, 10, 15));
        assert_eq!(
            dto.validate(today),
            Err("Event date cannot be in the past".to_string())
        );

        dto.event_date = Some(today);
        dto.event_time = Some("25:00".into());
        assert_eq!(dto.validate(today), Err("Event time must be HH:MM".to_string()));

        dto.event_time = None;
        dto.package_id.clear();
        assert_eq!(dto.validate(today), Err("Package is required".to_string()));

        let empty = BookingDto::default();
        assert_eq!(empty.validate(today), Err("Event type is required".to_string()));
    }

    #[test]
    fn toggling_add_ons() {
        let mut dto = BookingDto::default();
        dto.toggle_add_on("drone");
        dto.toggle_add_on("album");
        dto.toggle_add_on("drone");
        assert_eq!(dto.add_on_ids, vec!["album".to_string()]);
    }

    #[test]
    fn reschedule_rules() {
        let today = date(2026, 10, 16);
        let approved = booking(BookingStatus::Approved);
        let req = RescheduleBookingRequest {
            new_date: date(2026, 12, 5),
            reason: None,
        };
        assert!(req.validate(&approved, today).is_ok());

        let same_day = RescheduleBookingRequest {
            new_date: approved.event_date,
            reason: None,
        };
        assert!(same_day.validate(&approved, today).is_err());

        let past = RescheduleBookingRequest {
            new_date: date(2026, 10, 1),
            reason: None,
        };
        assert!(past.validate(&approved, today).is_err());

        let cancelled = booking(BookingStatus::Cancelled);
        assert_eq!(
            req.validate(&cancelled, today),
            Err("A cancelled booking cannot be rescheduled".to_string())
        );
    }

    #[test]
    fn search_and_paths() {
        let b = booking(BookingStatus::Pending);
        assert!(b.matches_filter("cathedral"));
        assert!(b.matches_filter("bk-0001"));
        assert!(!b.matches_filter("birthday"));
        assert_eq!(Booking::full_name(), "a001_booking");
        assert_eq!(Booking::detail_tab_key("b1"), "a001_booking_detail_b1");
        assert_eq!(Booking::api_item_path("b1"), "/api/bookings/b1");
        assert_eq!(BookingStatus::from_code("approved"), Some(BookingStatus::Approved));
    }

    #[test]
    fn reject_requires_reason() {
        assert!(RejectBookingRequest::default().validate().is_err());
        assert!(RejectBookingRequest {
            reason: "Date fully booked".into()
        }
        .validate()
        .is_ok());
    }
}
