use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::a001_booking::Booking;
use crate::domain::common::AggregateRoot;

pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    Pending,
    Posted,
    Unposted,
}

impl FeedbackStatus {
    pub fn all() -> Vec<FeedbackStatus> {
        vec![
            FeedbackStatus::Pending,
            FeedbackStatus::Posted,
            FeedbackStatus::Unposted,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "pending",
            FeedbackStatus::Posted => "posted",
            FeedbackStatus::Unposted => "unposted",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|s| s.code() == code)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "Pending review",
            FeedbackStatus::Posted => "Posted",
            FeedbackStatus::Unposted => "Unposted",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "badge badge--warning",
            FeedbackStatus::Posted => "badge badge--success",
            FeedbackStatus::Unposted => "badge badge--neutral",
        }
    }

    /// Statuses a moderator can move this feedback to
    pub fn moderation_actions(&self) -> &'static [FeedbackStatus] {
        match self {
            FeedbackStatus::Pending => &[FeedbackStatus::Posted, FeedbackStatus::Unposted],
            FeedbackStatus::Posted => &[FeedbackStatus::Unposted],
            FeedbackStatus::Unposted => &[FeedbackStatus::Posted],
        }
    }

    /// Button caption for moving into this status
    pub fn action_label(&self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "Reset",
            FeedbackStatus::Posted => "Post",
            FeedbackStatus::Unposted => "Unpost",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: String,
    pub booking_id: String,
    pub booking_code: String,
    pub client_name: String,
    /// 1 to 5 stars
    pub rating: u8,
    pub message: String,
    pub status: FeedbackStatus,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub fn stars(&self) -> String {
        let filled = self.rating.min(5) as usize;
        format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
    }

    pub fn moderate(&self, to: FeedbackStatus) -> Result<ModerateFeedbackDto, String> {
        if !self.status.moderation_actions().contains(&to) {
            return Err(format!(
                "Feedback that is {} cannot be moved to {}",
                self.status.label().to_lowercase(),
                to.label().to_lowercase()
            ));
        }
        Ok(ModerateFeedbackDto {
            feedback_id: self.id.clone(),
            status: to,
        })
    }
}

impl AggregateRoot for Feedback {
    fn id(&self) -> &str {
        &self.id
    }

    fn code(&self) -> &str {
        &self.booking_code
    }

    fn aggregate_index() -> &'static str {
        "a006"
    }

    fn entity_key() -> &'static str {
        "feedback"
    }

    fn collection_name() -> &'static str {
        "feedback"
    }

    fn element_name() -> &'static str {
        "Feedback"
    }

    fn list_name() -> &'static str {
        "Feedback"
    }
}

/// Client review form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackDto {
    pub booking_id: String,
    pub rating: u8,
    pub message: String,
}

impl Default for FeedbackDto {
    fn default() -> Self {
        Self {
            booking_id: String::new(),
            rating: 5,
            message: String::new(),
        }
    }
}

impl FeedbackDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.booking_id.trim().is_empty() {
            return Err("Select the booking you are reviewing".into());
        }
        if !(1..=5).contains(&self.rating) {
            return Err("Rating must be between 1 and 5".into());
        }
        let len = self.message.trim().chars().count();
        if len < MESSAGE_MIN_CHARS {
            return Err(format!(
                "Feedback must be at least {} characters",
                MESSAGE_MIN_CHARS
            ));
        }
        if len > MESSAGE_MAX_CHARS {
            return Err(format!(
                "Feedback must be at most {} characters",
                MESSAGE_MAX_CHARS
            ));
        }
        Ok(())
    }

    /// Also checks that the booking is finished and not reviewed yet
    pub fn validate_for(&self, booking: &Booking, existing: &[Feedback]) -> Result<(), String> {
        self.validate()?;
        if !booking.can_receive_feedback() {
            return Err("Only completed bookings can be reviewed".into());
        }
        if existing.iter().any(|f| f.booking_id == booking.id) {
            return Err(format!("Booking {} already has feedback", booking.code));
        }
        Ok(())
    }
}

/// Completed bookings of a client that still have no feedback
pub fn reviewable_bookings<'a>(bookings: &'a [Booking], existing: &[Feedback]) -> Vec<&'a Booking> {
    bookings
        .iter()
        .filter(|b| b.can_receive_feedback())
        .filter(|b| !existing.iter().any(|f| f.booking_id == b.id))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerateFeedbackDto {
    pub feedback_id: String,
    pub status: FeedbackStatus,
}

/// Mean rating of posted feedback, `None` when nothing is posted
pub fn average_rating(feedback: &[Feedback]) -> Option<f64> {
    let posted: Vec<u8> = feedback
        .iter()
        .filter(|f| f.status == FeedbackStatus::Posted)
        .map(|f| f.rating)
        .collect();
    if posted.is_empty() {
        return None;
    }
    let sum: u32 = posted.iter().map(|r| *r as u32).sum();
    Some((sum as f64 / posted.len() as f64 * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_booking::BookingStatus;
    use chrono::NaiveDate;

    fn feedback(id: &str, rating: u8, status: FeedbackStatus) -> Feedback {
        Feedback {
            id: id.into(),
            booking_id: format!("b-{}", id),
            booking_code: format!("BK-{}", id),
            client_name: "Ana".into(),
            rating,
            message: "Lovely photos, thank you!".into(),
            status,
            created_at: Utc::now(),
        }
    }

    fn booking(id: &str, status: BookingStatus) -> Booking {
        Booking {
            id: id.into(),
            code: format!("BK-{}", id),
            client_id: "c1".into(),
            client_name: "Ana".into(),
            client_email: None,
            client_phone: None,
            event_type: "Debut".into(),
            event_date: NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(),
            event_time: None,
            venue: "Hotel".into(),
            package_id: "p1".into(),
            package_name: "Silver".into(),
            add_on_ids: vec![],
            guest_count: None,
            notes: None,
            status,
            status_reason: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn moderation_paths() {
        use FeedbackStatus::*;
        assert_eq!(Pending.moderation_actions(), &[Posted, Unposted]);
        assert_eq!(Posted.moderation_actions(), &[Unposted]);
        let f = feedback("1", 5, Posted);
        assert!(f.moderate(Unposted).is_ok());
        assert_eq!(
            f.moderate(Pending),
            Err("Feedback that is posted cannot be moved to pending review".to_string())
        );
    }

    #[test]
    fn average_counts_posted_only() {
        let list = vec![
            feedback("1", 5, FeedbackStatus::Posted),
            feedback("2", 4, FeedbackStatus::Posted),
            feedback("3", 4, FeedbackStatus::Posted),
            feedback("4", 1, FeedbackStatus::Unposted),
            feedback("5", 1, FeedbackStatus::Pending),
        ];
        assert_eq!(average_rating(&list), Some(4.33));
        assert_eq!(average_rating(&list[3..]), None);
    }

    #[test]
    fn form_validation() {
        let mut dto = FeedbackDto {
            booking_id: "b1".into(),
            rating: 0,
            message: "Great!".into(),
        };
        assert_eq!(dto.validate(), Err("Rating must be between 1 and 5".to_string()));
        dto.rating = 4;
        assert_eq!(
            dto.validate(),
            Err("Feedback must be at least 10 characters".to_string())
        );
        dto.message = "x".repeat(1001);
        assert!(dto.validate().is_err());
        dto.message = "Great team, very punctual.".into();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn only_completed_unreviewed_bookings() {
        let dto = FeedbackDto {
            booking_id: "b2".into(),
            rating: 5,
            message: "Everything went smoothly.".into(),
        };
        let approved = booking("b2", BookingStatus::Approved);
        assert_eq!(
            dto.validate_for(&approved, &[]),
            Err("Only completed bookings can be reviewed".to_string())
        );
        let done = booking("b2", BookingStatus::Completed);
        assert!(dto.validate_for(&done, &[]).is_ok());

        let mut existing = feedback("x", 5, FeedbackStatus::Pending);
        existing.booking_id = "b2".into();
        assert!(dto.validate_for(&done, &[existing.clone()]).is_err());

        let bookings = vec![done, booking("b3", BookingStatus::Completed), approved];
        let open = reviewable_bookings(&bookings, &[existing]);
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, "b3");
    }

    #[test]
    fn star_rendering() {
        assert_eq!(feedback("1", 3, FeedbackStatus::Posted).stars(), "★★★☆☆");
    }
}
