use contracts::domain::a001_booking::calendar::{DayOccupancy, OccupancyQuery};
use contracts::domain::a001_booking::{
    ApproveBookingRequest, Booking, BookingDto, CancelBookingRequest, DisableDateRequest,
    DisabledDate, RejectBookingRequest, RescheduleBookingRequest,
};
use contracts::domain::common::AggregateRoot;

use crate::shared::api_utils::{created_id, delete, get_json, post_command, post_json, put_json};

const DISABLED_DATES_PATH: &str = "/api/calendar/disabled-dates";
const OCCUPANCY_PATH: &str = "/api/calendar/occupancy";

/// Bookings visible to the signed-in account; the API scopes clients to their own
pub async fn fetch_bookings() -> Result<Vec<Booking>, String> {
    get_json(&Booking::api_path(), "Load bookings").await
}

pub async fn fetch_booking(id: &str) -> Result<Booking, String> {
    get_json(&Booking::api_item_path(id), "Load booking").await
}

/// Returns the id of the new booking
pub async fn create_booking(dto: &BookingDto) -> Result<String, String> {
    let value: serde_json::Value = post_json(&Booking::api_path(), dto, "Create booking").await?;
    created_id(&value).ok_or_else(|| "Create booking failed: response has no id".to_string())
}

pub async fn update_booking(id: &str, dto: &BookingDto) -> Result<(), String> {
    put_json(&Booking::api_item_path(id), dto, "Save booking").await
}

fn command_path(id: &str, command: &str) -> String {
    format!("{}/{}", Booking::api_item_path(id), command)
}

pub async fn approve_booking(id: &str, request: &ApproveBookingRequest) -> Result<(), String> {
    post_command(&command_path(id, "approve"), request, "Approve booking").await
}

pub async fn reject_booking(id: &str, request: &RejectBookingRequest) -> Result<(), String> {
    post_command(&command_path(id, "reject"), request, "Reject booking").await
}

pub async fn reschedule_booking(
    id: &str,
    request: &RescheduleBookingRequest,
) -> Result<(), String> {
    post_command(&command_path(id, "reschedule"), request, "Reschedule booking").await
}

pub async fn cancel_booking(id: &str, request: &CancelBookingRequest) -> Result<(), String> {
    post_command(&command_path(id, "cancel"), request, "Cancel booking").await
}

pub async fn complete_booking(id: &str) -> Result<(), String> {
    post_command(&command_path(id, "complete"), &serde_json::json!({}), "Complete booking").await
}

pub async fn fetch_disabled_dates() -> Result<Vec<DisabledDate>, String> {
    get_json(DISABLED_DATES_PATH, "Load closed dates").await
}

pub async fn disable_date(request: &DisableDateRequest) -> Result<(), String> {
    post_command(DISABLED_DATES_PATH, request, "Close date").await
}

pub async fn enable_date(id: &str) -> Result<(), String> {
    delete(&format!("{}/{}", DISABLED_DATES_PATH, id), "Reopen date").await
}

fn occupancy_path(query: &OccupancyQuery) -> Result<String, String> {
    let qs = serde_qs::to_string(query).map_err(|e| format!("Failed to encode query: {}", e))?;
    Ok(format!("{}?{}", OCCUPANCY_PATH, qs))
}

/// Approved counts per date for every client, without booking details
pub async fn fetch_occupancy(query: &OccupancyQuery) -> Result<Vec<DayOccupancy>, String> {
    get_json(&occupancy_path(query)?, "Load open dates").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn occupancy_query_string() {
        let query = OccupancyQuery {
            from: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2026, 12, 12).unwrap(),
        };
        assert_eq!(
            occupancy_path(&query).unwrap(),
            "/api/calendar/occupancy?from=2026-11-01&to=2026-12-12"
        );
    }
}
