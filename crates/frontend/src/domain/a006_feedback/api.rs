use contracts::domain::a006_feedback::{Feedback, FeedbackDto, ModerateFeedbackDto};
use contracts::domain::common::AggregateRoot;

use crate::shared::api_utils::{get_json, post_command};

/// All feedback for staff; a client gets only their own
pub async fn fetch_feedback() -> Result<Vec<Feedback>, String> {
    get_json(&Feedback::api_path(), "Load feedback").await
}

pub async fn submit_feedback(dto: &FeedbackDto) -> Result<(), String> {
    post_command(&Feedback::api_path(), dto, "Send feedback").await
}

pub async fn moderate(dto: &ModerateFeedbackDto) -> Result<(), String> {
    let path = format!("{}/status", Feedback::api_item_path(&dto.feedback_id));
    post_command(&path, dto, "Update feedback").await
}
