use contracts::domain::a004_billing::{Billing, PaymentDto, UpdateDiscountDto};
use contracts::domain::common::AggregateRoot;

use crate::shared::api_utils::{get_json, post_command, put_json};

/// Billings visible to the signed-in account; clients get only their own
pub async fn fetch_billings() -> Result<Vec<Billing>, String> {
    get_json(&Billing::api_path(), "Load billings").await
}

pub async fn fetch_billing(id: &str) -> Result<Billing, String> {
    get_json(&Billing::api_item_path(id), "Load billing").await
}

pub async fn update_discount(dto: &UpdateDiscountDto) -> Result<(), String> {
    let path = format!("{}/discount", Billing::api_item_path(&dto.billing_id));
    put_json(&path, dto, "Save discount").await
}

pub async fn record_payment(dto: &PaymentDto) -> Result<(), String> {
    let path = format!("{}/payments", Billing::api_item_path(&dto.billing_id));
    post_command(&path, dto, "Record payment").await
}
