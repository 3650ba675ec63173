use contracts::domain::a003_add_on::{AddOn, AddOnDto};
use contracts::domain::common::AggregateRoot;

use crate::shared::api_utils::{created_id, delete, get_json, post_json, put_json};

pub async fn fetch_add_ons() -> Result<Vec<AddOn>, String> {
    get_json(&AddOn::api_path(), "Load add-ons").await
}

pub async fn fetch_add_on(id: &str) -> Result<AddOn, String> {
    get_json(&AddOn::api_item_path(id), "Load add-on").await
}

/// Create or update, depending on `dto.id`. Returns the record id.
pub async fn save_add_on(dto: &AddOnDto) -> Result<String, String> {
    match &dto.id {
        Some(id) => {
            put_json(&AddOn::api_item_path(id), dto, "Save add-on").await?;
            Ok(id.clone())
        }
        None => {
            let value: serde_json::Value =
                post_json(&AddOn::api_path(), dto, "Create add-on").await?;
            created_id(&value).ok_or_else(|| "Create add-on failed: response has no id".to_string())
        }
    }
}

pub async fn delete_add_on(id: &str) -> Result<(), String> {
    delete(&AddOn::api_item_path(id), "Delete add-on").await
}
