use contracts::domain::a002_package::{Package, PackageDto};
use contracts::domain::common::AggregateRoot;

use crate::shared::api_utils::{created_id, delete, get_json, post_json, put_json};

pub async fn fetch_packages() -> Result<Vec<Package>, String> {
    get_json(&Package::api_path(), "Load packages").await
}

pub async fn fetch_package(id: &str) -> Result<Package, String> {
    get_json(&Package::api_item_path(id), "Load package").await
}

/// Create or update, depending on `dto.id`. Returns the record id.
pub async fn save_package(dto: &PackageDto) -> Result<String, String> {
    match &dto.id {
        Some(id) => {
            put_json(&Package::api_item_path(id), dto, "Save package").await?;
            Ok(id.clone())
        }
        None => {
            let value: serde_json::Value =
                post_json(&Package::api_path(), dto, "Create package").await?;
            created_id(&value).ok_or_else(|| "Create package failed: response has no id".to_string())
        }
    }
}

pub async fn delete_package(id: &str) -> Result<(), String> {
    delete(&Package::api_item_path(id), "Delete package").await
}
