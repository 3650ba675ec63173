use contracts::domain::a005_workload::{AssignWorkloadDto, UpdateWorkloadStatusDto, Workload};
use contracts::domain::common::AggregateRoot;

use crate::shared::api_utils::{get_json, post_command};

/// Workloads visible to the signed-in account
pub async fn fetch_workloads() -> Result<Vec<Workload>, String> {
    get_json(&Workload::api_path(), "Load workloads").await
}

pub async fn fetch_workload(id: &str) -> Result<Workload, String> {
    get_json(&Workload::api_item_path(id), "Load workload").await
}

pub async fn assign(dto: &AssignWorkloadDto) -> Result<(), String> {
    let path = format!("{}/assign", Workload::api_item_path(&dto.workload_id));
    post_command(&path, dto, "Assign workload").await
}

pub async fn update_status(dto: &UpdateWorkloadStatusDto) -> Result<(), String> {
    let path = format!("{}/status", Workload::api_item_path(&dto.workload_id));
    post_command(&path, dto, "Update workload status").await
}
