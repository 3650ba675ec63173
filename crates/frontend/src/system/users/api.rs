use contracts::system::auth::UserInfo;
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};

use crate::shared::api_utils::{created_id, delete, get_json, post_command, post_json, put_json};

const USERS: &str = "/api/users";

pub async fn fetch_users() -> Result<Vec<User>, String> {
    get_json(USERS, "Loading accounts").await
}

/// Active photographers and editors, for workload assignment
pub async fn fetch_staff() -> Result<Vec<UserInfo>, String> {
    get_json(&format!("{}/staff", USERS), "Loading staff").await
}

/// Active client accounts, for bookings made by the front office
pub async fn fetch_clients() -> Result<Vec<UserInfo>, String> {
    get_json(&format!("{}/clients", USERS), "Loading clients").await
}

/// Returns the id of the new account
pub async fn create_user(dto: &CreateUserDto) -> Result<String, String> {
    let value: serde_json::Value = post_json(USERS, dto, "Creating the account").await?;
    Ok(created_id(&value).unwrap_or_default())
}

pub async fn update_user(dto: &UpdateUserDto) -> Result<(), String> {
    put_json(&format!("{}/{}", USERS, dto.id), dto, "Saving the account").await
}

pub async fn delete_user(id: &str) -> Result<(), String> {
    delete(&format!("{}/{}", USERS, id), "Deleting the account").await
}

/// Own password change (with `old_password`) or owner reset (without)
pub async fn change_password(dto: &ChangePasswordDto) -> Result<(), String> {
    post_command(
        &format!("{}/{}/password", USERS, dto.user_id),
        dto,
        "Changing the password",
    )
    .await
}
