use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::validation::{
    validate_email, validate_password, validate_password_confirmation, validate_phone,
    validate_required,
};
use crate::system::roles::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub password: String,
}

impl CreateUserDto {
    pub fn validate(&self) -> Result<(), String> {
        validate_required(&self.first_name, "First name")?;
        validate_required(&self.last_name, "Last name")?;
        validate_email(&self.email)?;
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        validate_password(&self.password)
    }
}

impl Default for CreateUserDto {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: None,
            role: Role::Client,
            password: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub is_active: bool,
}

impl UpdateUserDto {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            is_active: user.is_active,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_required(&self.first_name, "First name")?;
        validate_required(&self.last_name, "Last name")?;
        validate_email(&self.email)?;
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordDto {
    pub user_id: String,
    pub old_password: Option<String>, // None when the owner resets someone else's password
    pub new_password: String,
    #[serde(skip_serializing, default)]
    pub confirm_password: String,
}

impl ChangePasswordDto {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(old) = &self.old_password {
            validate_required(old, "Current password")?;
        }
        validate_password(&self.new_password)?;
        validate_password_confirmation(&self.new_password, &self.confirm_password)?;
        if self.old_password.as_deref() == Some(self.new_password.as_str()) {
            return Err("New password must differ from the current one".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_checks_optional_phone_only_when_present() {
        let mut dto = CreateUserDto {
            first_name: "Lea".into(),
            last_name: "Santos".into(),
            email: "lea@studio.ph".into(),
            phone: None,
            role: Role::Photographer,
            password: "Aperture!18".into(),
        };
        assert!(dto.validate().is_ok());
        dto.phone = Some("123".into());
        assert!(dto.validate().is_err());
    }

    #[test]
    fn change_password_rejects_reuse() {
        let dto = ChangePasswordDto {
            user_id: "u1".into(),
            old_password: Some("Aperture!18".into()),
            new_password: "Aperture!18".into(),
            confirm_password: "Aperture!18".into(),
        };
        assert_eq!(
            dto.validate(),
            Err("New password must differ from the current one".to_string())
        );
    }

    #[test]
    fn owner_reset_skips_current_password() {
        let dto = ChangePasswordDto {
            user_id: "u1".into(),
            old_password: None,
            new_password: "Focus#Pull9".into(),
            confirm_password: "Focus#Pull9".into(),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn full_name_ignores_blank_parts() {
        let user: User = serde_json::from_str(
            r#"{"id":"1","first_name":"Mara ","last_name":"","email":"m@x.io","phone":null,
                "role":"editor","is_active":true,"created_at":"2026-01-05T08:00:00Z",
                "last_login_at":null}"#,
        )
        .unwrap();
        assert_eq!(user.full_name(), "Mara");
        assert_eq!(UpdateUserDto::from_user(&user).role, Role::Editor);
    }
}
