use serde::{Deserialize, Serialize};

use crate::shared::validation::{
    validate_email, validate_password, validate_password_confirmation, validate_phone,
    validate_required,
};
use crate::system::roles::{Permission, Role, Section};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)?;
        validate_required(&self.password, "Password")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Self-service sign-up; always creates a `Client` account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    #[serde(skip_serializing, default)]
    pub confirm_password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_required(&self.first_name, "First name")?;
        validate_required(&self.last_name, "Last name")?;
        validate_email(&self.email)?;
        validate_phone(&self.phone)?;
        validate_password(&self.password)?;
        validate_password_confirmation(&self.password, &self.confirm_password)
    }
}

/// The signed-in account as reported by `/api/auth/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl UserInfo {
    pub fn has(&self, permission: Permission) -> bool {
        self.role.has(permission)
    }

    pub fn can_access(&self, section: Section) -> bool {
        self.role.can_access(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registration() -> RegisterRequest {
        RegisterRequest {
            first_name: "Ana".into(),
            last_name: "Cruz".into(),
            email: "ana@example.com".into(),
            phone: "0917 123 4567".into(),
            password: "Shutter#2026".into(),
            confirm_password: "Shutter#2026".into(),
        }
    }

    #[test]
    fn registration_accepts_complete_form() {
        assert!(sample_registration().validate().is_ok());
    }

    #[test]
    fn registration_reports_first_problem() {
        let mut req = sample_registration();
        req.last_name = " ".into();
        req.email = "broken".into();
        assert_eq!(req.validate(), Err("Last name is required".to_string()));

        let mut req = sample_registration();
        req.confirm_password = "Shutter#2025".into();
        assert_eq!(req.validate(), Err("Passwords do not match".to_string()));
    }

    #[test]
    fn confirmation_is_not_sent_to_the_api() {
        let json = serde_json::to_value(sample_registration()).unwrap();
        assert!(json.get("confirm_password").is_none());
        assert_eq!(json["email"], "ana@example.com");
    }

    #[test]
    fn user_info_delegates_to_role() {
        let info: UserInfo = serde_json::from_str(
            r#"{"id":"u1","email":"s@studio.ph","full_name":"Sam","role":"secretary"}"#,
        )
        .unwrap();
        assert_eq!(info.role, Role::Secretary);
        assert!(info.has(Permission::ApproveBookings));
        assert!(!info.can_access(Section::Accounts));
    }

    #[test]
    fn login_requires_both_fields() {
        let req = LoginRequest {
            email: "owner@studio.ph".into(),
            password: String::new(),
        };
        assert_eq!(req.validate(), Err("Password is required".to_string()));
    }
}
