//! Field checks used by every form before it talks to the API.
//!
//! Each check returns `Err(message)` with text ready to show next to the form.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("phone regex"));

static LOWER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").expect("lowercase regex"));
static UPPER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").expect("uppercase regex"));
static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").expect("digit regex"));
static SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").expect("symbol regex"));

pub const PASSWORD_MIN_LENGTH: usize = 8;

pub fn validate_required(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", label));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required".into());
    }
    if !EMAIL_RE.is_match(email) {
        return Err("Enter a valid email address".into());
    }
    Ok(())
}

/// Strip the separators people type into phone numbers
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect()
}

pub fn validate_phone(phone: &str) -> Result<(), String> {
    let normalized = normalize_phone(phone.trim());
    if normalized.is_empty() {
        return Err("Phone number is required".into());
    }
    if !PHONE_RE.is_match(&normalized) {
        return Err("Phone number must contain 10 to 15 digits".into());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LENGTH
        ));
    }
    if !LOWER_RE.is_match(password) {
        return Err("Password must contain a lowercase letter".into());
    }
    if !UPPER_RE.is_match(password) {
        return Err("Password must contain an uppercase letter".into());
    }
    if !DIGIT_RE.is_match(password) {
        return Err("Password must contain a digit".into());
    }
    if !SYMBOL_RE.is_match(password) {
        return Err("Password must contain a special character".into());
    }
    Ok(())
}

pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Result<(), String> {
    if password != confirmation {
        return Err("Passwords do not match".into());
    }
    Ok(())
}

pub fn validate_positive_amount(amount: f64, label: &str) -> Result<(), String> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(format!("{} must be greater than zero", label));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("ana@studio.ph").is_ok());
        assert!(validate_email("  ana.cruz+events@mail.example.com ").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("ana@studio").is_err());
        assert!(validate_email("ana studio@mail.com").is_err());
        assert!(validate_email("@mail.com").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("09171234567").is_ok());
        assert!(validate_phone("+63 917 123 4567").is_ok());
        assert!(validate_phone("(02) 8123-4567").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("0917-ABC-4567").is_err());
        assert!(validate_phone("").is_err());
        assert_eq!(normalize_phone("+63 (917) 123-4567"), "+639171234567");
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("Shutter#2026").is_ok());
        assert_eq!(
            validate_password("Sh#1"),
            Err("Password must be at least 8 characters".to_string())
        );
        assert!(validate_password("shutter#2026").is_err());
        assert!(validate_password("SHUTTER#2026").is_err());
        assert!(validate_password("Shutter#abcd").is_err());
        assert!(validate_password("Shutter2026").is_err());
    }

    #[test]
    fn test_confirmation_and_amounts() {
        assert!(validate_password_confirmation("a", "a").is_ok());
        assert!(validate_password_confirmation("a", "b").is_err());
        assert!(validate_positive_amount(0.01, "Amount").is_ok());
        assert!(validate_positive_amount(0.0, "Amount").is_err());
        assert!(validate_positive_amount(f64::NAN, "Amount").is_err());
        assert!(validate_required("  ", "Venue").is_err());
    }
}
