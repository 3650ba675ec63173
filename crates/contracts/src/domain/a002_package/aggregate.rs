use serde::{Deserialize, Serialize};

use crate::domain::common::AggregateRoot;
use crate::shared::money::round_money;
use crate::shared::validation::{validate_positive_amount, validate_required};

// ============================================================================
// Aggregate Root
// ============================================================================

/// Service tier offered to clients (e.g. "Gold Wedding Coverage")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub details: String,
    /// One line per included item
    #[serde(default)]
    pub inclusions: Vec<String>,
    pub is_active: bool,
}

impl Package {
    pub fn matches_filter(&self, filter: &str) -> bool {
        let needle = filter.trim().to_lowercase();
        needle.is_empty()
            || self.name.to_lowercase().contains(&needle)
            || self.details.to_lowercase().contains(&needle)
    }
}

impl AggregateRoot for Package {
    fn id(&self) -> &str {
        &self.id
    }

    fn code(&self) -> &str {
        &self.name
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn entity_key() -> &'static str {
        "package"
    }

    fn collection_name() -> &'static str {
        "packages"
    }

    fn element_name() -> &'static str {
        "Package"
    }

    fn list_name() -> &'static str {
        "Packages"
    }
}

// ============================================================================
// Form
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDto {
    pub id: Option<String>,
    pub name: String,
    pub price: f64,
    pub details: String,
    #[serde(default)]
    pub inclusions: Vec<String>,
    pub is_active: bool,
}

impl Default for PackageDto {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            price: 0.0,
            details: String::new(),
            inclusions: Vec::new(),
            is_active: true,
        }
    }
}

impl PackageDto {
    pub fn from_package(p: &Package) -> Self {
        Self {
            id: Some(p.id.clone()),
            name: p.name.clone(),
            price: p.price,
            details: p.details.clone(),
            inclusions: p.inclusions.clone(),
            is_active: p.is_active,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_required(&self.name, "Package name")?;
        validate_positive_amount(self.price, "Price")
    }

    /// Inclusions edited as a textarea, one per line
    pub fn inclusions_text(&self) -> String {
        self.inclusions.join("\n")
    }

    pub fn set_inclusions_text(&mut self, text: &str) {
        self.inclusions = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
    }

    /// Copy ready to send: trimmed name, price in cents
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            price: round_money(self.price),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_form_rules() {
        let mut dto = PackageDto {
            name: "Silver".into(),
            price: 25_000.0,
            ..Default::default()
        };
        assert!(dto.validate().is_ok());

        dto.price = 0.0;
        assert_eq!(
            dto.validate(),
            Err("Price must be greater than zero".to_string())
        );

        dto.name = "   ".into();
        assert_eq!(dto.validate(), Err("Package name is required".to_string()));
    }

    #[test]
    fn inclusions_round_trip_through_text() {
        let mut dto = PackageDto::default();
        dto.set_inclusions_text("8 hours coverage\n\n  1 photographer  \nOnline gallery");
        assert_eq!(dto.inclusions.len(), 3);
        assert_eq!(dto.inclusions[1], "1 photographer");
        assert_eq!(
            dto.inclusions_text(),
            "8 hours coverage\n1 photographer\nOnline gallery"
        );
    }

    #[test]
    fn normalized_rounds_price() {
        let dto = PackageDto {
            name: " Gold ".into(),
            price: 45_000.456,
            ..Default::default()
        };
        let n = dto.normalized();
        assert_eq!(n.name, "Gold");
        assert_eq!(n.price, 45_000.46);
        assert_eq!(Package::new_tab_key(), "a002_package_new");
    }
}
