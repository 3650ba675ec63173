use serde::{Deserialize, Serialize};

use crate::domain::common::AggregateRoot;
use crate::shared::money::round_money;
use crate::shared::validation::{validate_positive_amount, validate_required};

/// Optional extra that can be attached to a booking (drone shots, photo booth, album)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOn {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub details: String,
    pub is_active: bool,
}

impl AggregateRoot for AddOn {
    fn id(&self) -> &str {
        &self.id
    }

    fn code(&self) -> &str {
        &self.name
    }

    fn aggregate_index() -> &'static str {
        "a003"
    }

    fn entity_key() -> &'static str {
        "add_on"
    }

    fn collection_name() -> &'static str {
        "add-ons"
    }

    fn element_name() -> &'static str {
        "Add-on"
    }

    fn list_name() -> &'static str {
        "Add-ons"
    }
}

/// Sum of the prices of the selected add-ons; unknown ids are ignored
pub fn add_ons_total(catalog: &[AddOn], selected: &[String]) -> f64 {
    round_money(
        catalog
            .iter()
            .filter(|a| selected.iter().any(|id| id == &a.id))
            .map(|a| a.price)
            .sum(),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOnDto {
    pub id: Option<String>,
    pub name: String,
    pub price: f64,
    pub details: String,
    pub is_active: bool,
}

impl Default for AddOnDto {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            price: 0.0,
            details: String::new(),
            is_active: true,
        }
    }
}

impl AddOnDto {
    pub fn from_add_on(a: &AddOn) -> Self {
        Self {
            id: Some(a.id.clone()),
            name: a.name.clone(),
            price: a.price,
            details: a.details.clone(),
            is_active: a.is_active,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_required(&self.name, "Add-on name")?;
        validate_positive_amount(self.price, "Price")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_on(id: &str, price: f64) -> AddOn {
        AddOn {
            id: id.into(),
            name: id.to_uppercase(),
            price,
            details: String::new(),
            is_active: true,
        }
    }

    #[test]
    fn total_of_selected_add_ons() {
        let catalog = vec![add_on("drone", 5_000.0), add_on("booth", 7_500.5), add_on("album", 3_000.0)];
        let selected = vec!["drone".to_string(), "booth".to_string(), "gone".to_string()];
        assert_eq!(add_ons_total(&catalog, &selected), 12_500.5);
        assert_eq!(add_ons_total(&catalog, &[]), 0.0);
    }

    #[test]
    fn add_on_validation() {
        assert_eq!(
            AddOnDto::default().validate(),
            Err("Add-on name is required".to_string())
        );
        let dto = AddOnDto::from_add_on(&add_on("drone", 5_000.0));
        assert!(dto.validate().is_ok());
        assert_eq!(AddOn::api_item_path("drone"), "/api/add-ons/drone");
    }
}
