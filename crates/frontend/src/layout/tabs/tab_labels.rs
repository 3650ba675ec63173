//! Tab titles, derived from tab keys.
//!
//! Aggregates take their names from `AggregateRoot`; dashboards and system
//! pages are listed by hand.

use contracts::domain::a001_booking::Booking;
use contracts::domain::a002_package::Package;
use contracts::domain::a003_add_on::AddOn;
use contracts::domain::a004_billing::Billing;
use contracts::domain::a005_workload::Workload;
use contracts::domain::a006_feedback::Feedback;
use contracts::domain::common::AggregateRoot;

/// Title of a top-level tab. Fallback: empty string.
pub fn tab_label_for_key(key: &str) -> &'static str {
    match key {
        "a001_booking" => Booking::list_name(),
        "a001_booking_calendar" => "Calendar",
        "a002_package" => Package::list_name(),
        "a003_add_on" => AddOn::list_name(),
        "a004_billing" => Billing::list_name(),
        "a005_workload" => Workload::list_name(),
        "a006_feedback" => Feedback::list_name(),

        "d400_reports" => "Reports",

        "sys_users" => "Accounts",
        "sys_profile" => "My profile",

        _ => "",
    }
}

/// Singular name of the aggregate behind `aggregate_key`
pub fn entity_element_name(aggregate_key: &str) -> &'static str {
    match aggregate_key {
        "a001_booking" => Booking::element_name(),
        "a002_package" => Package::element_name(),
        "a003_add_on" => AddOn::element_name(),
        "a004_billing" => Billing::element_name(),
        "a005_workload" => Workload::element_name(),
        "a006_feedback" => Feedback::element_name(),
        "sys_users" => "Account",
        _ => "",
    }
}

/// Detail tab title: «<entity> · <identifier>».
///
/// Example: `detail_tab_label("Booking", "BK-0012")` → `"Booking · BK-0012"`
pub fn detail_tab_label(entity_label: &str, identifier: &str) -> String {
    format!("{} · {}", entity_label, identifier)
}

/// Title for any tab key, including `_detail_<id>` and `_new` keys.
///
/// Used when a tab is reopened from the URL before its record is loaded.
pub fn title_for_key(key: &str) -> String {
    let fixed = tab_label_for_key(key);
    if !fixed.is_empty() {
        return fixed.to_string();
    }
    if let Some((aggregate, id)) = key.split_once("_detail_") {
        let name = entity_element_name(aggregate);
        if !name.is_empty() {
            return detail_tab_label(name, id);
        }
    }
    if let Some(aggregate) = key.strip_suffix("_new") {
        let name = entity_element_name(aggregate);
        if !name.is_empty() {
            return format!("New {}", name.to_lowercase());
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_labels() {
        assert_eq!(tab_label_for_key("a001_booking"), "Bookings");
        assert_eq!(tab_label_for_key("a003_add_on"), "Add-ons");
        assert_eq!(tab_label_for_key("d400_reports"), "Reports");
        assert_eq!(tab_label_for_key("nope"), "");
    }

    #[test]
    fn titles_for_generated_keys() {
        assert_eq!(title_for_key("a004_billing_detail_17"), "Billing · 17");
        assert_eq!(title_for_key("a001_booking_new"), "New booking");
        assert_eq!(title_for_key("sys_users_detail_u1"), "Account · u1");
        assert_eq!(title_for_key("a001_booking_calendar"), "Calendar");
        assert_eq!(title_for_key("mystery"), "mystery");
    }
}
