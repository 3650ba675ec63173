//! Tab content registry: the one place that maps a tab key to its view.
//!
//! Keys follow three shapes:
//! - `<aggregate>` or a fixed page key for lists, dashboards and system pages
//! - `<aggregate>_new` for an empty details form
//! - `<aggregate>_detail_<id>` for a record
//!
//! Every view is wrapped in `RequireSection`, so a tab restored from the URL
//! still honours the signed-in role.

use contracts::system::roles::Section;
use leptos::prelude::*;

use crate::dashboards::ReportsDashboard;
use crate::domain::a001_booking::ui::calendar::BookingCalendar;
use crate::domain::a001_booking::ui::details::BookingDetails;
use crate::domain::a001_booking::ui::list::BookingList;
use crate::domain::a002_package::ui::details::PackageDetails;
use crate::domain::a002_package::ui::list::PackageList;
use crate::domain::a003_add_on::ui::details::AddOnDetails;
use crate::domain::a003_add_on::ui::list::AddOnList;
use crate::domain::a004_billing::ui::details::BillingDetails;
use crate::domain::a004_billing::ui::list::BillingList;
use crate::domain::a005_workload::ui::details::WorkloadDetails;
use crate::domain::a005_workload::ui::list::WorkloadList;
use crate::domain::a006_feedback::ui::list::FeedbackList;
use crate::layout::global_context::AppGlobalContext;
use crate::system::auth::guard::RequireSection;
use crate::system::pages::profile::ProfilePage;
use crate::system::users::ui::list::UsersListPage;

/// What a tab key points at
#[derive(Debug, Clone, PartialEq, Eq)]
enum TabTarget {
    Page,
    New,
    Detail(String),
}

/// Split a key into its aggregate and target
fn parse_key(key: &str) -> (&str, TabTarget) {
    if let Some((aggregate, id)) = key.split_once("_detail_") {
        return (aggregate, TabTarget::Detail(id.to_string()));
    }
    if let Some(aggregate) = key.strip_suffix("_new") {
        return (aggregate, TabTarget::New);
    }
    (key, TabTarget::Page)
}

/// View for `key`, or a placeholder when the key is unknown
pub fn render_tab_content(key: &str, tabs_store: AppGlobalContext) -> AnyView {
    let Some(section) = Section::for_tab_key(key) else {
        log::warn!("no section owns tab '{}'", key);
        return unknown_tab(key);
    };

    let key_for_close = key.to_string();
    let on_close = Callback::new(move |_| tabs_store.close_tab(&key_for_close));
    let key = StoredValue::new(key.to_string());

    view! {
        <RequireSection section=section>
            {move || key.with_value(|k| tab_view(k, on_close))}
        </RequireSection>
    }
    .into_any()
}

fn tab_view(key: &str, on_close: Callback<()>) -> AnyView {
    match parse_key(key) {
        ("a001_booking", TabTarget::Page) => view! { <BookingList /> }.into_any(),
        ("a001_booking_calendar", TabTarget::Page) => view! { <BookingCalendar /> }.into_any(),
        ("a001_booking", TabTarget::New) => {
            view! { <BookingDetails id=None on_close=on_close /> }.into_any()
        }
        ("a001_booking", TabTarget::Detail(id)) => {
            view! { <BookingDetails id=Some(id) on_close=on_close /> }.into_any()
        }

        ("a002_package", TabTarget::Page) => view! { <PackageList /> }.into_any(),
        ("a002_package", TabTarget::New) => {
            view! { <PackageDetails id=None on_close=on_close /> }.into_any()
        }
        ("a002_package", TabTarget::Detail(id)) => {
            view! { <PackageDetails id=Some(id) on_close=on_close /> }.into_any()
        }

        ("a003_add_on", TabTarget::Page) => view! { <AddOnList /> }.into_any(),
        ("a003_add_on", TabTarget::New) => {
            view! { <AddOnDetails id=None on_close=on_close /> }.into_any()
        }
        ("a003_add_on", TabTarget::Detail(id)) => {
            view! { <AddOnDetails id=Some(id) on_close=on_close /> }.into_any()
        }

        ("a004_billing", TabTarget::Page) => view! { <BillingList /> }.into_any(),
        ("a004_billing", TabTarget::Detail(id)) => {
            view! { <BillingDetails id=id on_close=on_close /> }.into_any()
        }

        ("a005_workload", TabTarget::Page) => view! { <WorkloadList /> }.into_any(),
        ("a005_workload", TabTarget::Detail(id)) => {
            view! { <WorkloadDetails id=id on_close=on_close /> }.into_any()
        }

        ("a006_feedback", TabTarget::Page) => view! { <FeedbackList /> }.into_any(),

        ("d400_reports", TabTarget::Page) => view! { <ReportsDashboard /> }.into_any(),

        ("sys_users", TabTarget::Page) => view! { <UsersListPage /> }.into_any(),
        ("sys_profile", TabTarget::Page) => view! { <ProfilePage /> }.into_any(),

        _ => {
            log::warn!("no view registered for tab '{}'", key);
            unknown_tab(key)
        }
    }
}

fn unknown_tab(key: &str) -> AnyView {
    view! {
        <div class="placeholder">
            <h2>"Page not found"</h2>
            <p>{format!("Nothing is registered for '{}'.", key)}</p>
        </div>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tab_keys() {
        assert_eq!(parse_key("a004_billing"), ("a004_billing", TabTarget::Page));
        assert_eq!(parse_key("a002_package_new"), ("a002_package", TabTarget::New));
        assert_eq!(
            parse_key("a005_workload_detail_w-7"),
            ("a005_workload", TabTarget::Detail("w-7".to_string()))
        );
        assert_eq!(
            parse_key("a001_booking_calendar"),
            ("a001_booking_calendar", TabTarget::Page)
        );
    }
}
