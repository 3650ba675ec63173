use chrono::NaiveDate;
use contracts::domain::a001_booking::{Booking, BookingDto, BookingStatus};
use contracts::domain::a002_package::Package;
use contracts::domain::a003_add_on::{add_ons_total, AddOn};
use contracts::shared::money::round_money;
use contracts::system::auth::UserInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_booking::api;
use crate::domain::a002_package::api as package_api;
use crate::domain::a003_add_on::api as add_on_api;
use crate::shared::date_utils::today;
use crate::system::users::api as users_api;

/// Package price plus the selected add-ons
pub fn estimate(form: &BookingDto, packages: &[Package], add_ons: &[AddOn]) -> f64 {
    let package_price = packages
        .iter()
        .find(|p| p.id == form.package_id)
        .map(|p| p.price)
        .unwrap_or(0.0);
    round_money(package_price + add_ons_total(add_ons, &form.add_on_ids))
}

/// Active packages, plus the selected one even if it was retired since
pub fn package_options(packages: &[Package], selected: &str) -> Vec<Package> {
    packages
        .iter()
        .filter(|p| p.is_active || p.id == selected)
        .cloned()
        .collect()
}

pub fn add_on_options(add_ons: &[AddOn], selected: &[String]) -> Vec<AddOn> {
    add_ons
        .iter()
        .filter(|a| a.is_active || selected.contains(&a.id))
        .cloned()
        .collect()
}

fn validate_form(dto: &BookingDto, books_for_client: bool, today: NaiveDate) -> Result<(), String> {
    if books_for_client && dto.id.is_none() && dto.client_id.as_deref().unwrap_or("").is_empty() {
        return Err("Pick the client the booking is for".into());
    }
    dto.validate(today)
}

/// Form state of one booking
#[derive(Clone, Copy)]
pub struct BookingDetailsVm {
    pub form: RwSignal<BookingDto>,
    /// The stored record; `None` for a new booking
    pub booking: RwSignal<Option<Booking>>,
    pub packages: RwSignal<Vec<Package>>,
    pub add_ons: RwSignal<Vec<AddOn>>,
    pub clients: RwSignal<Vec<UserInfo>>,
    pub error: RwSignal<Option<String>>,
    pub is_saving: RwSignal<bool>,
    /// Front office staff book on behalf of a client
    pub books_for_client: bool,
}

impl BookingDetailsVm {
    pub fn new(id: Option<String>, books_for_client: bool) -> Self {
        let vm = Self {
            form: RwSignal::new(BookingDto::default()),
            booking: RwSignal::new(None),
            packages: RwSignal::new(Vec::new()),
            add_ons: RwSignal::new(Vec::new()),
            clients: RwSignal::new(Vec::new()),
            error: RwSignal::new(None),
            is_saving: RwSignal::new(false),
            books_for_client,
        };

        vm.load_catalog(books_for_client && id.is_none());
        if let Some(id) = id {
            vm.load(id);
        }

        vm
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    /// Only requests that have not been decided on can be edited
    pub fn is_editable(&self) -> bool {
        self.booking.with(|b| {
            b.as_ref()
                .map(|b| b.status == BookingStatus::Pending)
                .unwrap_or(true)
        })
    }

    pub fn estimate(&self) -> f64 {
        self.form
            .with(|f| self.packages.with(|p| self.add_ons.with(|a| estimate(f, p, a))))
    }

    pub fn is_form_valid(&self) -> bool {
        self.form
            .with(|f| validate_form(f, self.books_for_client, today()).is_ok())
    }

    fn load_catalog(&self, with_clients: bool) {
        let packages = self.packages;
        let add_ons = self.add_ons;
        let clients = self.clients;
        let error = self.error;

        spawn_local(async move {
            match package_api::fetch_packages().await {
                Ok(data) => packages.set(data),
                Err(e) => error.set(Some(format!("Failed to load packages: {}", e))),
            }
            match add_on_api::fetch_add_ons().await {
                Ok(data) => add_ons.set(data),
                Err(e) => error.set(Some(format!("Failed to load add-ons: {}", e))),
            }
            if with_clients {
                match users_api::fetch_clients().await {
                    Ok(data) => clients.set(data),
                    Err(e) => error.set(Some(format!("Failed to load clients: {}", e))),
                }
            }
        });
    }

    pub fn load(&self, id: String) {
        let form = self.form;
        let booking = self.booking;
        let error = self.error;

        spawn_local(async move {
            match api::fetch_booking(&id).await {
                Ok(loaded) => {
                    form.set(BookingDto::from_booking(&loaded));
                    booking.set(Some(loaded));
                }
                Err(e) => error.set(Some(format!("Failed to load booking: {}", e))),
            }
        });
    }

    /// Validate and send the form; `on_saved` gets the booking id
    pub fn save_command(&self, on_saved: Callback<String>) {
        let current = self.form.get_untracked();

        if let Err(msg) = validate_form(&current, self.books_for_client, today()) {
            self.error.set(Some(msg));
            return;
        }

        let error = self.error;
        let is_saving = self.is_saving;
        is_saving.set(true);
        error.set(None);

        spawn_local(async move {
            let result = match &current.id {
                Some(id) => api::update_booking(id, &current).await.map(|_| id.clone()),
                None => api::create_booking(&current).await,
            };
            is_saving.set(false);
            match result {
                Ok(id) => {
                    log::info!("booking {} saved", id);
                    on_saved.run(id);
                }
                Err(e) => error.set(Some(e)),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(id: &str, price: f64, active: bool) -> Package {
        Package {
            id: id.into(),
            name: id.to_uppercase(),
            price,
            details: String::new(),
            inclusions: vec![],
            is_active: active,
        }
    }

    fn add_on(id: &str, price: f64, active: bool) -> AddOn {
        AddOn {
            id: id.into(),
            name: id.to_uppercase(),
            price,
            details: String::new(),
            is_active: active,
        }
    }

    fn form() -> BookingDto {
        BookingDto {
            event_type: "Wedding".into(),
            event_date: NaiveDate::from_ymd_opt(2026, 12, 12),
            venue: "Garden Pavilion".into(),
            package_id: "gold".into(),
            ..Default::default()
        }
    }

    #[test]
    fn estimate_adds_selected_add_ons() {
        let packages = vec![package("gold", 45_000.0, true)];
        let add_ons = vec![add_on("drone", 5_000.0, true), add_on("booth", 7_500.0, true)];
        let mut dto = form();
        assert_eq!(estimate(&dto, &packages, &add_ons), 45_000.0);
        dto.toggle_add_on("booth");
        assert_eq!(estimate(&dto, &packages, &add_ons), 52_500.0);
        dto.package_id = "unknown".into();
        assert_eq!(estimate(&dto, &packages, &add_ons), 7_500.0);
    }

    #[test]
    fn retired_catalog_items_stay_visible_when_selected() {
        let packages = vec![package("gold", 1.0, true), package("old", 1.0, false)];
        assert_eq!(package_options(&packages, "").len(), 1);
        assert_eq!(package_options(&packages, "old").len(), 2);

        let add_ons = vec![add_on("drone", 1.0, false)];
        assert!(add_on_options(&add_ons, &[]).is_empty());
        assert_eq!(add_on_options(&add_ons, &["drone".to_string()]).len(), 1);
    }

    #[test]
    fn front_office_must_pick_a_client() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let mut dto = form();
        assert_eq!(
            validate_form(&dto, true, today),
            Err("Pick the client the booking is for".to_string())
        );
        assert!(validate_form(&dto, false, today).is_ok());
        dto.client_id = Some("c1".into());
        assert!(validate_form(&dto, true, today).is_ok());
    }
}
