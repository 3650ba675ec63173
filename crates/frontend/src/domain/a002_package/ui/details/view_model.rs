use contracts::domain::a002_package::PackageDto;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a002_package::api;
use crate::shared::number_format::{format_number_with_decimals, parse_amount};

/// Form state of one package. Price and inclusions are edited as text and
/// folded into the dto on save.
#[derive(Clone, Copy)]
pub struct PackageDetailsVm {
    pub form: RwSignal<PackageDto>,
    pub price_text: RwSignal<String>,
    pub inclusions_text: RwSignal<String>,
    pub error: RwSignal<Option<String>>,
    pub is_saving: RwSignal<bool>,
    pub is_loaded: RwSignal<bool>,
}

impl PackageDetailsVm {
    pub fn new(id: Option<String>) -> Self {
        let vm = Self {
            form: RwSignal::new(PackageDto::default()),
            price_text: RwSignal::new(String::new()),
            inclusions_text: RwSignal::new(String::new()),
            error: RwSignal::new(None),
            is_saving: RwSignal::new(false),
            is_loaded: RwSignal::new(id.is_none()),
        };

        if let Some(id) = id {
            vm.load(id);
        }

        vm
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    pub fn load(&self, id: String) {
        let vm = *self;
        spawn_local(async move {
            match api::fetch_package(&id).await {
                Ok(package) => {
                    let dto = PackageDto::from_package(&package);
                    vm.price_text.set(format_number_with_decimals(dto.price, 2).replace(' ', ""));
                    vm.inclusions_text.set(dto.inclusions_text());
                    vm.form.set(dto);
                    vm.is_loaded.set(true);
                }
                Err(e) => vm.error.set(Some(format!("Failed to load package: {}", e))),
            }
        });
    }

    /// The dto as it would be sent
    pub fn collect(&self) -> Result<PackageDto, String> {
        let mut dto = self.form.get_untracked();
        dto.price = parse_amount(&self.price_text.get_untracked())
            .ok_or_else(|| "Price must be a number".to_string())?;
        dto.set_inclusions_text(&self.inclusions_text.get_untracked());
        dto.validate()?;
        Ok(dto.normalized())
    }

    pub fn save_command(&self, on_saved: Callback<String>) {
        let dto = match self.collect() {
            Ok(dto) => dto,
            Err(msg) => {
                self.error.set(Some(msg));
                return;
            }
        };

        let vm = *self;
        vm.is_saving.set(true);
        vm.error.set(None);
        spawn_local(async move {
            let result = api::save_package(&dto).await;
            vm.is_saving.set(false);
            match result {
                Ok(id) => {
                    log::info!("package {} saved", dto.name);
                    on_saved.run(id);
                }
                Err(e) => vm.error.set(Some(e)),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_price_and_inclusions_from_text() {
        let owner = Owner::new();
        owner.with(|| {
            let vm = PackageDetailsVm::new(None);
            vm.form.update(|f| f.name = "  Gold  ".into());
            vm.price_text.set("45 000,50".into());
            vm.inclusions_text.set("8 hours\n\n  Album \n".into());
            let dto = vm.collect().unwrap();
            assert_eq!(dto.name, "Gold");
            assert_eq!(dto.price, 45_000.5);
            assert_eq!(dto.inclusions, vec!["8 hours".to_string(), "Album".to_string()]);

            vm.price_text.set("abc".into());
            assert_eq!(vm.collect().unwrap_err(), "Price must be a number");
        });
    }
}
