use contracts::domain::a003_add_on::{AddOn, AddOnDto};
use contracts::domain::common::AggregateRoot;
use contracts::system::roles::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a003_add_on::api;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::shared::icons::icon;
use crate::shared::number_format::{format_money, parse_amount};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::system::auth::context::use_permission;

/// Create or edit one add-on; read-only for accounts without catalog rights
#[component]
pub fn AddOnDetails(id: Option<String>, on_close: Callback<()>) -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let can_manage = use_permission(Permission::ManageCatalog);
    let is_new = id.is_none();

    let form = RwSignal::new(AddOnDto::default());
    let price_text = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    if let Some(id) = id {
        spawn_local(async move {
            match api::fetch_add_on(&id).await {
                Ok(add_on) => {
                    price_text.set(format!("{:.2}", add_on.price));
                    tabs_store.update_tab_title(
                        &AddOn::detail_tab_key(&add_on.id),
                        &detail_tab_label(AddOn::element_name(), &add_on.name),
                    );
                    form.set(AddOnDto::from_add_on(&add_on));
                }
                Err(e) => set_error.set(Some(format!("Failed to load add-on: {}", e))),
            }
        });
    }

    let save = move |_| {
        let mut dto = form.get_untracked();
        let Some(price) = parse_amount(&price_text.get_untracked()) else {
            set_error.set(Some("Price must be a number".to_string()));
            return;
        };
        dto.price = price;
        dto.name = dto.name.trim().to_string();
        if let Err(e) = dto.validate() {
            set_error.set(Some(e));
            return;
        }
        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            let result = api::save_add_on(&dto).await;
            set_saving.set(false);
            match result {
                Ok(_) => on_close.run(()),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <PageFrame page_id="a003_add_on--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    {icon("layers")}
                    <h2>{if is_new { "New add-on" } else { "Add-on" }}</h2>
                </div>
                <div class="page__header-right">
                    <Show when=move || can_manage.get()>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=save
                            disabled=Signal::derive(move || saving.get())
                        >
                            {icon("save")}
                            " Save"
                        </Button>
                    </Show>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                        {icon("x")}
                        " Close"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <Show
                    when=move || can_manage.get()
                    fallback=move || view! {
                        <div class="package-summary">
                            <h3>{move || form.with(|f| f.name.clone())}</h3>
                            <div class="package-summary__price">{move || form.with(|f| format!("+{}", format_money(f.price)))}</div>
                            <p>{move || form.with(|f| f.details.clone())}</p>
                        </div>
                    }
                >
                    <div class="details-form">
                        <div class="form__row">
                            <div class="form__group form__group--wide">
                                <label for="name">"Name"</label>
                                <input
                                    type="text"
                                    id="name"
                                    class="form__input"
                                    placeholder="e.g. Drone coverage"
                                    prop:value=move || form.with(|f| f.name.clone())
                                    on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                                />
                            </div>
                            <div class="form__group">
                                <label for="price">"Price"</label>
                                <input
                                    type="text"
                                    id="price"
                                    class="form__input"
                                    inputmode="decimal"
                                    prop:value=move || price_text.get()
                                    on:input=move |ev| price_text.set(event_target_value(&ev))
                                />
                            </div>
                        </div>
                        <div class="form__group">
                            <label for="details">"Description"</label>
                            <textarea
                                id="details"
                                class="form__textarea"
                                rows="3"
                                prop:value=move || form.with(|f| f.details.clone())
                                on:input=move |ev| form.update(|f| f.details = event_target_value(&ev))
                            />
                        </div>
                        <div class="form__group">
                            <label class="checkbox-list__item">
                                <input
                                    type="checkbox"
                                    prop:checked=move || form.with(|f| f.is_active)
                                    on:change=move |ev| {
                                        let checked = event_target_checked(&ev);
                                        form.update(|f| f.is_active = checked);
                                    }
                                />
                                " Offered on new bookings"
                            </label>
                        </div>
                    </div>
                </Show>
            </div>
        </PageFrame>
    }
}
