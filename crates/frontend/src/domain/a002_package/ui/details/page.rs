use contracts::domain::a002_package::Package;
use contracts::domain::common::AggregateRoot;
use contracts::system::roles::Permission;
use leptos::prelude::*;
use thaw::*;

use super::view_model::PackageDetailsVm;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::shared::icons::icon;
use crate::shared::number_format::format_money;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::system::auth::context::use_permission;

#[component]
pub fn PackageDetails(id: Option<String>, on_close: Callback<()>) -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let can_manage = use_permission(Permission::ManageCatalog);
    let vm = PackageDetailsVm::new(id.clone());
    let is_new = id.is_none();

    if let Some(id_val) = id {
        let stored_id = StoredValue::new(id_val);
        Effect::new(move || {
            let name = vm.form.with(|f| f.name.clone());
            if vm.is_loaded.get() && !name.is_empty() {
                tabs_store.update_tab_title(
                    &Package::detail_tab_key(&stored_id.get_value()),
                    &detail_tab_label(Package::element_name(), &name),
                );
            }
        });
    }

    let handle_save = move |_| vm.save_command(Callback::new(move |_| on_close.run(())));

    view! {
        <PageFrame page_id="a002_package--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    {icon("package")}
                    <h2>{if is_new { "New package" } else { "Package" }}</h2>
                </div>
                <div class="page__header-right">
                    <Show when=move || can_manage.get()>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=handle_save
                            disabled=Signal::derive(move || vm.is_saving.get() || !vm.is_loaded.get())
                        >
                            {icon("save")}
                            {move || if vm.is_saving.get() { " Saving..." } else { " Save" }}
                        </Button>
                    </Show>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                        {icon("x")}
                        " Close"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <Show
                    when=move || can_manage.get()
                    fallback=move || view! {
                        <div class="package-summary">
                            <h3>{move || vm.form.with(|f| f.name.clone())}</h3>
                            <div class="package-summary__price">{move || vm.form.with(|f| format_money(f.price))}</div>
                            <p>{move || vm.form.with(|f| f.details.clone())}</p>
                            <ul>
                                {move || vm.form.with(|f| f.inclusions.clone()).into_iter().map(|i| view! { <li>{i}</li> }).collect_view()}
                            </ul>
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
                                    placeholder="e.g. Gold wedding coverage"
                                    prop:value=move || vm.form.with(|f| f.name.clone())
                                    on:input=move |ev| vm.form.update(|f| f.name = event_target_value(&ev))
                                />
                            </div>
                            <div class="form__group">
                                <label for="price">"Price"</label>
                                <input
                                    type="text"
                                    id="price"
                                    class="form__input"
                                    inputmode="decimal"
                                    placeholder="0.00"
                                    prop:value=move || vm.price_text.get()
                                    on:input=move |ev| vm.price_text.set(event_target_value(&ev))
                                />
                            </div>
                        </div>

                        <div class="form__group">
                            <label for="details">"Description"</label>
                            <textarea
                                id="details"
                                class="form__textarea"
                                rows="3"
                                prop:value=move || vm.form.with(|f| f.details.clone())
                                on:input=move |ev| vm.form.update(|f| f.details = event_target_value(&ev))
                            />
                        </div>

                        <div class="form__group">
                            <label for="inclusions">"Inclusions (one per line)"</label>
                            <textarea
                                id="inclusions"
                                class="form__textarea"
                                rows="6"
                                placeholder="8 hours coverage\n300 edited photos\nOnline gallery"
                                prop:value=move || vm.inclusions_text.get()
                                on:input=move |ev| vm.inclusions_text.set(event_target_value(&ev))
                            />
                        </div>

                        <div class="form__group">
                            <label class="checkbox-list__item">
                                <input
                                    type="checkbox"
                                    prop:checked=move || vm.form.with(|f| f.is_active)
                                    on:change=move |ev| {
                                        let checked = event_target_checked(&ev);
                                        vm.form.update(|f| f.is_active = checked);
                                    }
                                />
                                " Offered for new bookings"
                            </label>
                        </div>
                    </div>
                </Show>
            </div>
        </PageFrame>
    }
}

