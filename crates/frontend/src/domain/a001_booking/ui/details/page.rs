use contracts::domain::a001_booking::{Booking, EVENT_TYPES};
use contracts::domain::common::AggregateRoot;
use contracts::system::roles::Permission;
use leptos::prelude::*;
use thaw::*;

use super::view_model::{add_on_options, package_options, BookingDetailsVm};
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::shared::components::DateInput;
use crate::shared::date_utils::{format_datetime, today};
use crate::shared::icons::icon;
use crate::shared::number_format::format_money;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::system::auth::context::use_auth;

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[component]
pub fn BookingDetails(id: Option<String>, on_close: Callback<()>) -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (auth_state, _) = use_auth();
    let books_for_client = auth_state.with_untracked(|s| s.has(Permission::ApproveBookings));
    let vm = BookingDetailsVm::new(id.clone(), books_for_client);

    // Show the booking code in the tab once it is loaded
    if let Some(id_val) = id.clone() {
        let stored_id = StoredValue::new(id_val);
        Effect::new(move || {
            if let Some(code) = vm.booking.with(|b| b.as_ref().map(|b| b.code.clone())) {
                tabs_store.update_tab_title(
                    &Booking::detail_tab_key(&stored_id.get_value()),
                    &detail_tab_label(Booking::element_name(), &code),
                );
            }
        });
    }

    let read_only = Signal::derive(move || !vm.is_editable() || vm.is_saving.get());

    view! {
        <PageFrame page_id="a001_booking--detail" category=PAGE_CAT_DETAIL>
            <Header vm=vm is_new=id.is_none() on_close=on_close />

            <div class="page__content">
                {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                {move || vm.booking.get().map(|b| view! {
                    <div class="details__status">
                        <span class=b.status.badge_class()>{b.status.label()}</span>
                        <span class="details__meta">{format!("{} · requested {}", b.client_name, format_datetime(b.created_at))}</span>
                        {b.status_reason.clone().map(|r| view! { <span class="details__reason">{r}</span> })}
                        {(!vm.is_editable()).then(|| view! {
                            <span class="details__hint">"Decided bookings change through the workflow actions."</span>
                        })}
                    </div>
                })}

                <div class="details-form">
                    {vm.books_for_client.then(|| view! {
                        <div class="form__group">
                            <label for="client">"Client"</label>
                            {move || if vm.is_edit_mode() {
                                let name = vm.booking.with(|b| b.as_ref().map(|b| b.client_name.clone()).unwrap_or_default());
                                view! { <div class="form__static">{name}</div> }.into_any()
                            } else {
                                view! {
                                    <select
                                        id="client"
                                        class="form__select"
                                        prop:value=move || vm.form.with(|f| f.client_id.clone().unwrap_or_default())
                                        on:change=move |ev| {
                                            let value = event_target_value(&ev);
                                            vm.form.update(|f| f.client_id = optional(value));
                                        }
                                    >
                                        <option value="">"Select a client..."</option>
                                        {move || vm.clients.get().into_iter().map(|c| view! {
                                            <option value=c.id.clone()>{format!("{} ({})", c.full_name, c.email)}</option>
                                        }).collect_view()}
                                    </select>
                                }.into_any()
                            }}
                        </div>
                    })}

                    <div class="form__row">
                        <div class="form__group">
                            <label for="event_type">"Event type"</label>
                            <select
                                id="event_type"
                                class="form__select"
                                prop:value=move || vm.form.with(|f| f.event_type.clone())
                                disabled=move || read_only.get()
                                on:change=move |ev| vm.form.update(|f| f.event_type = event_target_value(&ev))
                            >
                                <option value="">"Select..."</option>
                                {EVENT_TYPES.iter().map(|t| view! { <option value=*t>{*t}</option> }).collect_view()}
                            </select>
                        </div>

                        <div class="form__group">
                            <label>"Event date"</label>
                            <DateInput
                                value=Signal::derive(move || vm.form.with(|f| f.event_date))
                                on_change=Callback::new(move |d| vm.form.update(|f| f.event_date = d))
                                min=today()
                                disabled=read_only
                            />
                        </div>

                        <div class="form__group">
                            <label for="event_time">"Start time"</label>
                            <input
                                type="time"
                                id="event_time"
                                class="form__input"
                                prop:value=move || vm.form.with(|f| f.event_time.clone().unwrap_or_default())
                                disabled=move || read_only.get()
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    vm.form.update(|f| f.event_time = optional(value));
                                }
                            />
                        </div>
                    </div>

                    <div class="form__row">
                        <div class="form__group form__group--wide">
                            <label for="venue">"Venue"</label>
                            <input
                                type="text"
                                id="venue"
                                class="form__input"
                                placeholder="Venue name and address"
                                prop:value=move || vm.form.with(|f| f.venue.clone())
                                disabled=move || read_only.get()
                                on:input=move |ev| vm.form.update(|f| f.venue = event_target_value(&ev))
                            />
                        </div>

                        <div class="form__group">
                            <label for="guest_count">"Guests"</label>
                            <input
                                type="number"
                                id="guest_count"
                                class="form__input"
                                min="1"
                                prop:value=move || vm.form.with(|f| f.guest_count.map(|n| n.to_string()).unwrap_or_default())
                                disabled=move || read_only.get()
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    vm.form.update(|f| f.guest_count = value.trim().parse::<u32>().ok());
                                }
                            />
                        </div>
                    </div>

                    <div class="form__group">
                        <label for="package">"Package"</label>
                        <select
                            id="package"
                            class="form__select"
                            prop:value=move || vm.form.with(|f| f.package_id.clone())
                            disabled=move || read_only.get()
                            on:change=move |ev| vm.form.update(|f| f.package_id = event_target_value(&ev))
                        >
                            <option value="">"Select a package..."</option>
                            {move || {
                                let selected = vm.form.with(|f| f.package_id.clone());
                                vm.packages.with(|p| package_options(p, &selected)).into_iter().map(|p| view! {
                                    <option value=p.id.clone()>{format!("{} · {}", p.name, format_money(p.price))}</option>
                                }).collect_view()
                            }}
                        </select>
                        {move || {
                            let selected = vm.form.with(|f| f.package_id.clone());
                            vm.packages.with(|p| p.iter().find(|p| p.id == selected).cloned()).map(|p| view! {
                                <div class="package-summary">
                                    <p>{p.details.clone()}</p>
                                    <ul>
                                        {p.inclusions.iter().map(|i| view! { <li>{i.clone()}</li> }).collect_view()}
                                    </ul>
                                </div>
                            })
                        }}
                    </div>

                    <div class="form__group">
                        <label>"Add-ons"</label>
                        <div class="checkbox-list">
                            {move || {
                                let selected = vm.form.with(|f| f.add_on_ids.clone());
                                let options = vm.add_ons.with(|a| add_on_options(a, &selected));
                                if options.is_empty() {
                                    return view! { <span class="form__hint">"No add-ons available"</span> }.into_any();
                                }
                                options.into_iter().map(|a| {
                                    let add_on_id = a.id.clone();
                                    let checked = selected.contains(&a.id);
                                    view! {
                                        <label class="checkbox-list__item">
                                            <input
                                                type="checkbox"
                                                prop:checked=checked
                                                disabled=move || read_only.get()
                                                on:change=move |_| vm.form.update(|f| f.toggle_add_on(&add_on_id))
                                            />
                                            {format!(" {} (+{})", a.name, format_money(a.price))}
                                        </label>
                                    }
                                }).collect_view().into_any()
                            }}
                        </div>
                    </div>

                    <div class="form__group">
                        <label for="notes">"Notes"</label>
                        <textarea
                            id="notes"
                            class="form__textarea"
                            rows="3"
                            placeholder="Schedule, special requests, contact on the day..."
                            prop:value=move || vm.form.with(|f| f.notes.clone().unwrap_or_default())
                            disabled=move || read_only.get()
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                vm.form.update(|f| f.notes = optional(value));
                            }
                        />
                    </div>

                    <div class="details__estimate">
                        <span>"Estimated total"</span>
                        <strong>{move || format_money(vm.estimate())}</strong>
                    </div>
                </div>
            </div>
        </PageFrame>
    }
}

#[component]
fn Header(vm: BookingDetailsVm, is_new: bool, on_close: Callback<()>) -> impl IntoView {
    let title = if is_new { "New booking" } else { "Booking" };

    let handle_save = move |_| {
        vm.save_command(Callback::new(move |_| on_close.run(())));
    };

    view! {
        <div class="page__header">
            <div class="page__header-left">
                {icon("file-text")}
                <h2>
                    {title}
                    {move || vm.booking.with(|b| b.as_ref().map(|b| format!(" {}", b.code)))}
                </h2>
            </div>
            <div class="page__header-right">
                <Show when=move || vm.is_editable()>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=handle_save
                        disabled=Signal::derive(move || vm.is_saving.get() || !vm.is_form_valid())
                    >
                        {icon("save")}
                        {move || if vm.is_saving.get() { " Saving..." } else if is_new { " Submit request" } else { " Save" }}
                    </Button>
                </Show>
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                    {icon("x")}
                    " Close"
                </Button>
            </div>
        </div>
    }
}
