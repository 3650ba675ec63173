use chrono::NaiveDate;
use leptos::prelude::*;

use crate::shared::date_utils::{date_input_value, parse_date_input};

/// Native date picker bound to an optional `NaiveDate`
#[component]
pub fn DateInput(
    #[prop(into)] value: Signal<Option<NaiveDate>>,
    on_change: Callback<Option<NaiveDate>>,
    /// Earliest selectable date
    #[prop(optional, into)]
    min: Option<NaiveDate>,
    #[prop(optional, into)] disabled: Signal<bool>,
) -> impl IntoView {
    view! {
        <input
            type="date"
            class="date-input"
            prop:value=move || date_input_value(value.get())
            min=min.map(|d| date_input_value(Some(d)))
            disabled=move || disabled.get()
            on:input=move |ev| on_change.run(parse_date_input(&event_target_value(&ev)))
        />
    }
}
