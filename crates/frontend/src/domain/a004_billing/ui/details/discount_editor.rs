use contracts::domain::a004_billing::{Billing, Discount, UpdateDiscountDto};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a004_billing::api;
use crate::shared::modal::Modal;
use crate::shared::number_format::{format_money, parse_amount};

fn kind_code(discount: &Discount) -> &'static str {
    match discount {
        Discount::None => "none",
        Discount::Percent(_) => "percent",
        Discount::Fixed(_) => "fixed",
    }
}

fn value_text(discount: &Discount) -> String {
    match discount {
        Discount::None => String::new(),
        Discount::Percent(v) | Discount::Fixed(v) => v.to_string(),
    }
}

/// Discount from the kind selector and the value field
pub fn discount_from_form(kind: &str, value: &str) -> Result<Discount, String> {
    let amount = || parse_amount(value).ok_or_else(|| "Discount value must be a number".to_string());
    match kind {
        "percent" => Ok(Discount::Percent(amount()?)),
        "fixed" => Ok(Discount::Fixed(amount()?)),
        _ => Ok(Discount::None),
    }
}

#[component]
pub fn DiscountEditor(billing: Billing, on_close: Callback<()>, on_saved: Callback<()>) -> impl IntoView {
    let subtotal = billing.subtotal();
    let billing_id = StoredValue::new(billing.id.clone());

    let kind = RwSignal::new(kind_code(&billing.discount).to_string());
    let value = RwSignal::new(value_text(&billing.discount));
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let preview = move || match discount_from_form(&kind.get(), &value.get()) {
        Ok(d) if d.validate(subtotal).is_ok() => {
            format!("New total: {}", format_money(subtotal - d.amount_for(subtotal)))
        }
        _ => String::new(),
    };

    let submit = move |_| {
        let result = discount_from_form(&kind.get_untracked(), &value.get_untracked()).and_then(|discount| {
            let dto = UpdateDiscountDto {
                billing_id: billing_id.get_value(),
                discount,
            };
            dto.validate(subtotal).map(|_| dto)
        });
        let dto = match result {
            Ok(dto) => dto,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };

        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            let result = api::update_discount(&dto).await;
            set_saving.set(false);
            match result {
                Ok(()) => on_saved.run(()),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let footer = move || {
        view! {
            <Button
                appearance=ButtonAppearance::Secondary
                on_click=move |_| on_close.run(())
                disabled=Signal::derive(move || saving.get())
            >
                "Cancel"
            </Button>
            <Button
                appearance=ButtonAppearance::Primary
                on_click=submit
                disabled=Signal::derive(move || saving.get())
            >
                "Save discount"
            </Button>
        }
    };

    view! {
        <Modal
            title=format!("Discount for {}", billing.booking_code)
            on_close=on_close
            footer=ChildrenFn::to_children(footer)
        >
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            <p class="confirm-dialog__message">{format!("Subtotal: {}", format_money(subtotal))}</p>
            <div class="form__row">
                <div class="form__group">
                    <Label>"Type"</Label>
                    <Select value=kind>
                        <option value="none">"No discount"</option>
                        <option value="percent">"Percent"</option>
                        <option value="fixed">"Fixed amount"</option>
                    </Select>
                </div>
                <div class="form__group">
                    <Label>{move || if kind.get() == "percent" { "Percent" } else { "Amount" }}</Label>
                    <Input
                        value=value
                        disabled=Signal::derive(move || kind.get() == "none")
                        attr:inputmode="decimal"
                    />
                </div>
            </div>
            <div class="details__estimate">{preview}</div>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_discount_fields() {
        assert_eq!(discount_from_form("none", "abc"), Ok(Discount::None));
        assert_eq!(discount_from_form("percent", "10"), Ok(Discount::Percent(10.0)));
        assert_eq!(discount_from_form("fixed", "2 500"), Ok(Discount::Fixed(2_500.0)));
        assert!(discount_from_form("fixed", "").is_err());
    }

    #[test]
    fn existing_discount_fills_the_form() {
        let d = Discount::Percent(12.5);
        assert_eq!(kind_code(&d), "percent");
        assert_eq!(value_text(&d), "12.5");
        assert_eq!(value_text(&Discount::None), "");
    }
}
