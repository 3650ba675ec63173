use contracts::domain::a004_billing::{Billing, PaymentDto, PaymentMethod};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a004_billing::api;
use crate::shared::modal::Modal;
use crate::shared::number_format::{format_money, parse_amount};

/// Payment dto from the raw form fields
pub fn payment_from_form(
    billing_id: &str,
    amount_text: &str,
    method_code: &str,
    reference: &str,
) -> Result<PaymentDto, String> {
    let amount = parse_amount(amount_text).ok_or_else(|| "Payment amount must be a number".to_string())?;
    let method = PaymentMethod::from_code(method_code).ok_or_else(|| "Pick a payment method".to_string())?;
    let reference = reference.trim();
    Ok(PaymentDto {
        amount,
        method,
        reference: (!reference.is_empty()).then(|| reference.to_string()),
        ..PaymentDto::new(billing_id)
    })
}

#[component]
pub fn PaymentForm(billing: Billing, on_close: Callback<()>, on_saved: Callback<()>) -> impl IntoView {
    let balance = billing.balance();
    let billing_id = StoredValue::new(billing.id.clone());

    let amount_text = RwSignal::new(format!("{:.2}", balance));
    let method = RwSignal::new(PaymentMethod::Cash.code().to_string());
    let reference = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let needs_reference = move || {
        PaymentMethod::from_code(&method.get())
            .map(|m| m.requires_reference())
            .unwrap_or(false)
    };

    let submit = move |_| {
        let dto = match payment_from_form(
            &billing_id.get_value(),
            &amount_text.get_untracked(),
            &method.get_untracked(),
            &reference.get_untracked(),
        )
        .and_then(|dto| dto.validate(balance).map(|_| dto))
        {
            Ok(dto) => dto,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };

        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            let result = api::record_payment(&dto).await;
            set_saving.set(false);
            match result {
                Ok(()) => {
                    log::info!("payment of {:.2} recorded on {}", dto.amount, dto.billing_id);
                    on_saved.run(());
                }
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
                {move || if saving.get() { "Saving..." } else { "Record payment" }}
            </Button>
        }
    };

    view! {
        <Modal
            title=format!("Payment for {}", billing.booking_code)
            on_close=on_close
            footer=ChildrenFn::to_children(footer)
        >
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            <p class="confirm-dialog__message">{format!("Balance due: {}", format_money(balance))}</p>
            <div class="form__group">
                <Label>"Amount"</Label>
                <Input value=amount_text attr:inputmode="decimal" />
            </div>
            <div class="form__group">
                <Label>"Method"</Label>
                <Select value=method>
                    {PaymentMethod::all()
                        .into_iter()
                        .map(|m| view! { <option value=m.code()>{m.label()}</option> })
                        .collect_view()}
                </Select>
            </div>
            <div class="form__group">
                <Label>{move || if needs_reference() { "Reference number" } else { "Reference number (optional)" }}</Label>
                <Input value=reference placeholder="Transaction or receipt number" />
            </div>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_payment_fields() {
        let dto = payment_from_form("bl-1", "12 500,50", "bank_transfer", "  TX-77 ").unwrap();
        assert_eq!(dto.billing_id, "bl-1");
        assert_eq!(dto.amount, 12_500.5);
        assert_eq!(dto.method, PaymentMethod::BankTransfer);
        assert_eq!(dto.reference.as_deref(), Some("TX-77"));

        let cash = payment_from_form("bl-1", "100", "cash", " ").unwrap();
        assert_eq!(cash.reference, None);

        assert!(payment_from_form("bl-1", "lots", "cash", "").is_err());
        assert!(payment_from_form("bl-1", "100", "barter", "").is_err());
    }

    #[test]
    fn non_cash_payment_needs_reference() {
        let dto = payment_from_form("bl-1", "100", "e_wallet", "").unwrap();
        assert_eq!(
            dto.validate(500.0),
            Err("Reference number is required for e-wallet payments".to_string())
        );
    }
}
