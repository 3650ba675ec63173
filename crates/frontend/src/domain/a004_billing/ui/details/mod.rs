mod discount_editor;
mod payment_form;

use contracts::domain::a004_billing::{Billing, BillingStatus, Payment};
use contracts::domain::common::AggregateRoot;
use contracts::system::roles::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a004_billing::api;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::shared::date_utils::{format_date, format_datetime, today};
use crate::shared::icons::icon;
use crate::shared::number_format::format_money;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::system::auth::context::use_permission;
use discount_editor::DiscountEditor;
use payment_form::PaymentForm;

#[derive(Clone, Copy, PartialEq)]
enum Dialog {
    Payment,
    Discount,
}

/// Payments, newest first
fn payment_history(billing: &Billing) -> Vec<Payment> {
    let mut payments = billing.payments.clone();
    payments.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
    payments
}

#[component]
pub fn BillingDetails(id: String, on_close: Callback<()>) -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let can_pay = use_permission(Permission::RecordPayments);
    let can_edit = use_permission(Permission::EditBilling);

    let id = StoredValue::new(id);
    let billing = RwSignal::new(None::<Billing>);
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let dialog = RwSignal::new(None::<Dialog>);

    let load = move || {
        set_loading.set(true);
        spawn_local(async move {
            match api::fetch_billing(&id.get_value()).await {
                Ok(b) => {
                    billing.set(Some(b));
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };
    load();

    Effect::new(move || {
        if let Some(code) = billing.with(|b| b.as_ref().map(|b| b.booking_code.clone())) {
            tabs_store.update_tab_title(
                &Billing::detail_tab_key(&id.get_value()),
                &detail_tab_label(Billing::element_name(), &code),
            );
        }
    });

    let after_change = Callback::new(move |_| {
        dialog.set(None);
        load();
    });
    let close_dialog = Callback::new(move |_| dialog.set(None));

    let has_balance = move || billing.with(|b| b.as_ref().map(|b| b.balance() > 0.0).unwrap_or(false));

    view! {
        <PageFrame page_id="a004_billing--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    {icon("credit-card")}
                    <h2>
                        "Billing"
                        {move || billing.with(|b| b.as_ref().map(|b| format!(" {}", b.booking_code)))}
                    </h2>
                </div>
                <div class="page__header-right">
                    <Show when=move || can_edit.get() && billing.with(|b| b.is_some())>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| dialog.set(Some(Dialog::Discount))
                        >
                            {icon("edit")}
                            " Discount"
                        </Button>
                    </Show>
                    <Show when=move || can_pay.get() && has_balance()>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| dialog.set(Some(Dialog::Payment))
                        >
                            {icon("plus")}
                            " Record payment"
                        </Button>
                    </Show>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load() disabled=loading>
                        {icon("refresh")}
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                        {icon("x")}
                        " Close"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                {move || billing.get().map(|b| view! { <Breakdown billing=b /> })}
            </div>

            {move || {
                let b = billing.get()?;
                match dialog.get()? {
                    Dialog::Payment => Some(view! {
                        <PaymentForm billing=b on_close=close_dialog on_saved=after_change />
                    }.into_any()),
                    Dialog::Discount => Some(view! {
                        <DiscountEditor billing=b on_close=close_dialog on_saved=after_change />
                    }.into_any()),
                }
            }}
        </PageFrame>
    }
}

#[component]
fn Breakdown(billing: Billing) -> impl IntoView {
    let status = billing.status();
    let overdue = billing.is_overdue(today());
    let payments = payment_history(&billing);
    let payment_count = payments.len();
    let meta = format!(
        "{} · event {} · due {}",
        billing.client_name,
        format_date(billing.event_date),
        format_date(billing.effective_due_date()),
    );
    let package_line = format!("Package: {}", billing.package_name);
    let package_price = format_money(billing.package_price);
    let add_on_lines: Vec<(String, String)> = billing
        .add_ons
        .iter()
        .map(|line| (format!("Add-on: {}", line.description), format_money(line.amount)))
        .collect();
    let subtotal = format_money(billing.subtotal());
    let discount_line = format!("Discount ({})", billing.discount.describe());
    let discount_amount = format!("-{}", format_money(billing.discount_amount()));
    let total = format_money(billing.total());
    let paid = format_money(billing.amount_paid());
    let balance = format_money(billing.balance());

    view! {
        <div class="details__status">
            <span class=status.badge_class()>{status.label()}</span>
            {overdue.then(|| view! { <span class="badge badge--error">"Overdue"</span> })}
            <span class="details__meta">
                {meta}
            </span>
        </div>

        <div class="details__section">
            <h3>"Charges"</h3>
            <Table>
                <TableBody>
                    <TableRow>
                        <TableCell>{package_line}</TableCell>
                        <TableCell class="table__cell--right">{package_price}</TableCell>
                    </TableRow>
                    {add_on_lines.into_iter().map(|(label, amount)| view! {
                        <TableRow>
                            <TableCell>{label}</TableCell>
                            <TableCell class="table__cell--right">{amount}</TableCell>
                        </TableRow>
                    }).collect_view()}
                    <TableRow class:table__row--subtotal=true>
                        <TableCell>"Subtotal"</TableCell>
                        <TableCell class="table__cell--right">{subtotal}</TableCell>
                    </TableRow>
                    <TableRow>
                        <TableCell>{discount_line}</TableCell>
                        <TableCell class="table__cell--right">{discount_amount}</TableCell>
                    </TableRow>
                    <TableRow class:table__row--total=true>
                        <TableCell><strong>"Total"</strong></TableCell>
                        <TableCell class="table__cell--right"><strong>{total}</strong></TableCell>
                    </TableRow>
                    <TableRow>
                        <TableCell>"Paid"</TableCell>
                        <TableCell class="table__cell--right">{paid}</TableCell>
                    </TableRow>
                    <TableRow class:table__row--total=true>
                        <TableCell><strong>"Balance"</strong></TableCell>
                        <TableCell class="table__cell--right"><strong>{balance}</strong></TableCell>
                    </TableRow>
                </TableBody>
            </Table>
        </div>

        <div class="details__section">
            <h3>{format!("Payments ({})", payment_count)}</h3>
            {if payments.is_empty() {
                view! { <div class="details__hint">"No payments recorded yet."</div> }.into_any()
            } else {
                view! {
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell resizable=false min_width=150.0>"Received"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>"Method"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=140.0>"Reference"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=140.0>"Recorded by"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0 class="table__cell--right">"Amount"</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            {payments.into_iter().map(|p| view! {
                                <TableRow>
                                    <TableCell>{format_datetime(p.paid_at)}</TableCell>
                                    <TableCell>{p.method.label()}</TableCell>
                                    <TableCell>
                                        <TableCellLayout truncate=true>{p.reference.unwrap_or_default()}</TableCellLayout>
                                    </TableCell>
                                    <TableCell>{p.received_by.unwrap_or_default()}</TableCell>
                                    <TableCell class="table__cell--right">{format_money(p.amount)}</TableCell>
                                </TableRow>
                            }).collect_view()}
                        </TableBody>
                    </Table>
                }.into_any()
            }}
        </div>

        {(status == BillingStatus::FullyPaid).then(|| view! {
            <div class="details__hint">"This billing is settled."</div>
        })}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use contracts::domain::a004_billing::{Discount, PaymentMethod};

    fn payment(id: &str, day: u32) -> Payment {
        Payment {
            id: id.into(),
            amount: 100.0,
            method: PaymentMethod::Cash,
            reference: None,
            paid_at: Utc.with_ymd_and_hms(2026, 10, day, 9, 0, 0).unwrap(),
            received_by: None,
        }
    }

    #[test]
    fn history_lists_newest_first() {
        let billing = Billing {
            id: "bl-1".into(),
            booking_id: "bk-1".into(),
            booking_code: "BK-1".into(),
            client_id: "c1".into(),
            client_name: "Ana".into(),
            event_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            package_name: "Gold".into(),
            package_price: 1000.0,
            add_ons: vec![],
            discount: Discount::None,
            payments: vec![payment("p1", 3), payment("p2", 9), payment("p3", 5)],
            due_date: None,
        };
        let ids: Vec<String> = payment_history(&billing).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["p2", "p3", "p1"]);
    }
}
