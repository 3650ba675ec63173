mod state;

use chrono::NaiveDate;
use contracts::domain::a004_billing::{Billing, BillingStatus, BillingTotals};
use contracts::domain::common::AggregateRoot;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a004_billing::api;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::shared::components::{PaginationControls, TableTotalsRow};
use crate::shared::date_utils::{format_date, today};
use crate::shared::export::{export_to_excel, ExcelExportable};
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    cmp_amount, cmp_text, get_sort_class, get_sort_indicator, page_count, page_slice, sort_list,
    Sortable,
};
use crate::shared::number_format::format_money;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::context::use_auth;
use state::create_state;

impl Sortable for Billing {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "booking_code" => self.booking_code.cmp(&other.booking_code),
            "client_name" => cmp_text(&self.client_name, &other.client_name),
            "event_date" => self.event_date.cmp(&other.event_date),
            "total" => cmp_amount(self.total(), other.total()),
            "paid" => cmp_amount(self.amount_paid(), other.amount_paid()),
            "balance" => cmp_amount(self.balance(), other.balance()),
            "status" => self.status().label().cmp(other.status().label()),
            _ => self
                .effective_due_date()
                .cmp(&other.effective_due_date())
                .then_with(|| self.booking_code.cmp(&other.booking_code)),
        }
    }
}

impl ExcelExportable for Billing {
    fn headers() -> Vec<&'static str> {
        vec![
            "Booking", "Client", "Event date", "Due date", "Package", "Subtotal", "Discount",
            "Total", "Paid", "Balance", "Status",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.booking_code.clone(),
            self.client_name.clone(),
            self.event_date.format("%Y-%m-%d").to_string(),
            self.effective_due_date().format("%Y-%m-%d").to_string(),
            self.package_name.clone(),
            format!("{:.2}", self.subtotal()),
            format!("{:.2}", self.discount_amount()),
            format!("{:.2}", self.total()),
            format!("{:.2}", self.amount_paid()),
            format!("{:.2}", self.balance()),
            self.status().label().to_string(),
        ]
    }
}

fn filter_billings(
    all: &[Billing],
    query: &str,
    status: Option<BillingStatus>,
    overdue_only: bool,
    client_id: Option<&str>,
    today: NaiveDate,
) -> Vec<Billing> {
    all.iter()
        .filter(|b| client_id.map(|id| b.client_id == id).unwrap_or(true))
        .filter(|b| status.map(|s| b.status() == s).unwrap_or(true))
        .filter(|b| !overdue_only || b.is_overdue(today))
        .filter(|b| b.matches_filter(query))
        .cloned()
        .collect()
}

#[component]
pub fn BillingList() -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (auth_state, _) = use_auth();
    let today = today();

    let state = create_state();
    let all_items: RwSignal<Vec<Billing>> = RwSignal::new(Vec::new());
    // totals over every filtered row, not just the visible page
    let totals = RwSignal::new(BillingTotals::default());
    let filtered: RwSignal<Vec<Billing>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let is_staff = auth_state.with_untracked(|s| s.role().map(|r| r.is_staff()).unwrap_or(false));

    let refresh_view = move || {
        let (query, status, overdue_only) = state.with_untracked(|s| {
            (
                s.search_query.clone(),
                BillingStatus::from_code(&s.status_filter),
                s.overdue_only,
            )
        });
        let scope = if is_staff {
            None
        } else {
            auth_state.with_untracked(|s| s.user_id())
        };
        let mut data = all_items.with_untracked(|all| {
            filter_billings(all, &query, status, overdue_only, scope.as_deref(), today)
        });
        totals.set(BillingTotals::of(&data));
        state.update(|s| {
            sort_list(&mut data, &s.sort_field, s.sort_ascending);
            s.total_count = data.len();
            s.total_pages = page_count(data.len(), s.page_size);
            let (items, page) = page_slice(&data, s.page, s.page_size);
            s.items = items;
            s.page = page;
        });
        filtered.set(data);
    };

    let load_data = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::fetch_billings().await {
                Ok(data) => {
                    log::debug!("loaded {} billings", data.len());
                    all_items.set(data);
                    state.update(|s| s.is_loaded = true);
                    refresh_view();
                }
                Err(e) => set_error.set(Some(format!("Failed to load billings: {}", e))),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        if !state.with_untracked(|s| s.is_loaded) {
            load_data();
        }
    });

    let search_signal = RwSignal::new(String::new());
    let status_signal = RwSignal::new(String::new());
    let overdue_signal = RwSignal::new(false);

    let apply_search = move || {
        state.update(|s| {
            s.search_query = search_signal.get_untracked();
            s.status_filter = status_signal.get_untracked();
            s.overdue_only = overdue_signal.get_untracked();
            s.page = 0;
        });
        refresh_view();
    };

    let reset_search = move || {
        search_signal.set(String::new());
        status_signal.set(String::new());
        overdue_signal.set(false);
        state.update(|s| {
            s.search_query.clear();
            s.status_filter.clear();
            s.overdue_only = false;
            s.page = 0;
        });
        refresh_view();
    };

    let toggle_sort = move |field: &'static str| {
        move |_| {
            state.update(|s| {
                if s.sort_field == field {
                    s.sort_ascending = !s.sort_ascending;
                } else {
                    s.sort_field = field.to_string();
                    s.sort_ascending = true;
                }
            });
            refresh_view();
        }
    };

    let sort_header = move |label: &'static str, field: &'static str| {
        view! {
            <div class="table__sortable-header" style="cursor:pointer;" on:click=toggle_sort(field)>
                {label}
                <span class=move || state.with(|s| get_sort_class(&s.sort_field, field))>
                    {move || state.with(|s| get_sort_indicator(&s.sort_field, field, s.sort_ascending))}
                </span>
            </div>
        }
    };

    let export = move |_| {
        let filename = format!("billings_{}.csv", today.format("%Y%m%d"));
        if let Err(e) = filtered.with_untracked(|data| export_to_excel(data, &filename)) {
            set_error.set(Some(e));
        }
    };

    let overdue_count = move || all_items.with(|all| all.iter().filter(|b| b.is_overdue(today)).count());

    view! {
        <PageFrame page_id="a004_billing--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    {icon("credit-card")}
                    <h1 class="page__title">"Billing"</h1>
                    <Badge>{move || state.get().total_count.to_string()}</Badge>
                    <Show when=move || { overdue_count() > 0 }>
                        <span class="badge badge--error">{move || format!("{} overdue", overdue_count())}</span>
                    </Show>
                </div>
                <div class="page__header-right">
                    <Show when=move || is_staff>
                        <Button appearance=ButtonAppearance::Secondary on_click=export>
                            {icon("download")}
                            " Export"
                        </Button>
                    </Show>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_data()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        {move || if loading.get() { " Loading..." } else { " Refresh" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            {icon("filter")}
                            <span class="filter-panel__title">"Filters"</span>
                        </div>
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || state.get().page)
                                total_pages=Signal::derive(move || state.get().total_pages)
                                total_count=Signal::derive(move || state.get().total_count)
                                page_size=Signal::derive(move || state.get().page_size)
                                on_page_change=Callback::new(move |page| {
                                    state.update(|s| s.page = page);
                                    refresh_view();
                                })
                                on_page_size_change=Callback::new(move |size| {
                                    state.update(|s| {
                                        s.page_size = size;
                                        s.page = 0;
                                    });
                                    refresh_view();
                                })
                            />
                        </div>
                    </div>
                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <div style="flex: 1; max-width: 320px;">
                                <Input value=search_signal placeholder="Booking, client, package..." />
                            </div>
                            <div style="width: 180px;">
                                <Select value=status_signal>
                                    <option value="">"All statuses"</option>
                                    {BillingStatus::all()
                                        .into_iter()
                                        .map(|s| view! { <option value=s.code()>{s.label()}</option> })
                                        .collect_view()}
                                </Select>
                            </div>
                            <Checkbox checked=overdue_signal label="Overdue only" />
                            <Button appearance=ButtonAppearance::Primary on_click=move |_| apply_search()>
                                "Find"
                            </Button>
                            <Button appearance=ButtonAppearance::Secondary on_click=move |_| reset_search()>
                                "Reset"
                            </Button>
                        </Flex>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell resizable=false min_width=110.0>{sort_header("Booking", "booking_code")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=160.0>{sort_header("Client", "client_name")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>{sort_header("Event", "event_date")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>{sort_header("Due", "due_date")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>{sort_header("Total", "total")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>{sort_header("Paid", "paid")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>{sort_header("Balance", "balance")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=120.0>{sort_header("Status", "status")}</TableHeaderCell>
                            </TableRow>
                            <TableTotalsRow>
                                <td colspan="4">{move || format!("{} billings", state.get().total_count)}</td>
                                <td class="table__cell--right">{move || format_money(totals.get().total)}</td>
                                <td class="table__cell--right">{move || format_money(totals.get().paid)}</td>
                                <td class="table__cell--right">{move || format_money(totals.get().balance)}</td>
                                <td></td>
                            </TableTotalsRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || state.get().items
                                key=|b| (b.id.clone(), b.payments.len(), b.discount.describe())
                                children=move |billing| {
                                    let overdue = billing.is_overdue(today);
                                    let status = billing.status();
                                    let (id, code) = (billing.id.clone(), billing.booking_code.clone());
                                    let code_label = code.clone();
                                    let client_name = billing.client_name.clone();
                                    let event_date = format_date(billing.event_date);
                                    let due_date = format_date(billing.effective_due_date());
                                    let total = format_money(billing.total());
                                    let paid = format_money(billing.amount_paid());
                                    let balance = format_money(billing.balance());
                                    view! {
                                        <TableRow class:table__row--overdue=overdue>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <a
                                                        href="#"
                                                        class="table__link"
                                                        on:click=move |ev| {
                                                            ev.prevent_default();
                                                            tabs_store.open_tab(
                                                                &Billing::detail_tab_key(&id),
                                                                &detail_tab_label(Billing::element_name(), &code),
                                                            );
                                                        }
                                                    >
                                                        {code_label}
                                                    </a>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{client_name}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{event_date}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {due_date}
                                                    {overdue.then(|| view! { <span class="badge badge--error">" overdue"</span> })}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell class="table__cell--right">
                                                <TableCellLayout>{total}</TableCellLayout>
                                            </TableCell>
                                            <TableCell class="table__cell--right">
                                                <TableCellLayout>{paid}</TableCellLayout>
                                            </TableCell>
                                            <TableCell class="table__cell--right">
                                                <TableCellLayout>{balance}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class=status.badge_class()>{status.label()}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use contracts::domain::a004_billing::{Discount, Payment, PaymentMethod};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn billing(id: &str, client: &str, event: NaiveDate, paid: f64) -> Billing {
        Billing {
            id: id.into(),
            booking_id: id.into(),
            booking_code: format!("BK-{}", id),
            client_id: client.into(),
            client_name: format!("Client {}", client),
            event_date: event,
            package_name: "Gold".into(),
            package_price: 40_000.0,
            add_ons: vec![],
            discount: Discount::None,
            payments: if paid > 0.0 {
                vec![Payment {
                    id: format!("p-{}", id),
                    amount: paid,
                    method: PaymentMethod::Cash,
                    reference: None,
                    paid_at: Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap(),
                    received_by: None,
                }]
            } else {
                vec![]
            },
            due_date: None,
        }
    }

    #[test]
    fn filters_by_status_overdue_and_client() {
        let today = date(10, 16);
        let all = vec![
            billing("1", "c1", date(10, 1), 0.0),
            billing("2", "c1", date(11, 1), 10_000.0),
            billing("3", "c2", date(9, 1), 40_000.0),
        ];
        let ids = |rows: Vec<Billing>| rows.into_iter().map(|b| b.id).collect::<Vec<_>>();

        assert_eq!(ids(filter_billings(&all, "", None, false, None, today)), vec!["1", "2", "3"]);
        assert_eq!(
            ids(filter_billings(&all, "", Some(BillingStatus::PartiallyPaid), false, None, today)),
            vec!["2"]
        );
        // fully paid past events are not overdue
        assert_eq!(ids(filter_billings(&all, "", None, true, None, today)), vec!["1"]);
        assert_eq!(ids(filter_billings(&all, "", None, false, Some("c2"), today)), vec!["3"]);
    }

    #[test]
    fn csv_row_matches_headers() {
        let b = billing("1", "c1", date(10, 1), 10_000.0);
        let row = b.to_csv_row();
        assert_eq!(row.len(), Billing::headers().len());
        assert_eq!(row[7], "40000.00");
        assert_eq!(row[9], "30000.00");
        assert_eq!(row[10], "Partially paid");
    }
}
