use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d400_reports::{ReportPeriod, ReportSummary, RevenueRow};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::dashboards::d400_reports::api::{self, ReportSources};
use crate::shared::components::{DateInput, StatCard, StatTone, TableTotalsRow};
use crate::shared::date_utils::{format_date, today};
use crate::shared::export::{export_to_excel, ExcelExportable};
use crate::shared::icons::icon;
use crate::shared::number_format::{format_money, format_number_int, format_rating};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;

impl ExcelExportable for RevenueRow {
    fn headers() -> Vec<&'static str> {
        vec!["Month", "Payments", "Collected"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.month.clone(),
            self.payments.to_string(),
            format!("{:.2}", self.collected),
        ]
    }
}

/// January 1st up to today
fn year_to_date(today: NaiveDate) -> ReportPeriod {
    ReportPeriod {
        from: today.with_ordinal(1).unwrap_or(today),
        to: today,
    }
}

fn period_from(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<ReportPeriod, String> {
    let (Some(from), Some(to)) = (from, to) else {
        return Err("Pick both dates of the period".to_string());
    };
    let period = ReportPeriod { from, to };
    period.validate()?;
    Ok(period)
}

#[component]
pub fn ReportsDashboard() -> impl IntoView {
    let today = today();
    let initial = ReportPeriod::current_month(today);
    let from = RwSignal::new(Some(initial.from));
    let to = RwSignal::new(Some(initial.to));

    let sources = RwSignal::new(None::<ReportSources>);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    let load_data = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::fetch_sources().await {
                Ok(data) => sources.set(Some(data)),
                Err(e) => set_error.set(Some(format!("Failed to load report data: {}", e))),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        if sources.with_untracked(|s| s.is_none()) {
            load_data();
        }
    });

    let period = Memo::new(move |_| period_from(from.get(), to.get()));
    let summary = Memo::new(move |_| {
        let period = period.get().ok()?;
        sources.with(|s| {
            s.as_ref().map(|s| {
                ReportSummary::compute(period, &s.bookings, &s.billings, &s.workloads, &s.feedback)
            })
        })
    });

    let set_period = move |p: ReportPeriod| {
        from.set(Some(p.from));
        to.set(Some(p.to));
    };

    let export = move |_| {
        let Some(s) = summary.get_untracked() else {
            return;
        };
        let filename = format!(
            "revenue_{}_{}.csv",
            s.period.from.format("%Y%m%d"),
            s.period.to.format("%Y%m%d")
        );
        if let Err(e) = export_to_excel(&s.revenue_by_month, &filename) {
            set_error.set(Some(e));
        }
    };

    let figure = move |f: fn(&ReportSummary) -> String| {
        Signal::derive(move || summary.with(|s| s.as_ref().map(f).unwrap_or_else(|| "-".to_string())))
    };

    view! {
        <PageFrame page_id="d400_reports--dashboard" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    {icon("bar-chart")}
                    <h1 class="page__title">"Reports"</h1>
                    <span class="page__subtitle">
                        {move || period.get().ok().map(|p| format!("{} - {}", format_date(p.from), format_date(p.to)))}
                    </span>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Secondary on_click=export>
                        {icon("download")}
                        " Export revenue"
                    </Button>
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
                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <div class="form__group">
                                <Label>"From"</Label>
                                <DateInput
                                    value=Signal::derive(move || from.get())
                                    on_change=Callback::new(move |d| from.set(d))
                                />
                            </div>
                            <div class="form__group">
                                <Label>"To"</Label>
                                <DateInput
                                    value=Signal::derive(move || to.get())
                                    on_change=Callback::new(move |d| to.set(d))
                                />
                            </div>
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| set_period(ReportPeriod::current_month(today))
                            >
                                "This month"
                            </Button>
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| set_period(year_to_date(today))
                            >
                                "Year to date"
                            </Button>
                        </Flex>
                    </div>
                </div>

                {move || period.get().err().map(|e| view! { <div class="alert alert--warning">{e}</div> })}

                <div class="dashboard__cards">
                    <StatCard
                        label="Bookings"
                        icon_name="calendar"
                        value=figure(|s| format_number_int(s.bookings_total as f64))
                    />
                    <StatCard
                        label="Revenue collected"
                        icon_name="credit-card"
                        value=figure(|s| format_money(s.revenue_collected))
                        tone=StatTone::Good
                    />
                    <StatCard
                        label="Outstanding balance"
                        icon_name="alert"
                        value=figure(|s| format_money(s.outstanding_balance))
                        tone=Signal::derive(move || {
                            summary.with(|s| match s {
                                Some(s) if s.outstanding_balance > 0.0 => StatTone::Warning,
                                _ => StatTone::Neutral,
                            })
                        })
                    />
                    <StatCard
                        label="Average rating"
                        icon_name="star"
                        value=figure(|s| format_rating(s.average_rating))
                        subtitle=Signal::derive(move || {
                            summary.with(|s| s.as_ref().map(|s| format!("{} posted reviews", s.posted_reviews)))
                        })
                    />
                    <StatCard
                        label="Pending deliverables"
                        icon_name="camera"
                        value=figure(|s| s.pending_deliverables.to_string())
                    />
                </div>

                {move || summary.get().map(|s| view! { <SummaryTables summary=s /> })}
            </div>
        </PageFrame>
    }
}

#[component]
fn SummaryTables(summary: ReportSummary) -> impl IntoView {
    let ReportSummary {
        bookings_by_status,
        workloads_by_status,
        revenue_by_month,
        revenue_collected,
        top_packages,
        ..
    } = summary;
    let payments: usize = revenue_by_month.iter().map(|r| r.payments).sum();
    let no_packages = top_packages.is_empty();

    view! {
        <div class="dashboard__grid">
            <div class="details__section">
                <h3>"Bookings by status"</h3>
                <Table>
                    <TableBody>
                        {bookings_by_status.into_iter().map(|(status, count)| view! {
                            <TableRow>
                                <TableCell><span class=status.badge_class()>{status.label()}</span></TableCell>
                                <TableCell class="table__cell--right">{count.to_string()}</TableCell>
                            </TableRow>
                        }).collect_view()}
                    </TableBody>
                </Table>
            </div>

            <div class="details__section">
                <h3>"Workload by status"</h3>
                <Table>
                    <TableBody>
                        {workloads_by_status.into_iter().map(|(status, count)| view! {
                            <TableRow>
                                <TableCell><span class=status.badge_class()>{status.label()}</span></TableCell>
                                <TableCell class="table__cell--right">{count.to_string()}</TableCell>
                            </TableRow>
                        }).collect_view()}
                    </TableBody>
                </Table>
            </div>

            <div class="details__section">
                <h3>"Revenue by month"</h3>
                <Table>
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell resizable=false min_width=120.0>"Month"</TableHeaderCell>
                            <TableHeaderCell resizable=false min_width=90.0>"Payments"</TableHeaderCell>
                            <TableHeaderCell resizable=false min_width=120.0>"Collected"</TableHeaderCell>
                        </TableRow>
                        <TableTotalsRow>
                            <td>"Total"</td>
                            <td class="table__cell--right">{payments.to_string()}</td>
                            <td class="table__cell--right">{format_money(revenue_collected)}</td>
                        </TableTotalsRow>
                    </TableHeader>
                    <TableBody>
                        {revenue_by_month.into_iter().map(|r| view! {
                            <TableRow>
                                <TableCell>{r.label}</TableCell>
                                <TableCell class="table__cell--right">{r.payments.to_string()}</TableCell>
                                <TableCell class="table__cell--right">{format_money(r.collected)}</TableCell>
                            </TableRow>
                        }).collect_view()}
                    </TableBody>
                </Table>
            </div>

            <div class="details__section">
                <h3>"Top packages"</h3>
                {if no_packages {
                    view! { <div class="details__hint">"No bookings in this period."</div> }.into_any()
                } else {
                    view! {
                        <Table>
                            <TableBody>
                                {top_packages.into_iter().enumerate().map(|(i, p)| view! {
                                    <TableRow>
                                        <TableCell>{format!("{}. {}", i + 1, p.package_name)}</TableCell>
                                        <TableCell class="table__cell--right">{p.bookings.to_string()}</TableCell>
                                    </TableRow>
                                }).collect_view()}
                            </TableBody>
                        </Table>
                    }.into_any()
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn year_to_date_starts_in_january() {
        let p = year_to_date(date(2026, 10, 16));
        assert_eq!(p.from, date(2026, 1, 1));
        assert_eq!(p.to, date(2026, 10, 16));
    }

    #[test]
    fn period_needs_both_dates_in_order() {
        assert!(period_from(None, Some(date(2026, 1, 1))).is_err());
        assert!(period_from(Some(date(2026, 2, 1)), Some(date(2026, 1, 1))).is_err());
        assert_eq!(
            period_from(Some(date(2026, 1, 1)), Some(date(2026, 1, 31))),
            Ok(ReportPeriod {
                from: date(2026, 1, 1),
                to: date(2026, 1, 31)
            })
        );
    }

    #[test]
    fn revenue_csv_row() {
        let row = RevenueRow {
            month: "2026-09".into(),
            label: "Sep 2026".into(),
            payments: 3,
            collected: 1250.5,
        };
        assert_eq!(row.to_csv_row(), vec!["2026-09", "3", "1250.50"]);
    }
}
