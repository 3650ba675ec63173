mod state;

use chrono::NaiveDate;
use contracts::domain::a005_workload::{Workload, WorkloadStatus};
use contracts::domain::common::AggregateRoot;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a005_workload::api;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::shared::components::PaginationControls;
use crate::shared::date_utils::{format_date, format_date_opt, today};
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    cmp_text, get_sort_class, get_sort_indicator, page_count, page_slice, sort_list, Sortable,
};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::context::use_auth;
use state::create_state;

impl Sortable for Workload {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "booking_code" => self.booking_code.cmp(&other.booking_code),
            "client_name" => cmp_text(&self.client_name, &other.client_name),
            "photographer" => cmp_text(
                self.photographer_name.as_deref().unwrap_or(""),
                other.photographer_name.as_deref().unwrap_or(""),
            ),
            "editor" => cmp_text(
                self.editor_name.as_deref().unwrap_or(""),
                other.editor_name.as_deref().unwrap_or(""),
            ),
            "status" => self.status.cmp(&other.status),
            "deadline" => self.deadline.cmp(&other.deadline),
            _ => self
                .event_date
                .cmp(&other.event_date)
                .then_with(|| self.booking_code.cmp(&other.booking_code)),
        }
    }
}

/// Rows for the list. `assignee` limits the rows to one staff member's work.
fn filter_workloads(
    all: &[Workload],
    query: &str,
    status: Option<WorkloadStatus>,
    hide_completed: bool,
    assignee: Option<&str>,
) -> Vec<Workload> {
    all.iter()
        .filter(|w| assignee.map(|id| w.is_assigned_to(id)).unwrap_or(true))
        .filter(|w| status.map(|s| w.status == s).unwrap_or(true))
        .filter(|w| !hide_completed || status.is_some() || w.status != WorkloadStatus::Completed)
        .filter(|w| w.matches_filter(query))
        .cloned()
        .collect()
}

#[component]
pub fn WorkloadList() -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (auth_state, _) = use_auth();
    let today = today();

    let state = create_state();
    let all_items: RwSignal<Vec<Workload>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let sees_all = auth_state.with_untracked(|s| s.role().map(|r| r.is_admin()).unwrap_or(false));

    let refresh_view = move || {
        let (query, status, hide_completed) = state.with_untracked(|s| {
            (
                s.search_query.clone(),
                WorkloadStatus::from_code(&s.status_filter),
                s.hide_completed,
            )
        });
        let assignee = if sees_all {
            None
        } else {
            auth_state.with_untracked(|s| s.user_id())
        };
        let mut data = all_items.with_untracked(|all| {
            filter_workloads(all, &query, status, hide_completed, assignee.as_deref())
        });
        state.update(|s| {
            sort_list(&mut data, &s.sort_field, s.sort_ascending);
            s.total_count = data.len();
            s.total_pages = page_count(data.len(), s.page_size);
            let (items, page) = page_slice(&data, s.page, s.page_size);
            s.items = items;
            s.page = page;
        });
    };

    let load_data = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::fetch_workloads().await {
                Ok(data) => {
                    log::debug!("loaded {} workloads", data.len());
                    all_items.set(data);
                    state.update(|s| s.is_loaded = true);
                    refresh_view();
                }
                Err(e) => set_error.set(Some(format!("Failed to load workloads: {}", e))),
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
    let hide_completed_signal = RwSignal::new(true);

    let apply_search = move || {
        state.update(|s| {
            s.search_query = search_signal.get_untracked();
            s.status_filter = status_signal.get_untracked();
            s.hide_completed = hide_completed_signal.get_untracked();
            s.page = 0;
        });
        refresh_view();
    };

    let reset_search = move || {
        search_signal.set(String::new());
        status_signal.set(String::new());
        hide_completed_signal.set(true);
        state.update(|s| {
            s.search_query.clear();
            s.status_filter.clear();
            s.hide_completed = true;
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

    view! {
        <PageFrame page_id="a005_workload--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    {icon("camera")}
                    <h1 class="page__title">{if sees_all { "Workload" } else { "My assignments" }}</h1>
                    <Badge>{move || state.get().total_count.to_string()}</Badge>
                </div>
                <div class="page__header-right">
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
                                <Input value=search_signal placeholder="Booking, client, staff..." />
                            </div>
                            <div style="width: 180px;">
                                <Select value=status_signal>
                                    <option value="">"All statuses"</option>
                                    {WorkloadStatus::all()
                                        .into_iter()
                                        .map(|s| view! { <option value=s.code()>{s.label()}</option> })
                                        .collect_view()}
                                </Select>
                            </div>
                            <Checkbox checked=hide_completed_signal label="Hide completed" />
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
                                <TableHeaderCell resizable=false min_width=140.0>{sort_header("Photographer", "photographer")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=140.0>{sort_header("Editor", "editor")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>{sort_header("Deadline", "deadline")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=120.0>{sort_header("Status", "status")}</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || state.get().items
                                key=|w| (w.id.clone(), w.status, w.updated_at)
                                children=move |workload| {
                                    let overdue = workload.is_overdue(today);
                                    let (id, code) = (workload.id.clone(), workload.booking_code.clone());
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
                                                                &Workload::detail_tab_key(&id),
                                                                &detail_tab_label(Workload::element_name(), &code),
                                                            );
                                                        }
                                                    >
                                                        {workload.booking_code.clone()}
                                                    </a>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{workload.client_name.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_date(workload.event_date)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    {workload.photographer_name.clone().unwrap_or_else(|| "-".to_string())}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    {workload.editor_name.clone().unwrap_or_else(|| "-".to_string())}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_date_opt(workload.deadline)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class=workload.status.badge_class()>{workload.status.label()}</span>
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
    use chrono::Utc;

    fn workload(id: &str, photographer: Option<&str>, status: WorkloadStatus) -> Workload {
        Workload {
            id: id.into(),
            booking_id: id.into(),
            booking_code: format!("BK-{}", id),
            client_name: "Ana".into(),
            event_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            event_type: "Wedding".into(),
            photographer_id: photographer.map(String::from),
            photographer_name: photographer.map(|p| format!("Photographer {}", p)),
            editor_id: None,
            editor_name: None,
            status,
            deliverable_link: None,
            deadline: None,
            updated_at: Utc::now(),
        }
    }

    fn ids(rows: Vec<Workload>) -> Vec<String> {
        rows.into_iter().map(|w| w.id).collect()
    }

    #[test]
    fn staff_see_only_their_assignments() {
        let all = vec![
            workload("1", Some("u1"), WorkloadStatus::Scheduled),
            workload("2", Some("u2"), WorkloadStatus::Scheduled),
            workload("3", None, WorkloadStatus::Unassigned),
        ];
        assert_eq!(ids(filter_workloads(&all, "", None, true, Some("u1"))), vec!["1"]);
        assert_eq!(filter_workloads(&all, "", None, true, None).len(), 3);
    }

    #[test]
    fn completed_rows_hidden_unless_asked_for() {
        let all = vec![
            workload("1", Some("u1"), WorkloadStatus::Completed),
            workload("2", Some("u1"), WorkloadStatus::Editing),
        ];
        assert_eq!(ids(filter_workloads(&all, "", None, true, None)), vec!["2"]);
        assert_eq!(filter_workloads(&all, "", None, false, None).len(), 2);
        assert_eq!(
            ids(filter_workloads(&all, "", Some(WorkloadStatus::Completed), true, None)),
            vec!["1"]
        );
        assert_eq!(ids(filter_workloads(&all, "photographer u1", None, false, None)).len(), 2);
    }
}
