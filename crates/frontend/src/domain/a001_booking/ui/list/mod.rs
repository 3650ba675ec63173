mod state;

use contracts::domain::a001_booking::{Booking, BookingStatus, DisabledDate};
use contracts::domain::common::AggregateRoot;
use contracts::system::roles::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::actions::{available_actions, BookingAction, BookingActionDialog};
use crate::domain::a001_booking::api;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::shared::components::PaginationControls;
use crate::shared::date_utils::format_date;
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    cmp_text, get_sort_class, get_sort_indicator, page_count, page_slice, sort_list, Sortable,
};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::context::{use_auth, use_permission};
use state::create_state;

impl Sortable for Booking {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "code" => self.code.cmp(&other.code),
            "client_name" => cmp_text(&self.client_name, &other.client_name),
            "event_type" => cmp_text(&self.event_type, &other.event_type),
            "venue" => cmp_text(&self.venue, &other.venue),
            "package_name" => cmp_text(&self.package_name, &other.package_name),
            "status" => self.status.label().cmp(other.status.label()),
            "created_at" => self.created_at.cmp(&other.created_at),
            _ => self
                .event_date
                .cmp(&other.event_date)
                .then_with(|| self.code.cmp(&other.code)),
        }
    }
}

/// Rows left after the status and text filters. `client_id` limits the
/// list to one client's bookings.
fn filter_bookings(
    all: &[Booking],
    query: &str,
    status: Option<BookingStatus>,
    client_id: Option<&str>,
) -> Vec<Booking> {
    all.iter()
        .filter(|b| client_id.map(|id| b.client_id == id).unwrap_or(true))
        .filter(|b| status.map(|s| b.status == s).unwrap_or(true))
        .filter(|b| b.matches_filter(query))
        .cloned()
        .collect()
}

#[component]
pub fn BookingList() -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (auth_state, _) = use_auth();
    let can_manage = use_permission(Permission::ApproveBookings);
    let can_create = use_permission(Permission::CreateBooking);

    let state = create_state();
    let all_items: RwSignal<Vec<Booking>> = RwSignal::new(Vec::new());
    let disabled_dates: RwSignal<Vec<DisabledDate>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let pending_action: RwSignal<Option<(BookingAction, Booking)>> = RwSignal::new(None);

    // staff see every booking; a client only their own
    let own_scope = move || {
        auth_state.with_untracked(|s| match s.role() {
            Some(role) if role.is_staff() => None,
            _ => s.user_id(),
        })
    };

    let refresh_view = move || {
        let (query, status) = state.with_untracked(|s| {
            (
                s.search_query.clone(),
                BookingStatus::from_code(&s.status_filter),
            )
        });
        let scope = own_scope();
        let mut data =
            all_items.with_untracked(|all| filter_bookings(all, &query, status, scope.as_deref()));
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
        let with_calendar = can_manage.get_untracked();
        spawn_local(async move {
            match api::fetch_bookings().await {
                Ok(data) => {
                    log::debug!("loaded {} bookings", data.len());
                    all_items.set(data);
                    state.update(|s| s.is_loaded = true);
                    refresh_view();
                }
                Err(e) => set_error.set(Some(format!("Failed to load bookings: {}", e))),
            }
            if with_calendar {
                match api::fetch_disabled_dates().await {
                    Ok(dates) => disabled_dates.set(dates),
                    Err(e) => log::warn!("closed dates not loaded: {}", e),
                }
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

    let apply_search = move || {
        state.update(|s| {
            s.search_query = search_signal.get_untracked();
            s.status_filter = status_signal.get_untracked();
            s.page = 0;
        });
        refresh_view();
    };

    let reset_search = move || {
        search_signal.set(String::new());
        status_signal.set(String::new());
        state.update(|s| {
            s.search_query.clear();
            s.status_filter.clear();
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

    let go_to_page = move |page: usize| {
        state.update(|s| s.page = page);
        refresh_view();
    };

    let change_page_size = move |size: usize| {
        state.update(|s| {
            s.page_size = size;
            s.page = 0;
        });
        refresh_view();
    };

    let open_details = move |booking: &Booking| {
        tabs_store.open_tab(
            &Booking::detail_tab_key(&booking.id),
            &detail_tab_label(Booking::element_name(), &booking.code),
        );
    };

    let open_new = move |_| {
        tabs_store.open_tab(&Booking::new_tab_key(), "New booking");
    };

    let status_counts = move || {
        all_items.with(|all| {
            BookingStatus::all()
                .into_iter()
                .map(|s| (s, all.iter().filter(|b| b.status == s).count()))
                .filter(|(_, n)| *n > 0)
                .collect::<Vec<_>>()
        })
    };

    view! {
        <PageFrame page_id="a001_booking--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    {icon("file-text")}
                    <h1 class="page__title">"Bookings"</h1>
                    <Badge>{move || state.get().total_count.to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Show when=move || can_create.get()>
                        <Button appearance=ButtonAppearance::Primary on_click=open_new>
                            {icon("plus")}
                            " New booking"
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
                                on_page_change=Callback::new(go_to_page)
                                on_page_size_change=Callback::new(change_page_size)
                            />
                        </div>
                        <div class="filter-panel-header__right">
                            {move || status_counts().into_iter().map(|(s, n)| view! {
                                <span class=s.badge_class()>{format!("{} {}", s.label(), n)}</span>
                            }).collect_view()}
                        </div>
                    </div>

                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <div style="flex: 1; max-width: 320px;">
                                <Input value=search_signal placeholder="Code, client, venue, package..." />
                            </div>
                            <div style="width: 180px;">
                                <Select value=status_signal>
                                    <option value="">"All statuses"</option>
                                    {BookingStatus::all()
                                        .into_iter()
                                        .map(|s| view! { <option value=s.code()>{s.label()}</option> })
                                        .collect_view()}
                                </Select>
                            </div>
                            <Button
                                appearance=ButtonAppearance::Primary
                                on_click=move |_| apply_search()
                                disabled=Signal::derive(move || loading.get())
                            >
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
                                <TableHeaderCell resizable=false min_width=110.0>{sort_header("Code", "code")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=120.0>{sort_header("Event date", "event_date")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=160.0>{sort_header("Client", "client_name")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>{sort_header("Event", "event_type")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=160.0>{sort_header("Venue", "venue")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=140.0>{sort_header("Package", "package_name")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>{sort_header("Status", "status")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=200.0></TableHeaderCell>
                            </TableRow>
                        </TableHeader>

                        <TableBody>
                            <For
                                each=move || state.get().items
                                key=|b| (b.id.clone(), b.status, b.event_date)
                                children=move |booking| {
                                    let own = auth_state.with_untracked(|s| s.user_id().as_deref() == Some(booking.client_id.as_str()));
                                    let actions = available_actions(&booking, can_manage.get_untracked(), own);
                                    let for_open = booking.clone();
                                    let for_actions = StoredValue::new(booking.clone());
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <a
                                                        href="#"
                                                        class="table__link"
                                                        on:click=move |ev| {
                                                            ev.prevent_default();
                                                            open_details(&for_open);
                                                        }
                                                    >
                                                        {booking.code.clone()}
                                                    </a>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {format_date(booking.event_date)}
                                                    {booking.event_time.clone().map(|t| format!(" {}", t))}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{booking.client_name.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{booking.event_type.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{booking.venue.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{booking.package_name.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class=booking.status.badge_class() title=booking.status_reason.clone().unwrap_or_default()>
                                                        {booking.status.label()}
                                                    </span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <Flex gap=FlexGap::Small>
                                                    {actions.into_iter().map(|action| view! {
                                                        <Button
                                                            appearance=ButtonAppearance::Subtle
                                                            size=ButtonSize::Small
                                                            on_click=move |_| pending_action.set(Some((action, for_actions.get_value())))
                                                            attr:title=action.label()
                                                        >
                                                            {icon(action.icon())}
                                                        </Button>
                                                    }).collect_view()}
                                                </Flex>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>

                {move || pending_action.get().map(|(action, booking)| view! {
                    <BookingActionDialog
                        action=action
                        booking=booking
                        bookings=Signal::derive(move || all_items.get())
                        disabled=Signal::derive(move || disabled_dates.get())
                        on_done=Callback::new(move |_| {
                            pending_action.set(None);
                            load_data();
                        })
                        on_cancel=Callback::new(move |_| pending_action.set(None))
                    />
                })}
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn booking(id: &str, client: &str, day: u32, status: BookingStatus) -> Booking {
        Booking {
            id: id.into(),
            code: format!("BK-{}", id),
            client_id: client.into(),
            client_name: format!("Client {}", client),
            client_email: None,
            client_phone: None,
            event_type: "Debut".into(),
            event_date: NaiveDate::from_ymd_opt(2026, 12, day).unwrap(),
            event_time: None,
            venue: "Manila Hotel".into(),
            package_id: "p1".into(),
            package_name: "Silver".into(),
            add_on_ids: vec![],
            guest_count: None,
            notes: None,
            status,
            status_reason: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn filters_by_client_status_and_text() {
        let all = vec![
            booking("1", "c1", 5, BookingStatus::Pending),
            booking("2", "c2", 6, BookingStatus::Approved),
            booking("3", "c1", 7, BookingStatus::Approved),
        ];
        assert_eq!(filter_bookings(&all, "", None, None).len(), 3);
        assert_eq!(filter_bookings(&all, "", None, Some("c1")).len(), 2);
        assert_eq!(
            filter_bookings(&all, "", Some(BookingStatus::Approved), Some("c1"))[0].id,
            "3"
        );
        assert_eq!(filter_bookings(&all, "bk-2", None, None).len(), 1);
        assert!(filter_bookings(&all, "cebu", None, None).is_empty());
    }

    #[test]
    fn default_sort_is_by_event_date() {
        let mut rows = vec![
            booking("2", "c1", 9, BookingStatus::Pending),
            booking("1", "c1", 3, BookingStatus::Pending),
        ];
        sort_list(&mut rows, "event_date", true);
        assert_eq!(rows[0].id, "1");
        sort_list(&mut rows, "event_date", false);
        assert_eq!(rows[0].id, "2");
    }
}
