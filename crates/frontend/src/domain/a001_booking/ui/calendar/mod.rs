//! Month view of bookings and closed dates.

use chrono::{Datelike, NaiveDate};
use contracts::domain::a001_booking::calendar::{
    can_disable, disabled_entry, grid_range, CalendarCell, CalendarMonth, DayAvailability,
    DayOccupancy, OccupancyQuery, SlotCounts, WEEKDAY_LABELS,
};
use contracts::domain::a001_booking::{Booking, DisableDateRequest, DisabledDate};
use contracts::system::roles::{Permission, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::actions::{available_actions, BookingAction, BookingActionDialog};
use crate::config::config;
use crate::domain::a001_booking::api;
use crate::shared::components::ConfirmDialog;
use crate::shared::date_utils::{format_date, today};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use crate::system::auth::context::{use_auth, use_permission};

/// "2 approved · 1 pending", empty when the day has nothing
fn cell_summary(cell: &CalendarCell) -> String {
    let mut parts = Vec::new();
    if !cell.approved.is_empty() {
        parts.push(format!("{} approved", cell.approved.len()));
    }
    if !cell.pending.is_empty() {
        parts.push(format!("{} pending", cell.pending.len()));
    }
    parts.join(" · ")
}

fn cell_class(cell: &CalendarCell, selected: Option<NaiveDate>) -> String {
    let mut class = format!("calendar__cell {}", cell.availability.css_modifier());
    if !cell.in_month {
        class.push_str(" calendar__cell--outside");
    }
    if cell.is_today {
        class.push_str(" calendar__cell--today");
    }
    if selected == Some(cell.date) {
        class.push_str(" calendar__cell--selected");
    }
    class
}

/// Where the grid learns how many approved bookings a date holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotSource {
    /// The booking list is unscoped for front office roles
    Bookings,
    /// Everyone else only sees their own bookings and asks for counts
    Occupancy,
}

fn slot_source(role: Option<Role>) -> SlotSource {
    match role {
        Some(r) if r.has(Permission::ApproveBookings) => SlotSource::Bookings,
        _ => SlotSource::Occupancy,
    }
}

fn slot_counts(source: SlotSource, occupancy: Option<&[DayOccupancy]>) -> SlotCounts<'_> {
    match (source, occupancy) {
        (SlotSource::Bookings, _) => SlotCounts::FromBookings,
        (SlotSource::Occupancy, Some(days)) => SlotCounts::Reported(days),
        (SlotSource::Occupancy, None) => SlotCounts::Unknown,
    }
}

#[derive(Clone, Debug, PartialEq)]
enum DateCommand {
    Close(NaiveDate),
    Reopen(DisabledDate),
}

#[component]
pub fn BookingCalendar() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let can_manage = use_permission(Permission::ApproveBookings);
    let can_close_dates = use_permission(Permission::ManageCalendar);
    let max_per_day = config().max_bookings_per_day;
    let today = today();
    let source = slot_source(auth_state.with_untracked(|s| s.role()));

    let shown = RwSignal::new((today.year(), today.month()));
    let bookings: RwSignal<Vec<Booking>> = RwSignal::new(Vec::new());
    let occupancy: RwSignal<Option<Vec<DayOccupancy>>> = RwSignal::new(None);
    let disabled: RwSignal<Vec<DisabledDate>> = RwSignal::new(Vec::new());
    let selected: RwSignal<Option<NaiveDate>> = RwSignal::new(None);
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let pending_action: RwSignal<Option<(BookingAction, Booking)>> = RwSignal::new(None);
    let date_command: RwSignal<Option<DateCommand>> = RwSignal::new(None);
    let (command_busy, set_command_busy) = signal(false);
    let (command_error, set_command_error) = signal::<Option<String>>(None);

    let load_data = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::fetch_bookings().await {
                Ok(data) => bookings.set(data),
                Err(e) => set_error.set(Some(format!("Failed to load bookings: {}", e))),
            }
            match api::fetch_disabled_dates().await {
                Ok(data) => disabled.set(data),
                Err(e) => set_error.set(Some(format!("Failed to load closed dates: {}", e))),
            }
            set_loading.set(false);
        });
    };

    let load_occupancy = move || {
        if source != SlotSource::Occupancy {
            return;
        }
        let (year, month) = shown.get_untracked();
        let Some((from, to)) = grid_range(year, month) else {
            return;
        };
        occupancy.set(None);
        spawn_local(async move {
            match api::fetch_occupancy(&OccupancyQuery { from, to }).await {
                Ok(data) => {
                    // a newer month may have been requested meanwhile
                    if shown.get_untracked() == (year, month) {
                        occupancy.set(Some(data));
                    }
                }
                Err(e) => set_error.set(Some(format!("Failed to load open dates: {}", e))),
            }
        });
    };

    let refresh = move || {
        load_data();
        load_occupancy();
    };

    Effect::new(move |_| load_data());
    Effect::new(move |_| {
        shown.track();
        load_occupancy();
    });

    let month = Memo::new(move |_| {
        let (year, month) = shown.get();
        bookings.with(|b| {
            disabled.with(|d| {
                occupancy.with(|o| {
                    let counts = slot_counts(source, o.as_deref());
                    CalendarMonth::build_with(year, month, today, b, counts, d, max_per_day)
                })
            })
        })
    });

    let go_prev = move |_| {
        if let Some((y, m)) = month.with_untracked(|g| g.as_ref().map(|g| g.prev())) {
            shown.set((y, m));
        }
    };
    let go_next = move |_| {
        if let Some((y, m)) = month.with_untracked(|g| g.as_ref().map(|g| g.next())) {
            shown.set((y, m));
        }
    };
    let go_today = move |_| {
        shown.set((today.year(), today.month()));
        selected.set(Some(today));
    };

    let selected_cell = move || {
        let date = selected.get()?;
        month.with(|g| g.as_ref().and_then(|g| g.cell(date).cloned()))
    };

    let run_date_command = move |reason: Option<String>| {
        let Some(command) = date_command.get_untracked() else {
            return;
        };
        if let DateCommand::Close(date) = &command {
            let allowed = bookings.with_untracked(|b| {
                disabled.with_untracked(|d| can_disable(*date, today, b, d))
            });
            if let Err(e) = allowed {
                set_command_error.set(Some(e));
                return;
            }
        }
        set_command_busy.set(true);
        set_command_error.set(None);
        spawn_local(async move {
            let result = match &command {
                DateCommand::Close(date) => {
                    api::disable_date(&DisableDateRequest {
                        date: *date,
                        reason,
                    })
                    .await
                }
                DateCommand::Reopen(entry) => api::enable_date(&entry.id).await,
            };
            set_command_busy.set(false);
            match result {
                Ok(()) => {
                    date_command.set(None);
                    refresh();
                }
                Err(e) => set_command_error.set(Some(e)),
            }
        });
    };

    view! {
        <PageFrame page_id="a001_booking_calendar--dashboard" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    {icon("calendar")}
                    <h1 class="page__title">"Calendar"</h1>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Secondary on_click=go_prev>
                        {icon("chevron-left")}
                    </Button>
                    <span class="calendar__title">
                        {move || month.with(|g| g.as_ref().map(|g| g.title()).unwrap_or_default())}
                    </span>
                    <Button appearance=ButtonAppearance::Secondary on_click=go_next>
                        {icon("chevron-right")}
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=go_today>
                        "Today"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| refresh()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                    </Button>
                </div>
            </div>

            <div class="page__content calendar">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="calendar__legend">
                    <span class="calendar__legend-item calendar__cell--available">"Available"</span>
                    <span class="calendar__legend-item calendar__cell--booked">"Fully booked"</span>
                    <span class="calendar__legend-item calendar__cell--disabled">"Closed"</span>
                    <span class="calendar__legend-item calendar__cell--past">"Past"</span>
                    {(source == SlotSource::Occupancy).then(|| view! {
                        <span class="calendar__legend-item calendar__cell--unknown">"Checking"</span>
                    })}
                </div>

                <div class="calendar__layout">
                    <div class="calendar__grid">
                        <div class="calendar__week calendar__week--head">
                            {WEEKDAY_LABELS.iter().map(|d| view! { <div class="calendar__weekday">{*d}</div> }).collect_view()}
                        </div>
                        {move || month.get().map(|g| {
                            g.weeks().map(|week| view! {
                                <div class="calendar__week">
                                    {week.iter().map(|cell| {
                                        let date = cell.date;
                                        let summary = cell_summary(cell);
                                        let cell_for_class = cell.clone();
                                        view! {
                                            <div
                                                class=move || cell_class(&cell_for_class, selected.get())
                                                title=cell.availability.label()
                                                on:click=move |_| selected.set(Some(date))
                                            >
                                                <div class="calendar__day">{cell.day()}</div>
                                                {(!summary.is_empty()).then(|| view! {
                                                    <div class="calendar__summary">{summary}</div>
                                                })}
                                            </div>
                                        }
                                    }).collect_view()}
                                </div>
                            }).collect_view()
                        })}
                    </div>

                    <div class="calendar__day-panel">
                        {move || match selected_cell() {
                            None => view! {
                                <div class="calendar__hint">"Pick a day to see its bookings."</div>
                            }.into_any(),
                            Some(cell) => {
                                let date = cell.date;
                                let closed_entry = disabled.with(|d| disabled_entry(date, d).cloned());
                                let day_bookings: Vec<Booking> = cell.approved.iter().chain(cell.pending.iter()).cloned().collect();
                                let reason = match &cell.availability {
                                    DayAvailability::Disabled { reason } => reason.clone(),
                                    _ => None,
                                };
                                view! {
                                    <h3 class="calendar__day-title">{format_date(date)}</h3>
                                    <div class=format!("calendar__availability {}", cell.availability.css_modifier())>
                                        {cell.availability.label()}
                                        {reason.map(|r| format!(": {}", r))}
                                    </div>

                                    {if day_bookings.is_empty() {
                                        view! { <p class="calendar__hint">"No bookings on this day."</p> }.into_any()
                                    } else {
                                        day_bookings.into_iter().map(|booking| {
                                            let own = auth_state.with_untracked(|s| s.user_id().as_deref() == Some(booking.client_id.as_str()));
                                            let actions = available_actions(&booking, can_manage.get_untracked(), own);
                                            let stored = StoredValue::new(booking.clone());
                                            view! {
                                                <div class="calendar__booking">
                                                    <div class="calendar__booking-head">
                                                        <strong>{booking.code.clone()}</strong>
                                                        <span class=booking.status.badge_class()>{booking.status.label()}</span>
                                                    </div>
                                                    <div>{format!("{} · {}", booking.client_name, booking.event_type)}</div>
                                                    <div class="calendar__booking-meta">
                                                        {booking.venue.clone()}
                                                        {booking.event_time.clone().map(|t| format!(" · {}", t))}
                                                    </div>
                                                    <Flex gap=FlexGap::Small>
                                                        {actions.into_iter().map(|action| view! {
                                                            <Button
                                                                appearance=ButtonAppearance::Secondary
                                                                size=ButtonSize::Small
                                                                on_click=move |_| pending_action.set(Some((action, stored.get_value())))
                                                            >
                                                                {action.label()}
                                                            </Button>
                                                        }).collect_view()}
                                                    </Flex>
                                                </div>
                                            }
                                        }).collect_view().into_any()
                                    }}

                                    {(can_close_dates.get() && date >= today).then(|| match closed_entry {
                                        Some(entry) => view! {
                                            <Button
                                                appearance=ButtonAppearance::Secondary
                                                on_click=move |_| {
                                                    set_command_error.set(None);
                                                    date_command.set(Some(DateCommand::Reopen(entry.clone())));
                                                }
                                            >
                                                {icon("check")}
                                                " Reopen date"
                                            </Button>
                                        }.into_any(),
                                        None => view! {
                                            <Button
                                                appearance=ButtonAppearance::Secondary
                                                on_click=move |_| {
                                                    set_command_error.set(None);
                                                    date_command.set(Some(DateCommand::Close(date)));
                                                }
                                            >
                                                {icon("lock")}
                                                " Close date"
                                            </Button>
                                        }.into_any(),
                                    })}
                                }.into_any()
                            }
                        }}
                    </div>
                </div>

                {move || pending_action.get().map(|(action, booking)| view! {
                    <BookingActionDialog
                        action=action
                        booking=booking
                        bookings=Signal::derive(move || bookings.get())
                        disabled=Signal::derive(move || disabled.get())
                        on_done=Callback::new(move |_| {
                            pending_action.set(None);
                            refresh();
                        })
                        on_cancel=Callback::new(move |_| pending_action.set(None))
                    />
                })}

                {move || date_command.get().map(|command| {
                    let (title, message, label, reason_label) = match &command {
                        DateCommand::Close(date) => (
                            "Close date",
                            format!("No new bookings will be accepted for {}.", format_date(*date)),
                            "Close date",
                            Some("Reason (optional)".to_string()),
                        ),
                        DateCommand::Reopen(entry) => (
                            "Reopen date",
                            format!("Accept bookings for {} again?", format_date(entry.date)),
                            "Reopen",
                            None,
                        ),
                    };
                    view! {
                        <ConfirmDialog
                            title=title
                            message=message
                            confirm_label=label
                            reason_label=reason_label
                            busy=command_busy
                            error=command_error
                            on_confirm=Callback::new(run_date_command)
                            on_cancel=Callback::new(move |_| date_command.set(None))
                        />
                    }
                })}
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use contracts::domain::a001_booking::BookingStatus;

    fn booking(id: &str, status: BookingStatus) -> Booking {
        Booking {
            id: id.into(),
            code: id.into(),
            client_id: "c".into(),
            client_name: "C".into(),
            client_email: None,
            client_phone: None,
            event_type: "Wedding".into(),
            event_date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            event_time: None,
            venue: "V".into(),
            package_id: "p".into(),
            package_name: "P".into(),
            add_on_ids: vec![],
            guest_count: None,
            notes: None,
            status,
            status_reason: None,
            created_at: Utc::now(),
        }
    }

    fn cell(approved: Vec<Booking>, pending: Vec<Booking>) -> CalendarCell {
        CalendarCell {
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            in_month: true,
            is_today: false,
            availability: DayAvailability::Available,
            approved,
            pending,
        }
    }

    #[test]
    fn summarises_cell_bookings() {
        assert_eq!(cell_summary(&cell(vec![], vec![])), "");
        assert_eq!(
            cell_summary(&cell(
                vec![booking("a", BookingStatus::Approved)],
                vec![booking("b", BookingStatus::Pending), booking("c", BookingStatus::Pending)]
            )),
            "1 approved · 2 pending"
        );
    }

    #[test]
    fn only_front_office_counts_slots_from_its_booking_list() {
        assert_eq!(slot_source(Some(Role::Owner)), SlotSource::Bookings);
        assert_eq!(slot_source(Some(Role::Secretary)), SlotSource::Bookings);
        assert_eq!(slot_source(Some(Role::Client)), SlotSource::Occupancy);
        assert_eq!(slot_source(Some(Role::Photographer)), SlotSource::Occupancy);
        assert_eq!(slot_source(None), SlotSource::Occupancy);
    }

    #[test]
    fn client_grid_waits_for_reported_counts() {
        let reported = vec![DayOccupancy {
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            approved: 1,
        }];
        assert_eq!(slot_counts(SlotSource::Bookings, None), SlotCounts::FromBookings);
        assert_eq!(slot_counts(SlotSource::Occupancy, None), SlotCounts::Unknown);
        assert_eq!(
            slot_counts(SlotSource::Occupancy, Some(reported.as_slice())),
            SlotCounts::Reported(&reported)
        );

        // another client's approved booking closes the day for this one
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let own = vec![booking("mine", BookingStatus::Pending)];
        let month = CalendarMonth::build_with(
            2026,
            10,
            today,
            &own,
            slot_counts(SlotSource::Occupancy, Some(reported.as_slice())),
            &[],
            1,
        )
        .unwrap();
        let cell = month.cell(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()).unwrap();
        assert_eq!(cell.availability, DayAvailability::FullyBooked);
        assert_eq!(cell.pending.len(), 1);
    }

    #[test]
    fn cell_classes() {
        let mut c = cell(vec![], vec![]);
        c.in_month = false;
        c.is_today = true;
        let class = cell_class(&c, Some(c.date));
        assert!(class.starts_with("calendar__cell calendar__cell--available"));
        assert!(class.contains("calendar__cell--outside"));
        assert!(class.contains("calendar__cell--today"));
        assert!(class.ends_with("calendar__cell--selected"));
    }
}
