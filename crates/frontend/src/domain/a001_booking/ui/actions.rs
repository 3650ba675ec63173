//! Booking workflow actions shared by the list and the calendar day panel.
//!
//! Every action is confirmed in a dialog. Approve and reschedule first check
//! the target date against the bookings and closed dates already loaded, so an
//! obvious conflict is reported without a round trip.

use chrono::NaiveDate;
use contracts::domain::a001_booking::calendar::check_slot;
use contracts::domain::a001_booking::{
    ApproveBookingRequest, Booking, BookingStatus, CancelBookingRequest, DisabledDate,
    RejectBookingRequest, RescheduleBookingRequest,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::config::config;
use crate::domain::a001_booking::api;
use crate::shared::components::{ConfirmDialog, DateInput};
use crate::shared::date_utils::{format_date, today};
use crate::shared::modal::Modal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingAction {
    Approve,
    Reject,
    Reschedule,
    Complete,
    Cancel,
}

impl BookingAction {
    pub fn label(&self) -> &'static str {
        match self {
            BookingAction::Approve => "Approve",
            BookingAction::Reject => "Reject",
            BookingAction::Reschedule => "Reschedule",
            BookingAction::Complete => "Mark completed",
            BookingAction::Cancel => "Cancel",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            BookingAction::Approve => "check",
            BookingAction::Reject => "x",
            BookingAction::Reschedule => "calendar",
            BookingAction::Complete => "star",
            BookingAction::Cancel => "trash",
        }
    }

    /// Status the booking ends up in; reschedule keeps the current one
    pub fn target_status(&self) -> Option<BookingStatus> {
        match self {
            BookingAction::Approve => Some(BookingStatus::Approved),
            BookingAction::Reject => Some(BookingStatus::Unavailable),
            BookingAction::Complete => Some(BookingStatus::Completed),
            BookingAction::Cancel => Some(BookingStatus::Cancelled),
            BookingAction::Reschedule => None,
        }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, BookingAction::Reject | BookingAction::Cancel)
    }
}

/// Actions offered on a booking.
///
/// Front office staff get every transition the status allows. A client may
/// only withdraw their own request while it is still pending.
pub fn available_actions(booking: &Booking, can_manage: bool, own_booking: bool) -> Vec<BookingAction> {
    if !can_manage {
        return if own_booking && booking.status == BookingStatus::Pending {
            vec![BookingAction::Cancel]
        } else {
            vec![]
        };
    }
    [
        BookingAction::Approve,
        BookingAction::Reject,
        BookingAction::Reschedule,
        BookingAction::Complete,
        BookingAction::Cancel,
    ]
    .into_iter()
    .filter(|action| match action.target_status() {
        Some(next) => booking.status.can_transition_to(next),
        None => booking.status.can_reschedule(),
    })
    .collect()
}

/// Local checks run before the request is sent
pub fn precheck(
    action: BookingAction,
    booking: &Booking,
    new_date: Option<NaiveDate>,
    today: NaiveDate,
    bookings: &[Booking],
    disabled: &[DisabledDate],
    max_per_day: usize,
) -> Result<(), String> {
    if let Some(next) = action.target_status() {
        booking.check_transition(next)?;
    }
    match action {
        BookingAction::Approve => check_slot(
            booking.event_date,
            today,
            bookings,
            disabled,
            max_per_day,
            Some(&booking.id),
        )
        .map_err(|c| c.to_string()),
        BookingAction::Reschedule => {
            let new_date = new_date.ok_or_else(|| "Pick the new date".to_string())?;
            RescheduleBookingRequest {
                new_date,
                reason: None,
            }
            .validate(booking, today)?;
            check_slot(new_date, today, bookings, disabled, max_per_day, Some(&booking.id))
                .map_err(|c| c.to_string())
        }
        _ => Ok(()),
    }
}

async fn send(
    action: BookingAction,
    id: String,
    reason: Option<String>,
    new_date: Option<NaiveDate>,
) -> Result<(), String> {
    match action {
        BookingAction::Approve => api::approve_booking(&id, &ApproveBookingRequest { note: reason }).await,
        BookingAction::Reject => {
            let request = RejectBookingRequest {
                reason: reason.unwrap_or_default(),
            };
            request.validate()?;
            api::reject_booking(&id, &request).await
        }
        BookingAction::Cancel => {
            let request = CancelBookingRequest {
                reason: reason.unwrap_or_default(),
            };
            request.validate()?;
            api::cancel_booking(&id, &request).await
        }
        BookingAction::Complete => api::complete_booking(&id).await,
        BookingAction::Reschedule => {
            let new_date = new_date.ok_or_else(|| "Pick the new date".to_string())?;
            api::reschedule_booking(&id, &RescheduleBookingRequest { new_date, reason }).await
        }
    }
}

/// Confirmation dialog that runs one workflow action.
///
/// `bookings` and `disabled` are what the caller has loaded; they feed the
/// local slot check.
#[component]
pub fn BookingActionDialog(
    action: BookingAction,
    booking: Booking,
    #[prop(into)] bookings: Signal<Vec<Booking>>,
    #[prop(into)] disabled: Signal<Vec<DisabledDate>>,
    on_done: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let (busy, set_busy) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let new_date = RwSignal::new(None::<NaiveDate>);
    let booking = StoredValue::new(booking);

    let run = move |reason: Option<String>| {
        let chosen_date = new_date.get_untracked();
        let checked = booking.with_value(|b| {
            bookings.with_untracked(|all| {
                disabled.with_untracked(|closed| {
                    precheck(
                        action,
                        b,
                        chosen_date,
                        today(),
                        all,
                        closed,
                        config().max_bookings_per_day,
                    )
                })
            })
        });
        if let Err(e) = checked {
            log::warn!("{} refused locally: {}", action.label(), e);
            set_error.set(Some(e));
            return;
        }

        let (id, code) = booking.with_value(|b| (b.id.clone(), b.code.clone()));
        set_busy.set(true);
        set_error.set(None);
        spawn_local(async move {
            match send(action, id, reason, chosen_date).await {
                Ok(()) => {
                    log::info!("{} {}", action.label(), code);
                    set_busy.set(false);
                    on_done.run(());
                }
                Err(e) => {
                    set_error.set(Some(e));
                    set_busy.set(false);
                }
            }
        });
    };

    let (code, client, date) = booking.with_value(|b| (b.code.clone(), b.client_name.clone(), b.event_date));

    if action == BookingAction::Reschedule {
        let reason = RwSignal::new(String::new());
        let footer = move || {
            view! {
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| on_cancel.run(())
                    disabled=Signal::derive(move || busy.get())
                >
                    "Cancel"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| {
                        let text = reason.get_untracked().trim().to_string();
                        run((!text.is_empty()).then_some(text));
                    }
                    disabled=Signal::derive(move || busy.get() || new_date.get().is_none())
                >
                    "Reschedule"
                </Button>
            }
        };
        return view! {
            <Modal
                title=format!("Reschedule {}", code)
                on_close=on_cancel
                footer=ChildrenFn::to_children(footer)
            >
                <p class="confirm-dialog__message">
                    {format!("{} is booked on {}. Pick the new date.", client, format_date(date))}
                </p>
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                <div class="form__group">
                    <Label>"New date"</Label>
                    <DateInput
                        value=Signal::derive(move || new_date.get())
                        on_change=Callback::new(move |d| new_date.set(d))
                        min=today()
                        disabled=Signal::derive(move || busy.get())
                    />
                </div>
                <div class="form__group">
                    <Label>"Reason (optional)"</Label>
                    <Textarea value=reason attr:rows=3 />
                </div>
            </Modal>
        }
        .into_any();
    }

    let message = match action {
        BookingAction::Approve => format!(
            "Approve {} for {} on {}? The date will be reserved.",
            code,
            client,
            format_date(date)
        ),
        BookingAction::Reject => format!(
            "Reject {}? The request will be marked unavailable and {} will see the reason.",
            code, client
        ),
        BookingAction::Complete => format!("Mark {} as completed? The client can then leave feedback.", code),
        _ => format!("Cancel {} for {} on {}?", code, client, format_date(date)),
    };
    let reason_label = match action {
        BookingAction::Approve => Some("Note to the client (optional)".to_string()),
        BookingAction::Reject | BookingAction::Cancel => Some("Reason".to_string()),
        _ => None,
    };

    view! {
        <ConfirmDialog
            title=format!("{} booking", action.label())
            message=message
            confirm_label=action.label()
            danger=action.is_destructive()
            reason_label=reason_label
            reason_required=action.is_destructive()
            busy=busy
            error=error
            on_confirm=Callback::new(run)
            on_cancel=on_cancel
        />
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, d).unwrap()
    }

    fn booking(id: &str, on: NaiveDate, status: BookingStatus) -> Booking {
        Booking {
            id: id.into(),
            code: id.to_uppercase(),
            client_id: "c1".into(),
            client_name: "Ana".into(),
            client_email: None,
            client_phone: None,
            event_type: "Wedding".into(),
            event_date: on,
            event_time: None,
            venue: "Hall".into(),
            package_id: "p1".into(),
            package_name: "Gold".into(),
            add_on_ids: vec![],
            guest_count: Some(80),
            notes: None,
            status,
            status_reason: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn staff_actions_follow_status() {
        let pending = booking("b1", date(20), BookingStatus::Pending);
        assert_eq!(
            available_actions(&pending, true, false),
            vec![
                BookingAction::Approve,
                BookingAction::Reject,
                BookingAction::Reschedule,
                BookingAction::Cancel
            ]
        );
        let approved = booking("b2", date(20), BookingStatus::Approved);
        assert_eq!(
            available_actions(&approved, true, false),
            vec![
                BookingAction::Reschedule,
                BookingAction::Complete,
                BookingAction::Cancel
            ]
        );
        let done = booking("b3", date(20), BookingStatus::Completed);
        assert!(available_actions(&done, true, false).is_empty());
    }

    #[test]
    fn clients_only_withdraw_pending_requests() {
        let pending = booking("b1", date(20), BookingStatus::Pending);
        assert_eq!(available_actions(&pending, false, true), vec![BookingAction::Cancel]);
        assert!(available_actions(&pending, false, false).is_empty());
        let approved = booking("b2", date(20), BookingStatus::Approved);
        assert!(available_actions(&approved, false, true).is_empty());
    }

    #[test]
    fn approve_is_refused_on_a_full_date() {
        let taken = booking("b1", date(20), BookingStatus::Approved);
        let request = booking("b2", date(20), BookingStatus::Pending);
        let all = vec![taken, request.clone()];
        let err = precheck(BookingAction::Approve, &request, None, date(1), &all, &[], 1).unwrap_err();
        assert!(err.contains("already has 1 approved booking"));
        assert!(precheck(BookingAction::Approve, &request, None, date(1), &all, &[], 2).is_ok());
    }

    #[test]
    fn reschedule_checks_the_new_date() {
        let moving = booking("b1", date(20), BookingStatus::Approved);
        let other = booking("b2", date(22), BookingStatus::Approved);
        let closed = vec![DisabledDate {
            id: "d1".into(),
            date: date(25),
            reason: Some("Studio trip".into()),
        }];
        let all = vec![moving.clone(), other];
        let run = |to| precheck(BookingAction::Reschedule, &moving, to, date(1), &all, &closed, 1);

        assert_eq!(run(None).unwrap_err(), "Pick the new date");
        assert!(run(Some(date(20))).is_err());
        assert!(run(Some(date(22))).is_err());
        assert!(run(Some(date(25))).unwrap_err().contains("Studio trip"));
        assert!(run(Some(date(23))).is_ok());
    }

    #[test]
    fn transitions_are_checked_first() {
        let done = booking("b1", date(20), BookingStatus::Cancelled);
        assert!(precheck(BookingAction::Complete, &done, None, date(1), &[], &[], 1).is_err());
    }
}
