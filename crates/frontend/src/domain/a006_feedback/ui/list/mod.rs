use contracts::domain::a001_booking::Booking;
use contracts::domain::a006_feedback::{
    average_rating, reviewable_bookings, Feedback, FeedbackStatus,
};
use contracts::system::roles::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_booking::api as bookings_api;
use crate::domain::a006_feedback::api;
use crate::domain::a006_feedback::ui::submit::FeedbackForm;
use crate::shared::components::ConfirmDialog;
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::number_format::format_rating;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::context::use_auth;

/// Newest first, optionally narrowed to one status
fn feedback_rows(all: &[Feedback], status: Option<FeedbackStatus>, query: &str) -> Vec<Feedback> {
    let needle = query.trim().to_lowercase();
    let mut rows: Vec<Feedback> = all
        .iter()
        .filter(|f| status.map(|s| f.status == s).unwrap_or(true))
        .filter(|f| {
            needle.is_empty()
                || f.booking_code.to_lowercase().contains(&needle)
                || f.client_name.to_lowercase().contains(&needle)
                || f.message.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows
}

#[derive(Clone)]
struct PendingModeration {
    feedback: Feedback,
    to: FeedbackStatus,
}

#[component]
pub fn FeedbackList() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let (can_moderate, can_submit) = auth_state.with_untracked(|s| {
        (s.has(Permission::ModerateFeedback), s.has(Permission::SubmitFeedback))
    });

    let all_items = RwSignal::new(Vec::<Feedback>::new());
    let bookings = RwSignal::new(Vec::<Booking>::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);

    let load_data = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::fetch_feedback().await {
                Ok(data) => {
                    log::debug!("loaded {} feedback entries", data.len());
                    all_items.set(data);
                }
                Err(e) => set_error.set(Some(format!("Failed to load feedback: {}", e))),
            }
            if can_submit {
                match bookings_api::fetch_bookings().await {
                    Ok(data) => bookings.set(data),
                    Err(e) => set_error.set(Some(e)),
                }
            }
            set_loading.set(false);
        });
    };
    load_data();

    let search_signal = RwSignal::new(String::new());
    let status_signal = RwSignal::new(String::new());
    let rows = Memo::new(move |_| {
        let status = FeedbackStatus::from_code(&status_signal.get());
        all_items.with(|all| feedback_rows(all, status, &search_signal.get()))
    });
    let reviewable = Signal::derive(move || {
        bookings.with(|b| {
            all_items.with(|e| reviewable_bookings(b, e).into_iter().cloned().collect::<Vec<_>>())
        })
    });

    let pending = RwSignal::new(None::<PendingModeration>);
    let (action_busy, set_action_busy) = signal(false);
    let (action_error, set_action_error) = signal::<Option<String>>(None);

    let run_pending = move |_: Option<String>| {
        let Some(p) = pending.get_untracked() else {
            return;
        };
        let dto = match p.feedback.moderate(p.to) {
            Ok(dto) => dto,
            Err(e) => {
                set_action_error.set(Some(e));
                return;
            }
        };
        set_action_busy.set(true);
        set_action_error.set(None);
        spawn_local(async move {
            let result = api::moderate(&dto).await;
            set_action_busy.set(false);
            match result {
                Ok(()) => {
                    log::info!("feedback {} moved to {}", dto.feedback_id, dto.status.code());
                    pending.set(None);
                    load_data();
                }
                Err(e) => set_action_error.set(Some(e)),
            }
        });
    };

    let average = move || all_items.with(|all| format_rating(average_rating(all)));

    view! {
        <PageFrame page_id="a006_feedback--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    {icon("message-square")}
                    <h1 class="page__title">{if can_moderate { "Feedback" } else { "My feedback" }}</h1>
                    <Badge>{move || rows.get().len().to_string()}</Badge>
                    <Show when=move || can_moderate>
                        <span class="page__subtitle">{icon("star")}{move || format!(" {}", average())}</span>
                    </Show>
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

                {can_submit.then(|| view! {
                    <FeedbackForm
                        reviewable=reviewable
                        existing=Signal::derive(move || all_items.get())
                        on_saved=Callback::new(move |_| load_data())
                    />
                })}

                <Show when=move || can_moderate>
                    <div class="filter-panel">
                        <div class="filter-panel-content">
                            <Flex gap=FlexGap::Small align=FlexAlign::End>
                                <div style="flex: 1; max-width: 320px;">
                                    <Input value=search_signal placeholder="Booking, client, text..." />
                                </div>
                                <div style="width: 180px;">
                                    <Select value=status_signal>
                                        <option value="">"All statuses"</option>
                                        {FeedbackStatus::all()
                                            .into_iter()
                                            .map(|s| view! { <option value=s.code()>{s.label()}</option> })
                                            .collect_view()}
                                    </Select>
                                </div>
                            </Flex>
                        </div>
                    </div>
                </Show>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell resizable=false min_width=150.0>"Received"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>"Booking"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=140.0>"Client"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=100.0>"Rating"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=300.0>"Feedback"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=120.0>"Status"</TableHeaderCell>
                                {can_moderate.then(|| view! {
                                    <TableHeaderCell resizable=false min_width=160.0>"Actions"</TableHeaderCell>
                                })}
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || rows.get()
                                key=|f| (f.id.clone(), f.status)
                                children=move |feedback| {
                                    let actions = feedback.status.moderation_actions();
                                    let stored = StoredValue::new(feedback.clone());
                                    let status = feedback.status;
                                    let received = format_datetime(feedback.created_at);
                                    let rating_title = format!("{} of 5", feedback.rating);
                                    let stars = feedback.stars();
                                    let message = feedback.message.clone();
                                    let message_title = message.clone();
                                    let Feedback { booking_code, client_name, .. } = feedback;
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>{received}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{booking_code}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{client_name}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class="rating" title=rating_title>{stars}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <span title=message_title>{message}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class=status.badge_class()>{status.label()}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            {can_moderate.then(|| view! {
                                                <TableCell>
                                                    <Flex gap=FlexGap::Small>
                                                        {actions.iter().map(|to| {
                                                            let to = *to;
                                                            view! {
                                                                <Button
                                                                    appearance=ButtonAppearance::Secondary
                                                                    size=ButtonSize::Small
                                                                    on_click=move |_| {
                                                                        set_action_error.set(None);
                                                                        pending.set(Some(PendingModeration {
                                                                            feedback: stored.get_value(),
                                                                            to,
                                                                        }));
                                                                    }
                                                                >
                                                                    {to.action_label()}
                                                                </Button>
                                                            }
                                                        }).collect_view()}
                                                    </Flex>
                                                </TableCell>
                                            })}
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>

                {move || pending.get().map(|p| {
                    let title = format!("{} feedback", p.to.action_label());
                    let message = match p.to {
                        FeedbackStatus::Posted => format!(
                            "Publish the review for {} by {}?",
                            p.feedback.booking_code, p.feedback.client_name
                        ),
                        _ => format!(
                            "Hide the review for {} by {} from the public page?",
                            p.feedback.booking_code, p.feedback.client_name
                        ),
                    };
                    view! {
                        <ConfirmDialog
                            title=title
                            message=message
                            confirm_label=p.to.action_label()
                            danger={p.to == FeedbackStatus::Unposted}
                            busy=action_busy
                            error=action_error
                            on_confirm=Callback::new(run_pending)
                            on_cancel=Callback::new(move |_| pending.set(None))
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
    use chrono::{TimeZone, Utc};

    fn feedback(id: &str, day: u32, status: FeedbackStatus) -> Feedback {
        Feedback {
            id: id.into(),
            booking_id: format!("b-{}", id),
            booking_code: format!("BK-{}", id),
            client_name: "Ana".into(),
            rating: 4,
            message: "Lovely photos, thank you".into(),
            status,
            created_at: Utc.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn rows_are_newest_first_and_filtered() {
        let all = vec![
            feedback("1", 2, FeedbackStatus::Posted),
            feedback("2", 9, FeedbackStatus::Pending),
            feedback("3", 5, FeedbackStatus::Posted),
        ];
        let ids = |rows: Vec<Feedback>| rows.into_iter().map(|f| f.id).collect::<Vec<_>>();
        assert_eq!(ids(feedback_rows(&all, None, "")), vec!["2", "3", "1"]);
        assert_eq!(ids(feedback_rows(&all, Some(FeedbackStatus::Posted), "")), vec!["3", "1"]);
        assert_eq!(ids(feedback_rows(&all, None, "bk-3")), vec!["3"]);
        assert!(feedback_rows(&all, None, "blurry").is_empty());
    }
}
