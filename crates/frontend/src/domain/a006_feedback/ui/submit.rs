use contracts::domain::a001_booking::Booking;
use contracts::domain::a006_feedback::{Feedback, FeedbackDto, MESSAGE_MAX_CHARS};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a006_feedback::api;
use crate::shared::date_utils::format_date;

fn rating_caption(rating: u8) -> &'static str {
    match rating {
        1 => "1 - Poor",
        2 => "2 - Fair",
        3 => "3 - Good",
        4 => "4 - Very good",
        _ => "5 - Excellent",
    }
}

/// Review form for the client's completed, not yet reviewed bookings
#[component]
pub fn FeedbackForm(
    #[prop(into)] reviewable: Signal<Vec<Booking>>,
    #[prop(into)] existing: Signal<Vec<Feedback>>,
    on_saved: Callback<()>,
) -> impl IntoView {
    let booking_id = RwSignal::new(String::new());
    let rating = RwSignal::new("5".to_string());
    let message = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let submit = move |_| {
        let dto = FeedbackDto {
            booking_id: booking_id.get_untracked(),
            rating: rating.get_untracked().parse().unwrap_or(0),
            message: message.get_untracked().trim().to_string(),
        };
        let checked = reviewable.with_untracked(|list| {
            match list.iter().find(|b| b.id == dto.booking_id) {
                Some(booking) => existing.with_untracked(|e| dto.validate_for(booking, e)),
                None => dto.validate(),
            }
        });
        if let Err(e) = checked {
            set_error.set(Some(e));
            return;
        }

        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            let result = api::submit_feedback(&dto).await;
            set_saving.set(false);
            match result {
                Ok(()) => {
                    booking_id.set(String::new());
                    rating.set("5".to_string());
                    message.set(String::new());
                    on_saved.run(());
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="details__section">
            <h3>"Leave a review"</h3>
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            <Show
                when=move || reviewable.with(|r| !r.is_empty())
                fallback=|| view! { <div class="details__hint">"No completed bookings are waiting for a review."</div> }
            >
                <div class="form__row">
                    <div class="form__group">
                        <Label>"Booking"</Label>
                        <Select value=booking_id>
                            <option value="">"Select a booking"</option>
                            {move || reviewable.get()
                                .into_iter()
                                .map(|b| view! {
                                    <option value=b.id.clone()>
                                        {format!("{} · {} · {}", b.code, b.event_type, format_date(b.event_date))}
                                    </option>
                                })
                                .collect_view()}
                        </Select>
                    </div>
                    <div class="form__group">
                        <Label>"Rating"</Label>
                        <Select value=rating>
                            {(1..=5u8)
                                .rev()
                                .map(|r| view! { <option value=r.to_string()>{rating_caption(r)}</option> })
                                .collect_view()}
                        </Select>
                    </div>
                </div>
                <div class="form__group">
                    <Label>"Your feedback"</Label>
                    <Textarea value=message attr:rows=4 />
                    <span class="form__counter">
                        {move || format!("{} / {}", message.with(|m| m.trim().chars().count()), MESSAGE_MAX_CHARS)}
                    </span>
                </div>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=submit
                    disabled=Signal::derive(move || saving.get())
                >
                    {move || if saving.get() { "Sending..." } else { "Send feedback" }}
                </Button>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_captions() {
        assert_eq!(rating_caption(1), "1 - Poor");
        assert_eq!(rating_caption(5), "5 - Excellent");
    }
}
