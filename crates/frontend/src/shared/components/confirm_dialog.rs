use leptos::prelude::*;
use thaw::*;

use crate::shared::modal::Modal;

/// Yes/no confirmation on top of `Modal`.
///
/// With `reason_label` set, a textarea is shown and its trimmed text is
/// passed to `on_confirm`; confirming with an empty reason is refused when
/// `reason_required` is set.
#[component]
pub fn ConfirmDialog(
    #[prop(into)] title: String,
    #[prop(into)] message: String,
    #[prop(into, default = "Confirm".to_string())] confirm_label: String,
    /// Red confirm button for destructive actions
    #[prop(optional)]
    danger: bool,
    #[prop(default = None)] reason_label: Option<String>,
    #[prop(optional)] reason_required: bool,
    /// True while the confirmed request is running
    #[prop(optional, into)]
    busy: Signal<bool>,
    /// Error of the last attempt
    #[prop(optional, into)]
    error: Signal<Option<String>>,
    on_confirm: Callback<Option<String>>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let reason = RwSignal::new(String::new());
    let local_error = RwSignal::new(None::<String>);
    let with_reason = reason_label.is_some();
    let reason_caption = reason_label.unwrap_or_default();
    let confirm_label = StoredValue::new(confirm_label);

    let confirm = move |_| {
        let text = reason.get_untracked().trim().to_string();
        if reason_required && text.is_empty() {
            local_error.set(Some("Please give a reason".to_string()));
            return;
        }
        local_error.set(None);
        on_confirm.run(with_reason.then_some(text).filter(|t| !t.is_empty()));
    };

    let footer = move || {
        view! {
            <Button
                appearance=ButtonAppearance::Secondary
                on_click=move |_| on_cancel.run(())
                disabled=busy
            >
                "Cancel"
            </Button>
            <Button
                appearance=ButtonAppearance::Primary
                attr:class=if danger { "button--danger" } else { "" }
                on_click=confirm
                disabled=busy
            >
                {move || {
                    if busy.get() {
                        "Working...".to_string()
                    } else {
                        confirm_label.get_value()
                    }
                }}
            </Button>
        }
    };

    view! {
        <Modal title=title on_close=on_cancel footer=ChildrenFn::to_children(footer)>
            {move || {
                local_error
                    .get()
                    .or_else(|| error.get())
                    .map(|e| view! { <div class="alert alert--error">{e}</div> })
            }}
            <p class="confirm-dialog__message">{message}</p>
            {with_reason.then(|| view! {
                <div class="form__group">
                    <Label>{reason_caption}</Label>
                    <Textarea value=reason attr:rows=3 />
                </div>
            })}
        </Modal>
    }
}
