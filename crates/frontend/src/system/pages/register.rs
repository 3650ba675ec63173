use contracts::system::auth::RegisterRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::system::auth::api;

/// Client sign-up. Staff accounts are created by the owner in Accounts.
#[component]
pub fn RegisterForm(on_registered: Callback<String>, on_cancel: Callback<()>) -> impl IntoView {
    let form = RwSignal::new(RegisterRequest::default());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let request = form.get_untracked();
        if let Err(e) = request.validate() {
            set_error_message.set(Some(e));
            return;
        }

        set_is_loading.set(true);
        set_error_message.set(None);
        spawn_local(async move {
            match api::register(&request).await {
                Ok(()) => {
                    log::info!("registered client account {}", request.email);
                    on_registered.run(request.email.trim().to_string());
                }
                Err(e) => set_error_message.set(Some(e)),
            }
            set_is_loading.set(false);
        });
    };

    // one text field bound to one string of the form
    let field = move |id: &'static str,
                      label: &'static str,
                      input_type: &'static str,
                      get: fn(&RegisterRequest) -> &String,
                      set: fn(&mut RegisterRequest, String)| {
        view! {
            <div class="form-group">
                <label for=id>{label}</label>
                <input
                    type=input_type
                    id=id
                    prop:value=move || form.with(|f| get(f).clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| set(f, value));
                    }
                    disabled=move || is_loading.get()
                />
            </div>
        }
    };

    view! {
        <h2>"Create a client account"</h2>

        {move || error_message.get().map(|e| view! { <div class="error-message">{e}</div> })}

        <form on:submit=on_submit>
            {field("first_name", "First name", "text", |f| &f.first_name, |f, v| f.first_name = v)}
            {field("last_name", "Last name", "text", |f| &f.last_name, |f, v| f.last_name = v)}
            {field("reg_email", "Email", "email", |f| &f.email, |f, v| f.email = v)}
            {field("phone", "Phone", "tel", |f| &f.phone, |f, v| f.phone = v)}
            {field("reg_password", "Password", "password", |f| &f.password, |f, v| f.password = v)}
            {field("confirm_password", "Confirm password", "password", |f| &f.confirm_password, |f, v| f.confirm_password = v)}

            <p class="form__hint">
                "At least 8 characters with upper and lower case letters, a digit and a symbol."
            </p>

            <button type="submit" class="btn-primary" disabled=move || is_loading.get()>
                {move || if is_loading.get() { "Creating..." } else { "Create account" }}
            </button>
        </form>

        <div class="login-info">
            <a href="#" on:click=move |ev| {
                ev.prevent_default();
                on_cancel.run(());
            }>
                "Back to sign in"
            </a>
        </div>
    }
}
