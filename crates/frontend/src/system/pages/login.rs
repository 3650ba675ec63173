use contracts::system::auth::LoginRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::register::RegisterForm;
use crate::system::auth::context::{do_login, use_auth};

#[component]
pub fn LoginPage() -> impl IntoView {
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);
    let (show_register, set_show_register) = signal(false);

    let (_, set_auth_state) = use_auth();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let request = LoginRequest {
            email: email.get().trim().to_string(),
            password: password.get(),
        };
        if let Err(e) = request.validate() {
            set_error_message.set(Some(e));
            return;
        }

        set_is_loading.set(true);
        set_error_message.set(None);
        set_notice.set(None);

        spawn_local(async move {
            // success flips the auth state, which swaps this page for the shell
            if let Err(e) = do_login(request.email, request.password, set_auth_state).await {
                log::warn!("login failed: {}", e);
                set_error_message.set(Some(e));
            }
            set_is_loading.set(false);
        });
    };

    let on_registered = Callback::new(move |registered_email: String| {
        set_email.set(registered_email);
        set_password.set(String::new());
        set_show_register.set(false);
        set_notice.set(Some("Account created. You can sign in now.".to_string()));
    });

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Studio Dashboard"</h1>

                <Show
                    when=move || !show_register.get()
                    fallback=move || view! {
                        <RegisterForm
                            on_registered=on_registered
                            on_cancel=Callback::new(move |_| set_show_register.set(false))
                        />
                    }
                >
                    <h2>"Sign in"</h2>

                    {move || notice.get().map(|n| view! { <div class="alert alert--success">{n}</div> })}
                    {move || error_message.get().map(|e| view! { <div class="error-message">{e}</div> })}

                    <form on:submit=on_submit>
                        <div class="form-group">
                            <label for="email">"Email"</label>
                            <input
                                type="email"
                                id="email"
                                autocomplete="username"
                                prop:value=move || email.get()
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                required
                                disabled=move || is_loading.get()
                            />
                        </div>

                        <div class="form-group">
                            <label for="password">"Password"</label>
                            <input
                                type="password"
                                id="password"
                                autocomplete="current-password"
                                prop:value=move || password.get()
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                required
                                disabled=move || is_loading.get()
                            />
                        </div>

                        <button
                            type="submit"
                            class="btn-primary"
                            disabled=move || is_loading.get()
                        >
                            {move || if is_loading.get() { "Signing in..." } else { "Sign in" }}
                        </button>
                    </form>

                    <div class="login-info">
                        <span>"New client? "</span>
                        <a href="#" on:click=move |ev| {
                            ev.prevent_default();
                            set_error_message.set(None);
                            set_show_register.set(true);
                        }>
                            "Create an account"
                        </a>
                    </div>
                </Show>
            </div>
        </div>
    }
}
