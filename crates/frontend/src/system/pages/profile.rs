use contracts::system::auth::UserInfo;
use contracts::system::users::ChangePasswordDto;
use leptos::prelude::*;
use gloo_timers::future::TimeoutFuture;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::system::auth::context::use_auth;
use crate::system::users::api;

const NOTICE_MS: u32 = 4000;

/// Account summary of the signed-in user and a password change form
#[component]
pub fn ProfilePage() -> impl IntoView {
    let (auth_state, _) = use_auth();

    let old_password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (notice, set_notice) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let on_change_password = move |_| {
        let Some(user_id) = auth_state.with_untracked(|s| s.user_id()) else {
            return;
        };
        let dto = ChangePasswordDto {
            user_id,
            old_password: Some(old_password.get_untracked()),
            new_password: new_password.get_untracked(),
            confirm_password: confirm_password.get_untracked(),
        };
        set_notice.set(None);
        if let Err(e) = dto.validate() {
            set_error.set(Some(e));
            return;
        }

        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::change_password(&dto).await {
                Ok(()) => {
                    old_password.set(String::new());
                    new_password.set(String::new());
                    confirm_password.set(String::new());
                    set_notice.set(Some("Password changed".to_string()));
                    set_saving.set(false);
                    TimeoutFuture::new(NOTICE_MS).await;
                    // the page may have been closed meanwhile
                    let _ = set_notice.try_set(None);
                }
                Err(e) => {
                    set_error.set(Some(format!("Failed to change password: {}", e)));
                    set_saving.set(false);
                }
            }
        });
    };

    let field = move |f: fn(&UserInfo) -> String| {
        move || {
            auth_state.with(|s| s.user_info.as_ref().map(f).unwrap_or_default())
        }
    };

    view! {
        <PageFrame page_id="sys_profile--detail" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    {icon("user")}
                    <h1 class="page__title">"My profile"</h1>
                </div>
            </div>

            <div class="page__content">
                <div class="detail-grid">
                    <div class="detail-card">
                        <h3 class="detail-card__title">"Account"</h3>
                        <div class="detail-row">
                            <span class="detail-row__label">"Name"</span>
                            <span class="detail-row__value">{field(|u| u.full_name.clone())}</span>
                        </div>
                        <div class="detail-row">
                            <span class="detail-row__label">"Email"</span>
                            <span class="detail-row__value">{field(|u| u.email.clone())}</span>
                        </div>
                        <div class="detail-row">
                            <span class="detail-row__label">"Role"</span>
                            <span class="detail-row__value">
                                <Badge>{field(|u| u.role.label().to_string())}</Badge>
                            </span>
                        </div>
                    </div>

                    <div class="detail-card">
                        <h3 class="detail-card__title">"Change password"</h3>
                        {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                        {move || notice.get().map(|n| view! { <div class="alert alert--success">{n}</div> })}
                        <div class="form__group">
                            <Label>"Current password"</Label>
                            <Input value=old_password input_type=InputType::Password />
                        </div>
                        <div class="form__group">
                            <Label>"New password"</Label>
                            <Input value=new_password input_type=InputType::Password />
                        </div>
                        <div class="form__group">
                            <Label>"Confirm new password"</Label>
                            <Input value=confirm_password input_type=InputType::Password />
                        </div>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=on_change_password
                            disabled=Signal::derive(move || saving.get())
                        >
                            {icon("save")}
                            {move || if saving.get() { " Saving..." } else { " Change password" }}
                        </Button>
                    </div>
                </div>
            </div>
        </PageFrame>
    }
}
