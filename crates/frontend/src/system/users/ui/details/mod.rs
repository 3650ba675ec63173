use contracts::system::roles::Role;
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::modal::Modal;
use crate::system::users::api;

fn optional(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[component]
fn RoleSelect(value: RwSignal<String>) -> impl IntoView {
    view! {
        <Select value=value>
            {Role::all()
                .into_iter()
                .map(|r| view! { <option value=r.code()>{r.label()}</option> })
                .collect_view()}
        </Select>
    }
}

#[component]
pub fn CreateUserForm(on_close: Callback<()>, on_created: Callback<()>) -> impl IntoView {
    let first_name = RwSignal::new(String::new());
    let last_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let role = RwSignal::new(Role::Client.code().to_string());
    let password = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let on_save = move |_| {
        let dto = CreateUserDto {
            first_name: first_name.get_untracked().trim().to_string(),
            last_name: last_name.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            phone: optional(phone.get_untracked()),
            role: Role::from_code(&role.get_untracked()).unwrap_or(Role::Client),
            password: password.get_untracked(),
        };
        if let Err(e) = dto.validate() {
            set_error.set(Some(e));
            return;
        }

        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::create_user(&dto).await {
                Ok(id) => {
                    log::info!("created account {} ({})", dto.email, id);
                    on_created.run(());
                }
                Err(e) => {
                    set_error.set(Some(e));
                    set_saving.set(false);
                }
            }
        });
    };

    let footer = move || {
        view! {
            <Button
                appearance=ButtonAppearance::Secondary
                on_click=move |_| on_close.run(())
                disabled=Signal::derive(move || saving.get())
            >
                "Cancel"
            </Button>
            <Button
                appearance=ButtonAppearance::Primary
                on_click=on_save
                disabled=Signal::derive(move || saving.get())
            >
                {move || if saving.get() { "Saving..." } else { "Create account" }}
            </Button>
        }
    };

    view! {
        <Modal title="New account".to_string() on_close=on_close footer=ChildrenFn::to_children(footer)>
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="form__row">
                <div class="form__group">
                    <Label>"First name"</Label>
                    <Input value=first_name />
                </div>
                <div class="form__group">
                    <Label>"Last name"</Label>
                    <Input value=last_name />
                </div>
            </div>
            <div class="form__group">
                <Label>"Email"</Label>
                <Input value=email input_type=InputType::Email />
            </div>
            <div class="form__group">
                <Label>"Phone"</Label>
                <Input value=phone input_type=InputType::Tel placeholder="Optional" />
            </div>
            <div class="form__group">
                <Label>"Role"</Label>
                <RoleSelect value=role />
            </div>
            <div class="form__group">
                <Label>"Initial password"</Label>
                <Input value=password input_type=InputType::Password />
            </div>
        </Modal>
    }
}

#[component]
pub fn EditUserForm(user: User, on_close: Callback<()>, on_saved: Callback<()>) -> impl IntoView {
    let original = UpdateUserDto::from_user(&user);
    let first_name = RwSignal::new(original.first_name.clone());
    let last_name = RwSignal::new(original.last_name.clone());
    let email = RwSignal::new(original.email.clone());
    let phone = RwSignal::new(original.phone.clone().unwrap_or_default());
    let role = RwSignal::new(original.role.code().to_string());
    let is_active = RwSignal::new(original.is_active);
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);
    let user_id = StoredValue::new(user.id.clone());

    let on_save = move |_| {
        let dto = UpdateUserDto {
            id: user_id.get_value(),
            first_name: first_name.get_untracked().trim().to_string(),
            last_name: last_name.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            phone: optional(phone.get_untracked()),
            role: Role::from_code(&role.get_untracked()).unwrap_or(Role::Client),
            is_active: is_active.get_untracked(),
        };
        if let Err(e) = dto.validate() {
            set_error.set(Some(e));
            return;
        }

        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::update_user(&dto).await {
                Ok(()) => on_saved.run(()),
                Err(e) => {
                    set_error.set(Some(e));
                    set_saving.set(false);
                }
            }
        });
    };

    let footer = move || {
        view! {
            <Button
                appearance=ButtonAppearance::Secondary
                on_click=move |_| on_close.run(())
                disabled=Signal::derive(move || saving.get())
            >
                "Cancel"
            </Button>
            <Button
                appearance=ButtonAppearance::Primary
                on_click=on_save
                disabled=Signal::derive(move || saving.get())
            >
                {move || if saving.get() { "Saving..." } else { "Save" }}
            </Button>
        }
    };

    view! {
        <Modal title=format!("Edit: {}", user.full_name()) on_close=on_close footer=ChildrenFn::to_children(footer)>
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="form__row">
                <div class="form__group">
                    <Label>"First name"</Label>
                    <Input value=first_name disabled=Signal::derive(move || saving.get()) />
                </div>
                <div class="form__group">
                    <Label>"Last name"</Label>
                    <Input value=last_name disabled=Signal::derive(move || saving.get()) />
                </div>
            </div>
            <div class="form__group">
                <Label>"Email"</Label>
                <Input value=email input_type=InputType::Email disabled=Signal::derive(move || saving.get()) />
            </div>
            <div class="form__group">
                <Label>"Phone"</Label>
                <Input value=phone input_type=InputType::Tel disabled=Signal::derive(move || saving.get()) />
            </div>
            <div class="form__group">
                <Label>"Role"</Label>
                <RoleSelect value=role />
            </div>
            <div class="form__group">
                <Checkbox checked=is_active label="Active" />
            </div>
        </Modal>
    }
}

/// Owner sets a new password for someone else's account
#[component]
pub fn ResetPasswordForm(user: User, on_close: Callback<()>) -> impl IntoView {
    let new_password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);
    let user_id = StoredValue::new(user.id.clone());

    let on_save = move |_| {
        let dto = ChangePasswordDto {
            user_id: user_id.get_value(),
            old_password: None,
            new_password: new_password.get_untracked(),
            confirm_password: confirm_password.get_untracked(),
        };
        if let Err(e) = dto.validate() {
            set_error.set(Some(e));
            return;
        }
        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::change_password(&dto).await {
                Ok(()) => on_close.run(()),
                Err(e) => {
                    set_error.set(Some(e));
                    set_saving.set(false);
                }
            }
        });
    };

    let footer = move || {
        view! {
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                "Cancel"
            </Button>
            <Button
                appearance=ButtonAppearance::Primary
                on_click=on_save
                disabled=Signal::derive(move || saving.get())
            >
                "Set password"
            </Button>
        }
    };

    view! {
        <Modal title=format!("Reset password: {}", user.email) on_close=on_close footer=ChildrenFn::to_children(footer)>
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            <div class="form__group">
                <Label>"New password"</Label>
                <Input value=new_password input_type=InputType::Password />
            </div>
            <div class="form__group">
                <Label>"Confirm password"</Label>
                <Input value=confirm_password input_type=InputType::Password />
            </div>
        </Modal>
    }
}
