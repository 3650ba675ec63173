use std::cell::Cell;

use contracts::system::auth::UserInfo;
use contracts::system::roles::{Permission, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
    /// Set once the stored session has been checked on startup
    pub restored: bool,
}

impl AuthState {
    pub fn role(&self) -> Option<Role> {
        self.user_info.as_ref().map(|u| u.role)
    }

    pub fn has(&self, permission: Permission) -> bool {
        self.user_info
            .as_ref()
            .map(|u| u.has(permission))
            .unwrap_or(false)
    }

    pub fn user_id(&self) -> Option<String> {
        self.user_info.as_ref().map(|u| u.id.clone())
    }
}

thread_local! {
    // lets API helpers end the session without a reactive owner
    static SESSION_SETTER: Cell<Option<WriteSignal<AuthState>>> = const { Cell::new(None) };
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState::default());
    SESSION_SETTER.with(|s| s.set(Some(set_auth_state)));

    // Restore the session saved in localStorage
    Effect::new(move |_| {
        spawn_local(async move {
            let state = restore_session().await;
            set_auth_state.set(state);
        });
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

async fn restore_session() -> AuthState {
    let restored = AuthState {
        restored: true,
        ..Default::default()
    };
    let Some(access_token) = storage::get_access_token() else {
        return restored;
    };

    match api::get_current_user(&access_token).await {
        Ok(user_info) => {
            log::info!("session restored for {}", user_info.email);
            return AuthState {
                access_token: Some(access_token),
                user_info: Some(user_info),
                restored: true,
            };
        }
        Err(e) => log::warn!("stored access token rejected: {}", e),
    }

    // Token invalid, try refresh
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Ok(response) = api::refresh_token(refresh_token).await {
            storage::save_access_token(&response.access_token);
            if let Ok(user_info) = api::get_current_user(&response.access_token).await {
                log::info!("session refreshed for {}", user_info.email);
                return AuthState {
                    access_token: Some(response.access_token),
                    user_info: Some(user_info),
                    restored: true,
                };
            }
        }
    }

    storage::clear_tokens();
    restored
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Reactive permission check for the signed-in user
pub fn use_permission(permission: Permission) -> Signal<bool> {
    let (auth_state, _) = use_auth();
    Signal::derive(move || auth_state.with(|s| s.has(permission)))
}

/// Sign in and publish the new session
pub async fn do_login(
    email: String,
    password: String,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<(), String> {
    let response = api::login(email, password).await?;

    storage::save_tokens(&response.access_token, &response.refresh_token);
    log::info!("signed in as {} ({})", response.user.email, response.user.role);

    set_auth_state.set(AuthState {
        access_token: Some(response.access_token),
        user_info: Some(response.user),
        restored: true,
    });

    Ok(())
}

pub async fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Err(e) = api::logout(refresh_token).await {
            log::warn!("logout request failed: {}", e);
        }
    }
    storage::clear_tokens();
    set_auth_state.set(AuthState {
        restored: true,
        ..Default::default()
    });
}

/// Drop the local session after the API rejected the token
pub fn end_session() {
    storage::clear_tokens();
    SESSION_SETTER.with(|s| {
        if let Some(setter) = s.get() {
            setter.set(AuthState {
                restored: true,
                ..Default::default()
            });
        }
    });
}
