use contracts::system::roles::{Permission, Section};
use leptos::prelude::*;

use super::context::use_auth;
use crate::shared::icons::icon;

#[component]
fn AccessDenied(#[prop(into)] what: String) -> impl IntoView {
    view! {
        <div class="access-denied">
            {icon("lock")}
            <div>
                <div class="access-denied__title">"Access denied"</div>
                <div class="access-denied__text">
                    {format!("Your role does not have access to {}.", what)}
                </div>
            </div>
        </div>
    }
}

/// Renders children only when the signed-in role may open `section`
#[component]
pub fn RequireSection(section: Section, children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();
    let allowed = move || {
        auth_state.with(|s| {
            s.user_info
                .as_ref()
                .map(|u| u.can_access(section))
                .unwrap_or(false)
        })
    };
    let what = section.label().to_lowercase();

    view! {
        <Show
            when=allowed
            fallback=move || view! { <AccessDenied what=what.clone() /> }
        >
            {children()}
        </Show>
    }
}

/// Renders children only when the signed-in role holds `permission`.
///
/// With `silent` the notice is skipped and nothing is rendered; used for
/// action buttons.
#[component]
pub fn RequirePermission(
    permission: Permission,
    #[prop(optional)] silent: bool,
    children: ChildrenFn,
) -> impl IntoView {
    let (auth_state, _) = use_auth();
    let allowed = move || auth_state.with(|s| s.has(permission));

    view! {
        <Show
            when=allowed
            fallback=move || {
                (!silent).then(|| view! { <AccessDenied what="this action" /> })
            }
        >
            {children()}
        </Show>
    }
}
