use leptos::prelude::*;

use crate::layout::global_context::AppGlobalContext;

/// Collapsible navigation column
#[component]
pub fn Left(children: Children) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");
    let collapsed = move || !ctx.left_open.get();

    view! {
        <aside
            data-zone="left"
            class="left studio-nav"
            class:hidden=collapsed
            aria-hidden=move || collapsed().to_string()
        >
            {children()}
        </aside>
    }
}
