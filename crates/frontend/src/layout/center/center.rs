use leptos::prelude::*;

use super::tab_bar::TabBar;

/// Tab strip above the open pages
#[component]
pub fn Center(children: Children) -> impl IntoView {
    view! {
        <div data-zone="center" class="app-tabs" style="flex: 1; overflow: auto;">
            <TabBar />
            <div class="tabs__content">
                {children()}
            </div>
        </div>
    }
}
