use leptos::ev;
use leptos::prelude::*;

use crate::layout::global_context::{AppGlobalContext, Tab as TabData};
use crate::shared::icons::icon;

#[component]
fn TabButton(tab: TabData) -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");

    let key_for_active = tab.key.clone();
    let is_active = Memo::new(move |_| {
        tabs_store.active.with(|a| a.as_deref() == Some(key_for_active.as_str()))
    });

    let key_for_click = tab.key.clone();
    let key_for_close = tab.key.clone();
    let on_close = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
        tabs_store.close_tab(&key_for_close);
    };

    // title can change after a detail page loads its record
    let key_for_title = tab.key.clone();
    let title = move || {
        tabs_store.opened.with(|tabs| {
            tabs.iter()
                .find(|t| t.key == key_for_title)
                .map(|t| t.title.clone())
                .unwrap_or_default()
        })
    };

    view! {
        <div
            class="tabs__tab"
            class:tabs__tab--active=is_active
            on:click=move |_| tabs_store.activate_tab(&key_for_click)
        >
            <span class="tabs__tab-title">{title}</span>
            <button class="tabs__tab-close" on:click=on_close title="Close">
                {icon("x")}
            </button>
        </div>
    }
}

#[component]
pub fn TabBar() -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");

    view! {
        <Show when=move || tabs_store.opened.with(|t| !t.is_empty())>
            <div class="tabs__bar">
                <For
                    each=move || tabs_store.opened.get()
                    key=|tab| tab.key.clone()
                    children=move |tab| view! { <TabButton tab=tab /> }
                />
                <button
                    class="tabs__close-all"
                    on:click=move |_| tabs_store.close_all()
                    title="Close all tabs"
                >
                    "Close all"
                </button>
            </div>
        </Show>
    }
}
