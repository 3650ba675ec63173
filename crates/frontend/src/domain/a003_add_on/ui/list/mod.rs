use contracts::domain::a003_add_on::{AddOn, AddOnDto};
use contracts::domain::common::AggregateRoot;
use contracts::system::roles::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a003_add_on::api;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::shared::components::ConfirmDialog;
use crate::shared::icons::icon;
use crate::shared::list_utils::{cmp_amount, cmp_text, sort_list, Sortable};
use crate::shared::number_format::format_money;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::context::use_permission;

impl Sortable for AddOn {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "price" => cmp_amount(self.price, other.price),
            _ => cmp_text(&self.name, &other.name),
        }
    }
}

/// Catalog order: offered first, then by name
fn catalog_rows(all: &[AddOn], query: &str, show_inactive: bool) -> Vec<AddOn> {
    let needle = query.trim().to_lowercase();
    let mut rows: Vec<AddOn> = all
        .iter()
        .filter(|a| show_inactive || a.is_active)
        .filter(|a| {
            needle.is_empty()
                || a.name.to_lowercase().contains(&needle)
                || a.details.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();
    sort_list(&mut rows, "name", true);
    rows.sort_by_key(|a| !a.is_active);
    rows
}

#[derive(Clone, Debug)]
enum PendingAction {
    ToggleActive(AddOn),
    Delete(AddOn),
}

#[component]
pub fn AddOnList() -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let can_manage = use_permission(Permission::ManageCatalog);

    let all_items: RwSignal<Vec<AddOn>> = RwSignal::new(Vec::new());
    let search = RwSignal::new(String::new());
    let show_inactive = RwSignal::new(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let pending: RwSignal<Option<PendingAction>> = RwSignal::new(None);
    let (action_busy, set_action_busy) = signal(false);
    let (action_error, set_action_error) = signal::<Option<String>>(None);

    let load_data = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::fetch_add_ons().await {
                Ok(data) => all_items.set(data),
                Err(e) => set_error.set(Some(format!("Failed to load add-ons: {}", e))),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| load_data());

    let rows = Memo::new(move |_| {
        all_items.with(|all| catalog_rows(all, &search.get(), show_inactive.get()))
    });

    let run_pending = move |_reason: Option<String>| {
        let Some(action) = pending.get_untracked() else {
            return;
        };
        set_action_busy.set(true);
        set_action_error.set(None);
        spawn_local(async move {
            let result = match &action {
                PendingAction::ToggleActive(a) => {
                    let dto = AddOnDto {
                        is_active: !a.is_active,
                        ..AddOnDto::from_add_on(a)
                    };
                    api::save_add_on(&dto).await.map(|_| ())
                }
                PendingAction::Delete(a) => api::delete_add_on(&a.id).await,
            };
            set_action_busy.set(false);
            match result {
                Ok(()) => {
                    pending.set(None);
                    load_data();
                }
                Err(e) => set_action_error.set(Some(e)),
            }
        });
    };

    view! {
        <PageFrame page_id="a003_add_on--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    {icon("layers")}
                    <h1 class="page__title">"Add-ons"</h1>
                    <Badge>{move || rows.with(|r| r.len()).to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Show when=move || can_manage.get()>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| tabs_store.open_tab(&AddOn::new_tab_key(), "New add-on")
                        >
                            {icon("plus")}
                            " New add-on"
                        </Button>
                    </Show>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_data()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        " Refresh"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="filter-panel">
                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::Center>
                            <div style="flex: 1; max-width: 320px;">
                                <Input value=search placeholder="Search add-ons..." />
                            </div>
                            <Show when=move || can_manage.get()>
                                <Checkbox checked=show_inactive label="Show retired" />
                            </Show>
                        </Flex>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell resizable=false min_width=180.0>"Add-on"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=120.0>"Price"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=280.0>"Description"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=120.0></TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || rows.get()
                                key=|a| (a.id.clone(), a.is_active, a.name.clone())
                                children=move |add_on| {
                                    let stored = StoredValue::new(add_on.clone());
                                    let retired = !add_on.is_active;
                                    let toggle_title = if add_on.is_active { "Retire" } else { "Offer again" };
                                    view! {
                                        <TableRow class:table__row--muted=retired>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <a
                                                        href="#"
                                                        class="table__link"
                                                        on:click=move |ev| {
                                                            ev.prevent_default();
                                                            stored.with_value(|a| tabs_store.open_tab(
                                                                &AddOn::detail_tab_key(&a.id),
                                                                &detail_tab_label(AddOn::element_name(), &a.name),
                                                            ));
                                                        }
                                                    >
                                                        {add_on.name.clone()}
                                                    </a>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format!("+{}", format_money(add_on.price))}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{add_on.details.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <Show when=move || can_manage.get()>
                                                    <Flex gap=FlexGap::Small>
                                                        <Button
                                                            appearance=ButtonAppearance::Subtle
                                                            size=ButtonSize::Small
                                                            attr:title=toggle_title
                                                            on_click=move |_| {
                                                                set_action_error.set(None);
                                                                pending.set(Some(PendingAction::ToggleActive(stored.get_value())));
                                                            }
                                                        >
                                                            {icon(if stored.with_value(|a| a.is_active) { "x" } else { "check" })}
                                                        </Button>
                                                        <Button
                                                            appearance=ButtonAppearance::Subtle
                                                            size=ButtonSize::Small
                                                            attr:title="Delete"
                                                            on_click=move |_| {
                                                                set_action_error.set(None);
                                                                pending.set(Some(PendingAction::Delete(stored.get_value())));
                                                            }
                                                        >
                                                            {icon("trash")}
                                                        </Button>
                                                    </Flex>
                                                </Show>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>

                {move || pending.get().map(|action| {
                    let (title, message, label, danger) = match &action {
                        PendingAction::ToggleActive(a) if a.is_active => (
                            "Retire add-on",
                            format!("{} will no longer be offered on new bookings.", a.name),
                            "Retire",
                            false,
                        ),
                        PendingAction::ToggleActive(a) => (
                            "Offer add-on",
                            format!("Offer {} on new bookings again?", a.name),
                            "Offer",
                            false,
                        ),
                        PendingAction::Delete(a) => (
                            "Delete add-on",
                            format!("Delete {}?", a.name),
                            "Delete",
                            true,
                        ),
                    };
                    view! {
                        <ConfirmDialog
                            title=title
                            message=message
                            confirm_label=label
                            danger=danger
                            busy=action_busy
                            error=action_error
                            on_confirm=Callback::new(run_pending)
                            on_cancel=Callback::new(move |_| pending.set(None))
                        />
                    }
                })}
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_on(name: &str, active: bool) -> AddOn {
        AddOn {
            id: name.to_lowercase(),
            name: name.into(),
            price: 1_000.0,
            details: String::new(),
            is_active: active,
        }
    }

    #[test]
    fn offered_add_ons_come_first() {
        let all = vec![add_on("Drone", true), add_on("Album", false), add_on("Booth", true)];
        let names = |rows: Vec<AddOn>| rows.into_iter().map(|a| a.name).collect::<Vec<_>>();
        assert_eq!(names(catalog_rows(&all, "", false)), vec!["Booth", "Drone"]);
        assert_eq!(names(catalog_rows(&all, "", true)), vec!["Booth", "Drone", "Album"]);
        assert_eq!(names(catalog_rows(&all, "dro", true)), vec!["Drone"]);
    }
}
