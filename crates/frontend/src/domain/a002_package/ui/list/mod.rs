mod state;

use contracts::domain::a002_package::{Package, PackageDto};
use contracts::domain::common::AggregateRoot;
use contracts::system::roles::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a002_package::api;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::shared::components::{ConfirmDialog, PaginationControls};
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    cmp_amount, cmp_text, get_sort_class, get_sort_indicator, page_count, page_slice, sort_list,
    Sortable,
};
use crate::shared::number_format::format_money;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::context::use_permission;
use state::create_state;

impl Sortable for Package {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "name" => cmp_text(&self.name, &other.name),
            "is_active" => self.is_active.cmp(&other.is_active),
            _ => cmp_amount(self.price, other.price).then_with(|| cmp_text(&self.name, &other.name)),
        }
    }
}

/// Retired packages are listed only when asked for
fn visible_packages(all: &[Package], query: &str, show_inactive: bool) -> Vec<Package> {
    all.iter()
        .filter(|p| show_inactive || p.is_active)
        .filter(|p| p.matches_filter(query))
        .cloned()
        .collect()
}

#[derive(Clone, Debug)]
enum PendingAction {
    ToggleActive(Package),
    Delete(Package),
}

#[component]
pub fn PackageList() -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let can_manage = use_permission(Permission::ManageCatalog);

    let state = create_state();
    let all_items: RwSignal<Vec<Package>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let pending: RwSignal<Option<PendingAction>> = RwSignal::new(None);
    let (action_busy, set_action_busy) = signal(false);
    let (action_error, set_action_error) = signal::<Option<String>>(None);

    let refresh_view = move || {
        let (query, show_inactive) =
            state.with_untracked(|s| (s.search_query.clone(), s.show_inactive));
        let mut data = all_items.with_untracked(|all| visible_packages(all, &query, show_inactive));
        state.update(|s| {
            sort_list(&mut data, &s.sort_field, s.sort_ascending);
            s.total_count = data.len();
            s.total_pages = page_count(data.len(), s.page_size);
            let (items, page) = page_slice(&data, s.page, s.page_size);
            s.items = items;
            s.page = page;
        });
    };

    let load_data = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::fetch_packages().await {
                Ok(data) => {
                    all_items.set(data);
                    state.update(|s| s.is_loaded = true);
                    refresh_view();
                }
                Err(e) => set_error.set(Some(format!("Failed to load packages: {}", e))),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        if !state.with_untracked(|s| s.is_loaded) {
            load_data();
        }
    });

    let search_signal = RwSignal::new(String::new());
    let show_inactive = RwSignal::new(false);

    let apply_search = move || {
        state.update(|s| {
            s.search_query = search_signal.get_untracked();
            s.show_inactive = show_inactive.get_untracked();
            s.page = 0;
        });
        refresh_view();
    };

    let toggle_sort = move |field: &'static str| {
        move |_| {
            state.update(|s| {
                if s.sort_field == field {
                    s.sort_ascending = !s.sort_ascending;
                } else {
                    s.sort_field = field.to_string();
                    s.sort_ascending = true;
                }
            });
            refresh_view();
        }
    };

    let sort_header = move |label: &'static str, field: &'static str| {
        view! {
            <div class="table__sortable-header" style="cursor:pointer;" on:click=toggle_sort(field)>
                {label}
                <span class=move || state.with(|s| get_sort_class(&s.sort_field, field))>
                    {move || state.with(|s| get_sort_indicator(&s.sort_field, field, s.sort_ascending))}
                </span>
            </div>
        }
    };

    let open_details = move |package: &Package| {
        tabs_store.open_tab(
            &Package::detail_tab_key(&package.id),
            &detail_tab_label(Package::element_name(), &package.name),
        );
    };

    let run_pending = move |_reason: Option<String>| {
        let Some(action) = pending.get_untracked() else {
            return;
        };
        set_action_busy.set(true);
        set_action_error.set(None);
        spawn_local(async move {
            let result = match &action {
                PendingAction::ToggleActive(p) => {
                    let dto = PackageDto {
                        is_active: !p.is_active,
                        ..PackageDto::from_package(p)
                    };
                    api::save_package(&dto).await.map(|_| ())
                }
                PendingAction::Delete(p) => api::delete_package(&p.id).await,
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
        <PageFrame page_id="a002_package--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    {icon("package")}
                    <h1 class="page__title">"Packages"</h1>
                    <Badge>{move || state.get().total_count.to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Show when=move || can_manage.get()>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| tabs_store.open_tab(&Package::new_tab_key(), "New package")
                        >
                            {icon("plus")}
                            " New package"
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
                                <Input value=search_signal placeholder="Name or description..." />
                            </div>
                            <Show when=move || can_manage.get()>
                                <Checkbox checked=show_inactive label="Show retired" />
                            </Show>
                            <Button appearance=ButtonAppearance::Primary on_click=move |_| apply_search()>
                                "Find"
                            </Button>
                            <PaginationControls
                                current_page=Signal::derive(move || state.get().page)
                                total_pages=Signal::derive(move || state.get().total_pages)
                                total_count=Signal::derive(move || state.get().total_count)
                                page_size=Signal::derive(move || state.get().page_size)
                                on_page_change=Callback::new(move |page| {
                                    state.update(|s| s.page = page);
                                    refresh_view();
                                })
                                on_page_size_change=Callback::new(move |size| {
                                    state.update(|s| {
                                        s.page_size = size;
                                        s.page = 0;
                                    });
                                    refresh_view();
                                })
                            />
                        </Flex>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell resizable=false min_width=180.0>{sort_header("Package", "name")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=120.0>{sort_header("Price", "price")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=280.0>"Inclusions"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=100.0>{sort_header("Status", "is_active")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=120.0></TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || state.get().items
                                key=|p| (p.id.clone(), p.is_active, p.name.clone())
                                children=move |package| {
                                    let for_open = package.clone();
                                    let stored = StoredValue::new(package.clone());
                                    let (toggle_title, toggle_icon) = if package.is_active {
                                        ("Retire", "x")
                                    } else {
                                        ("Offer again", "check")
                                    };
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <a
                                                        href="#"
                                                        class="table__link"
                                                        on:click=move |ev| {
                                                            ev.prevent_default();
                                                            open_details(&for_open);
                                                        }
                                                    >
                                                        {package.name.clone()}
                                                    </a>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_money(package.price)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{package.inclusions.join(", ")}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {if package.is_active {
                                                        view! { <span class="badge badge--success">"Offered"</span> }.into_any()
                                                    } else {
                                                        view! { <span class="badge badge--neutral">"Retired"</span> }.into_any()
                                                    }}
                                                </TableCellLayout>
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
                                                            {icon(toggle_icon)}
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
                        PendingAction::ToggleActive(p) if p.is_active => (
                            "Retire package",
                            format!("{} will no longer be offered for new bookings.", p.name),
                            "Retire",
                            false,
                        ),
                        PendingAction::ToggleActive(p) => (
                            "Offer package",
                            format!("Offer {} for new bookings again?", p.name),
                            "Offer",
                            false,
                        ),
                        PendingAction::Delete(p) => (
                            "Delete package",
                            format!("Delete {}? Existing bookings keep their package name.", p.name),
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

    fn package(name: &str, price: f64, active: bool) -> Package {
        Package {
            id: name.to_lowercase(),
            name: name.into(),
            price,
            details: format!("{} coverage", name),
            inclusions: vec![],
            is_active: active,
        }
    }

    #[test]
    fn hides_retired_packages_by_default() {
        let all = vec![package("Gold", 45_000.0, true), package("Legacy", 9_000.0, false)];
        assert_eq!(visible_packages(&all, "", false).len(), 1);
        assert_eq!(visible_packages(&all, "", true).len(), 2);
        assert_eq!(visible_packages(&all, "legacy", true)[0].name, "Legacy");
    }

    #[test]
    fn sorts_by_price_then_name() {
        let mut rows = vec![
            package("Silver", 25_000.0, true),
            package("Bronze", 15_000.0, true),
            package("Basic", 15_000.0, true),
        ];
        sort_list(&mut rows, "price", true);
        let names: Vec<_> = rows.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Basic", "Bronze", "Silver"]);
    }
}
