mod state;

use contracts::system::roles::{Permission, Role};
use contracts::system::users::{UpdateUserDto, User};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::components::{ConfirmDialog, PaginationControls};
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    cmp_text, get_sort_class, get_sort_indicator, page_count, page_slice, sort_list, Sortable,
};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::RequirePermission;
use crate::system::users::api;
use crate::system::users::ui::details::{CreateUserForm, EditUserForm, ResetPasswordForm};
use state::create_state;

impl Sortable for User {
    fn compare_by_field(&self, other: &Self, field: &str) -> std::cmp::Ordering {
        match field {
            "email" => cmp_text(&self.email, &other.email),
            "role" => self.role.label().cmp(other.role.label()),
            "is_active" => self.is_active.cmp(&other.is_active),
            "created_at" => self.created_at.cmp(&other.created_at),
            "last_login_at" => self.last_login_at.cmp(&other.last_login_at),
            _ => cmp_text(&self.full_name(), &other.full_name()),
        }
    }
}

/// Search text and role code filter
fn matches_filter(user: &User, query: &str, role: &str) -> bool {
    if !role.is_empty() && user.role.code() != role {
        return false;
    }
    query.is_empty()
        || user.full_name().to_lowercase().contains(query)
        || user.email.to_lowercase().contains(query)
        || user
            .phone
            .as_deref()
            .map(|p| p.contains(query))
            .unwrap_or(false)
}

#[derive(Clone, Debug)]
enum PendingAction {
    ToggleActive(User),
    Delete(User),
}

#[component]
pub fn UsersListPage() -> impl IntoView {
    view! {
        <RequirePermission permission=Permission::ManageAccounts>
            <UsersList />
        </RequirePermission>
    }
}

#[component]
fn UsersList() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let state = create_state();
    let all_users: RwSignal<Vec<User>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let (show_create_form, set_show_create_form) = signal(false);
    let editing_user: RwSignal<Option<User>> = RwSignal::new(None);
    let password_user: RwSignal<Option<User>> = RwSignal::new(None);
    let pending: RwSignal<Option<PendingAction>> = RwSignal::new(None);
    let (action_busy, set_action_busy) = signal(false);
    let (action_error, set_action_error) = signal::<Option<String>>(None);

    let refresh_view = move || {
        let (query, role) =
            state.with_untracked(|s| (s.search_query.to_lowercase(), s.role_filter.clone()));
        let mut data = all_users.get_untracked();
        data.retain(|u| matches_filter(u, &query, &role));
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
            match api::fetch_users().await {
                Ok(data) => {
                    all_users.set(data);
                    state.update(|s| s.is_loaded = true);
                    refresh_view();
                    set_loading.set(false);
                }
                Err(e) => {
                    set_error.set(Some(format!("Failed to load accounts: {}", e)));
                    set_loading.set(false);
                }
            }
        });
    };

    Effect::new(move |_| {
        if !state.with_untracked(|s| s.is_loaded) {
            load_data();
        }
    });

    let search_signal = RwSignal::new(String::new());
    let role_signal = RwSignal::new(String::new());

    let apply_search = move || {
        state.update(|s| {
            s.search_query = search_signal.get_untracked();
            s.role_filter = role_signal.get_untracked();
            s.page = 0;
        });
        refresh_view();
    };

    let reset_search = move || {
        search_signal.set(String::new());
        role_signal.set(String::new());
        state.update(|s| {
            s.search_query.clear();
            s.role_filter.clear();
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

    let go_to_page = move |page: usize| {
        state.update(|s| s.page = page);
        refresh_view();
    };

    let change_page_size = move |size: usize| {
        state.update(|s| {
            s.page_size = size;
            s.page = 0;
        });
        refresh_view();
    };

    let run_pending = move |_reason: Option<String>| {
        let Some(action) = pending.get_untracked() else {
            return;
        };
        set_action_busy.set(true);
        set_action_error.set(None);
        spawn_local(async move {
            let result = match &action {
                PendingAction::ToggleActive(user) => {
                    let mut dto = UpdateUserDto::from_user(user);
                    dto.is_active = !user.is_active;
                    api::update_user(&dto).await
                }
                PendingAction::Delete(user) => api::delete_user(&user.id).await,
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

    let is_me = move |id: &str| auth_state.with(|s| s.user_id().as_deref() == Some(id));

    view! {
        <PageFrame page_id="sys_users--list" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Accounts"</h1>
                    <Badge>{move || state.get().total_count.to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| set_show_create_form.set(true)
                    >
                        {icon("plus")}
                        " New account"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_data()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        {move || if loading.get() { " Loading..." } else { " Refresh" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            {icon("filter")}
                            <span class="filter-panel__title">"Search"</span>
                        </div>
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || state.get().page)
                                total_pages=Signal::derive(move || state.get().total_pages)
                                total_count=Signal::derive(move || state.get().total_count)
                                page_size=Signal::derive(move || state.get().page_size)
                                on_page_change=Callback::new(go_to_page)
                                on_page_size_change=Callback::new(change_page_size)
                            />
                        </div>
                        <div class="filter-panel-header__right"></div>
                    </div>

                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <div style="flex: 1; max-width: 320px;">
                                <Input value=search_signal placeholder="Name, email or phone..." />
                            </div>
                            <div style="width: 180px;">
                                <Select value=role_signal>
                                    <option value="">"All roles"</option>
                                    {Role::all()
                                        .into_iter()
                                        .map(|r| view! { <option value=r.code()>{r.label()}</option> })
                                        .collect_view()}
                                </Select>
                            </div>
                            <Button
                                appearance=ButtonAppearance::Primary
                                on_click=move |_| apply_search()
                                disabled=Signal::derive(move || loading.get())
                            >
                                "Find"
                            </Button>
                            <Button appearance=ButtonAppearance::Secondary on_click=move |_| reset_search()>
                                "Reset"
                            </Button>
                        </Flex>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell resizable=false min_width=180.0>{sort_header("Name", "name")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=180.0>{sort_header("Email", "email")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>{sort_header("Role", "role")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=90.0>{sort_header("Status", "is_active")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=130.0>{sort_header("Created", "created_at")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=130.0>{sort_header("Last sign-in", "last_login_at")}</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=150.0></TableHeaderCell>
                            </TableRow>
                        </TableHeader>

                        <TableBody>
                            <For
                                each=move || state.get().items
                                key=|u| (u.id.clone(), u.is_active, u.role)
                                children=move |user| {
                                    let own_account = is_me(&user.id);
                                    let stored = StoredValue::new(user.clone());
                                    let full_name = user.full_name();
                                    let email = user.email.clone();
                                    let role = user.role;
                                    let is_active = user.is_active;
                                    let created = format_datetime(user.created_at);
                                    let last_login = user
                                        .last_login_at
                                        .map(format_datetime)
                                        .unwrap_or_else(|| "-".to_string());
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <span style="font-weight: 500;">{full_name}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{email}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class={if role.is_staff() { "badge badge--warning" } else { "badge badge--neutral" }}>
                                                        {role.label()}
                                                    </span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {if is_active {
                                                        view! { <span class="badge badge--success">"Active"</span> }.into_any()
                                                    } else {
                                                        view! { <span class="badge badge--error">"Disabled"</span> }.into_any()
                                                    }}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{created}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{last_login}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <Flex gap=FlexGap::Small>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| editing_user.set(Some(stored.get_value()))
                                                        attr:title="Edit"
                                                    >
                                                        {icon("edit")}
                                                    </Button>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| password_user.set(Some(stored.get_value()))
                                                        attr:title="Reset password"
                                                    >
                                                        {icon("lock")}
                                                    </Button>
                                                    <Show when=move || !own_account>
                                                        {
                                                            let (toggle_title, toggle_icon) = if is_active {
                                                                ("Deactivate", "x")
                                                            } else {
                                                                ("Activate", "check")
                                                            };
                                                            view! {
                                                                <Button
                                                                    appearance=ButtonAppearance::Subtle
                                                                    on_click=move |_| {
                                                                        set_action_error.set(None);
                                                                        pending.set(Some(PendingAction::ToggleActive(stored.get_value())));
                                                                    }
                                                                    attr:title=toggle_title
                                                                >
                                                                    {icon(toggle_icon)}
                                                                </Button>
                                                                <Button
                                                                    appearance=ButtonAppearance::Subtle
                                                                    on_click=move |_| {
                                                                        set_action_error.set(None);
                                                                        pending.set(Some(PendingAction::Delete(stored.get_value())));
                                                                    }
                                                                    attr:title="Delete"
                                                                >
                                                                    {icon("trash")}
                                                                </Button>
                                                            }
                                                        }
                                                    </Show>
                                                </Flex>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>

                <Show when=move || show_create_form.get()>
                    <CreateUserForm
                        on_close=Callback::new(move |_| set_show_create_form.set(false))
                        on_created=Callback::new(move |_| {
                            set_show_create_form.set(false);
                            load_data();
                        })
                    />
                </Show>

                {move || editing_user.get().map(|user| view! {
                    <EditUserForm
                        user=user
                        on_close=Callback::new(move |_| editing_user.set(None))
                        on_saved=Callback::new(move |_| {
                            editing_user.set(None);
                            load_data();
                        })
                    />
                })}

                {move || password_user.get().map(|user| view! {
                    <ResetPasswordForm
                        user=user
                        on_close=Callback::new(move |_| password_user.set(None))
                    />
                })}

                {move || pending.get().map(|action| {
                    let (title, message, label, danger) = match &action {
                        PendingAction::ToggleActive(u) if u.is_active => (
                            "Deactivate account",
                            format!("{} will no longer be able to sign in.", u.full_name()),
                            "Deactivate",
                            true,
                        ),
                        PendingAction::ToggleActive(u) => (
                            "Activate account",
                            format!("{} will be able to sign in again.", u.full_name()),
                            "Activate",
                            false,
                        ),
                        PendingAction::Delete(u) => (
                            "Delete account",
                            format!("Delete {} ({})? This cannot be undone.", u.full_name(), u.email),
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
    use chrono::Utc;

    fn user(first: &str, last: &str, email: &str, role: Role) -> User {
        User {
            id: email.into(),
            first_name: first.into(),
            last_name: last.into(),
            email: email.into(),
            phone: Some("0917 555 0101".into()),
            role,
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn filters_by_text_and_role() {
        let ana = user("Ana", "Cruz", "ana@studio.ph", Role::Secretary);
        assert!(matches_filter(&ana, "", ""));
        assert!(matches_filter(&ana, "cruz", ""));
        assert!(matches_filter(&ana, "studio.ph", "secretary"));
        assert!(matches_filter(&ana, "555", ""));
        assert!(!matches_filter(&ana, "", "client"));
        assert!(!matches_filter(&ana, "ben", ""));
    }

    #[test]
    fn sorts_by_name_by_default() {
        let mut rows = vec![
            user("ben", "Yu", "b@x.ph", Role::Client),
            user("Ana", "Cruz", "a@x.ph", Role::Owner),
        ];
        sort_list(&mut rows, "unknown", true);
        assert_eq!(rows[0].first_name, "Ana");
        sort_list(&mut rows, "role", true);
        assert_eq!(rows[0].role, Role::Client);
    }
}
