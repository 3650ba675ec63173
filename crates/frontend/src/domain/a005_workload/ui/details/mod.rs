mod assign_panel;
mod stepper;

use contracts::domain::a005_workload::{UpdateWorkloadStatusDto, Workload, WorkloadStatus};
use contracts::domain::common::AggregateRoot;
use contracts::system::roles::{Permission, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a005_workload::api;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::detail_tab_label;
use crate::shared::components::ConfirmDialog;
use crate::shared::date_utils::{format_date, format_date_opt, format_datetime, today};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::system::auth::context::use_auth;
use assign_panel::AssignPanel;
use stepper::StatusStepper;

fn link_input(text: &str) -> Option<&str> {
    let text = text.trim();
    (!text.is_empty()).then_some(text)
}

#[component]
pub fn WorkloadDetails(id: String, on_close: Callback<()>) -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (auth_state, _) = use_auth();
    let role = auth_state.with_untracked(|s| s.role()).unwrap_or(Role::Client);
    let can_assign = role.has(Permission::AssignWorkload);
    let can_update = role.has(Permission::UpdateWorkloadStatus);

    let id = StoredValue::new(id);
    let workload = RwSignal::new(None::<Workload>);
    let link = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (busy, set_busy) = signal(false);
    let confirm_revert = RwSignal::new(false);

    let load = move || {
        spawn_local(async move {
            match api::fetch_workload(&id.get_value()).await {
                Ok(w) => {
                    link.set(w.deliverable_link.clone().unwrap_or_default());
                    workload.set(Some(w));
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };
    load();

    Effect::new(move || {
        if let Some(code) = workload.with(|w| w.as_ref().map(|w| w.booking_code.clone())) {
            tabs_store.update_tab_title(
                &Workload::detail_tab_key(&id.get_value()),
                &detail_tab_label(Workload::element_name(), &code),
            );
        }
    });

    let send = move |dto: UpdateWorkloadStatusDto| {
        set_busy.set(true);
        set_error.set(None);
        spawn_local(async move {
            let result = api::update_status(&dto).await;
            set_busy.set(false);
            match result {
                Ok(()) => {
                    log::info!("workload {} moved to {}", dto.workload_id, dto.status.label());
                    confirm_revert.set(false);
                    load();
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let advance = move |_| {
        let request = workload.with_untracked(|w| {
            w.as_ref()
                .map(|w| link.with_untracked(|l| w.advance_request(role, link_input(l))))
        });
        match request {
            Some(Ok(dto)) => send(dto),
            Some(Err(e)) => set_error.set(Some(e)),
            None => {}
        }
    };

    let revert = move |_: Option<String>| {
        match workload.with_untracked(|w| w.as_ref().map(|w| w.revert_request(role))) {
            Some(Ok(dto)) => send(dto),
            Some(Err(e)) => set_error.set(Some(e)),
            None => {}
        }
    };

    let status = Signal::derive(move || {
        workload.with(|w| w.as_ref().map(|w| w.status).unwrap_or(WorkloadStatus::Unassigned))
    });
    let next_status = move || status.get().next();
    let shows_advance = move || can_update && status.get().can_advance(role);
    let shows_revert = move || can_update && status.get().can_revert(role);
    let needs_link = move || next_status().map(|s| s.requires_deliverable()).unwrap_or(false);

    view! {
        <PageFrame page_id="a005_workload--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    {icon("camera")}
                    <h2>
                        "Workload"
                        {move || workload.with(|w| w.as_ref().map(|w| format!(" {}", w.booking_code)))}
                    </h2>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load()>
                        {icon("refresh")}
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                        {icon("x")}
                        " Close"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                {move || workload.get().map(|w| {
                    let overdue = w.is_overdue(today());
                    let for_panel = w.clone();
                    view! {
                        <StatusStepper status=status />
                        <div class="details__grid">
                            <div class="details__field">
                                <span class="details__label">"Client"</span>
                                <span>{w.client_name.clone()}</span>
                            </div>
                            <div class="details__field">
                                <span class="details__label">"Event"</span>
                                <span>{format!("{} · {}", w.event_type, format_date(w.event_date))}</span>
                            </div>
                            <div class="details__field">
                                <span class="details__label">"Photographer"</span>
                                <span>{w.photographer_name.clone().unwrap_or_else(|| "Not assigned".into())}</span>
                            </div>
                            <div class="details__field">
                                <span class="details__label">"Editor"</span>
                                <span>{w.editor_name.clone().unwrap_or_else(|| "Not assigned".into())}</span>
                            </div>
                            <div class="details__field">
                                <span class="details__label">"Deadline"</span>
                                <span>
                                    {format_date_opt(w.deadline)}
                                    {overdue.then(|| view! { <span class="badge badge--error">" overdue"</span> })}
                                </span>
                            </div>
                            <div class="details__field">
                                <span class="details__label">"Deliverables"</span>
                                {match w.deliverable_link.clone() {
                                    Some(url) => {
                                        let href = url.clone();
                                        view! {
                                            <a href=href target="_blank" rel="noopener">{url}</a>
                                        }.into_any()
                                    }
                                    None => view! { <span>"-"</span> }.into_any(),
                                }}
                            </div>
                            <div class="details__field">
                                <span class="details__label">"Updated"</span>
                                <span>{format_datetime(w.updated_at)}</span>
                            </div>
                        </div>
                        {can_assign.then(|| view! {
                            <AssignPanel workload=for_panel on_saved=Callback::new(move |_| load()) />
                        })}
                    }
                })}

                <Show when=move || shows_advance() || shows_revert()>
                    <div class="details__section">
                        <h3>"Progress"</h3>
                        <div class="form__group">
                            <Label>{move || if needs_link() { "Deliverable link (required)" } else { "Deliverable link" }}</Label>
                            <Input value=link placeholder="https://..." />
                        </div>
                        <Flex gap=FlexGap::Small>
                            <Show when=shows_advance>
                                <Button
                                    appearance=ButtonAppearance::Primary
                                    on_click=advance
                                    disabled=Signal::derive(move || busy.get())
                                >
                                    {icon("arrow-right")}
                                    {move || next_status().map(|s| format!(" Move to {}", s.label())).unwrap_or_default()}
                                </Button>
                            </Show>
                            <Show when=shows_revert>
                                <Button
                                    appearance=ButtonAppearance::Secondary
                                    on_click=move |_| confirm_revert.set(true)
                                    disabled=Signal::derive(move || busy.get())
                                >
                                    {icon("arrow-left")}
                                    " Step back"
                                </Button>
                            </Show>
                        </Flex>
                    </div>
                </Show>

                <Show when=move || confirm_revert.get()>
                    <ConfirmDialog
                        title="Step back"
                        message=format!(
                            "Move this workload back to {}?",
                            status.get_untracked().prev().map(|s| s.label()).unwrap_or("the previous step"),
                        )
                        confirm_label="Step back"
                        busy=busy
                        error=error
                        on_confirm=Callback::new(revert)
                        on_cancel=Callback::new(move |_| confirm_revert.set(false))
                    />
                </Show>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_link_is_not_sent() {
        assert_eq!(link_input("  "), None);
        assert_eq!(link_input(" https://drive.test/x "), Some("https://drive.test/x"));
    }
}
