//! Navigation built from the sections the signed-in role may open.

use contracts::system::roles::Section;
use leptos::prelude::*;

use crate::layout::global_context::AppGlobalContext;
use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;

/// Sidebar groups in display order
const GROUPS: &[(&str, &[Section])] = &[
    (
        "Front office",
        &[Section::Bookings, Section::Calendar, Section::Billing],
    ),
    ("Production", &[Section::Workload]),
    (
        "Catalog",
        &[Section::Packages, Section::AddOns, Section::Feedback],
    ),
    ("Insights", &[Section::Reports]),
    ("Settings", &[Section::Accounts, Section::Profile]),
];

/// Groups with at least one section the role may open, sections in group order
fn visible_groups(allowed: &[Section]) -> Vec<(&'static str, Vec<Section>)> {
    GROUPS
        .iter()
        .filter_map(|(label, sections)| {
            let visible: Vec<Section> = sections
                .iter()
                .copied()
                .filter(|s| allowed.contains(s))
                .collect();
            (!visible.is_empty()).then_some((*label, visible))
        })
        .collect()
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (auth_state, _) = use_auth();

    let groups = move || {
        let allowed = auth_state
            .with(|s| s.role())
            .map(|r| r.sections())
            .unwrap_or(&[]);
        visible_groups(allowed)
    };

    view! {
        <div class="app-sidebar__content">
            {move || groups().into_iter().map(|(label, sections)| {
                view! {
                    <div class="app-sidebar__group">
                        <div class="app-sidebar__group-label">{label}</div>
                        {sections.into_iter().map(|section| {
                            let key = section.tab_key();
                            view! {
                                <div
                                    class="app-sidebar__item"
                                    class:app-sidebar__item--active=move || {
                                        ctx.active.with(|a| {
                                            a.as_deref()
                                                .and_then(Section::for_tab_key)
                                                .map(|s| s == section)
                                                .unwrap_or(false)
                                        })
                                    }
                                    style:padding-left="12px"
                                    on:click=move |_| ctx.open_tab(key, section.label())
                                >
                                    <div class="app-sidebar__item-content">
                                        {icon(section.icon())}
                                        <span>{section.label()}</span>
                                    </div>
                                </div>
                            }
                        }).collect_view()}
                    </div>
                }
            }).collect_view()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::roles::Role;

    #[test]
    fn every_section_belongs_to_a_group() {
        let grouped: Vec<Section> = GROUPS.iter().flat_map(|(_, s)| s.iter().copied()).collect();
        for section in Role::Owner.sections() {
            assert!(grouped.contains(section), "{:?} has no sidebar group", section);
        }
    }

    #[test]
    fn editor_sees_only_production_and_settings() {
        let groups = visible_groups(Role::Editor.sections());
        let labels: Vec<&str> = groups.iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["Production", "Settings"]);
        assert_eq!(groups[1].1, vec![Section::Profile]);
    }

    #[test]
    fn client_has_no_reports_or_accounts() {
        let all: Vec<Section> = visible_groups(Role::Client.sections())
            .into_iter()
            .flat_map(|(_, s)| s)
            .collect();
        assert!(all.contains(&Section::Bookings));
        assert!(!all.contains(&Section::Reports));
        assert!(!all.contains(&Section::Accounts));
        assert!(!all.contains(&Section::Workload));
    }
}
