use contracts::domain::a005_workload::{AssignWorkloadDto, Workload};
use contracts::system::auth::UserInfo;
use contracts::system::roles::Role;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a005_workload::api;
use crate::system::users::api as users_api;

/// Staff members who can take the given job, sorted by name
pub fn staff_for(staff: &[UserInfo], role: Role) -> Vec<UserInfo> {
    let mut out: Vec<UserInfo> = staff.iter().filter(|u| u.role == role).cloned().collect();
    out.sort_by(|a, b| a.full_name.cmp(&b.full_name));
    out
}

fn selected(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// Photographer and editor pickers for one workload
#[component]
pub fn AssignPanel(workload: Workload, on_saved: Callback<()>) -> impl IntoView {
    let status = workload.status;
    let workload_id = StoredValue::new(workload.id.clone());
    let photographer = RwSignal::new(workload.photographer_id.clone().unwrap_or_default());
    let editor = RwSignal::new(workload.editor_id.clone().unwrap_or_default());
    let staff = RwSignal::new(Vec::<UserInfo>::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    spawn_local(async move {
        match users_api::fetch_staff().await {
            Ok(list) => staff.set(list),
            Err(e) => set_error.set(Some(e)),
        }
    });

    let dto = move || AssignWorkloadDto {
        workload_id: workload_id.get_value(),
        photographer_id: selected(photographer.get()),
        editor_id: selected(editor.get()),
    };

    let save = move |_| {
        let dto = dto();
        if let Err(e) = dto.validate() {
            set_error.set(Some(e));
            return;
        }
        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            let result = api::assign(&dto).await;
            set_saving.set(false);
            match result {
                Ok(()) => on_saved.run(()),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let options = move |role: Role| {
        staff.with(|s| {
            staff_for(s, role)
                .into_iter()
                .map(|u| view! { <option value=u.id.clone()>{u.full_name.clone()}</option> })
                .collect_view()
        })
    };

    view! {
        <div class="details__section">
            <h3>"Assignment"</h3>
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            <div class="form__row">
                <div class="form__group">
                    <Label>"Photographer"</Label>
                    <Select value=photographer>
                        <option value="">"Not assigned"</option>
                        {move || options(Role::Photographer)}
                    </Select>
                </div>
                <div class="form__group">
                    <Label>"Editor"</Label>
                    <Select value=editor>
                        <option value="">"Not assigned"</option>
                        {move || options(Role::Editor)}
                    </Select>
                </div>
            </div>
            <Flex gap=FlexGap::Small align=FlexAlign::Center>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=save
                    disabled=Signal::derive(move || saving.get())
                >
                    {move || if saving.get() { "Saving..." } else { "Save assignment" }}
                </Button>
                {move || {
                    let next = dto().resulting_status(status);
                    (next != status).then(|| view! {
                        <span class="details__hint">{format!("Saving moves the workload to {}", next.label())}</span>
                    })
                }}
            </Flex>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, name: &str, role: Role) -> UserInfo {
        UserInfo {
            id: id.into(),
            email: format!("{}@studio.test", id),
            full_name: name.into(),
            role,
        }
    }

    #[test]
    fn pickers_list_matching_staff_by_name() {
        let staff = vec![
            user("u1", "Mara", Role::Photographer),
            user("u2", "Leo", Role::Editor),
            user("u3", "Ben", Role::Photographer),
            user("u4", "Ola", Role::Secretary),
        ];
        let names: Vec<String> = staff_for(&staff, Role::Photographer)
            .into_iter()
            .map(|u| u.full_name)
            .collect();
        assert_eq!(names, vec!["Ben", "Mara"]);
        assert_eq!(staff_for(&staff, Role::Editor).len(), 1);
    }

    #[test]
    fn blank_selection_is_none() {
        assert_eq!(selected(" ".into()), None);
        assert_eq!(selected("u1".into()), Some("u1".to_string()));
    }
}
