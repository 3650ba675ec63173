use contracts::domain::a005_workload::WorkloadStatus;
use leptos::prelude::*;

fn step_class(step: WorkloadStatus, current: WorkloadStatus) -> &'static str {
    if step < current || current == WorkloadStatus::Completed {
        "stepper__step stepper__step--done"
    } else if step == current {
        "stepper__step stepper__step--current"
    } else {
        "stepper__step"
    }
}

/// The deliverable pipeline with the current step highlighted
#[component]
pub fn StatusStepper(#[prop(into)] status: Signal<WorkloadStatus>) -> impl IntoView {
    view! {
        <ol class="stepper">
            {WorkloadStatus::all()
                .into_iter()
                .map(|step| view! {
                    <li class=move || step_class(step, status.get())>
                        <span class="stepper__index">{step.index() + 1}</span>
                        <span class="stepper__label">{step.label()}</span>
                    </li>
                })
                .collect_view()}
        </ol>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_done_current_and_upcoming_steps() {
        let current = WorkloadStatus::ForEdit;
        assert!(step_class(WorkloadStatus::Scheduled, current).ends_with("--done"));
        assert!(step_class(WorkloadStatus::ForEdit, current).ends_with("--current"));
        assert_eq!(step_class(WorkloadStatus::Completed, current), "stepper__step");
        assert!(step_class(WorkloadStatus::Completed, WorkloadStatus::Completed).ends_with("--done"));
    }
}
