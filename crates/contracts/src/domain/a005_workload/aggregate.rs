use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::AggregateRoot;
use crate::system::roles::Role;

// ============================================================================
// Status
// ============================================================================

/// Deliverable pipeline of a booking, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadStatus {
    Unassigned,
    Scheduled,
    Uploaded,
    ForEdit,
    Editing,
    ForRelease,
    Completed,
}

const PIPELINE: [WorkloadStatus; 7] = [
    WorkloadStatus::Unassigned,
    WorkloadStatus::Scheduled,
    WorkloadStatus::Uploaded,
    WorkloadStatus::ForEdit,
    WorkloadStatus::Editing,
    WorkloadStatus::ForRelease,
    WorkloadStatus::Completed,
];

impl WorkloadStatus {
    pub fn all() -> Vec<WorkloadStatus> {
        PIPELINE.to_vec()
    }

    pub fn index(&self) -> usize {
        PIPELINE.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Option<WorkloadStatus> {
        PIPELINE.get(self.index() + 1).copied()
    }

    pub fn prev(&self) -> Option<WorkloadStatus> {
        self.index().checked_sub(1).and_then(|i| PIPELINE.get(i).copied())
    }

    pub fn code(&self) -> &'static str {
        match self {
            WorkloadStatus::Unassigned => "unassigned",
            WorkloadStatus::Scheduled => "scheduled",
            WorkloadStatus::Uploaded => "uploaded",
            WorkloadStatus::ForEdit => "for_edit",
            WorkloadStatus::Editing => "editing",
            WorkloadStatus::ForRelease => "for_release",
            WorkloadStatus::Completed => "completed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        PIPELINE.iter().copied().find(|s| s.code() == code)
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkloadStatus::Unassigned => "Unassigned",
            WorkloadStatus::Scheduled => "Scheduled",
            WorkloadStatus::Uploaded => "Uploaded",
            WorkloadStatus::ForEdit => "For Edit",
            WorkloadStatus::Editing => "Editing",
            WorkloadStatus::ForRelease => "For Release",
            WorkloadStatus::Completed => "Completed",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            WorkloadStatus::Unassigned => "badge badge--neutral",
            WorkloadStatus::Completed => "badge badge--success",
            WorkloadStatus::ForRelease => "badge badge--info",
            _ => "badge badge--warning",
        }
    }

    /// Moving into this status needs a link to the deliverables
    pub fn requires_deliverable(&self) -> bool {
        matches!(self, WorkloadStatus::ForRelease | WorkloadStatus::Completed)
    }

    /// Whether `role` may move a workload from this status to the next one.
    ///
    /// Assignment (leaving `Unassigned`) goes through `AssignWorkloadDto`,
    /// so it is not an advance for anyone.
    pub fn can_advance(&self, role: Role) -> bool {
        if self.next().is_none() || *self == WorkloadStatus::Unassigned {
            return false;
        }
        match role {
            Role::Owner | Role::Secretary => true,
            Role::Photographer => *self == WorkloadStatus::Scheduled,
            Role::Editor => matches!(self, WorkloadStatus::ForEdit | WorkloadStatus::Editing),
            Role::Client => false,
        }
    }

    /// Only admins step a workload back
    pub fn can_revert(&self, role: Role) -> bool {
        role.is_admin() && self.index() > WorkloadStatus::Scheduled.index()
    }
}

impl std::fmt::Display for WorkloadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    pub id: String,
    pub booking_id: String,
    pub booking_code: String,
    pub client_name: String,
    pub event_date: NaiveDate,
    pub event_type: String,
    pub photographer_id: Option<String>,
    pub photographer_name: Option<String>,
    pub editor_id: Option<String>,
    pub editor_name: Option<String>,
    pub status: WorkloadStatus,
    pub deliverable_link: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

impl Workload {
    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.photographer_id.as_deref() == Some(user_id)
            || self.editor_id.as_deref() == Some(user_id)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != WorkloadStatus::Completed
            && self.deadline.map(|d| d < today).unwrap_or(false)
    }

    fn has_deliverable(&self, link: Option<&str>) -> bool {
        link.or(self.deliverable_link.as_deref())
            .map(|l| !l.trim().is_empty())
            .unwrap_or(false)
    }

    /// Build the status change for the next pipeline step.
    ///
    /// `link` replaces the stored deliverable link when given.
    pub fn advance_request(
        &self,
        role: Role,
        link: Option<&str>,
    ) -> Result<UpdateWorkloadStatusDto, String> {
        let next = self
            .status
            .next()
            .ok_or_else(|| "Workload is already completed".to_string())?;
        if !self.status.can_advance(role) {
            return Err(format!(
                "A {} cannot move this workload from {} to {}",
                role.label().to_lowercase(),
                self.status.label(),
                next.label()
            ));
        }
        if next.requires_deliverable() && !self.has_deliverable(link) {
            return Err(format!(
                "A deliverable link is required before moving to {}",
                next.label()
            ));
        }
        Ok(UpdateWorkloadStatusDto {
            workload_id: self.id.clone(),
            status: next,
            deliverable_link: link
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .or_else(|| self.deliverable_link.clone()),
        })
    }

    pub fn revert_request(&self, role: Role) -> Result<UpdateWorkloadStatusDto, String> {
        if !self.status.can_revert(role) {
            return Err(format!("{} cannot be stepped back", self.status.label()));
        }
        let prev = self
            .status
            .prev()
            .ok_or_else(|| "Workload has no previous step".to_string())?;
        Ok(UpdateWorkloadStatusDto {
            workload_id: self.id.clone(),
            status: prev,
            deliverable_link: self.deliverable_link.clone(),
        })
    }

    pub fn matches_filter(&self, filter: &str) -> bool {
        let needle = filter.trim().to_lowercase();
        needle.is_empty()
            || [
                Some(self.booking_code.as_str()),
                Some(self.client_name.as_str()),
                Some(self.event_type.as_str()),
                self.photographer_name.as_deref(),
                self.editor_name.as_deref(),
            ]
            .iter()
            .flatten()
            .any(|f| f.to_lowercase().contains(&needle))
    }
}

impl AggregateRoot for Workload {
    fn id(&self) -> &str {
        &self.id
    }

    fn code(&self) -> &str {
        &self.booking_code
    }

    fn aggregate_index() -> &'static str {
        "a005"
    }

    fn entity_key() -> &'static str {
        "workload"
    }

    fn collection_name() -> &'static str {
        "workloads"
    }

    fn element_name() -> &'static str {
        "Workload"
    }

    fn list_name() -> &'static str {
        "Workloads"
    }
}

// ============================================================================
// Commands
// ============================================================================

fn is_blank(id: &Option<String>) -> bool {
    id.as_deref().map(str::trim).unwrap_or("").is_empty()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignWorkloadDto {
    pub workload_id: String,
    pub photographer_id: Option<String>,
    pub editor_id: Option<String>,
}

impl AssignWorkloadDto {
    pub fn from_workload(w: &Workload) -> Self {
        Self {
            workload_id: w.id.clone(),
            photographer_id: w.photographer_id.clone(),
            editor_id: w.editor_id.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if is_blank(&self.photographer_id) && is_blank(&self.editor_id) {
            return Err("Select a photographer or an editor".into());
        }
        Ok(())
    }

    /// Status the workload ends up in after this assignment
    pub fn resulting_status(&self, current: WorkloadStatus) -> WorkloadStatus {
        if current == WorkloadStatus::Unassigned && !is_blank(&self.photographer_id) {
            WorkloadStatus::Scheduled
        } else {
            current
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateWorkloadStatusDto {
    pub workload_id: String,
    pub status: WorkloadStatus,
    pub deliverable_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workload(status: WorkloadStatus) -> Workload {
        Workload {
            id: "w1".into(),
            booking_id: "b1".into(),
            booking_code: "BK-0001".into(),
            client_name: "Ana Cruz".into(),
            event_date: NaiveDate::from_ymd_opt(2026, 11, 14).unwrap(),
            event_type: "Wedding".into(),
            photographer_id: Some("ph1".into()),
            photographer_name: Some("Paolo".into()),
            editor_id: Some("ed1".into()),
            editor_name: Some("Ella".into()),
            status,
            deliverable_link: None,
            deadline: NaiveDate::from_ymd_opt(2026, 12, 14),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn pipeline_order() {
        use WorkloadStatus::*;
        assert_eq!(Unassigned.next(), Some(Scheduled));
        assert_eq!(ForEdit.next(), Some(Editing));
        assert_eq!(Completed.next(), None);
        assert_eq!(Unassigned.prev(), None);
        assert_eq!(ForRelease.prev(), Some(Editing));
        assert_eq!(WorkloadStatus::all().len(), 7);
        assert_eq!(Editing.index(), 4);
        assert!(Uploaded < ForEdit);
        assert_eq!(WorkloadStatus::from_code("for_release"), Some(ForRelease));
    }

    #[test]
    fn who_may_advance() {
        use WorkloadStatus::*;
        assert!(Scheduled.can_advance(Role::Photographer));
        assert!(!Uploaded.can_advance(Role::Photographer));
        assert!(ForEdit.can_advance(Role::Editor));
        assert!(Editing.can_advance(Role::Editor));
        assert!(!ForRelease.can_advance(Role::Editor));
        assert!(ForRelease.can_advance(Role::Secretary));
        assert!(!Completed.can_advance(Role::Owner));
        assert!(!Scheduled.can_advance(Role::Client));
        assert!(!Unassigned.can_advance(Role::Owner));
    }

    #[test]
    fn advancing_into_release_needs_a_link() {
        let w = workload(WorkloadStatus::Editing);
        assert_eq!(
            w.advance_request(Role::Editor, None),
            Err("A deliverable link is required before moving to For Release".to_string())
        );
        let req = w
            .advance_request(Role::Editor, Some(" https://drive.example/ana "))
            .unwrap();
        assert_eq!(req.status, WorkloadStatus::ForRelease);
        assert_eq!(req.deliverable_link.as_deref(), Some("https://drive.example/ana"));

        let mut stored = workload(WorkloadStatus::ForRelease);
        stored.deliverable_link = Some("https://drive.example/ana".into());
        let done = stored.advance_request(Role::Owner, None).unwrap();
        assert_eq!(done.status, WorkloadStatus::Completed);
    }

    #[test]
    fn advance_refusal_names_the_role() {
        let w = workload(WorkloadStatus::Uploaded);
        assert_eq!(
            w.advance_request(Role::Photographer, None),
            Err("A photographer cannot move this workload from Uploaded to For Edit".to_string())
        );
    }

    #[test]
    fn revert_is_admin_only() {
        let w = workload(WorkloadStatus::Editing);
        assert_eq!(
            w.revert_request(Role::Owner).map(|r| r.status),
            Ok(WorkloadStatus::ForEdit)
        );
        assert!(w.revert_request(Role::Editor).is_err());
        assert!(workload(WorkloadStatus::Scheduled)
            .revert_request(Role::Owner)
            .is_err());
    }

    #[test]
    fn assignment_schedules_unassigned_work() {
        let dto = AssignWorkloadDto {
            workload_id: "w1".into(),
            photographer_id: Some("ph1".into()),
            editor_id: None,
        };
        assert!(dto.validate().is_ok());
        assert_eq!(
            dto.resulting_status(WorkloadStatus::Unassigned),
            WorkloadStatus::Scheduled
        );
        assert_eq!(
            dto.resulting_status(WorkloadStatus::Editing),
            WorkloadStatus::Editing
        );
        assert!(AssignWorkloadDto::default().validate().is_err());
    }

    #[test]
    fn blank_photographer_does_not_schedule() {
        let editor_only = AssignWorkloadDto {
            workload_id: "w1".into(),
            photographer_id: Some("  ".into()),
            editor_id: Some("ed1".into()),
        };
        assert!(editor_only.validate().is_ok());
        assert_eq!(
            editor_only.resulting_status(WorkloadStatus::Unassigned),
            WorkloadStatus::Unassigned
        );

        let nobody = AssignWorkloadDto {
            workload_id: "w1".into(),
            photographer_id: Some(String::new()),
            editor_id: Some(" ".into()),
        };
        assert!(nobody.validate().is_err());
        assert_eq!(
            nobody.resulting_status(WorkloadStatus::Unassigned),
            WorkloadStatus::Unassigned
        );
    }

    #[test]
    fn assignment_and_deadline() {
        let w = workload(WorkloadStatus::Uploaded);
        assert!(w.is_assigned_to("ed1"));
        assert!(!w.is_assigned_to("someone"));
        let after = NaiveDate::from_ymd_opt(2026, 12, 15).unwrap();
        assert!(w.is_overdue(after));
        assert!(!workload(WorkloadStatus::Completed).is_overdue(after));
        assert!(w.matches_filter("paolo"));
    }
}
