use serde::{Deserialize, Serialize};

/// Account role. Decides the navigation a user sees and which actions the
/// API will accept from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Secretary,
    Photographer,
    Editor,
    Client,
}

/// Top-level navigation section of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Bookings,
    Calendar,
    Billing,
    Workload,
    Packages,
    AddOns,
    Feedback,
    Reports,
    Accounts,
    Profile,
}

/// Individual action rights checked before a button is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageAccounts,
    CreateBooking,
    ApproveBookings,
    ManageCalendar,
    EditBilling,
    RecordPayments,
    AssignWorkload,
    UpdateWorkloadStatus,
    ManageCatalog,
    ModerateFeedback,
    SubmitFeedback,
    ViewReports,
}

const OWNER_SECTIONS: &[Section] = &[
    Section::Bookings,
    Section::Calendar,
    Section::Billing,
    Section::Workload,
    Section::Packages,
    Section::AddOns,
    Section::Feedback,
    Section::Reports,
    Section::Accounts,
    Section::Profile,
];

const SECRETARY_SECTIONS: &[Section] = &[
    Section::Bookings,
    Section::Calendar,
    Section::Billing,
    Section::Workload,
    Section::Packages,
    Section::AddOns,
    Section::Feedback,
    Section::Reports,
    Section::Profile,
];

const PHOTOGRAPHER_SECTIONS: &[Section] = &[Section::Calendar, Section::Workload, Section::Profile];

const EDITOR_SECTIONS: &[Section] = &[Section::Workload, Section::Profile];

const CLIENT_SECTIONS: &[Section] = &[
    Section::Bookings,
    Section::Calendar,
    Section::Billing,
    Section::Packages,
    Section::AddOns,
    Section::Feedback,
    Section::Profile,
];

impl Role {
    pub fn all() -> Vec<Role> {
        vec![
            Role::Owner,
            Role::Secretary,
            Role::Photographer,
            Role::Editor,
            Role::Client,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Secretary => "secretary",
            Role::Photographer => "photographer",
            Role::Editor => "editor",
            Role::Client => "client",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "owner" => Some(Role::Owner),
            "secretary" => Some(Role::Secretary),
            "photographer" => Some(Role::Photographer),
            "editor" => Some(Role::Editor),
            "client" => Some(Role::Client),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Owner => "Owner",
            Role::Secretary => "Secretary",
            Role::Photographer => "Photographer",
            Role::Editor => "Editor",
            Role::Client => "Client",
        }
    }

    /// Studio personnel, as opposed to clients
    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Client)
    }

    /// Owner and Secretary run the front office and see every record
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Owner | Role::Secretary)
    }

    /// Sections in sidebar order
    pub fn sections(&self) -> &'static [Section] {
        match self {
            Role::Owner => OWNER_SECTIONS,
            Role::Secretary => SECRETARY_SECTIONS,
            Role::Photographer => PHOTOGRAPHER_SECTIONS,
            Role::Editor => EDITOR_SECTIONS,
            Role::Client => CLIENT_SECTIONS,
        }
    }

    pub fn can_access(&self, section: Section) -> bool {
        self.sections().contains(&section)
    }

    pub fn has(&self, permission: Permission) -> bool {
        use Permission::*;
        match self {
            Role::Owner => !matches!(permission, SubmitFeedback),
            Role::Secretary => !matches!(permission, ManageAccounts | SubmitFeedback),
            Role::Photographer => matches!(permission, UpdateWorkloadStatus),
            Role::Editor => matches!(permission, UpdateWorkloadStatus),
            Role::Client => matches!(permission, CreateBooking | SubmitFeedback),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Section {
    /// Tab key opened when the section is picked in the sidebar
    pub fn tab_key(&self) -> &'static str {
        match self {
            Section::Bookings => "a001_booking",
            Section::Calendar => "a001_booking_calendar",
            Section::Billing => "a004_billing",
            Section::Workload => "a005_workload",
            Section::Packages => "a002_package",
            Section::AddOns => "a003_add_on",
            Section::Feedback => "a006_feedback",
            Section::Reports => "d400_reports",
            Section::Accounts => "sys_users",
            Section::Profile => "sys_profile",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Bookings => "Bookings",
            Section::Calendar => "Calendar",
            Section::Billing => "Billing",
            Section::Workload => "Workload",
            Section::Packages => "Packages",
            Section::AddOns => "Add-ons",
            Section::Feedback => "Feedback",
            Section::Reports => "Reports",
            Section::Accounts => "Accounts",
            Section::Profile => "My profile",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Section::Bookings => "file-text",
            Section::Calendar => "calendar",
            Section::Billing => "credit-card",
            Section::Workload => "layers",
            Section::Packages => "package",
            Section::AddOns => "plus",
            Section::Feedback => "message-square",
            Section::Reports => "bar-chart",
            Section::Accounts => "users",
            Section::Profile => "user",
        }
    }

    /// Resolve the section that owns a tab key, detail tabs included
    pub fn for_tab_key(key: &str) -> Option<Section> {
        // calendar shares the a001 prefix, so it has to be checked first
        if key.starts_with("a001_booking_calendar") {
            return Some(Section::Calendar);
        }
        let all = [
            Section::Bookings,
            Section::Billing,
            Section::Workload,
            Section::Packages,
            Section::AddOns,
            Section::Feedback,
            Section::Reports,
            Section::Accounts,
            Section::Profile,
        ];
        all.into_iter().find(|s| key.starts_with(s.tab_key()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_sees_every_section() {
        for section in OWNER_SECTIONS {
            assert!(Role::Owner.can_access(*section));
        }
        assert!(Role::Owner.has(Permission::ManageAccounts));
        assert!(!Role::Owner.has(Permission::SubmitFeedback));
    }

    #[test]
    fn secretary_cannot_manage_accounts() {
        assert!(!Role::Secretary.can_access(Section::Accounts));
        assert!(!Role::Secretary.has(Permission::ManageAccounts));
        assert!(Role::Secretary.has(Permission::ApproveBookings));
        assert!(Role::Secretary.has(Permission::RecordPayments));
    }

    #[test]
    fn production_staff_only_see_their_work() {
        assert_eq!(
            Role::Editor.sections(),
            &[Section::Workload, Section::Profile]
        );
        assert!(Role::Photographer.can_access(Section::Calendar));
        assert!(!Role::Photographer.can_access(Section::Billing));
        assert!(Role::Photographer.has(Permission::UpdateWorkloadStatus));
        assert!(!Role::Photographer.has(Permission::AssignWorkload));
    }

    #[test]
    fn client_rights() {
        assert!(!Role::Client.is_staff());
        assert!(Role::Client.has(Permission::CreateBooking));
        assert!(Role::Client.has(Permission::SubmitFeedback));
        assert!(!Role::Client.has(Permission::ManageCatalog));
        assert!(!Role::Client.can_access(Section::Workload));
        assert!(!Role::Client.can_access(Section::Reports));
    }

    #[test]
    fn role_codes_round_trip_through_serde() {
        let json = serde_json::to_string(&Role::Photographer).unwrap();
        assert_eq!(json, "\"photographer\"");
        for role in Role::all() {
            assert_eq!(Role::from_code(role.code()), Some(role));
        }
        assert_eq!(Role::from_code("admin"), None);
    }

    #[test]
    fn tab_keys_resolve_to_sections() {
        assert_eq!(
            Section::for_tab_key("a001_booking_calendar"),
            Some(Section::Calendar)
        );
        assert_eq!(
            Section::for_tab_key("a001_booking_detail_42"),
            Some(Section::Bookings)
        );
        assert_eq!(
            Section::for_tab_key("a004_billing_detail_7"),
            Some(Section::Billing)
        );
        assert_eq!(Section::for_tab_key("unknown"), None);
    }
}
