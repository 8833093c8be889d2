//! Page router state machine.
//!
//! Transitions are absolute jumps between pages. There is no history.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Home,
    Profile,
    Dashboard,
    About,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Profile, Page::Dashboard, Page::About];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Profile => "profile",
            Self::Dashboard => "dashboard",
            Self::About => "about",
        }
    }

    /// Page after `event`, or `None` when the event is not available on
    /// this page.
    pub fn after(self, event: NavigationEvent) -> Option<Page> {
        use NavigationEvent as E;

        match (self, event) {
            (Self::Home, E::StartCheckup) => Some(Self::Profile),
            (Self::Home, E::OpenAbout) => Some(Self::About),
            (Self::Profile, E::SubmitProfile) => Some(Self::Dashboard),
            (Self::Dashboard, E::EditProfile) => Some(Self::Profile),
            (Self::Dashboard, E::CompleteProfile) => Some(Self::Profile),
            (Self::About, E::Back) => Some(Self::Home),
            _ => None,
        }
    }
}

/// User triggered navigation.
///
/// The serialized names are the values of the `event` field in
/// navigation forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationEvent {
    /// "Start free financial checkup" on the home page.
    StartCheckup,
    /// "About Us" on the home page.
    OpenAbout,
    /// Profile form submit.
    SubmitProfile,
    /// "Edit Profile" on the dashboard.
    EditProfile,
    /// "Go to Profile" on the dashboard when required fields are missing.
    CompleteProfile,
    /// "Back to main page" on the about page.
    Back,
}

impl NavigationEvent {
    pub const ALL: [NavigationEvent; 6] = [
        NavigationEvent::StartCheckup,
        NavigationEvent::OpenAbout,
        NavigationEvent::SubmitProfile,
        NavigationEvent::EditProfile,
        NavigationEvent::CompleteProfile,
        NavigationEvent::Back,
    ];

    pub fn form_value(&self) -> &'static str {
        match self {
            Self::StartCheckup => "start_checkup",
            Self::OpenAbout => "open_about",
            Self::SubmitProfile => "submit_profile",
            Self::EditProfile => "edit_profile",
            Self::CompleteProfile => "complete_profile",
            Self::Back => "back",
        }
    }
}
