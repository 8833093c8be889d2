//! Per browser session state.

pub mod cleanup;

use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use model::{NavigationEvent, Page, Profile, ProfileStore};
use tokio::{
    sync::{Mutex, MutexGuard, RwLock},
    time::Instant,
};
use tracing::{debug, info};
use uuid::Uuid;

pub const SESSION_COOKIE_NAME: &str = "astra_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(text: &str) -> Option<Self> {
        Uuid::try_parse(text).ok().map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigate(NavigationEvent),
    SubmitProfile(Profile),
    RequestAdvice,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Navigate(event) => event.form_value(),
            Self::SubmitProfile(_) => "submit_profile_form",
            Self::RequestAdvice => "request_advice",
        }
    }
}

/// Advice request which the caller must run and report back with
/// [`Session::finish_advice`].
#[derive(Debug, Clone, PartialEq)]
pub struct AdviceTicket {
    pub generation: u64,
    pub profile: Profile,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Updated,
    /// Action is not possible on the current page.
    Ignored,
    StartAdvice(AdviceTicket),
}

#[derive(Debug)]
pub struct Session {
    page: Page,
    profile: ProfileStore,
    advice: Option<String>,
    advice_error: Option<String>,
    loading: bool,
    /// Incremented when the current advice request becomes outdated.
    advice_generation: u64,
    last_activity: Instant,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            page: Page::default(),
            profile: ProfileStore::default(),
            advice: None,
            advice_error: None,
            loading: false,
            advice_generation: 0,
            last_activity: Instant::now(),
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn profile(&self) -> &Profile {
        self.profile.get()
    }

    pub fn advice(&self) -> Option<&str> {
        self.advice.as_deref()
    }

    pub fn advice_error(&self) -> Option<&str> {
        self.advice_error.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn apply(&mut self, action: Action) -> ActionOutcome {
        match action {
            // Profile submission must carry the form values.
            Action::Navigate(NavigationEvent::SubmitProfile) => ActionOutcome::Ignored,
            Action::Navigate(event) => match self.page.after(event) {
                Some(next) => {
                    self.page = next;
                    ActionOutcome::Updated
                }
                None => ActionOutcome::Ignored,
            },
            Action::SubmitProfile(profile) => {
                let Some(next) = self.page.after(NavigationEvent::SubmitProfile) else {
                    return ActionOutcome::Ignored;
                };
                self.profile.set(profile);
                self.clear_advice();
                self.page = next;
                ActionOutcome::Updated
            }
            Action::RequestAdvice => {
                if self.page != Page::Dashboard
                    || self.loading
                    || !self.profile.get().has_dashboard_fields()
                {
                    return ActionOutcome::Ignored;
                }
                self.clear_advice();
                self.loading = true;
                ActionOutcome::StartAdvice(AdviceTicket {
                    generation: self.advice_generation,
                    profile: self.profile.get().clone(),
                })
            }
        }
    }

    /// Store result of an advice request. Results of outdated requests
    /// are discarded and false is returned.
    pub fn finish_advice(&mut self, generation: u64, result: Result<String, String>) -> bool {
        if !self.loading || generation != self.advice_generation {
            return false;
        }

        self.loading = false;
        match result {
            Ok(advice) => self.advice = Some(advice),
            Err(message) => self.advice_error = Some(message),
        }
        true
    }

    /// Remove all user data from the session.
    pub fn wipe(&mut self) {
        self.profile.reset();
        self.clear_advice();
        self.page = Page::default();
    }

    fn clear_advice(&mut self) {
        self.advice = None;
        self.advice_error = None;
        self.loading = false;
        self.advice_generation += 1;
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    fn idle_time(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }
}

#[derive(Debug, Default)]
pub struct SessionEntry {
    session: Mutex<Session>,
}

impl SessionEntry {
    /// Lock for handling a request from the session owner.
    pub async fn access(&self) -> MutexGuard<'_, Session> {
        let mut session = self.session.lock().await;
        session.touch();
        session
    }

    /// Lock without updating the activity time.
    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().await
    }
}

pub struct SessionHandle {
    pub id: SessionId,
    pub entry: Arc<SessionEntry>,
    /// Browser does not know the session ID yet.
    pub created: bool,
}

#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<SessionEntry>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unknown and missing IDs get a new session with a new ID.
    pub async fn get_or_create(&self, id: Option<SessionId>) -> SessionHandle {
        if let Some(id) = id {
            if let Some(entry) = self.sessions.read().await.get(&id) {
                return SessionHandle {
                    id,
                    entry: entry.clone(),
                    created: false,
                };
            }
        }

        let id = SessionId::new_random();
        let entry = Arc::new(SessionEntry::default());
        let count = {
            let mut sessions = self.sessions.write().await;
            sessions.insert(id, entry.clone());
            sessions.len()
        };
        debug!("New session created, {} sessions active", count);
        SessionHandle {
            id,
            entry,
            created: true,
        }
    }

    pub async fn get(&self, id: SessionId) -> Option<Arc<SessionEntry>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Returns false if the session did not exist.
    pub async fn end_session(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(entry) => {
                entry.lock().await.wipe();
                true
            }
            None => false,
        }
    }

    /// Returns count of removed sessions. Sessions which are
    /// currently locked are in use and stay.
    pub async fn remove_idle(&self, idle_timeout: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let count_before = sessions.len();
        sessions.retain(|_, entry| match entry.session.try_lock() {
            Ok(mut session) => {
                if session.idle_time(now) >= idle_timeout {
                    session.wipe();
                    false
                } else {
                    true
                }
            }
            Err(_) => true,
        });
        let removed = count_before - sessions.len();
        if removed > 0 {
            info!("Removed {} idle sessions", removed);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use model::Age;

    use super::*;

    fn complete_profile() -> Profile {
        Profile {
            age: Age::new(30),
            target_retirement_age: Age::new(65),
            income: "100000".to_string(),
            cash_savings: "20000".to_string(),
            investments: "50000".to_string(),
            retirement_accounts: "20000".to_string(),
            kids_ages: String::new(),
        }
    }

    fn session_on_dashboard() -> Session {
        let mut session = Session::new();
        session.apply(Action::Navigate(NavigationEvent::StartCheckup));
        session.apply(Action::SubmitProfile(complete_profile()));
        session
    }

    fn start_advice(session: &mut Session) -> AdviceTicket {
        match session.apply(Action::RequestAdvice) {
            ActionOutcome::StartAdvice(ticket) => ticket,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn new_session_starts_from_home_with_empty_profile() {
        let session = Session::new();
        assert_eq!(session.page(), Page::Home);
        assert_eq!(session.profile(), &Profile::default());
        assert_eq!(session.advice(), None);
        assert!(!session.loading());
    }

    #[test]
    fn checkup_flow_reaches_dashboard() {
        let session = session_on_dashboard();
        assert_eq!(session.page(), Page::Dashboard);
        assert_eq!(session.profile(), &complete_profile());
    }

    #[test]
    fn navigation_event_for_other_page_is_ignored() {
        let mut session = Session::new();
        assert_eq!(
            session.apply(Action::Navigate(NavigationEvent::EditProfile)),
            ActionOutcome::Ignored
        );
        assert_eq!(session.page(), Page::Home);
    }

    #[test]
    fn submit_navigation_without_form_values_is_ignored() {
        let mut session = Session::new();
        session.apply(Action::Navigate(NavigationEvent::StartCheckup));
        assert_eq!(
            session.apply(Action::Navigate(NavigationEvent::SubmitProfile)),
            ActionOutcome::Ignored
        );
        assert_eq!(session.page(), Page::Profile);
    }

    #[test]
    fn profile_submit_outside_profile_page_is_ignored() {
        let mut session = Session::new();
        assert_eq!(
            session.apply(Action::SubmitProfile(complete_profile())),
            ActionOutcome::Ignored
        );
        assert_eq!(session.profile(), &Profile::default());
    }

    #[test]
    fn about_page_back_returns_home() {
        let mut session = Session::new();
        session.apply(Action::Navigate(NavigationEvent::OpenAbout));
        assert_eq!(session.page(), Page::About);
        session.apply(Action::Navigate(NavigationEvent::Back));
        assert_eq!(session.page(), Page::Home);
    }

    #[test]
    fn advice_result_is_stored() {
        let mut session = session_on_dashboard();
        let ticket = start_advice(&mut session);
        assert!(session.loading());
        assert_eq!(ticket.profile, complete_profile());

        assert!(session.finish_advice(ticket.generation, Ok("Save more.".to_string())));
        assert!(!session.loading());
        assert_eq!(session.advice(), Some("Save more."));
        assert_eq!(session.advice_error(), None);
    }

    #[test]
    fn advice_error_is_stored_separately() {
        let mut session = session_on_dashboard();
        let ticket = start_advice(&mut session);
        assert!(session.finish_advice(ticket.generation, Err("Error generating advice: x".to_string())));
        assert_eq!(session.advice(), None);
        assert_eq!(session.advice_error(), Some("Error generating advice: x"));
    }

    #[test]
    fn advice_request_while_loading_is_ignored() {
        let mut session = session_on_dashboard();
        start_advice(&mut session);
        assert_eq!(session.apply(Action::RequestAdvice), ActionOutcome::Ignored);
    }

    #[test]
    fn advice_request_needs_complete_profile() {
        let mut session = Session::new();
        session.apply(Action::Navigate(NavigationEvent::StartCheckup));
        session.apply(Action::SubmitProfile(Profile::default()));
        assert_eq!(session.page(), Page::Dashboard);
        assert_eq!(session.apply(Action::RequestAdvice), ActionOutcome::Ignored);
    }

    #[test]
    fn advice_request_outside_dashboard_is_ignored() {
        let mut session = Session::new();
        assert_eq!(session.apply(Action::RequestAdvice), ActionOutcome::Ignored);
    }

    #[test]
    fn new_advice_request_replaces_previous_advice() {
        let mut session = session_on_dashboard();
        let ticket = start_advice(&mut session);
        session.finish_advice(ticket.generation, Ok("First".to_string()));

        start_advice(&mut session);
        assert_eq!(session.advice(), None);
        assert!(session.loading());
    }

    #[test]
    fn resubmitted_profile_discards_running_advice_request() {
        let mut session = session_on_dashboard();
        let ticket = start_advice(&mut session);

        session.apply(Action::Navigate(NavigationEvent::EditProfile));
        session.apply(Action::SubmitProfile(complete_profile()));
        assert!(!session.loading());

        assert!(!session.finish_advice(ticket.generation, Ok("Old".to_string())));
        assert_eq!(session.advice(), None);
    }

    #[test]
    fn wipe_removes_user_data() {
        let mut session = session_on_dashboard();
        let ticket = start_advice(&mut session);
        session.finish_advice(ticket.generation, Ok("Advice".to_string()));

        session.wipe();
        assert_eq!(session.page(), Page::Home);
        assert_eq!(session.profile(), &Profile::default());
        assert_eq!(session.advice(), None);
    }

    #[test]
    fn session_id_parsing() {
        let id = SessionId::new_random();
        assert_eq!(SessionId::parse(&id.to_string()), Some(id));
        assert_eq!(SessionId::parse("not-a-session"), None);
    }

    #[tokio::test]
    async fn known_session_id_returns_same_session() {
        let manager = SessionManager::new();
        let first = manager.get_or_create(None).await;
        assert!(first.created);
        first
            .entry
            .access()
            .await
            .apply(Action::Navigate(NavigationEvent::OpenAbout));

        let second = manager.get_or_create(Some(first.id)).await;
        assert!(!second.created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.entry.lock().await.page(), Page::About);
    }

    #[tokio::test]
    async fn unknown_session_id_creates_new_session() {
        let manager = SessionManager::new();
        let unknown = SessionId::new_random();
        let handle = manager.get_or_create(Some(unknown)).await;
        assert!(handle.created);
        assert_ne!(handle.id, unknown);
        assert_eq!(manager.len().await, 1);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let manager = SessionManager::new();
        let first = manager.get_or_create(None).await;
        let second = manager.get_or_create(None).await;

        {
            let mut session = first.entry.access().await;
            session.apply(Action::Navigate(NavigationEvent::StartCheckup));
            session.apply(Action::SubmitProfile(complete_profile()));
        }

        let other = second.entry.lock().await;
        assert_eq!(other.page(), Page::Home);
        assert_eq!(other.profile(), &Profile::default());
    }

    #[tokio::test]
    async fn ended_session_is_removed_and_wiped() {
        let manager = SessionManager::new();
        let handle = manager.get_or_create(None).await;
        {
            let mut session = handle.entry.access().await;
            session.apply(Action::Navigate(NavigationEvent::StartCheckup));
            session.apply(Action::SubmitProfile(complete_profile()));
        }

        assert!(manager.end_session(handle.id).await);
        assert!(manager.get(handle.id).await.is_none());
        assert_eq!(handle.entry.lock().await.profile(), &Profile::default());
        assert!(!manager.end_session(handle.id).await);
    }

    #[tokio::test]
    async fn idle_sessions_are_removed() {
        let manager = SessionManager::new();
        manager.get_or_create(None).await;
        manager.get_or_create(None).await;

        assert_eq!(manager.remove_idle(Duration::from_secs(3600)).await, 0);
        assert_eq!(manager.len().await, 2);

        assert_eq!(manager.remove_idle(Duration::ZERO).await, 2);
        assert!(manager.is_empty().await);
    }

    #[tokio::test]
    async fn locked_session_is_not_removed() {
        let manager = SessionManager::new();
        let handle = manager.get_or_create(None).await;
        let _guard = handle.entry.lock().await;

        assert_eq!(manager.remove_idle(Duration::ZERO).await, 0);
        assert_eq!(manager.len().await, 1);
    }
}
