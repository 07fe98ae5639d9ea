use std::collections::HashSet;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::ApiError;
use crate::filter;
use crate::forms::{self, Form};
use crate::models::{
    Application, Candidate, FavoriteToggle, Job, Metrics, Profile, PublicStats, Role, User,
};
use crate::router::{Navigator, Tab};
use crate::sync::{Command, Event, TaskScope};

/// Remote data as a view sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Loadable::Ready(value),
            Err(e) => Loadable::Failed(e.to_string()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }
}

/// What a list view should draw.
#[derive(Debug, PartialEq)]
pub enum Content<'a, T> {
    Loading,
    Failed(&'a str),
    Empty,
    Items(Vec<&'a T>),
}

impl<T> Loadable<Vec<T>> {
    pub fn content(&self) -> Content<'_, T> {
        match self {
            Loadable::Loading => Content::Loading,
            Loadable::Failed(message) => Content::Failed(message),
            Loadable::Ready(items) if items.is_empty() => Content::Empty,
            Loadable::Ready(items) => Content::Items(items.iter().collect()),
        }
    }
}

/// Inline banner under a form.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyState {
    pub message: &'static str,
    pub action: &'static str,
}

pub const LANDING_EMPTY: EmptyState = EmptyState {
    message: "No jobs have been published yet.",
    action: "Create an account to be ready when they arrive (press n)",
};

pub const NO_SEARCH_MATCHES: EmptyState = EmptyState {
    message: "No jobs match your search.",
    action: "Press / to change the search",
};

/// Empty-collection message for a tab, with what the user can do next.
pub fn empty_state(tab: Tab, role: Role) -> EmptyState {
    let (message, action) = match (tab, role) {
        (Tab::Jobs, Role::Company) => (
            "You have not posted any jobs yet.",
            "Create your first job (press n)",
        ),
        (Tab::Jobs, Role::Candidate) => (
            "No jobs available right now.",
            "Check back soon (press r to reload)",
        ),
        (Tab::Candidates, _) => (
            "No candidates have applied yet.",
            "Post a job to start receiving applications",
        ),
        (Tab::Favorites, _) => (
            "You have no favorite jobs yet.",
            "Browse Jobs and press f to save one",
        ),
        (Tab::Applications, _) => (
            "You have not applied to any jobs yet.",
            "Find a job in Jobs and press a to apply",
        ),
        (Tab::Recommendations, _) => (
            "No recommendations yet.",
            "Complete your profile to get better matches",
        ),
        (Tab::Home | Tab::Profile, _) => ("Nothing to show yet.", "Press r to reload"),
    };
    EmptyState { message, action }
}

// --- Job lists ---

/// A fetched job collection with search, selection and the per-job
/// requests still in flight.
#[derive(Debug)]
pub struct JobList {
    pub jobs: Loadable<Vec<Job>>,
    pub filter: String,
    selected: usize,
    pending_apply: HashSet<i64>,
    pending_favorite: HashSet<i64>,
}

impl Default for JobList {
    fn default() -> Self {
        Self {
            jobs: Loadable::Loading,
            filter: String::new(),
            selected: 0,
            pending_apply: HashSet::new(),
            pending_favorite: HashSet::new(),
        }
    }
}

impl JobList {
    /// Stores a fetch result. Jobs applied to during this session stay
    /// marked even if the backend has not caught up yet.
    pub fn load(&mut self, result: Result<Vec<Job>, ApiError>, applied: &HashSet<i64>) {
        let result = result.map(|mut jobs| {
            for job in jobs.iter_mut().filter(|job| applied.contains(&job.id)) {
                job.has_applied = true;
            }
            jobs
        });
        self.jobs = Loadable::from_result(result);
        self.clamp_selection();
    }

    pub fn content(&self) -> Content<'_, Job> {
        match &self.jobs {
            Loadable::Ready(jobs) if !jobs.is_empty() => {
                Content::Items(filter::filter_jobs(jobs, &self.filter))
            }
            other => other.content(),
        }
    }

    pub fn visible(&self) -> Vec<&Job> {
        match self.jobs.ready() {
            Some(jobs) => filter::filter_jobs(jobs, &self.filter),
            None => Vec::new(),
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_job(&self) -> Option<&Job> {
        self.visible().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn set_filter(&mut self, filter: String) {
        self.filter = filter;
        self.selected = 0;
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn can_apply(&self, job: &Job) -> bool {
        !job.has_applied && !self.pending_apply.contains(&job.id)
    }

    pub fn is_pending(&self, job_id: i64) -> bool {
        self.pending_apply.contains(&job_id) || self.pending_favorite.contains(&job_id)
    }

    pub fn request_apply(&mut self) -> Option<Command> {
        let job = self.selected_job()?;
        if !self.can_apply(job) {
            debug!(job_id = job.id, "apply disabled");
            return None;
        }
        let job_id = job.id;
        self.pending_apply.insert(job_id);
        Some(Command::Apply { job_id })
    }

    pub fn finish_apply(&mut self, job_id: i64, result: Result<(), ApiError>) -> Result<(), ApiError> {
        self.pending_apply.remove(&job_id);
        result?;
        if let Some(job) = self.find_mut(job_id) {
            job.has_applied = true;
            job.applicants += 1;
        }
        Ok(())
    }

    pub fn request_favorite(&mut self) -> Option<Command> {
        let job_id = self.selected_job()?.id;
        if !self.pending_favorite.insert(job_id) {
            return None;
        }
        Some(Command::ToggleFavorite { job_id })
    }

    /// Applies the flag the server reports. With `drop_unfavorited` a job
    /// that is no longer a favorite leaves the list.
    pub fn finish_favorite(
        &mut self,
        job_id: i64,
        result: Result<FavoriteToggle, ApiError>,
        drop_unfavorited: bool,
    ) -> Result<(), ApiError> {
        self.pending_favorite.remove(&job_id);
        let toggle = result?;
        if drop_unfavorited && !toggle.is_favorite {
            if let Some(jobs) = self.jobs.ready_mut() {
                jobs.retain(|job| job.id != job_id);
            }
            self.clamp_selection();
        } else if let Some(job) = self.find_mut(job_id) {
            job.is_favorite = toggle.is_favorite;
        }
        Ok(())
    }

    fn find_mut(&mut self, job_id: i64) -> Option<&mut Job> {
        self.jobs.ready_mut()?.iter_mut().find(|job| job.id == job_id)
    }
}

// --- Views ---

#[derive(Debug)]
pub struct HomeView {
    pub metrics: Loadable<Metrics>,
}

#[derive(Debug, Default)]
pub struct JobsView {
    pub list: JobList,
    pub form: Option<Form>,
    pub notice: Option<Notice>,
}

#[derive(Debug)]
pub struct ApplicationsView {
    pub applications: Loadable<Vec<Application>>,
    pub selected: usize,
}

#[derive(Debug)]
pub struct CandidatesView {
    pub candidates: Loadable<Vec<Candidate>>,
    pub selected: usize,
    pub detail: Option<Loadable<Candidate>>,
}

impl CandidatesView {
    pub fn selected_candidate(&self) -> Option<&Candidate> {
        self.candidates.ready()?.get(self.selected)
    }
}

#[derive(Debug)]
pub struct ProfileView {
    pub profile: Loadable<Profile>,
    pub form: Option<Form>,
    pub notice: Option<Notice>,
}

/// The single main-content view of the dashboard.
#[derive(Debug)]
pub enum ActiveView {
    Home(HomeView),
    Jobs(JobsView),
    Candidates(CandidatesView),
    Favorites(JobList),
    Applications(ApplicationsView),
    Recommendations(JobList),
    Profile(ProfileView),
}

impl ActiveView {
    fn for_tab(tab: Tab) -> Self {
        match tab {
            Tab::Home => ActiveView::Home(HomeView {
                metrics: Loadable::Loading,
            }),
            Tab::Jobs => ActiveView::Jobs(JobsView::default()),
            Tab::Candidates => ActiveView::Candidates(CandidatesView {
                candidates: Loadable::Loading,
                selected: 0,
                detail: None,
            }),
            Tab::Favorites => ActiveView::Favorites(JobList::default()),
            Tab::Applications => ActiveView::Applications(ApplicationsView {
                applications: Loadable::Loading,
                selected: 0,
            }),
            Tab::Recommendations => ActiveView::Recommendations(JobList::default()),
            Tab::Profile => ActiveView::Profile(ProfileView {
                profile: Loadable::Loading,
                form: None,
                notice: None,
            }),
        }
    }

    pub fn job_list(&self) -> Option<&JobList> {
        match self {
            ActiveView::Jobs(view) => Some(&view.list),
            ActiveView::Favorites(list) | ActiveView::Recommendations(list) => Some(list),
            _ => None,
        }
    }

    pub fn job_list_mut(&mut self) -> Option<&mut JobList> {
        match self {
            ActiveView::Jobs(view) => Some(&mut view.list),
            ActiveView::Favorites(list) | ActiveView::Recommendations(list) => Some(list),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&Form> {
        match self {
            ActiveView::Jobs(view) => view.form.as_ref(),
            ActiveView::Profile(view) => view.form.as_ref(),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut Form> {
        match self {
            ActiveView::Jobs(view) => view.form.as_mut(),
            ActiveView::Profile(view) => view.form.as_mut(),
            _ => None,
        }
    }
}

fn load_command(tab: Tab, role: Role) -> Command {
    match tab {
        Tab::Home => Command::LoadMetrics,
        Tab::Jobs => Command::LoadJobs,
        Tab::Candidates => Command::LoadCandidates,
        Tab::Favorites => Command::LoadFavorites,
        Tab::Applications => Command::LoadApplications,
        Tab::Recommendations => Command::LoadRecommendations,
        Tab::Profile => Command::LoadProfile(role),
    }
}

// --- Dashboard ---

/// Signed-in shell: the role's menu, the active view and the tasks it owns.
///
/// Views never talk to the backend directly. Every action returns the
/// `Command` to run; its `Event` comes back through `handle` tagged with the
/// generation that issued it.
#[derive(Debug)]
pub struct Dashboard {
    user: User,
    nav: Navigator,
    view: ActiveView,
    generation: u64,
    tasks: TaskScope,
    writes: TaskScope,
    alert: Option<String>,
    applied: HashSet<i64>,
}

impl Dashboard {
    pub fn new(user: User) -> (Self, Command) {
        let role = user.role;
        let dashboard = Self {
            user,
            nav: Navigator::new(role),
            view: ActiveView::for_tab(Tab::Home),
            generation: 1,
            tasks: TaskScope::default(),
            writes: TaskScope::default(),
            alert: None,
            applied: HashSet::new(),
        };
        (dashboard, load_command(Tab::Home, role))
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn nav(&self) -> &Navigator {
        &self.nav
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ActiveView {
        &mut self.view
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Reads die with the active view; writes are kept until they settle.
    pub fn track(&mut self, command: &Command, handle: JoinHandle<()>) {
        if command.is_write() {
            self.writes.track(handle);
        } else {
            self.tasks.track(handle);
        }
    }

    pub fn greeting(&self) -> String {
        match self.user.role {
            Role::Company => format!("Welcome, {}!", self.user.name),
            Role::Candidate => format!("Hello, {}!", self.user.first_name()),
        }
    }

    /// Replaces the active view. Tasks owned by the old view are aborted.
    fn open(&mut self) -> Command {
        let tab = self.nav.active();
        self.tasks.cancel();
        self.generation += 1;
        self.alert = None;
        self.view = ActiveView::for_tab(tab);
        debug!(tab = tab.id(), generation = self.generation, "view activated");
        load_command(tab, self.user.role)
    }

    pub fn activate(&mut self, tab: Tab) -> Option<Command> {
        if !self.nav.select(tab) {
            return None;
        }
        Some(self.open())
    }

    pub fn activate_index(&mut self, index: usize) -> Option<Command> {
        if !self.nav.select_index(index) {
            return None;
        }
        Some(self.open())
    }

    pub fn next_tab(&mut self) -> Command {
        self.nav.next();
        self.open()
    }

    pub fn prev_tab(&mut self) -> Command {
        self.nav.prev();
        self.open()
    }

    pub fn reload(&mut self) -> Command {
        self.open()
    }

    /// Folds a settled request into the active view. Returns a follow-up
    /// command when the result calls for a re-fetch.
    pub fn handle(&mut self, generation: u64, event: Event) -> Option<Command> {
        if generation != self.generation {
            debug!(generation, current = self.generation, "discarding stale event");
            self.settle_stale_write(event);
            return None;
        }

        match (&mut self.view, event) {
            (ActiveView::Home(view), Event::MetricsLoaded(result)) => {
                view.metrics = Loadable::from_result(result);
            }
            (ActiveView::Jobs(view), Event::JobsLoaded(result)) => {
                view.list.load(result, &self.applied);
            }
            (ActiveView::Favorites(list), Event::FavoritesLoaded(result))
            | (ActiveView::Recommendations(list), Event::RecommendationsLoaded(result)) => {
                list.load(result, &self.applied);
            }
            (ActiveView::Applications(view), Event::ApplicationsLoaded(result)) => {
                view.applications = Loadable::from_result(result);
            }
            (ActiveView::Candidates(view), Event::CandidatesLoaded(result)) => {
                view.candidates = Loadable::from_result(result);
            }
            (ActiveView::Candidates(view), Event::CandidateLoaded(result)) => match result {
                Ok(candidate) => view.detail = Some(Loadable::Ready(candidate)),
                Err(e) => {
                    view.detail = None;
                    self.alert = Some(e.to_string());
                }
            },
            (ActiveView::Profile(view), Event::ProfileLoaded(result)) => {
                view.profile = Loadable::from_result(result);
            }
            (ActiveView::Profile(view), Event::ProfileSaved { profile, result }) => match result {
                Ok(()) => {
                    info!("profile saved");
                    view.profile = Loadable::Ready(profile);
                    view.form = None;
                    view.notice = Some(Notice::Success("Profile updated successfully!".to_string()));
                }
                Err(e) => {
                    if let Some(form) = view.form.as_mut() {
                        form.submitting = false;
                    }
                    view.notice = Some(Notice::Error(format!("Could not update profile: {}", e)));
                }
            },
            (ActiveView::Jobs(view), Event::JobCreated(result)) => match result {
                Ok(created) => {
                    info!(job_id = created.job_id, "job created");
                    view.form = None;
                    view.notice = Some(Notice::Success("Job created successfully!".to_string()));
                    view.list.jobs = Loadable::Loading;
                    return Some(Command::LoadJobs);
                }
                Err(e) => {
                    if let Some(form) = view.form.as_mut() {
                        form.submitting = false;
                    }
                    view.notice = Some(Notice::Error(format!("Could not create job: {}", e)));
                }
            },
            (view, Event::Applied { job_id, result }) => {
                let Some(list) = view.job_list_mut() else {
                    return None;
                };
                match list.finish_apply(job_id, result) {
                    Ok(()) => {
                        info!(job_id, "applied to job");
                        self.applied.insert(job_id);
                    }
                    Err(e) => self.alert = Some(e.to_string()),
                }
            }
            (view, Event::FavoriteToggled { job_id, result }) => {
                let drop_unfavorited = matches!(view, ActiveView::Favorites(_));
                let Some(list) = view.job_list_mut() else {
                    return None;
                };
                if let Err(e) = list.finish_favorite(job_id, result, drop_unfavorited) {
                    self.alert = Some(e.to_string());
                }
            }
            (_, event) => {
                debug!(?event, "event does not belong to the active view");
            }
        }
        None
    }

    /// A write that finished after its view was replaced. The view is gone,
    /// but the outcome still counts.
    fn settle_stale_write(&mut self, event: Event) {
        let failure = match event {
            Event::Applied { job_id, result: Ok(()) } => {
                info!(job_id, "applied to job");
                self.applied.insert(job_id);
                None
            }
            Event::Applied { result: Err(e), .. }
            | Event::FavoriteToggled { result: Err(e), .. } => Some(e.to_string()),
            Event::JobCreated(Err(e)) => Some(format!("Could not create job: {}", e)),
            Event::ProfileSaved { result: Err(e), .. } => {
                Some(format!("Could not update profile: {}", e))
            }
            _ => None,
        };
        if failure.is_some() {
            self.alert = failure;
        }
    }

    // --- Actions ---

    pub fn select_next(&mut self) {
        match &mut self.view {
            ActiveView::Candidates(view) => {
                let len = view.candidates.ready().map_or(0, Vec::len);
                if view.selected + 1 < len {
                    view.selected += 1;
                }
            }
            ActiveView::Applications(view) => {
                let len = view.applications.ready().map_or(0, Vec::len);
                if view.selected + 1 < len {
                    view.selected += 1;
                }
            }
            view => {
                if let Some(list) = view.job_list_mut() {
                    list.select_next();
                }
            }
        }
    }

    pub fn select_prev(&mut self) {
        match &mut self.view {
            ActiveView::Candidates(view) => view.selected = view.selected.saturating_sub(1),
            ActiveView::Applications(view) => view.selected = view.selected.saturating_sub(1),
            view => {
                if let Some(list) = view.job_list_mut() {
                    list.select_prev();
                }
            }
        }
    }

    pub fn apply(&mut self) -> Option<Command> {
        match self.user.role {
            Role::Candidate => self.view.job_list_mut()?.request_apply(),
            Role::Company => None,
        }
    }

    pub fn toggle_favorite(&mut self) -> Option<Command> {
        match self.user.role {
            Role::Candidate => self.view.job_list_mut()?.request_favorite(),
            Role::Company => None,
        }
    }

    pub fn set_filter(&mut self, filter: String) {
        if let Some(list) = self.view.job_list_mut() {
            list.set_filter(filter);
        }
    }

    pub fn open_job_form(&mut self) -> bool {
        match (self.user.role, &mut self.view) {
            (Role::Company, ActiveView::Jobs(view)) => {
                view.form = Some(forms::job_form());
                view.notice = None;
                true
            }
            _ => false,
        }
    }

    pub fn submit_job_form(&mut self) -> Option<Command> {
        let ActiveView::Jobs(view) = &mut self.view else {
            return None;
        };
        let form = view.form.as_mut()?;
        if form.submitting {
            return None;
        }
        match forms::new_job(form) {
            Ok(job) => {
                form.submitting = true;
                view.notice = None;
                Some(Command::CreateJob(job))
            }
            Err(message) => {
                view.notice = Some(Notice::Error(message));
                None
            }
        }
    }

    pub fn edit_profile(&mut self) -> bool {
        let ActiveView::Profile(view) = &mut self.view else {
            return false;
        };
        match view.profile.ready() {
            Some(profile) => {
                view.form = Some(forms::profile_form(profile));
                view.notice = None;
                true
            }
            None => false,
        }
    }

    pub fn submit_profile(&mut self) -> Option<Command> {
        let ActiveView::Profile(view) = &mut self.view else {
            return None;
        };
        let original = view.profile.ready()?;
        let form = view.form.as_mut()?;
        if form.submitting {
            return None;
        }
        match forms::edited_profile(form, original) {
            Ok(profile) => {
                form.submitting = true;
                Some(Command::SaveProfile(profile))
            }
            Err(message) => {
                view.notice = Some(Notice::Error(message));
                None
            }
        }
    }

    pub fn cancel_form(&mut self) {
        match &mut self.view {
            ActiveView::Jobs(view) => view.form = None,
            ActiveView::Profile(view) => view.form = None,
            _ => {}
        }
    }

    pub fn open_candidate(&mut self) -> Option<Command> {
        let ActiveView::Candidates(view) = &mut self.view else {
            return None;
        };
        let id = view.selected_candidate()?.id;
        view.detail = Some(Loadable::Loading);
        Some(Command::LoadCandidate(id))
    }

    /// Closes whatever overlay is open. Returns false when there was none.
    pub fn close_overlay(&mut self) -> bool {
        if self.alert.take().is_some() {
            return true;
        }
        match &mut self.view {
            ActiveView::Candidates(view) => view.detail.take().is_some(),
            ActiveView::Jobs(view) => view.form.take().is_some(),
            ActiveView::Profile(view) => view.form.take().is_some(),
            _ => false,
        }
    }
}

// --- Landing ---

/// Public page shown before sign-in.
#[derive(Debug)]
pub struct LandingView {
    pub data: Loadable<(Vec<Job>, PublicStats)>,
    pub search: String,
}

impl Default for LandingView {
    fn default() -> Self {
        Self {
            data: Loadable::Loading,
            search: String::new(),
        }
    }
}

impl LandingView {
    pub fn load(&mut self, result: Result<(Vec<Job>, PublicStats), ApiError>) {
        self.data = Loadable::from_result(result);
    }

    pub fn stats(&self) -> Option<&PublicStats> {
        self.data.ready().map(|(_, stats)| stats)
    }

    pub fn jobs(&self) -> Vec<&Job> {
        match self.data.ready() {
            Some((jobs, _)) => filter::landing_jobs(jobs, &self.search),
            None => Vec::new(),
        }
    }

    /// `Empty` only when the backend has no public jobs at all. A search
    /// that matches nothing yields `Items` with no entries.
    pub fn content(&self) -> Content<'_, Job> {
        match &self.data {
            Loadable::Loading => Content::Loading,
            Loadable::Failed(message) => Content::Failed(message),
            Loadable::Ready((jobs, _)) if jobs.is_empty() => Content::Empty,
            Loadable::Ready(_) => Content::Items(self.jobs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_backend::{JobsMode, MockBackend, MockState};
    use crate::models::Credentials;
    use crate::sync::{perform, Executor, Scope};
    use std::time::Duration;
    use tokio::runtime::Handle;

    fn user(role: Role) -> User {
        User {
            id: 1,
            email: "someone@example.com".to_string(),
            name: "Ana Maria Souza".to_string(),
            role,
            avatar: None,
        }
    }

    async fn signed_in(backend: &MockBackend, role: Role) -> crate::api::ApiClient {
        let api = backend.client();
        let email = match role {
            Role::Candidate => "ana@example.com",
            Role::Company => "rh@acme.com",
        };
        api.login(&Credentials {
            email: email.to_string(),
            password: "secret".to_string(),
            role,
        })
        .await
        .unwrap();
        api
    }

    /// Runs `command` against the backend and feeds the event back.
    async fn run(
        dashboard: &mut Dashboard,
        api: &crate::api::ApiClient,
        command: Command,
    ) -> Option<Command> {
        let generation = dashboard.generation();
        let event = perform(api, command).await;
        dashboard.handle(generation, event)
    }

    async fn jobs_dashboard(backend: &MockBackend, role: Role) -> (Dashboard, crate::api::ApiClient) {
        let api = signed_in(backend, role).await;
        let (mut dashboard, _) = Dashboard::new(user(role));
        let load = dashboard.activate(Tab::Jobs).unwrap();
        run(&mut dashboard, &api, load).await;
        (dashboard, api)
    }

    fn jobs(dashboard: &Dashboard) -> &JobList {
        dashboard.view().job_list().unwrap()
    }

    #[tokio::test]
    async fn test_empty_jobs_renders_empty_state() {
        let backend = MockBackend::with(MockState {
            jobs_mode: JobsMode::Empty,
            ..MockState::default()
        })
        .await;
        let (dashboard, _) = jobs_dashboard(&backend, Role::Candidate).await;

        assert_eq!(jobs(&dashboard).content(), Content::Empty);
        let empty = empty_state(Tab::Jobs, Role::Candidate);
        assert_eq!(empty.message, "No jobs available right now.");
    }

    #[tokio::test]
    async fn test_server_error_renders_inline_error_without_cards() {
        let backend = MockBackend::with(MockState {
            jobs_mode: JobsMode::Fail,
            ..MockState::default()
        })
        .await;
        let (dashboard, _) = jobs_dashboard(&backend, Role::Candidate).await;

        assert_eq!(jobs(&dashboard).content(), Content::Failed("Erro interno do servidor"));
        assert!(jobs(&dashboard).visible().is_empty());
        assert_eq!(dashboard.alert(), None);
    }

    #[tokio::test]
    async fn test_favorite_toggled_twice_returns_to_original() {
        let backend = MockBackend::start().await;
        let (mut dashboard, api) = jobs_dashboard(&backend, Role::Candidate).await;
        let original = jobs(&dashboard).selected_job().unwrap().is_favorite;

        let toggle = dashboard.toggle_favorite().unwrap();
        assert_eq!(dashboard.toggle_favorite(), None);
        run(&mut dashboard, &api, toggle).await;
        assert_eq!(jobs(&dashboard).selected_job().unwrap().is_favorite, !original);

        let toggle = dashboard.toggle_favorite().unwrap();
        run(&mut dashboard, &api, toggle).await;
        assert_eq!(jobs(&dashboard).selected_job().unwrap().is_favorite, original);
    }

    #[tokio::test]
    async fn test_apply_disabled_once_applied() {
        let backend = MockBackend::start().await;
        let (mut dashboard, api) = jobs_dashboard(&backend, Role::Candidate).await;

        let apply = dashboard.apply().unwrap();
        assert_eq!(dashboard.apply(), None, "disabled while in flight");
        run(&mut dashboard, &api, apply).await;

        let job = jobs(&dashboard).selected_job().unwrap();
        assert!(job.has_applied);
        assert_eq!(job.applicants, 1);
        assert!(!jobs(&dashboard).can_apply(job));
        assert_eq!(dashboard.apply(), None);
        assert_eq!(backend.applications_received(), 1);
    }

    #[test]
    fn test_applied_flag_survives_stale_refetch() {
        let (mut dashboard, _) = Dashboard::new(user(Role::Candidate));
        dashboard.activate(Tab::Recommendations);
        let stale: Job = serde_json::from_value(serde_json::json!({"id": 5, "title": "QA"})).unwrap();

        let generation = dashboard.generation();
        dashboard.handle(generation, Event::RecommendationsLoaded(Ok(vec![stale.clone()])));
        let apply = dashboard.apply().unwrap();
        assert_eq!(apply, Command::Apply { job_id: 5 });
        dashboard.handle(generation, Event::Applied { job_id: 5, result: Ok(()) });

        dashboard.activate(Tab::Jobs);
        let generation = dashboard.generation();
        dashboard.handle(generation, Event::JobsLoaded(Ok(vec![stale])));
        assert!(jobs(&dashboard).visible()[0].has_applied);
    }

    #[test]
    fn test_failed_apply_shows_alert_and_reenables() {
        let (mut dashboard, _) = Dashboard::new(user(Role::Candidate));
        dashboard.activate(Tab::Jobs);
        let job: Job = serde_json::from_value(serde_json::json!({"id": 1, "title": "Dev"})).unwrap();
        let generation = dashboard.generation();
        dashboard.handle(generation, Event::JobsLoaded(Ok(vec![job])));

        dashboard.apply().unwrap();
        dashboard.handle(
            generation,
            Event::Applied {
                job_id: 1,
                result: Err(ApiError::Server {
                    status: 400,
                    message: "Você já se candidatou a esta vaga".to_string(),
                }),
            },
        );
        assert_eq!(dashboard.alert(), Some("Você já se candidatou a esta vaga"));
        assert!(dashboard.close_overlay());
        assert!(dashboard.apply().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_apply_survives_tab_switch() {
        let backend = MockBackend::start().await;
        let (mut dashboard, api) = jobs_dashboard(&backend, Role::Candidate).await;
        let job_id = jobs(&dashboard).selected_job().unwrap().id;
        let (executor, mut rx) = Executor::new(api.clone(), Handle::current());

        let apply = dashboard.apply().unwrap();
        let handle = executor.spawn(Scope::View(dashboard.generation()), apply.clone());
        dashboard.track(&apply, handle);
        dashboard.next_tab();

        let envelope = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(backend.applications_received(), 1);
        let Scope::View(generation) = envelope.scope else { panic!("app scope") };
        assert_eq!(dashboard.handle(generation, envelope.event), None);
        assert_eq!(dashboard.alert(), None);

        let load = dashboard.activate(Tab::Jobs).unwrap();
        run(&mut dashboard, &api, load).await;
        let job = jobs(&dashboard).visible().into_iter().find(|j| j.id == job_id).unwrap();
        assert!(job.has_applied);
        assert!(!jobs(&dashboard).can_apply(job));
    }

    #[test]
    fn test_late_write_failure_still_alerts() {
        let (mut dashboard, _) = Dashboard::new(user(Role::Candidate));
        dashboard.activate(Tab::Jobs);
        let job: Job = serde_json::from_value(serde_json::json!({"id": 3, "title": "Dev"})).unwrap();
        let generation = dashboard.generation();
        dashboard.handle(generation, Event::JobsLoaded(Ok(vec![job])));
        dashboard.toggle_favorite().unwrap();

        dashboard.activate(Tab::Favorites);
        let failure = Err(ApiError::Server {
            status: 404,
            message: "Vaga não encontrada".to_string(),
        });
        let outcome = dashboard.handle(generation, Event::FavoriteToggled { job_id: 3, result: failure });
        assert_eq!(outcome, None);
        assert_eq!(dashboard.alert(), Some("Vaga não encontrada"));
        assert!(dashboard.view().job_list().unwrap().jobs.is_loading());
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let (mut dashboard, _) = Dashboard::new(user(Role::Candidate));
        let home_generation = dashboard.generation();
        dashboard.activate(Tab::Jobs).unwrap();

        let outcome = dashboard.handle(home_generation, Event::JobsLoaded(Ok(Vec::new())));
        assert_eq!(outcome, None);
        assert!(jobs(&dashboard).jobs.is_loading());
    }

    #[tokio::test]
    async fn test_favorites_view_drops_unfavorited_job() {
        let backend = MockBackend::start().await;
        let api = signed_in(&backend, Role::Candidate).await;
        let (mut dashboard, _) = Dashboard::new(user(Role::Candidate));
        let load = dashboard.activate(Tab::Favorites).unwrap();
        run(&mut dashboard, &api, load).await;
        assert_eq!(jobs(&dashboard).visible().len(), 1);

        let toggle = dashboard.toggle_favorite().unwrap();
        run(&mut dashboard, &api, toggle).await;
        assert_eq!(jobs(&dashboard).content(), Content::Empty);
    }

    #[tokio::test]
    async fn test_company_creates_job_then_refetches() {
        let backend = MockBackend::start().await;
        let (mut dashboard, api) = jobs_dashboard(&backend, Role::Company).await;
        assert_eq!(dashboard.apply(), None);
        assert_eq!(dashboard.toggle_favorite(), None);

        assert!(dashboard.open_job_form());
        assert_eq!(dashboard.submit_job_form(), None);
        let ActiveView::Jobs(view) = dashboard.view() else { panic!("not on jobs") };
        assert_eq!(view.notice, Some(Notice::Error("Please fill in: Job title".to_string())));

        let form = dashboard.view_mut().form_mut().unwrap();
        form.set("title", "SRE");
        form.set("description", "Keep it up");
        form.set("location", "Recife");
        let create = dashboard.submit_job_form().unwrap();
        let refetch = run(&mut dashboard, &api, create).await.unwrap();
        assert_eq!(refetch, Command::LoadJobs);
        run(&mut dashboard, &api, refetch).await;

        let ActiveView::Jobs(view) = dashboard.view() else { panic!("not on jobs") };
        assert!(view.form.is_none());
        assert_eq!(view.notice, Some(Notice::Success("Job created successfully!".to_string())));
        assert_eq!(view.list.visible().len(), 4);
    }

    #[tokio::test]
    async fn test_profile_save_shows_inline_notice() {
        let backend = MockBackend::start().await;
        let api = signed_in(&backend, Role::Candidate).await;
        let (mut dashboard, _) = Dashboard::new(user(Role::Candidate));
        let load = dashboard.activate(Tab::Profile).unwrap();
        assert_eq!(load, Command::LoadProfile(Role::Candidate));
        run(&mut dashboard, &api, load).await;

        assert!(dashboard.edit_profile());
        dashboard.view_mut().form_mut().unwrap().set("bio", "Rustacean");
        let save = dashboard.submit_profile().unwrap();
        assert_eq!(dashboard.submit_profile(), None);
        run(&mut dashboard, &api, save).await;

        let ActiveView::Profile(view) = dashboard.view() else { panic!("not on profile") };
        assert_eq!(view.notice, Some(Notice::Success("Profile updated successfully!".to_string())));
        assert_eq!(view.profile.ready().unwrap().get_field("bio").as_deref(), Some("Rustacean"));
    }

    #[tokio::test]
    async fn test_missing_candidate_detail_raises_alert() {
        let backend = MockBackend::start().await;
        let api = signed_in(&backend, Role::Company).await;
        let (mut dashboard, _) = Dashboard::new(user(Role::Company));
        let load = dashboard.activate(Tab::Candidates).unwrap();
        run(&mut dashboard, &api, load).await;

        let open = dashboard.open_candidate().unwrap();
        run(&mut dashboard, &api, open).await;
        let ActiveView::Candidates(view) = dashboard.view() else { panic!("not on candidates") };
        assert!(matches!(view.detail, Some(Loadable::Ready(_))));

        let generation = dashboard.generation();
        let missing = perform(&api, Command::LoadCandidate(999)).await;
        dashboard.handle(generation, missing);
        assert!(dashboard.alert().is_some());
    }

    #[test]
    fn test_role_menus_and_greeting() {
        let (mut company, first) = Dashboard::new(user(Role::Company));
        assert_eq!(first, Command::LoadMetrics);
        assert_eq!(company.greeting(), "Welcome, Ana Maria Souza!");
        assert_eq!(company.activate(Tab::Favorites), None);

        let (candidate, _) = Dashboard::new(user(Role::Candidate));
        assert_eq!(candidate.greeting(), "Hello, Ana!");
        assert_eq!(candidate.nav().menu().len(), 6);
    }

    #[test]
    fn test_search_narrows_visible_jobs() {
        let (mut dashboard, _) = Dashboard::new(user(Role::Candidate));
        dashboard.activate(Tab::Jobs);
        let listing: Vec<Job> = serde_json::from_value(serde_json::json!([
            {"id": 1, "title": "Rust Developer", "tags": ["backend"]},
            {"id": 2, "title": "Designer", "company": "Globex"}
        ]))
        .unwrap();
        let generation = dashboard.generation();
        dashboard.handle(generation, Event::JobsLoaded(Ok(listing)));

        dashboard.set_filter("globex".to_string());
        assert_eq!(jobs(&dashboard).selected_job().unwrap().id, 2);
        dashboard.set_filter("cobol".to_string());
        assert_eq!(jobs(&dashboard).content(), Content::Items(Vec::new()));
    }

    #[test]
    fn test_landing_limits_results() {
        let mut landing = LandingView::default();
        let listing: Vec<Job> = (1..=8)
            .map(|id| serde_json::from_value(serde_json::json!({"id": id, "title": "Engineer"})).unwrap())
            .collect();
        landing.load(Ok((listing, PublicStats::default())));
        assert_eq!(landing.jobs().len(), filter::LANDING_LIMIT);
        landing.search = "nothing".to_string();
        assert!(landing.jobs().is_empty());
        assert_eq!(landing.content(), Content::Items(Vec::new()));
    }

    #[test]
    fn test_landing_without_jobs_is_empty_not_no_match() {
        let mut landing = LandingView::default();
        assert_eq!(landing.content(), Content::Loading);
        landing.load(Ok((Vec::new(), PublicStats::default())));
        assert_eq!(landing.content(), Content::Empty);

        landing.search = "rust".to_string();
        assert_eq!(landing.content(), Content::Empty);
    }
}
