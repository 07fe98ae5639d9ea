use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::models::{
    Application, Candidate, Credentials, FavoriteToggle, Job, JobCreated, Metrics, NewJob, Profile,
    PublicStats, Registration, Role, User,
};

/// A backend request a screen wants made.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CheckStatus,
    Login(Credentials),
    Register(Registration),
    Logout,
    LoadLanding,
    LoadMetrics,
    LoadJobs,
    LoadFavorites,
    LoadApplications,
    LoadRecommendations,
    LoadCandidates,
    LoadCandidate(i64),
    LoadProfile(Role),
    Apply { job_id: i64 },
    ToggleFavorite { job_id: i64 },
    CreateJob(NewJob),
    SaveProfile(Profile),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::CheckStatus => "check_status",
            Command::Login(_) => "login",
            Command::Register(_) => "register",
            Command::Logout => "logout",
            Command::LoadLanding => "load_landing",
            Command::LoadMetrics => "load_metrics",
            Command::LoadJobs => "load_jobs",
            Command::LoadFavorites => "load_favorites",
            Command::LoadApplications => "load_applications",
            Command::LoadRecommendations => "load_recommendations",
            Command::LoadCandidates => "load_candidates",
            Command::LoadCandidate(_) => "load_candidate",
            Command::LoadProfile(_) => "load_profile",
            Command::Apply { .. } => "apply",
            Command::ToggleFavorite { .. } => "toggle_favorite",
            Command::CreateJob(_) => "create_job",
            Command::SaveProfile(_) => "save_profile",
        }
    }

    /// Writes run to completion even when the view that issued them is
    /// replaced. Only their effect on that view is dropped.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Command::Apply { .. }
                | Command::ToggleFavorite { .. }
                | Command::CreateJob(_)
                | Command::SaveProfile(_)
        )
    }

    /// App-scoped commands outlive view switches.
    pub fn is_app_scoped(&self) -> bool {
        matches!(
            self,
            Command::CheckStatus
                | Command::Login(_)
                | Command::Register(_)
                | Command::Logout
                | Command::LoadLanding
        )
    }
}

/// The settled outcome of a `Command`.
#[derive(Debug, Clone)]
pub enum Event {
    StatusChecked(Result<User, ApiError>),
    SignedIn(Result<User, ApiError>),
    SignedOut(Result<(), ApiError>),
    LandingLoaded(Result<(Vec<Job>, PublicStats), ApiError>),
    MetricsLoaded(Result<Metrics, ApiError>),
    JobsLoaded(Result<Vec<Job>, ApiError>),
    FavoritesLoaded(Result<Vec<Job>, ApiError>),
    ApplicationsLoaded(Result<Vec<Application>, ApiError>),
    RecommendationsLoaded(Result<Vec<Job>, ApiError>),
    CandidatesLoaded(Result<Vec<Candidate>, ApiError>),
    CandidateLoaded(Result<Candidate, ApiError>),
    ProfileLoaded(Result<Profile, ApiError>),
    Applied { job_id: i64, result: Result<(), ApiError> },
    FavoriteToggled { job_id: i64, result: Result<FavoriteToggle, ApiError> },
    JobCreated(Result<JobCreated, ApiError>),
    ProfileSaved { profile: Profile, result: Result<(), ApiError> },
}

/// Who an event belongs to. View events carry the generation of the view
/// that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    App,
    View(u64),
}

#[derive(Debug)]
pub struct Envelope {
    pub scope: Scope,
    pub event: Event,
}

pub async fn perform(api: &ApiClient, command: Command) -> Event {
    match command {
        Command::CheckStatus => Event::StatusChecked(api.current_user().await),
        Command::Login(credentials) => Event::SignedIn(api.login(&credentials).await),
        Command::Register(registration) => Event::SignedIn(api.register(&registration).await),
        Command::Logout => Event::SignedOut(api.logout().await),
        Command::LoadLanding => {
            let (jobs, stats) = tokio::join!(api.public_jobs(), api.public_stats());
            Event::LandingLoaded(jobs.and_then(|jobs| stats.map(|stats| (jobs, stats))))
        }
        Command::LoadMetrics => Event::MetricsLoaded(api.dashboard_metrics().await),
        Command::LoadJobs => Event::JobsLoaded(api.jobs().await),
        Command::LoadFavorites => Event::FavoritesLoaded(api.favorites().await),
        Command::LoadApplications => Event::ApplicationsLoaded(api.applications().await),
        Command::LoadRecommendations => Event::RecommendationsLoaded(api.recommendations().await),
        Command::LoadCandidates => Event::CandidatesLoaded(api.candidates().await),
        Command::LoadCandidate(id) => Event::CandidateLoaded(api.candidate_details(id).await),
        Command::LoadProfile(role) => Event::ProfileLoaded(api.profile(role).await),
        Command::Apply { job_id } => Event::Applied {
            job_id,
            result: api.apply(job_id, None).await,
        },
        Command::ToggleFavorite { job_id } => Event::FavoriteToggled {
            job_id,
            result: api.toggle_favorite(job_id).await,
        },
        Command::CreateJob(job) => Event::JobCreated(api.create_job(&job).await),
        Command::SaveProfile(profile) => {
            let result = api.update_profile(&profile).await;
            Event::ProfileSaved { profile, result }
        }
    }
}

/// Runs commands on the tokio runtime and posts their events back to the UI thread.
pub struct Executor {
    api: ApiClient,
    runtime: Handle,
    tx: UnboundedSender<Envelope>,
}

impl Executor {
    pub fn new(api: ApiClient, runtime: Handle) -> (Self, UnboundedReceiver<Envelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { api, runtime, tx }, rx)
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn spawn(&self, scope: Scope, command: Command) -> JoinHandle<()> {
        debug!(?scope, command = command.name(), "dispatch");
        let api = self.api.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let event = perform(&api, command).await;
            // The receiver is gone only when the UI is shutting down.
            let _ = tx.send(Envelope { scope, event });
        })
    }
}

/// In-flight tasks owned by one view. Dropping or cancelling the scope
/// aborts them, so their results never arrive.
#[derive(Debug, Default)]
pub struct TaskScope {
    handles: Vec<JoinHandle<()>>,
}

impl TaskScope {
    pub fn track(&mut self, handle: JoinHandle<()>) {
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(handle);
    }

    pub fn cancel(&mut self) {
        let aborted = self.handles.len();
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        if aborted > 0 {
            debug!(aborted, "cancelled view tasks");
        }
    }

    pub fn in_flight(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_backend::{JobsMode, MockBackend};
    use std::time::Duration;

    #[tokio::test]
    async fn test_perform_landing_joins_jobs_and_stats() {
        let backend = MockBackend::start().await;
        let event = perform(&backend.client(), Command::LoadLanding).await;
        match event {
            Event::LandingLoaded(Ok((jobs, stats))) => {
                assert_eq!(jobs.len(), 3);
                assert_eq!(stats.total_jobs, 3);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_perform_failing_jobs_reports_message() {
        let backend = MockBackend::start().await;
        backend.set_jobs_mode(JobsMode::Fail);
        let api = backend.client();
        perform(
            &api,
            Command::Login(Credentials {
                email: "ana@example.com".to_string(),
                password: "secret".to_string(),
                role: Role::Candidate,
            }),
        )
        .await;

        match perform(&api, Command::LoadJobs).await {
            Event::JobsLoaded(Err(e)) => assert_eq!(e.to_string(), "Erro interno do servidor"),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_executor_delivers_envelope() {
        let backend = MockBackend::start().await;
        let (executor, mut rx) = Executor::new(backend.client(), Handle::current());

        executor.spawn(Scope::View(7), Command::LoadLanding);
        let envelope = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(envelope.scope, Scope::View(7));
        assert!(matches!(envelope.event, Event::LandingLoaded(Ok(_))));
    }

    #[test]
    fn test_only_mutations_are_writes() {
        assert!(Command::Apply { job_id: 1 }.is_write());
        assert!(Command::ToggleFavorite { job_id: 1 }.is_write());
        assert!(!Command::LoadJobs.is_write());
        assert!(!Command::LoadCandidate(1).is_write());
        assert!(!Command::Logout.is_write());
    }

    #[tokio::test]
    async fn test_cancelled_scope_never_delivers() {
        let (tx, mut rx) = mpsc::unbounded_channel::<u8>();
        let mut scope = TaskScope::default();
        scope.track(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            let _ = tx.send(1);
        }));
        assert_eq!(scope.in_flight(), 1);

        scope.cancel();
        assert_eq!(scope.in_flight(), 0);
        // The aborted task drops its sender, closing the channel.
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_auth_commands_are_app_scoped() {
        assert!(Command::Logout.is_app_scoped());
        assert!(Command::LoadLanding.is_app_scoped());
        assert!(!Command::LoadJobs.is_app_scoped());
        assert!(!Command::Apply { job_id: 1 }.is_app_scoped());
    }
}
