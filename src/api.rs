use anyhow::{Context, Result};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{
    Application, Candidate, CandidateProfile, CompanyProfile, Credentials, FavoriteToggle, Health,
    Job, JobCreated, Metrics, NewJob, Profile, PublicStats, Registration, Role, User,
    NATIVE_JOB_SOURCE,
};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

pub const CONNECTION_ERROR: &str = "Connection error. Check that the backend is running.";

/// Every failure the backend contract can produce, reduced to a message
/// fit for showing to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{}", CONNECTION_ERROR)]
    Connection,

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    user: User,
}

#[derive(Debug, Deserialize)]
struct Ack {
    #[allow(dead_code)]
    #[serde(default)]
    success: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationRequest<'a> {
    job_id: i64,
    job_source: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteRequest {
    job_id: i64,
}

/// Cookie store whose contents can be dropped wholesale. `Jar` itself has no
/// way to forget a cookie, so signing out swaps in a fresh one.
#[derive(Default)]
struct SessionJar(RwLock<Jar>);

impl SessionJar {
    fn add_cookie_str(&self, cookie: &str, url: &Url) {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .add_cookie_str(cookie, url);
    }

    fn clear(&self) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Jar::default();
    }
}

impl CookieStore for SessionJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .set_cookies(cookie_headers, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .cookies(url)
    }
}

/// Thin async wrapper over the SelectFlow REST API. Cheap to clone; all
/// clones share one connection pool and one cookie jar.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    origin: Url,
    jar: Arc<SessionJar>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let origin = Url::parse(&base_url)
            .with_context(|| format!("Invalid API URL: {}", base_url))?;
        let jar = Arc::new(SessionJar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            origin,
            jar,
        })
    }

    /// Cookie header currently held for the backend, if any.
    pub fn session_cookie(&self) -> Option<String> {
        self.jar
            .cookies(&self.origin)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Forgets every cookie, so later requests go out anonymous.
    pub fn clear_session(&self) {
        self.jar.clear();
    }

    /// Seeds the jar from a header previously returned by `session_cookie`.
    pub fn restore_session(&self, cookie_header: &str) {
        for pair in cookie_header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.jar
                .add_cookie_str(&format!("{}; Path=/", pair), &self.origin);
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.client.get(self.url(path)), path).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.client.post(self.url(path)).json(body), path)
            .await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, ApiError> {
        debug!(path, "api request");
        let response = request.send().await.map_err(|e| {
            warn!(path, error = %e, "backend unreachable");
            ApiError::Connection
        })?;
        let result = decode(response).await;
        if let Err(e) = &result {
            warn!(path, error = %e, "api request failed");
        }
        result
    }

    // --- Health ---

    pub async fn health(&self) -> Result<Health, ApiError> {
        self.get("/health").await
    }

    // --- Authentication ---

    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let response: AuthResponse = self.post("/auth/login", credentials).await?;
        Ok(response.user)
    }

    pub async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        let response: AuthResponse = self.post("/auth/register", registration).await?;
        Ok(response.user)
    }

    /// The local cookie is dropped even when the backend call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let path = "/auth/logout";
        let result: Result<Ack, ApiError> = self
            .execute(self.client.post(self.url(path)), path)
            .await;
        self.clear_session();
        result.map(|_| ())
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/auth/me").await
    }

    // --- Public ---

    pub async fn public_jobs(&self) -> Result<Vec<Job>, ApiError> {
        self.get("/public/jobs").await
    }

    pub async fn public_stats(&self) -> Result<PublicStats, ApiError> {
        self.get("/public/stats").await
    }

    // --- Dashboard ---

    pub async fn dashboard_metrics(&self) -> Result<Metrics, ApiError> {
        self.get("/dashboard/metrics").await
    }

    pub async fn jobs(&self) -> Result<Vec<Job>, ApiError> {
        self.get("/jobs").await
    }

    pub async fn create_job(&self, job: &NewJob) -> Result<JobCreated, ApiError> {
        self.post("/jobs", job).await
    }

    pub async fn candidates(&self) -> Result<Vec<Candidate>, ApiError> {
        self.get("/candidates").await
    }

    pub async fn candidate_details(&self, candidate_id: i64) -> Result<Candidate, ApiError> {
        self.get(&format!("/candidates/{}/details", candidate_id))
            .await
    }

    pub async fn apply(&self, job_id: i64, job_source: Option<&str>) -> Result<(), ApiError> {
        let body = ApplicationRequest {
            job_id,
            job_source: job_source.unwrap_or(NATIVE_JOB_SOURCE),
        };
        let _: Ack = self.post("/applications", &body).await?;
        Ok(())
    }

    pub async fn applications(&self) -> Result<Vec<Application>, ApiError> {
        self.get("/applications").await
    }

    pub async fn toggle_favorite(&self, job_id: i64) -> Result<FavoriteToggle, ApiError> {
        self.post("/favorites", &FavoriteRequest { job_id }).await
    }

    pub async fn favorites(&self) -> Result<Vec<Job>, ApiError> {
        self.get("/favorites").await
    }

    pub async fn recommendations(&self) -> Result<Vec<Job>, ApiError> {
        self.get("/recommendations/jobs").await
    }

    /// The profile endpoint is role-scoped; the caller's role picks the shape.
    pub async fn profile(&self, role: Role) -> Result<Profile, ApiError> {
        match role {
            Role::Candidate => Ok(Profile::Candidate(
                self.get::<CandidateProfile>("/profile").await?,
            )),
            Role::Company => Ok(Profile::Company(
                self.get::<CompanyProfile>("/profile").await?,
            )),
        }
    }

    pub async fn update_profile(&self, profile: &Profile) -> Result<(), ApiError> {
        let path = "/profile";
        let _: Ack = self
            .execute(self.client.put(self.url(path)).json(profile), path)
            .await?;
        Ok(())
    }

    pub async fn tags(&self) -> Result<Vec<String>, ApiError> {
        self.get("/tags").await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));

    if !is_json {
        return Err(ApiError::Unexpected(format!(
            "Server returned {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )));
    }

    let body = response.bytes().await.map_err(|_| ApiError::Connection)?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
        return Err(ApiError::Server {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&body)
        .map_err(|e| ApiError::Unexpected(format!("Malformed response from server: {}", e)))
}
