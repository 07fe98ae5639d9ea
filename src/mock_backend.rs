//! In-process stand-in for the SelectFlow backend, used by tests.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

use crate::api::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobsMode {
    #[default]
    Ok,
    Empty,
    Fail,
    Html,
}

#[derive(Debug, Clone)]
pub struct MockState {
    pub jobs: Vec<Value>,
    pub jobs_mode: JobsMode,
    pub favorites: BTreeSet<i64>,
    pub applied: BTreeSet<i64>,
    pub logout_fails: bool,
    pub candidate_profile: Value,
    pub company_profile: Value,
    pub applications_received: usize,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            jobs: vec![
                job(1, "Rust Backend Developer", "Acme", "Recife, PE", "remoto", &["rust", "backend"]),
                job(2, "Frontend Engineer", "Globex", "São Paulo, SP", "híbrido", &["react", "typescript"]),
                job(3, "Data Analyst", "Initech", "Curitiba, PR", "presencial", &["sql", "python"]),
            ],
            jobs_mode: JobsMode::Ok,
            favorites: BTreeSet::from([2]),
            applied: BTreeSet::new(),
            logout_fails: false,
            candidate_profile: json!({
                "profile_title": "Developer",
                "bio": "",
                "skills": ["Rust"],
                "experience": [],
                "education": [],
                "languages": []
            }),
            company_profile: json!({
                "company_name": "Acme",
                "industry": "Software"
            }),
            applications_received: 0,
        }
    }
}

fn job(id: i64, title: &str, company: &str, location: &str, work: &str, tags: &[&str]) -> Value {
    json!({
        "id": id,
        "title": title,
        "company": company,
        "location": location,
        "workLocation": work,
        "salary": "R$ 8.000 - R$ 12.000",
        "type": "full-time",
        "applicants": 0,
        "description": format!("{} wanted", title),
        "tags": tags,
        "requirements": []
    })
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub base_url: String,
    state: Shared,
    task: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        Self::with(MockState::default()).await
    }

    pub async fn with(state: MockState) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state: Shared = Arc::new(Mutex::new(state));
        let app = router(state.clone());
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{}/api", addr),
            state,
            task,
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url).unwrap()
    }

    pub fn applications_received(&self) -> usize {
        self.state.lock().unwrap().applications_received
    }

    pub fn set_jobs_mode(&self, mode: JobsMode) {
        self.state.lock().unwrap().jobs_mode = mode;
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route("/api/public/jobs", get(public_jobs))
        .route("/api/public/stats", get(public_stats))
        .route("/api/dashboard/metrics", get(metrics))
        .route("/api/jobs", get(list_jobs).post(create_job))
        .route("/api/candidates", get(candidates))
        .route("/api/candidates/{id}/details", get(candidate_details))
        .route("/api/applications", get(applications).post(apply))
        .route("/api/favorites", get(favorites).post(toggle_favorite))
        .route("/api/recommendations/jobs", get(recommendations))
        .route("/api/profile", get(profile).put(update_profile))
        .route("/api/tags", get(tags))
        .with_state(state)
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn session_role(headers: &HeaderMap) -> Option<&'static str> {
    let cookie = headers.get(header::COOKIE)?.to_str().ok()?;
    if cookie.contains("session=candidate") {
        Some("candidate")
    } else if cookie.contains("session=company") {
        Some("company")
    } else {
        None
    }
}

fn user_json(role: &str) -> Value {
    match role {
        "company" => json!({"id": 20, "name": "Acme RH", "email": "rh@acme.com", "type": "company", "avatar": null}),
        _ => json!({"id": 10, "name": "Ana Souza", "email": "ana@example.com", "type": "candidate", "avatar": null}),
    }
}

fn with_session(role: &str, body: Value) -> Response {
    (
        [(header::SET_COOKIE, format!("session={}; Path=/", role))],
        Json(body),
    )
        .into_response()
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "database": "connected", "timestamp": "2024-05-01T10:00:00"}))
}

async fn login(Json(body): Json<Value>) -> Response {
    let role = body["userType"].as_str().unwrap_or("candidate").to_string();
    let known = matches!(body["email"].as_str(), Some("ana@example.com") | Some("rh@acme.com"));
    if !known || body["password"] != "secret" {
        return error(StatusCode::UNAUTHORIZED, "Credenciais inválidas");
    }
    with_session(&role, json!({"success": true, "user": user_json(&role)}))
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@example.com" {
        return error(StatusCode::BAD_REQUEST, "Já existe um cadastro com esse e-mail.");
    }
    let role = body["userType"].as_str().unwrap_or("candidate").to_string();
    let user = json!({
        "id": 30,
        "name": body["name"],
        "email": body["email"],
        "type": role,
        "avatar": null
    });
    with_session(&role, json!({"success": true, "user": user}))
}

async fn logout(State(state): State<Shared>) -> Response {
    if state.lock().unwrap().logout_fails {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao fazer logout");
    }
    (
        [(header::SET_COOKIE, "session=; Path=/; Max-Age=0")],
        Json(json!({"success": true})),
    )
        .into_response()
}

async fn me(headers: HeaderMap) -> Response {
    match session_role(&headers) {
        Some(role) => Json(user_json(role)).into_response(),
        None => error(StatusCode::UNAUTHORIZED, "Não autenticado"),
    }
}

async fn public_jobs(State(state): State<Shared>) -> Json<Value> {
    Json(Value::Array(state.lock().unwrap().jobs.clone()))
}

async fn public_stats(State(state): State<Shared>) -> Json<Value> {
    let jobs = state.lock().unwrap().jobs.len();
    Json(json!({"totalJobs": jobs, "totalCompanies": 3, "totalCandidates": 12}))
}

async fn metrics(headers: HeaderMap) -> Response {
    if session_role(&headers).is_none() {
        return error(StatusCode::UNAUTHORIZED, "Não autenticado");
    }
    Json(json!({
        "totalCandidates": 4,
        "activeJobs": 3,
        "candidatesInReview": 2,
        "scheduledInterviews": 1
    }))
    .into_response()
}

fn decorated_jobs(state: &MockState) -> Vec<Value> {
    state
        .jobs
        .iter()
        .map(|job| {
            let mut job = job.clone();
            let id = job["id"].as_i64().unwrap_or_default();
            job["isFavorite"] = json!(state.favorites.contains(&id));
            job["hasApplied"] = json!(state.applied.contains(&id));
            job
        })
        .collect()
}

async fn list_jobs(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if session_role(&headers).is_none() {
        return error(StatusCode::UNAUTHORIZED, "Não autenticado");
    }
    let state = state.lock().unwrap();
    match state.jobs_mode {
        JobsMode::Ok => Json(decorated_jobs(&state)).into_response(),
        JobsMode::Empty => Json(json!([])).into_response(),
        JobsMode::Fail => error(StatusCode::INTERNAL_SERVER_ERROR, "Erro interno do servidor"),
        JobsMode::Html => (
            StatusCode::BAD_GATEWAY,
            [(header::CONTENT_TYPE, "text/html")],
            "<html>bad gateway</html>",
        )
            .into_response(),
    }
}

async fn create_job(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if session_role(&headers) != Some("company") {
        return error(StatusCode::FORBIDDEN, "Acesso negado");
    }
    if body["title"].as_str().unwrap_or_default().is_empty() {
        return error(StatusCode::BAD_REQUEST, "Campos obrigatórios não preenchidos");
    }
    let mut state = state.lock().unwrap();
    let id = state.jobs.len() as i64 + 1;
    let mut created = body.clone();
    created["id"] = json!(id);
    created["applicants"] = json!(0);
    state.jobs.push(created);
    Json(json!({"success": true, "jobId": id})).into_response()
}

async fn candidates(headers: HeaderMap) -> Response {
    if session_role(&headers) != Some("company") {
        return error(StatusCode::FORBIDDEN, "Acesso negado");
    }
    Json(json!([{
        "id": 10,
        "name": "Ana Souza",
        "email": "ana@example.com",
        "profileTitle": "Developer",
        "bio": "Backend developer",
        "position": "Rust Backend Developer",
        "location": "Recife, PE",
        "skills": ["Rust", "SQL", "Docker", "Kubernetes"],
        "status": "technical_test",
        "appliedAt": "2024-05-01 10:00:00"
    }]))
    .into_response()
}

async fn candidate_details(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if session_role(&headers) != Some("company") {
        return error(StatusCode::FORBIDDEN, "Acesso negado");
    }
    if id != 10 {
        return error(StatusCode::NOT_FOUND, "Candidato não encontrado");
    }
    Json(json!({
        "id": 10,
        "name": "Ana Souza",
        "email": "ana@example.com",
        "phone": "+55 81 99999-0000",
        "profileTitle": "Developer",
        "bio": "Backend developer",
        "location": "Recife, PE",
        "skills": ["Rust", "SQL"],
        "experience": [{
            "title": "Engineer", "company": "Initech", "start_date": "2021-01",
            "end_date": null, "current": true, "location": "Recife",
            "location_type": "remoto", "description": "APIs", "skills": ["Rust"]
        }],
        "education": [{"degree": "BSc Computer Science", "institution": "UFPE", "year": 2020}],
        "languages": ["Portuguese", "English"],
        "github": "https://github.com/ana",
        "resumeContent": "Ana Souza - Backend developer"
    }))
    .into_response()
}

async fn apply(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if session_role(&headers) != Some("candidate") {
        return error(StatusCode::FORBIDDEN, "Acesso negado");
    }
    let Some(job_id) = body["jobId"].as_i64() else {
        return error(StatusCode::BAD_REQUEST, "ID da vaga é obrigatório");
    };
    let mut state = state.lock().unwrap();
    state.applications_received += 1;
    if !state.applied.insert(job_id) {
        return error(StatusCode::BAD_REQUEST, "Você já se candidatou a esta vaga");
    }
    Json(json!({"success": true})).into_response()
}

async fn applications(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if session_role(&headers) != Some("candidate") {
        return error(StatusCode::FORBIDDEN, "Acesso negado");
    }
    let state = state.lock().unwrap();
    let list: Vec<Value> = state
        .applied
        .iter()
        .map(|id| {
            json!({
                "id": 100 + id,
                "jobId": id,
                "jobTitle": format!("Job {}", id),
                "company": "Acme",
                "currentStage": "resume_analysis",
                "status": "pending",
                "jobSource": "selectflow",
                "appliedAt": "2024-05-01 10:00:00"
            })
        })
        .collect();
    Json(list).into_response()
}

async fn toggle_favorite(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if session_role(&headers) != Some("candidate") {
        return error(StatusCode::FORBIDDEN, "Acesso negado");
    }
    let Some(job_id) = body["jobId"].as_i64() else {
        return error(StatusCode::BAD_REQUEST, "ID da vaga é obrigatório");
    };
    let mut state = state.lock().unwrap();
    let is_favorite = if state.favorites.remove(&job_id) {
        false
    } else {
        state.favorites.insert(job_id);
        true
    };
    Json(json!({"success": true, "isFavorite": is_favorite})).into_response()
}

async fn favorites(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if session_role(&headers) != Some("candidate") {
        return error(StatusCode::FORBIDDEN, "Acesso negado");
    }
    let state = state.lock().unwrap();
    let list: Vec<Value> = decorated_jobs(&state)
        .into_iter()
        .filter(|job| job["isFavorite"] == true)
        .collect();
    Json(list).into_response()
}

async fn recommendations(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if session_role(&headers) != Some("candidate") {
        return error(StatusCode::FORBIDDEN, "Acesso negado");
    }
    let state = state.lock().unwrap();
    let list: Vec<Value> = decorated_jobs(&state)
        .into_iter()
        .take(2)
        .enumerate()
        .map(|(rank, mut job)| {
            job["matchScore"] = json!(80 - rank * 20);
            job
        })
        .collect();
    Json(list).into_response()
}

async fn profile(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    match session_role(&headers) {
        Some("candidate") => Json(state.candidate_profile.clone()).into_response(),
        Some(_) => Json(state.company_profile.clone()).into_response(),
        None => error(StatusCode::UNAUTHORIZED, "Não autenticado"),
    }
}

async fn update_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    match session_role(&headers) {
        Some("candidate") => state.candidate_profile = body,
        Some(_) => state.company_profile = body,
        None => return error(StatusCode::UNAUTHORIZED, "Não autenticado"),
    }
    Json(json!({"success": true})).into_response()
}

async fn tags() -> Json<Value> {
    Json(json!(["backend", "frontend", "remoto", "rust", "senior"]))
}
