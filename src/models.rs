use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// --- Identity ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidate,
    Company,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Company => "company",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Candidate => "Candidate",
            Role::Company => "Company",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "candidate" | "candidato" => Ok(Role::Candidate),
            "company" | "empresa" => Ok(Role::Company),
            other => Err(format!("unknown role '{}' (expected candidate or company)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(rename = "type")]
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl User {
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

// --- Jobs ---

/// Work arrangement of a job. The backend stores free text, so anything
/// outside the three known values is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkLocation {
    Remote,
    OnSite,
    Hybrid,
    Other(String),
}

impl WorkLocation {
    pub fn label(&self) -> &str {
        match self {
            WorkLocation::Remote => "Remote",
            WorkLocation::OnSite => "On-site",
            WorkLocation::Hybrid => "Hybrid",
            WorkLocation::Other(raw) => raw,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            WorkLocation::Remote => "[home]",
            WorkLocation::OnSite => "[office]",
            WorkLocation::Hybrid => "[hybrid]",
            WorkLocation::Other(_) => "[*]",
        }
    }
}

impl From<String> for WorkLocation {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "remoto" | "remote" => WorkLocation::Remote,
            "presencial" | "on-site" | "onsite" => WorkLocation::OnSite,
            "híbrido" | "hibrido" | "hybrid" => WorkLocation::Hybrid,
            _ => WorkLocation::Other(raw),
        }
    }
}

impl From<WorkLocation> for String {
    fn from(value: WorkLocation) -> Self {
        match value {
            WorkLocation::Remote => "remoto".to_string(),
            WorkLocation::OnSite => "presencial".to_string(),
            WorkLocation::Hybrid => "híbrido".to_string(),
            WorkLocation::Other(raw) => raw,
        }
    }
}

impl FromStr for WorkLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match WorkLocation::from(s.to_string()) {
            WorkLocation::Other(raw) => Err(format!(
                "unknown work location '{}' (expected presencial, remoto or híbrido)",
                raw
            )),
            known => Ok(known),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub work_location: Option<WorkLocation>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(rename = "type", default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub applicants: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub has_applied: bool,
    #[serde(default)]
    pub match_score: Option<u32>,
    #[serde(default)]
    pub posted_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Job {
    pub fn company_name(&self) -> &str {
        self.company.as_deref().unwrap_or("Company")
    }
}

/// Payload for `POST /jobs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub location: String,
    pub work_location: WorkLocation,
    pub salary: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub employment_type: String,
    pub requirements: Vec<String>,
    pub tags: Vec<String>,
}

impl NewJob {
    pub fn new(
        title: &str,
        description: &str,
        location: &str,
        work_location: WorkLocation,
        salary: &str,
        requirements: &str,
        tags: &str,
    ) -> Self {
        Self {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            location: location.trim().to_string(),
            work_location,
            salary: salary.trim().to_string(),
            job_type: "full-time".to_string(),
            employment_type: "tempo_integral".to_string(),
            requirements: split_list(requirements),
            tags: split_list(tags),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCreated {
    pub job_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggle {
    pub is_favorite: bool,
}

// --- Applications ---

/// Hiring pipeline stage. Opaque to the client beyond its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stage {
    Pending,
    UnderReview,
    Approved,
    Rejected,
    ResumeAnalysis,
    TechnicalTest,
    GroupDynamics,
    Interview,
    ReferenceCheck,
    FinalInterview,
    Hired,
    Other(String),
}

impl Stage {
    pub fn label(&self) -> &str {
        match self {
            Stage::Pending => "Pending",
            Stage::UnderReview => "Under review",
            Stage::Approved => "Approved",
            Stage::Rejected => "Rejected",
            Stage::ResumeAnalysis => "Resume analysis",
            Stage::TechnicalTest => "Technical test",
            Stage::GroupDynamics => "Group dynamics",
            Stage::Interview => "Interview",
            Stage::ReferenceCheck => "Reference check",
            Stage::FinalInterview => "Final interview",
            Stage::Hired => "Hired",
            Stage::Other(raw) => raw,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Stage::Approved | Stage::Hired => Tone::Good,
            Stage::Rejected => Tone::Bad,
            Stage::Pending | Stage::Other(_) => Tone::Waiting,
            _ => Tone::Progress,
        }
    }
}

/// Badge colouring class for a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Bad,
    Waiting,
    Progress,
}

impl From<String> for Stage {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => Stage::Pending,
            "under_review" => Stage::UnderReview,
            "approved" => Stage::Approved,
            "rejected" => Stage::Rejected,
            "resume_analysis" => Stage::ResumeAnalysis,
            "technical_test" => Stage::TechnicalTest,
            "group_dynamics" => Stage::GroupDynamics,
            "interview" => Stage::Interview,
            "reference_check" => Stage::ReferenceCheck,
            "final_interview" => Stage::FinalInterview,
            "hired" => Stage::Hired,
            _ => Stage::Other(raw),
        }
    }
}

impl From<Stage> for String {
    fn from(value: Stage) -> Self {
        let key = match value {
            Stage::Pending => "pending",
            Stage::UnderReview => "under_review",
            Stage::Approved => "approved",
            Stage::Rejected => "rejected",
            Stage::ResumeAnalysis => "resume_analysis",
            Stage::TechnicalTest => "technical_test",
            Stage::GroupDynamics => "group_dynamics",
            Stage::Interview => "interview",
            Stage::ReferenceCheck => "reference_check",
            Stage::FinalInterview => "final_interview",
            Stage::Hired => "hired",
            Stage::Other(raw) => return raw,
        };
        key.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i64,
    #[serde(default)]
    pub job_id: Option<i64>,
    pub job_title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub current_stage: Option<Stage>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub work_location: Option<WorkLocation>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub job_source: Option<String>,
    #[serde(default)]
    pub applied_at: Option<String>,
}

pub const NATIVE_JOB_SOURCE: &str = "selectflow";

impl Application {
    /// True when the job was found outside the platform.
    pub fn is_external(&self) -> bool {
        self.job_source
            .as_deref()
            .is_some_and(|source| source != NATIVE_JOB_SOURCE)
    }

    pub fn applied_on(&self) -> Option<NaiveDate> {
        self.applied_at.as_deref().and_then(parse_timestamp)
    }
}

/// Backend timestamps come from SQLite (`2024-05-01 10:00:00`) or ISO 8601.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

// --- Candidates ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub location_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Experience {
    pub fn period(&self) -> String {
        let start = self.start_date.as_deref().unwrap_or("?");
        let end = if self.current {
            "present"
        } else {
            self.end_date.as_deref().unwrap_or("?")
        };
        format!("{} - {}", start, end)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: Option<String>,
}

/// Languages are stored either as bare names or as `{language, level}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Language {
    Name(String),
    Detailed {
        language: String,
        #[serde(default)]
        level: Option<String>,
    },
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Name(name) => f.write_str(name),
            Language::Detailed { language, level: Some(level) } => write!(f, "{} ({})", language, level),
            Language::Detailed { language, level: None } => f.write_str(language),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub profile_title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub status: Option<Stage>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub professional_interest: Option<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
    #[serde(default)]
    pub resume_content: Option<String>,
    #[serde(default)]
    pub applied_at: Option<String>,
}

// --- Profile ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct CandidateProfile {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "profileTitle")]
    pub profile_title: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, alias = "professionalInterest")]
    pub professional_interest: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
}

/// Editable profile, shaped by the role of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Profile {
    Candidate(CandidateProfile),
    Company(CompanyProfile),
}

pub const CANDIDATE_PROFILE_FIELDS: &[(&str, &str)] = &[
    ("profile_title", "Profile title"),
    ("bio", "About you"),
    ("phone", "Phone"),
    ("location", "Location"),
    ("professional_interest", "Professional interest"),
    ("skills", "Skills (comma-separated)"),
    ("linkedin", "LinkedIn"),
    ("github", "GitHub"),
    ("portfolio", "Portfolio"),
];

/// What a candidate is on the platform for, as the backend stores it.
pub const PROFESSIONAL_INTERESTS: &[(&str, &str)] = &[
    ("encontrar_emprego", "Find a new job"),
    ("prestar_servicos", "Offer services"),
    ("contratar", "Hire"),
];

/// Unknown values are shown as stored.
pub fn interest_label(raw: &str) -> &str {
    PROFESSIONAL_INTERESTS
        .iter()
        .find(|(value, _)| *value == raw)
        .map_or(raw, |(_, label)| *label)
}

pub const COMPANY_PROFILE_FIELDS: &[(&str, &str)] = &[
    ("company_name", "Company name"),
    ("description", "Description"),
    ("industry", "Industry"),
    ("size", "Company size"),
    ("website", "Website"),
    ("location", "Location"),
    ("linkedin", "Company LinkedIn"),
];

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Profile::Candidate(_) => Role::Candidate,
            Profile::Company(_) => Role::Company,
        }
    }

    /// `(key, label)` pairs of the fields the user may edit.
    pub fn field_specs(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Profile::Candidate(_) => CANDIDATE_PROFILE_FIELDS,
            Profile::Company(_) => COMPANY_PROFILE_FIELDS,
        }
    }

    pub fn get_field(&self, key: &str) -> Option<String> {
        let text = |value: &Option<String>| Some(value.clone().unwrap_or_default());
        match self {
            Profile::Candidate(p) => match key {
                "phone" => text(&p.phone),
                "location" => text(&p.location),
                "profile_title" => text(&p.profile_title),
                "bio" => text(&p.bio),
                "professional_interest" => text(&p.professional_interest),
                "skills" => Some(p.skills.join(", ")),
                "linkedin" => text(&p.linkedin),
                "github" => text(&p.github),
                "portfolio" => text(&p.portfolio),
                _ => None,
            },
            Profile::Company(p) => match key {
                "company_name" => text(&p.company_name),
                "description" => text(&p.description),
                "industry" => text(&p.industry),
                "size" => text(&p.size),
                "website" => text(&p.website),
                "location" => text(&p.location),
                "linkedin" => text(&p.linkedin),
                _ => None,
            },
        }
    }

    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        let text = || (!value.is_empty()).then(|| value.to_string());
        let slot = match self {
            Profile::Candidate(p) => match key {
                "skills" => {
                    p.skills = split_list(value);
                    return Ok(());
                }
                "phone" => &mut p.phone,
                "location" => &mut p.location,
                "profile_title" => &mut p.profile_title,
                "bio" => &mut p.bio,
                "professional_interest" => &mut p.professional_interest,
                "linkedin" => &mut p.linkedin,
                "github" => &mut p.github,
                "portfolio" => &mut p.portfolio,
                _ => return Err(unknown_field(key, CANDIDATE_PROFILE_FIELDS)),
            },
            Profile::Company(p) => match key {
                "company_name" => &mut p.company_name,
                "description" => &mut p.description,
                "industry" => &mut p.industry,
                "size" => &mut p.size,
                "website" => &mut p.website,
                "location" => &mut p.location,
                "linkedin" => &mut p.linkedin,
                _ => return Err(unknown_field(key, COMPANY_PROFILE_FIELDS)),
            },
        };
        *slot = text();
        Ok(())
    }
}

fn unknown_field(key: &str, specs: &[(&str, &str)]) -> String {
    let known: Vec<&str> = specs.iter().map(|(k, _)| *k).collect();
    format!("unknown profile field '{}'. Available: {}", key, known.join(", "))
}

// --- Aggregates ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    #[serde(default)]
    pub total_candidates: u32,
    #[serde(default)]
    pub active_jobs: u32,
    #[serde(default)]
    pub candidates_in_review: u32,
    #[serde(default)]
    pub scheduled_interviews: u32,
    #[serde(default)]
    pub total_applications: Option<u32>,
    #[serde(default)]
    pub hired_candidates: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStats {
    #[serde(default)]
    pub total_jobs: u32,
    #[serde(default)]
    pub total_companies: u32,
    #[serde(default)]
    pub total_candidates: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// --- Request payloads ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    #[serde(rename = "userType")]
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "userType")]
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

/// Splits a comma-separated form value, dropping blank entries.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
