mod api;
mod config;
mod filter;
mod forms;
#[cfg(test)]
mod mock_backend;
mod models;
mod router;
mod session;
mod store;
mod sync;
mod tui;
mod views;
mod widgets;

use anyhow::{anyhow, Context, Result};
use api::ApiClient;
use clap::{Parser, Subcommand};
use config::Config;
use models::{Job, NewJob, Role, WorkLocation};
use session::Session;
use ratatui::text::Text;
use store::SessionStore;
use tokio::runtime::Runtime;
use tracing::{info, warn};
use widgets::truncate;

#[derive(Parser)]
#[command(name = "selectflow")]
#[command(about = "Terminal client for the SelectFlow job board")]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = config::API_URL_VAR)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the full-screen client (the default)
    Tui {
        /// Start at a route such as /login or /dashboard/jobs
        #[arg(long)]
        open: Option<String>,
    },

    /// Check the backend and its database
    Health,

    /// Sign in and remember the session
    Login {
        email: String,
        password: String,

        /// candidate or company
        #[arg(short, long, default_value = "candidate")]
        role: Role,
    },

    /// Create an account and sign in
    Register {
        name: String,
        email: String,
        password: String,

        /// candidate or company
        #[arg(short, long, default_value = "candidate")]
        role: Role,

        /// Required for company accounts
        #[arg(long)]
        company_name: Option<String>,
    },

    /// Sign out and forget the saved session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List jobs
    Jobs {
        /// Only jobs whose title, company or tags contain this text
        #[arg(short, long)]
        search: Option<String>,

        /// Use the public listing (no sign-in needed)
        #[arg(long)]
        public: bool,
    },

    /// Public platform counters
    Stats,

    /// Dashboard counters for the signed-in user
    Metrics,

    /// List candidates who applied to your jobs
    Candidates,

    /// Show a candidate's full profile
    Candidate {
        /// Candidate ID
        id: i64,
    },

    /// Apply to a job
    Apply {
        /// Job ID
        job_id: i64,

        /// Where the job was found
        #[arg(long)]
        source: Option<String>,
    },

    /// Toggle a job as favorite
    Favorite {
        /// Job ID
        job_id: i64,
    },

    /// List favorite jobs
    Favorites,

    /// List your applications
    Applications,

    /// List recommended jobs
    Recommendations,

    /// Show or edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// List the tag vocabulary
    Tags,

    /// Publish a job (company accounts)
    PostJob {
        title: String,
        description: String,
        location: String,

        /// presencial, remoto or híbrido
        #[arg(short, long, default_value = "presencial")]
        work_location: WorkLocation,

        #[arg(short, long, default_value = "")]
        salary: String,

        /// Comma-separated
        #[arg(short, long, default_value = "")]
        requirements: String,

        /// Comma-separated
        #[arg(short, long, default_value = "")]
        tags: String,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Print every profile field
    Show,

    /// Change one field
    Set {
        /// Field key, as printed by `profile show`
        field: String,
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = config::data_dir();
    let log_path = config::init_logging(&data_dir)?;
    let config = Config::load(cli.api_url, data_dir);
    info!(api_url = %config.api_url, log = %log_path.display(), "starting");

    let api = ApiClient::new(&config.api_url)?;
    let store = SessionStore::new(&config.data_dir);
    let runtime = Runtime::new().context("Failed to start async runtime")?;

    match cli.command.unwrap_or(Commands::Tui { open: None }) {
        Commands::Tui { open } => tui::run(api, runtime.handle().clone(), store, open),
        command => {
            restore_session(&api, &store);
            runtime.block_on(run_command(command, &api, &store))
        }
    }
}

fn restore_session(api: &ApiClient, store: &SessionStore) {
    match store.load() {
        Ok(Some(cookie)) => api.restore_session(&cookie),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "ignoring unreadable saved session"),
    }
}

fn save_session(api: &ApiClient, store: &SessionStore) -> Result<()> {
    let cookie = api
        .session_cookie()
        .ok_or_else(|| anyhow!("Backend did not return a session cookie"))?;
    store.save(&cookie)
}

async fn run_command(command: Commands, api: &ApiClient, store: &SessionStore) -> Result<()> {
    match command {
        Commands::Tui { .. } => return Err(anyhow!("The TUI cannot run as a script command")),

        Commands::Health => {
            let health = api.health().await?;
            println!("Status: {}", health.status);
            if let Some(database) = &health.database {
                println!("Database: {}", database);
            }
            if let Some(timestamp) = &health.timestamp {
                println!("Timestamp: {}", timestamp);
            }
            if let Some(error) = &health.error {
                println!("Error: {}", error);
            }
        }

        Commands::Login { email, password, role } => {
            let credentials = models::Credentials { email, password, role };
            let user = Session::new().login(api, &credentials).await?;
            save_session(api, store)?;
            println!("Signed in as {} <{}> ({}).", user.name, user.email, user.role);
        }

        Commands::Register {
            name,
            email,
            password,
            role,
            company_name,
        } => {
            if role == Role::Company && company_name.as_deref().is_none_or(|n| n.trim().is_empty()) {
                return Err(anyhow!("--company-name is required for company accounts"));
            }
            let registration = models::Registration {
                name,
                email,
                password,
                role,
                company_name: company_name.filter(|_| role == Role::Company),
            };
            let user = Session::new().register(api, &registration).await?;
            save_session(api, store)?;
            println!("Account created. Signed in as {} <{}> ({}).", user.name, user.email, user.role);
        }

        Commands::Logout => {
            Session::new().logout(api).await;
            store.clear()?;
            println!("Signed out.");
        }

        Commands::Whoami => match api.current_user().await {
            Ok(user) => {
                println!("User #{}", user.id);
                println!("Name: {}", user.name);
                println!("Email: {}", user.email);
                println!("Role: {}", user.role.label());
            }
            Err(e) if e.status() == Some(401) => println!("Not signed in."),
            Err(e) => return Err(e.into()),
        },

        Commands::Jobs { search, public } => {
            let jobs = if public {
                api.public_jobs().await?
            } else {
                api.jobs().await?
            };
            let jobs = filter::filter_jobs(&jobs, search.as_deref().unwrap_or(""));
            print_jobs(&jobs);
        }

        Commands::Stats => {
            let stats = api.public_stats().await?;
            println!("Open jobs:  {}", stats.total_jobs);
            println!("Companies:  {}", stats.total_companies);
            println!("Candidates: {}", stats.total_candidates);
        }

        Commands::Metrics => {
            let metrics = api.dashboard_metrics().await?;
            println!("Candidates:           {}", metrics.total_candidates);
            println!("Active jobs:          {}", metrics.active_jobs);
            println!("In review:            {}", metrics.candidates_in_review);
            println!("Scheduled interviews: {}", metrics.scheduled_interviews);
            if let Some(total) = metrics.total_applications {
                println!("Applications:         {}", total);
            }
            if let Some(hired) = metrics.hired_candidates {
                println!("Hired:                {}", hired);
            }
        }

        Commands::Candidates => {
            let candidates = api.candidates().await?;
            if candidates.is_empty() {
                println!("No candidates found.");
            } else {
                println!("{:<6} {:<24} {:<24} {:<18} {:<16}", "ID", "NAME", "TITLE", "LOCATION", "STATUS");
                println!("{}", "-".repeat(92));
                for c in candidates {
                    println!(
                        "{:<6} {:<24} {:<24} {:<18} {:<16}",
                        c.id,
                        truncate(&c.name, 22),
                        truncate(c.profile_title.as_deref().unwrap_or("-"), 22),
                        truncate(c.location.as_deref().unwrap_or("-"), 16),
                        c.status.as_ref().map_or("-", |s| s.label())
                    );
                }
            }
        }

        Commands::Candidate { id } => {
            let candidate = api.candidate_details(id).await?;
            print_text(widgets::candidate_detail(&candidate, 80));
        }

        Commands::Apply { job_id, source } => {
            api.apply(job_id, source.as_deref()).await?;
            println!("Applied to job #{}.", job_id);
        }

        Commands::Favorite { job_id } => {
            let toggle = api.toggle_favorite(job_id).await?;
            if toggle.is_favorite {
                println!("Job #{} added to favorites.", job_id);
            } else {
                println!("Job #{} removed from favorites.", job_id);
            }
        }

        Commands::Favorites => {
            let jobs = api.favorites().await?;
            print_jobs(&jobs.iter().collect::<Vec<_>>());
        }

        Commands::Applications => {
            let applications = api.applications().await?;
            if applications.is_empty() {
                println!("No applications found.");
            } else {
                println!("{:<6} {:<28} {:<20} {:<18} {:<10}", "ID", "JOB", "COMPANY", "STAGE", "APPLIED");
                println!("{}", "-".repeat(86));
                for app in applications {
                    let mut job = app.job_title.clone();
                    if app.is_external() {
                        job.push_str(" [ext]");
                    }
                    println!(
                        "{:<6} {:<28} {:<20} {:<18} {:<10}",
                        app.id,
                        truncate(&job, 26),
                        truncate(app.company.as_deref().unwrap_or("-"), 18),
                        truncate(app.current_stage.as_ref().map_or("-", |s| s.label()), 16),
                        app.applied_on()
                            .map(|d| d.format("%d/%m/%Y").to_string())
                            .unwrap_or_else(|| "-".to_string())
                    );
                }
            }
        }

        Commands::Recommendations => {
            let jobs = api.recommendations().await?;
            if jobs.is_empty() {
                println!("No recommendations yet. Complete your profile to get better matches.");
            } else {
                println!("{:<6} {:<7} {:<30} {:<20} {:<14}", "ID", "MATCH", "TITLE", "COMPANY", "WHERE");
                println!("{}", "-".repeat(81));
                for job in jobs {
                    println!(
                        "{:<6} {:<7} {:<30} {:<20} {:<14}",
                        job.id,
                        job.match_score.map_or("-".to_string(), |s| format!("{}%", s)),
                        truncate(&job.title, 28),
                        truncate(job.company_name(), 18),
                        job.work_location.as_ref().map_or("-", |w| w.label())
                    );
                }
            }
        }

        Commands::Profile { command } => {
            let user = api.current_user().await?;
            let mut profile = api.profile(user.role).await?;
            match command {
                ProfileCommands::Show => {
                    println!("{} profile of {}", user.role.label(), user.name);
                    println!("{}", "-".repeat(40));
                    for (key, _) in profile.field_specs() {
                        let value = profile.get_field(key).unwrap_or_default();
                        println!("{:<22} {}", key, if value.is_empty() { "-" } else { value.as_str() });
                    }
                }
                ProfileCommands::Set { field, value } => {
                    profile.set_field(&field, &value).map_err(|e| anyhow!(e))?;
                    api.update_profile(&profile).await?;
                    println!("Profile updated successfully!");
                }
            }
        }

        Commands::Tags => {
            let tags = api.tags().await?;
            if tags.is_empty() {
                println!("No tags found.");
            } else {
                for tag in tags {
                    println!("{}", tag);
                }
            }
        }

        Commands::PostJob {
            title,
            description,
            location,
            work_location,
            salary,
            requirements,
            tags,
        } => {
            let job = NewJob::new(
                &title,
                &description,
                &location,
                work_location,
                &salary,
                &requirements,
                &tags,
            );
            let created = api.create_job(&job).await?;
            println!("Job created successfully! (#{})", created.job_id);
        }
    }

    Ok(())
}

fn print_jobs(jobs: &[&Job]) {
    if jobs.is_empty() {
        println!("No jobs found.");
        return;
    }
    println!(
        "{:<6} {:<30} {:<20} {:<12} {:<14} {:>5}",
        "ID", "TITLE", "COMPANY", "WHERE", "SALARY", "APPL"
    );
    println!("{}", "-".repeat(92));
    for job in jobs {
        let mut title = job.title.clone();
        if job.is_favorite {
            title.push_str(" *");
        }
        println!(
            "{:<6} {:<30} {:<20} {:<12} {:<14} {:>5}",
            job.id,
            truncate(&title, 28),
            truncate(job.company_name(), 18),
            job.work_location.as_ref().map_or("-", |w| w.label()),
            truncate(job.salary.as_deref().unwrap_or("-"), 12),
            job.applicants
        );
    }
}

/// Prints a rendered detail block as plain text.
fn print_text(text: Text) {
    for line in text.lines {
        let plain: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
        println!("{}", plain);
    }
}
