use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, ListItem, Paragraph, Wrap},
};

use crate::forms::{FieldKind, Form};
use crate::models::{
    interest_label, Application, Candidate, Job, Metrics, Role, Tone, WorkLocation,
};
use crate::views::{EmptyState, Notice};

const TAG_PREVIEW: usize = 3;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Cuts `text` to at most `max` characters, ending in "..." when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// First few entries plus a "+N" count for the rest.
pub fn preview_list(items: &[String], limit: usize) -> String {
    let shown: Vec<&str> = items.iter().take(limit).map(String::as_str).collect();
    match items.len().saturating_sub(limit) {
        0 => shown.join(", "),
        rest => format!("{} +{}", shown.join(", "), rest),
    }
}

pub fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Good => Style::default().fg(Color::Green),
        Tone::Bad => Style::default().fg(Color::Red),
        Tone::Waiting => Style::default().fg(Color::Yellow),
        Tone::Progress => Style::default().fg(Color::Cyan),
    }
}

// --- Cards ---

pub fn job_card(job: &Job, role: Role, pending: bool) -> ListItem<'static> {
    let mut title = vec![Span::styled(job.title.clone(), bold())];
    match role {
        Role::Candidate => {
            if job.is_favorite {
                title.push(Span::styled(" [fav]", Style::default().fg(Color::Yellow)));
            }
            if job.has_applied {
                title.push(Span::styled(" [applied]", Style::default().fg(Color::Green)));
            }
        }
        Role::Company => {
            if let Some(status) = &job.status {
                title.push(Span::styled(format!(" ({})", status), dim()));
            }
        }
    }
    if let Some(score) = job.match_score {
        title.push(Span::styled(format!(" {}% match", score), Style::default().fg(Color::Magenta)));
    }
    if pending {
        title.push(Span::styled(" ...", dim()));
    }

    let marker = job.work_location.as_ref().map_or("[*]", |w| w.marker());
    let mut place = format!("{} {}", job.company_name(), marker);
    if let Some(location) = &job.location {
        place.push_str(&format!(" {}", location));
    }
    if let Some(salary) = job.salary.as_deref().filter(|s| !s.is_empty()) {
        place.push_str(&format!(" | {}", salary));
    }

    let mut footer = format!("{} applicants", job.applicants);
    if !job.tags.is_empty() {
        footer = format!("{}  {}", preview_list(&job.tags, TAG_PREVIEW), footer);
    }

    ListItem::new(vec![
        Line::from(title),
        Line::from(format!("  {}", place)),
        Line::from(Span::styled(format!("  {}", footer), dim())),
    ])
}

pub fn job_detail(job: &Job, width: usize) -> Text<'static> {
    let mut lines = vec![
        Line::from(Span::styled(job.title.clone(), bold())),
        Line::from(format!("at {}", job.company_name())),
    ];
    if let Some(work) = &job.work_location {
        let location = job.location.as_deref().unwrap_or("-");
        lines.push(Line::from(format!("{} ({})", location, work.label())));
    }
    if let Some(salary) = job.salary.as_deref().filter(|s| !s.is_empty()) {
        lines.push(Line::from(format!("Salary: {}", salary)));
    }
    if let Some(kind) = &job.job_type {
        lines.push(Line::from(format!("Type: {}", kind)));
    }
    lines.push(Line::from(""));

    if let Some(description) = &job.description {
        for line in textwrap::fill(description, width.max(20)).lines() {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::from(""));
    }
    if !job.requirements.is_empty() {
        lines.push(Line::from(Span::styled("Requirements", bold())));
        for requirement in &job.requirements {
            lines.push(Line::from(format!("  - {}", requirement)));
        }
        lines.push(Line::from(""));
    }
    if !job.tags.is_empty() {
        lines.push(Line::from(Span::styled(job.tags.join(", "), Style::default().fg(Color::Cyan))));
    }
    Text::from(lines)
}

pub fn candidate_card(candidate: &Candidate) -> ListItem<'static> {
    let mut title = vec![Span::styled(candidate.name.clone(), bold())];
    if let Some(stage) = &candidate.status {
        title.push(Span::raw(" "));
        title.push(Span::styled(format!("[{}]", stage.label()), tone_style(stage.tone())));
    }

    let headline = [
        candidate.profile_title.as_deref(),
        candidate.location.as_deref(),
        candidate.position.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" | ");

    let mut lines = vec![Line::from(title), Line::from(format!("  {}", headline))];
    if let Some(bio) = &candidate.bio {
        lines.push(Line::from(Span::styled(format!("  {}", truncate(bio, 70)), dim())));
    }
    if !candidate.skills.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", preview_list(&candidate.skills, TAG_PREVIEW)),
            Style::default().fg(Color::Cyan),
        )));
    }
    ListItem::new(lines)
}

pub fn candidate_detail(candidate: &Candidate, width: usize) -> Text<'static> {
    let width = width.max(20);
    let heading = |text: &str| Line::from(Span::styled(text.to_string(), bold()));
    let mut lines = vec![Line::from(Span::styled(
        candidate.name.clone(),
        bold().fg(Color::Cyan),
    ))];
    if let Some(title) = &candidate.profile_title {
        lines.push(Line::from(title.clone()));
    }
    let interest = candidate.professional_interest.as_deref().map(interest_label);
    for (label, value) in [
        ("Email", candidate.email.as_deref()),
        ("Phone", candidate.phone.as_deref()),
        ("Location", candidate.location.as_deref()),
        ("Interest", interest),
    ] {
        if let Some(value) = value {
            lines.push(Line::from(format!("{}: {}", label, value)));
        }
    }
    if let Some(stage) = &candidate.status {
        lines.push(Line::from(Span::styled(
            format!("Status: {}", stage.label()),
            tone_style(stage.tone()),
        )));
    }

    if let Some(bio) = &candidate.bio {
        lines.push(Line::from(""));
        lines.push(heading("About"));
        for line in textwrap::fill(bio, width).lines() {
            lines.push(Line::from(line.to_string()));
        }
    }
    if !candidate.skills.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Skills"));
        lines.push(Line::from(candidate.skills.join(", ")));
    }
    if !candidate.experience.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Experience"));
        for job in &candidate.experience {
            lines.push(Line::from(format!(
                "  {} @ {} ({})",
                job.title.as_deref().unwrap_or("-"),
                job.company.as_deref().unwrap_or("-"),
                job.period()
            )));
            let setting = job.location_type.clone().map(WorkLocation::from);
            let place = match (job.location.as_deref(), setting.as_ref()) {
                (Some(location), Some(setting)) => {
                    Some(format!("{} ({})", location, setting.label()))
                }
                (Some(location), None) => Some(location.to_string()),
                (None, Some(setting)) => Some(setting.label().to_string()),
                (None, None) => None,
            };
            if let Some(place) = place {
                lines.push(Line::from(format!("    {}", place)));
            }
            if !job.skills.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    Skills: {}", job.skills.join(", ")),
                    Style::default().fg(Color::Cyan),
                )));
            }
            if let Some(description) = &job.description {
                for line in textwrap::fill(description, width.saturating_sub(4)).lines() {
                    lines.push(Line::from(Span::styled(format!("    {}", line), dim())));
                }
            }
        }
    }
    if !candidate.education.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Education"));
        for school in &candidate.education {
            let year = school.year.as_deref().map(|y| format!(" ({})", y)).unwrap_or_default();
            lines.push(Line::from(format!(
                "  {} - {}{}",
                school.degree.as_deref().unwrap_or("-"),
                school.institution.as_deref().unwrap_or("-"),
                year
            )));
        }
    }
    if !candidate.languages.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Languages"));
        let languages: Vec<String> = candidate.languages.iter().map(|l| l.to_string()).collect();
        lines.push(Line::from(languages.join(", ")));
    }

    let links: Vec<String> = [
        ("LinkedIn", &candidate.linkedin),
        ("GitHub", &candidate.github),
        ("Portfolio", &candidate.portfolio),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}: {}", label, v)))
    .collect();
    if !links.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Links"));
        lines.extend(links.into_iter().map(Line::from));
    }

    if let Some(resume) = &candidate.resume_content {
        lines.push(Line::from(""));
        lines.push(heading("Resume"));
        for line in textwrap::fill(resume, width).lines() {
            lines.push(Line::from(line.to_string()));
        }
    }
    Text::from(lines)
}

pub fn application_card(application: &Application) -> ListItem<'static> {
    let mut title = vec![Span::styled(application.job_title.clone(), bold())];
    if application.is_external() {
        title.push(Span::styled(" [external]", Style::default().fg(Color::Magenta)));
    }

    let stage = match &application.current_stage {
        Some(stage) => Span::styled(format!("[{}]", stage.label()), tone_style(stage.tone())),
        None => Span::styled("[Pending]", tone_style(Tone::Waiting)),
    };
    let mut place = vec![
        Span::raw(format!("  {} ", application.company.as_deref().unwrap_or("Company"))),
        stage,
    ];
    if let Some(date) = application.applied_on() {
        place.push(Span::styled(format!("  applied {}", date.format("%d/%m/%Y")), dim()));
    }

    ListItem::new(vec![Line::from(title), Line::from(place)])
}

// --- Frames ---

/// A rectangle of the given percentages centered in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);
    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(vertical[1])[1]
}

pub fn render_modal(frame: &mut Frame, title: &str, body: Text, scroll: u16) {
    let area = centered_rect(70, 70, frame.area());
    frame.render_widget(Clear, area);
    let modal = Paragraph::new(body)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title))
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(modal, area);
}

/// Blocking message; the caller waits for a key before clearing it.
pub fn render_alert(frame: &mut Frame, message: &str) {
    let area = centered_rect(50, 25, frame.area());
    frame.render_widget(Clear, area);
    let text = Text::from(vec![
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled("Press any key to continue", dim())),
    ]);
    let alert = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Error ")
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(alert, area);
}

pub fn render_loading(frame: &mut Frame, area: Rect, what: &str) {
    let text = Paragraph::new(format!("Loading {}...", what))
        .style(dim())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, area);
}

pub fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))),
        Line::from(Span::styled("Press r to try again", dim())),
    ]))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title(" Error "));
    frame.render_widget(text, area);
}

pub fn render_empty(frame: &mut Frame, area: Rect, empty: EmptyState) {
    let text = Paragraph::new(Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(empty.message, bold())),
        Line::from(Span::styled(empty.action, Style::default().fg(Color::Cyan))),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, area);
}

pub fn notice_line(notice: &Notice) -> Line<'static> {
    match notice {
        Notice::Success(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Green),
        )),
        Notice::Error(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        )),
    }
}

/// Counter tiles. Optional counters only appear when the backend sent them.
pub fn render_metrics(frame: &mut Frame, area: Rect, metrics: &Metrics) {
    let mut cards = vec![
        ("Candidates", metrics.total_candidates, Color::Cyan),
        ("Active jobs", metrics.active_jobs, Color::Green),
        ("In review", metrics.candidates_in_review, Color::Yellow),
        ("Interviews", metrics.scheduled_interviews, Color::Magenta),
    ];
    if let Some(total) = metrics.total_applications {
        cards.push(("Applications", total, Color::Blue));
    }
    if let Some(hired) = metrics.hired_candidates {
        cards.push(("Hired", hired, Color::Green));
    }

    let columns = Layout::horizontal(vec![Constraint::Ratio(1, cards.len() as u32); cards.len()])
        .split(area);
    for ((label, value, color), column) in cards.into_iter().zip(columns.iter()) {
        let card = Paragraph::new(Text::from(vec![
            Line::from(Span::styled(value.to_string(), bold().fg(color))),
            Line::from(Span::styled(label, dim())),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(card, *column);
    }
}

pub fn render_form(frame: &mut Frame, area: Rect, form: &Form, notice: Option<&Notice>) {
    let mut lines = Vec::new();
    for (index, field) in form.fields().iter().enumerate() {
        let focused = index == form.focus();
        let marker = if focused { "> " } else { "  " };
        let required = if field.required { " *" } else { "" };
        let label_style = if focused { bold().fg(Color::Cyan) } else { bold() };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{}{}", field.label, required), label_style),
        ]));
        let value = match (field.kind, focused) {
            (FieldKind::Choice(_), _) | (_, false) => field.display(),
            (_, true) => format!("{}_", field.display()),
        };
        lines.push(Line::from(format!("    {}", value)));
    }
    lines.push(Line::from(""));
    if form.submitting {
        lines.push(Line::from(Span::styled("Saving...", dim())));
    } else if let Some(notice) = notice {
        lines.push(notice_line(notice));
    }

    let widget = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", form.title)))
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}
