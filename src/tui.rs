use anyhow::Result;
use crossterm::{
    event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::forms::{self, Form};
use crate::models::{interest_label, Role, User};
use crate::router::{Route, Tab};
use crate::session::Session;
use crate::store::SessionStore;
use crate::sync::{Command, Envelope, Event, Executor, Scope, TaskScope};
use crate::views::{
    empty_state, ActiveView, Content, Dashboard, EmptyState, JobList, LandingView, Loadable,
    Notice, ProfileView, LANDING_EMPTY, NO_SEARCH_MATCHES,
};
use crate::widgets;

const TICK: Duration = Duration::from_millis(100);

const LANDING_HELP: &str = " j/k:scroll  /:search  l:sign in  n:create account  r:reload  q:quit";
const AUTH_HELP: &str = " Tab/Up/Down:field  Left/Right:choose  Enter:submit  Esc:back";
const FORM_HELP: &str = " Tab/Up/Down:field  Left/Right:choose  Enter:save  Esc:cancel";
const SEARCH_HELP: &str = " type to filter  Enter/Esc:done";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    Login,
    Register,
}

struct AuthScreen {
    mode: AuthMode,
    form: Form,
    error: Option<String>,
}

enum Screen {
    Splash(&'static str),
    Landing(LandingView, usize),
    SignIn(AuthScreen),
    Dashboard(Dashboard),
}

struct App {
    session: Session,
    screen: Screen,
    executor: Executor,
    rx: UnboundedReceiver<Envelope>,
    store: SessionStore,
    app_tasks: TaskScope,
    start: Option<String>,
    searching: bool,
    detail_open: bool,
    detail_scroll: u16,
    quit: bool,
}

impl App {
    fn new(
        executor: Executor,
        rx: UnboundedReceiver<Envelope>,
        store: SessionStore,
        start: Option<String>,
    ) -> Self {
        Self {
            session: Session::new(),
            screen: Screen::Splash("Checking session..."),
            executor,
            rx,
            store,
            app_tasks: TaskScope::default(),
            start,
            searching: false,
            detail_open: false,
            detail_scroll: 0,
            quit: false,
        }
    }

    fn route(&self) -> Option<Route> {
        match &self.screen {
            Screen::Splash(_) => None,
            Screen::Landing(..) => Some(Route::Landing),
            Screen::SignIn(auth) => match auth.mode {
                AuthMode::Login => Some(Route::Login),
                AuthMode::Register => Some(Route::Register),
            },
            Screen::Dashboard(dashboard) => Some(Route::Dashboard(dashboard.nav().active())),
        }
    }

    fn start(&mut self) {
        self.session.begin();
        self.dispatch(Command::CheckStatus);
    }

    fn dispatch(&mut self, command: Command) {
        if command.is_app_scoped() {
            let handle = self.executor.spawn(Scope::App, command);
            self.app_tasks.track(handle);
        } else if let Screen::Dashboard(dashboard) = &mut self.screen {
            let scope = Scope::View(dashboard.generation());
            let handle = self.executor.spawn(scope, command.clone());
            dashboard.track(&command, handle);
        }
    }

    fn drain(&mut self) {
        while let Ok(envelope) = self.rx.try_recv() {
            self.on_envelope(envelope);
        }
    }

    fn on_envelope(&mut self, envelope: Envelope) {
        match envelope.scope {
            Scope::App => self.on_app_event(envelope.event),
            Scope::View(generation) => {
                let follow_up = match &mut self.screen {
                    Screen::Dashboard(dashboard) => dashboard.handle(generation, envelope.event),
                    _ => None,
                };
                if let Some(command) = follow_up {
                    self.dispatch(command);
                }
            }
        }
    }

    fn on_app_event(&mut self, event: Event) {
        match event {
            Event::StatusChecked(result) => {
                self.session.complete_status_check(result);
                let role = self.session.role();
                let route = self
                    .start
                    .take()
                    .and_then(|path| Route::resolve(&path, role))
                    .unwrap_or(Route::initial(role));
                self.navigate(route);
            }
            Event::SignedIn(result) => match self.session.complete_sign_in(result) {
                Ok(user) => {
                    self.persist_session();
                    self.enter_dashboard(user, Tab::Home);
                }
                Err(_) => {
                    if let Screen::SignIn(auth) = &mut self.screen {
                        auth.form.submitting = false;
                        auth.error = self.session.last_error().map(str::to_string);
                    }
                }
            },
            Event::SignedOut(result) => {
                self.session.complete_logout(result);
                self.show_landing();
            }
            Event::LandingLoaded(result) => {
                if let Screen::Landing(view, _) = &mut self.screen {
                    view.load(result);
                }
            }
            other => warn!(event = ?other, "view event delivered on app scope"),
        }
    }

    fn navigate(&mut self, route: Route) {
        match (route, self.session.user().cloned()) {
            (Route::Dashboard(tab), Some(user)) => self.enter_dashboard(user, tab),
            (Route::Login, _) => self.open_auth(AuthMode::Login),
            (Route::Register, _) => self.open_auth(AuthMode::Register),
            (Route::Landing, _) | (Route::Dashboard(_), None) => self.show_landing(),
        }
        if let Some(route) = self.route() {
            info!(path = %route.path(), "navigated");
        }
    }

    fn show_landing(&mut self) {
        self.searching = false;
        self.screen = Screen::Landing(LandingView::default(), 0);
        self.dispatch(Command::LoadLanding);
    }

    fn open_auth(&mut self, mode: AuthMode) {
        let form = match mode {
            AuthMode::Login => forms::login_form(),
            AuthMode::Register => forms::register_form(),
        };
        self.searching = false;
        self.screen = Screen::SignIn(AuthScreen {
            mode,
            form,
            error: None,
        });
    }

    fn enter_dashboard(&mut self, user: User, tab: Tab) {
        let (mut dashboard, mut command) = Dashboard::new(user);
        if tab != Tab::Home {
            if let Some(load) = dashboard.activate(tab) {
                command = load;
            }
        }
        self.reset_overlays();
        self.screen = Screen::Dashboard(dashboard);
        self.dispatch(command);
    }

    fn persist_session(&self) {
        match self.executor.api().session_cookie() {
            Some(cookie) => {
                if let Err(e) = self.store.save(&cookie) {
                    warn!(error = %e, "could not save session");
                }
            }
            None => warn!("backend did not set a session cookie"),
        }
    }

    fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "could not remove saved session");
        }
        self.reset_overlays();
        self.screen = Screen::Splash("Signing out...");
        self.dispatch(Command::Logout);
    }

    fn reset_overlays(&mut self) {
        self.searching = false;
        self.detail_open = false;
        self.detail_scroll = 0;
    }

    // --- Input ---

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }
        if self.searching {
            self.on_search_key(key);
            return;
        }
        match self.screen {
            Screen::Splash(_) => {
                if key.code == KeyCode::Char('q') {
                    self.quit = true;
                }
            }
            Screen::Landing(..) => self.on_landing_key(key),
            Screen::SignIn(_) => self.on_auth_key(key),
            Screen::Dashboard(_) => self.on_dashboard_key(key),
        }
    }

    fn current_filter(&self) -> String {
        match &self.screen {
            Screen::Landing(view, _) => view.search.clone(),
            Screen::Dashboard(dashboard) => dashboard
                .view()
                .job_list()
                .map(|list| list.filter.clone())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        let mut filter = self.current_filter();
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.searching = false;
                return;
            }
            KeyCode::Backspace => {
                filter.pop();
            }
            KeyCode::Char(c) => filter.push(c),
            _ => return,
        }
        match &mut self.screen {
            Screen::Landing(view, selected) => {
                view.search = filter;
                *selected = 0;
            }
            Screen::Dashboard(dashboard) => dashboard.set_filter(filter),
            _ => {}
        }
    }

    fn on_landing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('l') => self.navigate(Route::Login),
            KeyCode::Char('n') => self.navigate(Route::Register),
            KeyCode::Char('r') => self.show_landing(),
            KeyCode::Down | KeyCode::Char('j') => {
                if let Screen::Landing(view, selected) = &mut self.screen {
                    if *selected + 1 < view.jobs().len() {
                        *selected += 1;
                    }
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Screen::Landing(_, selected) = &mut self.screen {
                    *selected = selected.saturating_sub(1);
                }
            }
            _ => {}
        }
    }

    fn on_auth_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.navigate(Route::Landing);
            return;
        }
        let Screen::SignIn(auth) = &mut self.screen else {
            return;
        };
        if auth.form.submitting {
            return;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Down => auth.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => auth.form.focus_prev(),
            KeyCode::Left => auth.form.cycle(false),
            KeyCode::Right => auth.form.cycle(true),
            KeyCode::Backspace => auth.form.backspace(),
            KeyCode::Char(c) => auth.form.input(c),
            KeyCode::Enter => {
                let command = match auth.mode {
                    AuthMode::Login => forms::credentials(&auth.form).map(Command::Login),
                    AuthMode::Register => forms::registration(&auth.form).map(Command::Register),
                };
                match command {
                    Ok(command) => {
                        auth.form.submitting = true;
                        auth.error = None;
                        self.session.begin();
                        self.dispatch(command);
                    }
                    Err(message) => auth.error = Some(message),
                }
            }
            _ => {}
        }
    }

    fn on_dashboard_key(&mut self, key: KeyEvent) {
        let Screen::Dashboard(dashboard) = &mut self.screen else {
            return;
        };

        if dashboard.alert().is_some() {
            dashboard.dismiss_alert();
            return;
        }

        let candidate_open = matches!(
            dashboard.view(),
            ActiveView::Candidates(view) if view.detail.is_some()
        );
        if self.detail_open || candidate_open {
            match key.code {
                KeyCode::Down | KeyCode::Char('j') => {
                    self.detail_scroll = self.detail_scroll.saturating_add(3);
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.detail_scroll = self.detail_scroll.saturating_sub(3);
                }
                _ => {
                    dashboard.close_overlay();
                    self.detail_open = false;
                    self.detail_scroll = 0;
                }
            }
            return;
        }

        if dashboard.view().form().is_some() {
            let command = on_form_key(dashboard, key);
            if let Some(command) = command {
                self.dispatch(command);
            }
            return;
        }

        let command = match key.code {
            KeyCode::Char('q') => {
                self.quit = true;
                None
            }
            KeyCode::Char('L') => {
                self.logout();
                return;
            }
            KeyCode::Tab | KeyCode::Right => Some(dashboard.next_tab()),
            KeyCode::BackTab | KeyCode::Left => Some(dashboard.prev_tab()),
            KeyCode::Char(c @ '1'..='9') => dashboard.activate_index(c as usize - '1' as usize),
            KeyCode::Down | KeyCode::Char('j') => {
                dashboard.select_next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                dashboard.select_prev();
                None
            }
            KeyCode::Char('r') => Some(dashboard.reload()),
            KeyCode::Char('a') => dashboard.apply(),
            KeyCode::Char('f') => dashboard.toggle_favorite(),
            KeyCode::Char('/') => {
                self.searching = dashboard.view().job_list().is_some();
                None
            }
            KeyCode::Char('n') => {
                dashboard.open_job_form();
                None
            }
            KeyCode::Char('e') => {
                dashboard.edit_profile();
                None
            }
            KeyCode::Enter => match dashboard.view() {
                ActiveView::Candidates(_) => dashboard.open_candidate(),
                view => {
                    self.detail_open = view
                        .job_list()
                        .and_then(JobList::selected_job)
                        .is_some();
                    self.detail_scroll = 0;
                    None
                }
            },
            _ => None,
        };
        if let Some(command) = command {
            self.dispatch(command);
        }
    }
}

fn on_form_key(dashboard: &mut Dashboard, key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Esc => {
            dashboard.cancel_form();
            None
        }
        KeyCode::Enter => match dashboard.view() {
            ActiveView::Jobs(_) => dashboard.submit_job_form(),
            ActiveView::Profile(_) => dashboard.submit_profile(),
            _ => None,
        },
        code => {
            let form = dashboard.view_mut().form_mut()?;
            if form.submitting {
                return None;
            }
            match code {
                KeyCode::Tab | KeyCode::Down => form.focus_next(),
                KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
                KeyCode::Left => form.cycle(false),
                KeyCode::Right => form.cycle(true),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) => form.input(c),
                _ => {}
            }
            None
        }
    }
}

/// Runs the full-screen client until the user quits.
pub fn run(api: ApiClient, runtime: Handle, store: SessionStore, start: Option<String>) -> Result<()> {
    match store.load() {
        Ok(Some(cookie)) => api.restore_session(&cookie),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "ignoring unreadable saved session"),
    }

    let (executor, rx) = Executor::new(api, runtime);
    let mut app = App::new(executor, rx, store, start);
    app.start();

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App) -> Result<()> {
    while !app.quit {
        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(TICK)? {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }
        app.drain();
    }
    Ok(())
}

// --- Drawing ---

fn draw(frame: &mut Frame, app: &App) {
    let [body, footer] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    let help = match &app.screen {
        Screen::Splash(message) => {
            let splash = Paragraph::new(*message)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" SelectFlow "));
            frame.render_widget(splash, widgets::centered_rect(40, 20, body));
            " q:quit".to_string()
        }
        Screen::Landing(view, selected) => {
            draw_landing(frame, body, view, *selected, app.searching);
            LANDING_HELP.to_string()
        }
        Screen::SignIn(auth) => {
            draw_auth(frame, body, auth);
            AUTH_HELP.to_string()
        }
        Screen::Dashboard(dashboard) => {
            draw_dashboard(frame, body, dashboard, app.searching);
            if app.detail_open {
                draw_job_detail(frame, dashboard, app.detail_scroll);
            }
            draw_overlays(frame, dashboard, app.detail_scroll);
            dashboard_help(dashboard)
        }
    };

    let help = if app.searching { SEARCH_HELP.to_string() } else { help };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        footer,
    );
}

fn search_line(filter: &str, searching: bool) -> Line<'static> {
    let cursor = if searching { "_" } else { "" };
    Line::from(vec![
        Span::styled("Search: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("{}{}", filter, cursor)),
    ])
}

fn draw_landing(frame: &mut Frame, area: Rect, view: &LandingView, selected: usize, searching: bool) {
    let [header, search, list] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    let mut lines = vec![Line::from(Span::styled(
        "SelectFlow - find your next opportunity",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))];
    if let Some(stats) = view.stats() {
        lines.push(Line::from(format!(
            "{} open jobs | {} companies | {} candidates",
            stats.total_jobs, stats.total_companies, stats.total_candidates
        )));
    }
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
        header,
    );
    frame.render_widget(Paragraph::new(search_line(&view.search, searching)), search);

    render_collection(
        frame,
        list,
        "Latest jobs",
        view.content(),
        LANDING_EMPTY,
        selected,
        |job| widgets::job_card(job, Role::Candidate, false),
    );
}

fn draw_auth(frame: &mut Frame, area: Rect, auth: &AuthScreen) {
    let area = widgets::centered_rect(60, 80, area);
    let notice = auth.error.clone().map(Notice::Error);
    widgets::render_form(frame, area, &auth.form, notice.as_ref());
}

fn render_list(frame: &mut Frame, area: Rect, title: String, items: Vec<ListItem>, selected: usize) {
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_collection<T>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    content: Content<'_, T>,
    empty: EmptyState,
    selected: usize,
    card: impl Fn(&T) -> ListItem<'static>,
) {
    match content {
        Content::Loading => widgets::render_loading(frame, area, &title.to_lowercase()),
        Content::Failed(message) => widgets::render_error(frame, area, message),
        Content::Empty => widgets::render_empty(frame, area, empty),
        Content::Items(items) if items.is_empty() => {
            widgets::render_empty(frame, area, NO_SEARCH_MATCHES)
        }
        Content::Items(items) => {
            let title = format!(" {} ({}) ", title, items.len());
            let items: Vec<ListItem> = items.into_iter().map(card).collect();
            render_list(frame, area, title, items, selected);
        }
    }
}

fn draw_dashboard(frame: &mut Frame, area: Rect, dashboard: &Dashboard, searching: bool) {
    let [header, main] = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
    let user = dashboard.user();
    let title = Line::from(vec![
        Span::styled("SelectFlow  ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(dashboard.greeting()),
        Span::styled(
            format!("  {} ({})", user.email, user.role.label()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(title).block(Block::default().borders(Borders::ALL)),
        header,
    );

    let [menu, content] =
        Layout::horizontal([Constraint::Length(22), Constraint::Min(0)]).areas(main);
    let items: Vec<ListItem> = dashboard
        .nav()
        .menu()
        .iter()
        .enumerate()
        .map(|(index, tab)| ListItem::new(format!("{} {}", index + 1, tab.label())))
        .collect();
    render_list(frame, menu, " Menu ".to_string(), items, dashboard.nav().index());

    let role = dashboard.role();
    match dashboard.view() {
        ActiveView::Home(view) => {
            let [greeting, cards, _] = Layout::vertical([
                Constraint::Length(2),
                Constraint::Length(5),
                Constraint::Min(0),
            ])
            .areas(content);
            frame.render_widget(
                Paragraph::new(Span::styled(
                    dashboard.greeting(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                greeting,
            );
            match &view.metrics {
                Loadable::Loading => widgets::render_loading(frame, cards, "metrics"),
                Loadable::Failed(message) => widgets::render_error(frame, cards, message),
                Loadable::Ready(metrics) => widgets::render_metrics(frame, cards, metrics),
            }
        }
        ActiveView::Jobs(view) => match &view.form {
            Some(form) => widgets::render_form(frame, content, form, view.notice.as_ref()),
            None => {
                let title = match role {
                    Role::Company => "My Jobs",
                    Role::Candidate => "Available Jobs",
                };
                let notice = view.notice.as_ref();
                draw_job_list(frame, content, dashboard, &view.list, Tab::Jobs, title, notice, searching);
            }
        },
        ActiveView::Favorites(list) => {
            let title = "Favorite Jobs";
            draw_job_list(frame, content, dashboard, list, Tab::Favorites, title, None, searching);
        }
        ActiveView::Recommendations(list) => {
            let title = "Recommended for you";
            let tab = Tab::Recommendations;
            draw_job_list(frame, content, dashboard, list, tab, title, None, searching);
        }
        ActiveView::Candidates(view) => render_collection(
            frame,
            content,
            "Candidates",
            view.candidates.content(),
            empty_state(Tab::Candidates, role),
            view.selected,
            widgets::candidate_card,
        ),
        ActiveView::Applications(view) => render_collection(
            frame,
            content,
            "My Applications",
            view.applications.content(),
            empty_state(Tab::Applications, role),
            view.selected,
            widgets::application_card,
        ),
        ActiveView::Profile(view) => draw_profile(frame, content, view),
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_job_list(
    frame: &mut Frame,
    area: Rect,
    dashboard: &Dashboard,
    list: &JobList,
    tab: Tab,
    title: &str,
    notice: Option<&Notice>,
    searching: bool,
) {
    let [status, body] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
    if searching || !list.filter.is_empty() {
        frame.render_widget(Paragraph::new(search_line(&list.filter, searching)), status);
    } else if let Some(notice) = notice {
        frame.render_widget(Paragraph::new(widgets::notice_line(notice)), status);
    }

    let role = dashboard.role();
    render_collection(
        frame,
        body,
        title,
        list.content(),
        empty_state(tab, role),
        list.selected(),
        |job| widgets::job_card(job, role, list.is_pending(job.id)),
    );
}

fn draw_profile(frame: &mut Frame, area: Rect, view: &ProfileView) {
    if let Some(form) = &view.form {
        widgets::render_form(frame, area, form, view.notice.as_ref());
        return;
    }
    let profile = match &view.profile {
        Loadable::Loading => return widgets::render_loading(frame, area, "profile"),
        Loadable::Failed(message) => return widgets::render_error(frame, area, message),
        Loadable::Ready(profile) => profile,
    };

    let mut lines = Vec::new();
    if let Some(notice) = &view.notice {
        lines.push(widgets::notice_line(notice));
        lines.push(Line::from(""));
    }
    for (key, label) in profile.field_specs() {
        let value = profile
            .get_field(key)
            .filter(|v| !v.is_empty())
            .map(|v| match *key {
                "professional_interest" => interest_label(&v).to_string(),
                _ => v,
            });
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(value.unwrap_or_else(|| "-".to_string())),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press e to edit",
        Style::default().fg(Color::DarkGray),
    )));

    let title = match profile.role() {
        Role::Candidate => " My profile ",
        Role::Company => " Company profile ",
    };
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn modal_width(frame: &Frame) -> usize {
    (frame.area().width as usize * 70 / 100).saturating_sub(4)
}

fn draw_job_detail(frame: &mut Frame, dashboard: &Dashboard, scroll: u16) {
    let Some(job) = dashboard.view().job_list().and_then(JobList::selected_job) else {
        return;
    };
    let text = widgets::job_detail(job, modal_width(frame));
    widgets::render_modal(frame, "Job details", text, scroll);
}

fn draw_overlays(frame: &mut Frame, dashboard: &Dashboard, scroll: u16) {
    if let ActiveView::Candidates(view) = dashboard.view() {
        match &view.detail {
            Some(Loadable::Ready(candidate)) => {
                let text = widgets::candidate_detail(candidate, modal_width(frame));
                widgets::render_modal(frame, "Candidate profile", text, scroll);
            }
            Some(Loadable::Loading) => {
                widgets::render_modal(frame, "Candidate profile", Text::from("Loading..."), 0);
            }
            Some(Loadable::Failed(_)) | None => {}
        }
    }
    if let Some(message) = dashboard.alert() {
        widgets::render_alert(frame, message);
    }
}

fn dashboard_help(dashboard: &Dashboard) -> String {
    if dashboard.alert().is_some() {
        return " any key:dismiss".to_string();
    }
    if dashboard.view().form().is_some() {
        return FORM_HELP.to_string();
    }
    let mut keys = vec!["Tab/1-9:menu", "j/k:move"];
    match (dashboard.role(), dashboard.nav().active()) {
        (Role::Candidate, Tab::Jobs | Tab::Favorites | Tab::Recommendations) => {
            keys.extend(["a:apply", "f:favorite", "/:search", "Enter:details"]);
        }
        (Role::Company, Tab::Jobs) => keys.extend(["n:new job", "/:search", "Enter:details"]),
        (_, Tab::Candidates) => keys.push("Enter:profile"),
        (_, Tab::Profile) => keys.push("e:edit"),
        _ => {}
    }
    keys.extend(["r:reload", "L:logout", "q:quit"]);
    format!(" {}", keys.join("  "))
}
