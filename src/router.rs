use crate::models::Role;

/// One entry of the dashboard side menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Home,
    Jobs,
    Candidates,
    Favorites,
    Applications,
    Recommendations,
    Profile,
}

const COMPANY_MENU: &[Tab] = &[Tab::Home, Tab::Jobs, Tab::Candidates, Tab::Profile];

const CANDIDATE_MENU: &[Tab] = &[
    Tab::Home,
    Tab::Jobs,
    Tab::Favorites,
    Tab::Applications,
    Tab::Recommendations,
    Tab::Profile,
];

impl Tab {
    pub fn id(self) -> &'static str {
        match self {
            Tab::Home => "home",
            Tab::Jobs => "jobs",
            Tab::Candidates => "candidates",
            Tab::Favorites => "favorites",
            Tab::Applications => "applications",
            Tab::Recommendations => "recommendations",
            Tab::Profile => "profile",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Home => "Dashboard",
            Tab::Jobs => "Jobs",
            Tab::Candidates => "Candidates",
            Tab::Favorites => "Favorites",
            Tab::Applications => "Applications",
            Tab::Recommendations => "Recommendations",
            Tab::Profile => "Profile",
        }
    }

    pub fn path(self) -> String {
        match self {
            Tab::Home => "/dashboard".to_string(),
            other => format!("/dashboard/{}", other.id()),
        }
    }
}

/// Fixed, ordered side menu for a role.
pub fn navigation(role: Role) -> &'static [Tab] {
    match role {
        Role::Company => COMPANY_MENU,
        Role::Candidate => CANDIDATE_MENU,
    }
}

pub fn is_allowed(role: Role, tab: Tab) -> bool {
    navigation(role).contains(&tab)
}

/// Top-level screen of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    Dashboard(Tab),
}

impl Route {
    /// Where the client lands once the session check has settled.
    pub fn initial(role: Option<Role>) -> Route {
        match role {
            Some(_) => Route::Dashboard(Tab::Home),
            None => Route::Landing,
        }
    }

    pub fn path(self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard(tab) => tab.path(),
        }
    }

    /// Resolves a path for the given session role. Dashboard paths need a
    /// role whose menu contains the tab.
    pub fn resolve(path: &str, role: Option<Role>) -> Option<Route> {
        let path = path.trim_end_matches('/');
        match path {
            "" => return Some(Route::Landing),
            "/login" => return Some(Route::Login),
            "/register" => return Some(Route::Register),
            _ => {}
        }
        let role = role?;
        let rest = path.strip_prefix("/dashboard")?;
        let tab = match rest.trim_start_matches('/') {
            "" => Tab::Home,
            id => *navigation(role).iter().find(|tab| tab.id() == id)?,
        };
        Some(Route::Dashboard(tab))
    }
}

/// Cursor over the role's menu. Exactly one tab is active.
#[derive(Debug, Clone)]
pub struct Navigator {
    role: Role,
    index: usize,
}

impl Navigator {
    pub fn new(role: Role) -> Self {
        Self { role, index: 0 }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn menu(&self) -> &'static [Tab] {
        navigation(self.role)
    }

    pub fn active(&self) -> Tab {
        self.menu()[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns false when the tab is not part of this role's menu.
    pub fn select(&mut self, tab: Tab) -> bool {
        match self.menu().iter().position(|t| *t == tab) {
            Some(index) => {
                self.index = index;
                true
            }
            None => false,
        }
    }

    pub fn select_index(&mut self, index: usize) -> bool {
        if index < self.menu().len() {
            self.index = index;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> Tab {
        self.index = (self.index + 1) % self.menu().len();
        self.active()
    }

    pub fn prev(&mut self) -> Tab {
        let len = self.menu().len();
        self.index = (self.index + len - 1) % len;
        self.active()
    }
}
