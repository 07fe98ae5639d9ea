use crate::models::{
    Credentials, NewJob, Profile, Registration, Role, WorkLocation, PROFESSIONAL_INTERESTS,
};

/// `(value sent to the backend, label shown on screen)`
pub type Choices = &'static [(&'static str, &'static str)];

const ROLE_CHOICES: Choices = &[("candidate", "Candidate"), ("company", "Company")];
const WORK_LOCATION_CHOICES: Choices = &[
    ("presencial", "On-site"),
    ("remoto", "Remote"),
    ("híbrido", "Hybrid"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    Choice(Choices),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl Field {
    fn text(key: &'static str, label: &'static str, required: bool) -> Self {
        Self {
            key,
            label,
            value: String::new(),
            kind: FieldKind::Text,
            required,
        }
    }

    fn secret(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Secret,
            ..Self::text(key, label, true)
        }
    }

    fn choice(key: &'static str, label: &'static str, choices: Choices) -> Self {
        Self {
            key,
            label,
            value: choices.first().map(|(value, _)| value.to_string()).unwrap_or_default(),
            kind: FieldKind::Choice(choices),
            required: true,
        }
    }

    /// What the field shows on screen.
    pub fn display(&self) -> String {
        match self.kind {
            FieldKind::Secret => "*".repeat(self.value.chars().count()),
            FieldKind::Choice(choices) => {
                let label = choices
                    .iter()
                    .find(|(value, _)| *value == self.value)
                    .map_or(self.value.as_str(), |(_, label)| *label);
                format!("< {} >", label)
            }
            FieldKind::Text => self.value.clone(),
        }
    }
}

/// Keyboard-driven form state. Validation stops at required fields, the
/// same check an HTML `required` attribute makes.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub title: &'static str,
    fields: Vec<Field>,
    focus: usize,
    pub submitting: bool,
}

impl Form {
    fn new(title: &'static str, fields: Vec<Field>) -> Self {
        Self {
            title,
            fields,
            focus: 0,
            submitting: false,
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused(&self) -> &Field {
        &self.fields[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn input(&mut self, c: char) {
        if let FieldKind::Choice(_) = self.fields[self.focus].kind {
            if c == ' ' {
                self.cycle(true);
            }
            return;
        }
        self.fields[self.focus].value.push(c);
    }

    pub fn backspace(&mut self) {
        let field = &mut self.fields[self.focus];
        if !matches!(field.kind, FieldKind::Choice(_)) {
            field.value.pop();
        }
    }

    /// Steps a choice field through its options. No-op on text fields.
    pub fn cycle(&mut self, forward: bool) {
        let field = &mut self.fields[self.focus];
        let FieldKind::Choice(choices) = field.kind else {
            return;
        };
        let current = choices
            .iter()
            .position(|(value, _)| *value == field.value)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % choices.len()
        } else {
            (current + choices.len() - 1) % choices.len()
        };
        field.value = choices[next].0.to_string();
    }

    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            field.value = value.to_string();
        }
    }

    pub fn missing_required(&self) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|f| f.required && f.value.trim().is_empty())
            .map(|f| f.label)
    }

    fn role(&self) -> Role {
        self.value("userType").parse().unwrap_or(Role::Candidate)
    }

    fn check(&self) -> Result<(), String> {
        match self.missing_required() {
            Some(label) => Err(format!("Please fill in: {}", label)),
            None => Ok(()),
        }
    }
}

pub fn login_form() -> Form {
    Form::new(
        "Sign in",
        vec![
            Field::choice("userType", "I am a", ROLE_CHOICES),
            Field::text("email", "Email", true),
            Field::secret("password", "Password"),
        ],
    )
}

pub fn register_form() -> Form {
    Form::new(
        "Create your account",
        vec![
            Field::choice("userType", "I am a", ROLE_CHOICES),
            Field::text("name", "Full name", true),
            Field::text("companyName", "Company name (companies only)", false),
            Field::text("email", "Email", true),
            Field::secret("password", "Password"),
        ],
    )
}

pub fn job_form() -> Form {
    Form::new(
        "Create new job",
        vec![
            Field::text("title", "Job title", true),
            Field::text("description", "Description", true),
            Field::text("location", "Location", true),
            Field::choice("workLocation", "Work location", WORK_LOCATION_CHOICES),
            Field::text("salary", "Salary", false),
            Field::text("requirements", "Requirements (comma-separated)", false),
            Field::text("tags", "Tags (comma-separated)", false),
        ],
    )
}

pub fn profile_form(profile: &Profile) -> Form {
    let title = match profile.role() {
        Role::Candidate => "My profile",
        Role::Company => "Company profile",
    };
    let fields = profile
        .field_specs()
        .iter()
        .map(|(key, label)| {
            let value = profile.get_field(key).unwrap_or_default();
            match *key {
                "professional_interest" => {
                    let mut field = Field::choice(key, label, PROFESSIONAL_INTERESTS);
                    if !value.is_empty() {
                        field.value = value;
                    }
                    field
                }
                _ => Field {
                    value,
                    ..Field::text(key, label, false)
                },
            }
        })
        .collect();
    Form::new(title, fields)
}

pub fn credentials(form: &Form) -> Result<Credentials, String> {
    form.check()?;
    Ok(Credentials {
        email: form.value("email").trim().to_string(),
        password: form.value("password").to_string(),
        role: form.role(),
    })
}

pub fn registration(form: &Form) -> Result<Registration, String> {
    form.check()?;
    let role = form.role();
    let company_name = match role {
        Role::Company => Some(form.value("companyName").trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        Role::Candidate => None,
    };
    Ok(Registration {
        name: form.value("name").trim().to_string(),
        email: form.value("email").trim().to_string(),
        password: form.value("password").to_string(),
        role,
        company_name,
    })
}

pub fn new_job(form: &Form) -> Result<NewJob, String> {
    form.check()?;
    let work_location = form
        .value("workLocation")
        .parse::<WorkLocation>()
        .unwrap_or(WorkLocation::OnSite);
    Ok(NewJob::new(
        form.value("title"),
        form.value("description"),
        form.value("location"),
        work_location,
        form.value("salary"),
        form.value("requirements"),
        form.value("tags"),
    ))
}

/// Copies the form back into a profile of the same role.
pub fn edited_profile(form: &Form, original: &Profile) -> Result<Profile, String> {
    let mut profile = original.clone();
    for field in form.fields() {
        profile.set_field(field.key, &field.value)?;
    }
    Ok(profile)
}
