//! Pages shown by the router.

use colored::Colorize;
use log::{debug, info};
use std::borrow::Cow;
use std::collections::HashMap;

use crate::error::FormError;
use crate::i18n::LocaleTable;
use crate::route::{AuthFlag, AuthProvider, Credentials, Route};
use crate::selector::LocaleBinding;
use crate::store::LocaleStore;
use crate::template::Template;

pub const DEFAULT_LOGIN_TEMPLATE: &str = "\
{cardMetaTitle:bold}
{cardMetaDescription:dimmed}

{usernameInputLabel}
  [{username}]
{passwordInputLabel}
  [{password}]

[ {logInButtonText:cyan,bold} ]  {forgotPasswordLinkText:blue,underline}
{divider:dimmed}
{footerText:dimmed}
";

const DIVIDER_WIDTH: usize = 40;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks both fields are filled in and hands them out as credentials.
    pub fn submit(&self) -> Result<Credentials, FormError> {
        if self.username.trim().is_empty() {
            return Err(FormError::MissingUsername);
        }
        if self.password.is_empty() {
            return Err(FormError::MissingPassword);
        }
        info!("Login form submitted: username={}", self.username);
        Ok(Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

/// The login card. The page keeps its form across locale switches; only the
/// strings coming from the bound table change.
pub struct LoginPage {
    binding: LocaleBinding,
    template: Template,
    pub form: LoginForm,
}

impl LoginPage {
    pub fn new(store: &LocaleStore, template: Template) -> Self {
        Self {
            binding: LocaleBinding::new(store),
            template,
            form: LoginForm::new(),
        }
    }

    pub fn with_default_template(store: &LocaleStore) -> Self {
        Self::new(store, Template::parse(DEFAULT_LOGIN_TEMPLATE))
    }

    pub fn locale(&self) -> &'static LocaleTable {
        self.binding.current()
    }

    pub fn button_text(&self) -> &'static str {
        self.locale().log_in_button_text.as_str()
    }

    pub fn renders(&self) -> usize {
        self.binding.renders()
    }

    pub fn render(&self) -> String {
        let masked = "*".repeat(self.form.password.chars().count());
        let mut vars: HashMap<&str, Cow<'_, str>> = HashMap::new();
        vars.insert("username", Cow::Borrowed(self.form.username.as_str()));
        vars.insert("password", Cow::Owned(masked));
        vars.insert("divider", Cow::Owned("─".repeat(DIVIDER_WIDTH)));
        self.template.render(self.locale(), &vars)
    }

    pub fn submit(&self, auth: &dyn AuthProvider) -> Result<AuthFlag, FormError> {
        let credentials = self.form.submit()?;
        let flag = auth.submit(&credentials);
        debug!("Auth provider answered {:?}", flag);
        Ok(flag)
    }
}

#[derive(Debug, Default)]
pub struct HomePage;

impl HomePage {
    pub fn render(&self) -> String {
        format!("{}\n", "Home".bold())
    }
}

/// Renders whichever page the router settled on.
pub fn render_route(route: Route, login: &LoginPage) -> String {
    match route {
        Route::Home => HomePage.render(),
        Route::Login => login.render(),
    }
}
