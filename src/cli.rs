use clap::Parser;
use lazy_static::lazy_static;
use std::path::PathBuf;

lazy_static! {
    static ref ABOUT_TEXT: String =
        "Renders the login page in the terminal, in English or Russian".to_string();
}

#[derive(Parser, Debug)]
#[command(name = "login-ui", author, version, about = ABOUT_TEXT.as_str())]
pub struct Args {
    /// Route to open (`/` or `/login`)
    #[arg(long, default_value = "/")]
    pub path: String,

    /// Switch to this locale (en_US, ru_RU) after the first render
    #[arg(short, long, value_name = "TAG")]
    pub locale: Option<String>,

    /// Fill in the username field
    #[arg(short, long)]
    pub username: Option<String>,

    /// Fill in the password field
    #[arg(short, long)]
    pub password: Option<String>,

    // config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Storage file for the chosen language
    #[arg(long, value_name = "FILE")]
    pub storage: Option<PathBuf>,

    /// Keep the chosen language in memory only
    #[arg(long, conflicts_with = "storage")]
    pub no_persist: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    pub fn wants_submit(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }
}
