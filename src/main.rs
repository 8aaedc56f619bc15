use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::{info, warn};

use login_ui::cli::Args;
use login_ui::storage::{FileStore, KeyValueStore, MemoryStore};
use login_ui::template::Template;
use login_ui::view::render_route;
use login_ui::{
    AuthProvider, Config, FakeAuth, LanguageTag, LocaleStore, LoginPage, Route, Router,
};

fn main() -> Result<()> {
    env_logger::init();
    info!("Logger initialized");

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path),
        None => Config::load_from_config_dir(),
    };
    if args.no_color || !config.color {
        colored::control::set_override(false);
    }

    let store = LocaleStore::with_storage(open_storage(&args, &config), config.default_locale);
    info!("Starting with locale {}", store.tag());

    let auth = FakeAuth;
    let router = Router;
    let route = router
        .navigate(&args.path, auth.auth_flag())
        .with_context(|| format!("no route for {}", args.path))?;

    let mut page = LoginPage::new(&store, Template::parse(&config.card_template));
    if let Some(username) = &args.username {
        page.form.username = username.clone();
    }
    if let Some(password) = &args.password {
        page.form.password = password.clone();
    }

    println!("{}", render_route(route, &page));

    if let Some(tag) = &args.locale {
        if let Err(e) = LanguageTag::parse(tag) {
            eprintln!("{}: {}", "Locale not switched".yellow().bold(), e);
        }
        store.set_locale(tag);
        println!("{}", render_route(route, &page));
    }

    if route == Route::Login && args.wants_submit() {
        match page.submit(&auth) {
            Ok(flag) => match router.navigate(Route::Home.path(), flag) {
                Some(Route::Home) => println!("{}", "Signed in".green().bold()),
                _ => eprintln!("{}", "Authentication failed".red().bold()),
            },
            Err(e) => eprintln!("{}: {}", "Invalid form".red().bold(), e),
        }
    }

    Ok(())
}

fn open_storage(args: &Args, config: &Config) -> Box<dyn KeyValueStore> {
    if args.no_persist {
        return Box::new(MemoryStore::new());
    }
    match args.storage.as_ref().or(config.storage_path.as_ref()) {
        Some(path) => Box::new(FileStore::new(path)),
        None => {
            warn!("Data dir not found, locale will not be persisted");
            Box::new(MemoryStore::new())
        }
    }
}
