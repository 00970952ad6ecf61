mod config;
mod console;
mod diagnostics;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Config, ContactsConfig};
use console::{ConsoleNavigator, ConsoleVibrator, SimulatedAudioPlayer};
use cosmic_dialer_core::{
    AudioPlayer, CallContext, CallEvent, CallSession, Contact, ContactListController,
    ContactPage, ContactSource, FavoritesStore, FavoritesView, JsonFileContactSource,
    SilentAudioPlayer, StaticContactSource, ThemeStore,
};
use diagnostics::{Cli, Command};
use cosmic_dialer_core::Navigator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

/// Sample contact page used when no source file is configured
const SAMPLE_CONTACTS: &str = include_str!("../data/contacts.json");

/// The dialer application: shared stores, the contact list and call capabilities
struct Dialer {
    config: Config,
    favorites: FavoritesStore,
    theme: ThemeStore,
    navigator: Arc<ConsoleNavigator>,
    contacts: ContactListController,
    favorites_view: FavoritesView,
    call_context: CallContext,
}

impl Dialer {
    fn new(config: Config) -> Result<Self> {
        let source = contact_source(&config.contacts).context("Failed to set up contacts")?;
        let favorites = FavoritesStore::new();
        let theme = ThemeStore::new(config.appearance.theme);
        let navigator = Arc::new(ConsoleNavigator::new());

        let contacts =
            ContactListController::new(source, favorites.clone(), navigator.clone())
                .with_refresh_delay(config.contacts.refresh_delay());
        let favorites_view = FavoritesView::new(favorites.clone(), navigator.clone());

        let audio: Arc<dyn AudioPlayer> = if config.call.native_audio {
            Arc::new(SimulatedAudioPlayer::new(config.call.ringback_latency()))
        } else {
            info!("Native audio disabled, calls connect immediately");
            Arc::new(SilentAudioPlayer)
        };
        let call_context = CallContext::new(audio, Arc::new(ConsoleVibrator), navigator.clone());

        Ok(Self {
            config,
            favorites,
            theme,
            navigator,
            contacts,
            favorites_view,
            call_context,
        })
    }

    async fn list_contacts(&self, refresh: bool) -> Result<Vec<Contact>> {
        let result = if refresh {
            println!("Refreshing...");
            self.contacts.refresh().await
        } else {
            self.contacts.load_contacts().await
        };

        let contacts = match result {
            Ok(contacts) => contacts,
            Err(e) => {
                println!("{}", e.user_message());
                return Err(e).context("Failed to load contacts");
            }
        };

        println!("\n=== Contacts ===");
        if contacts.is_empty() {
            println!("No contacts found.");
        }
        for contact in &contacts {
            println!(
                "{} {:<28} {}",
                if contact.favorite { "*" } else { " " },
                contact.display_name(),
                contact.phone
            );
        }
        println!();

        Ok(contacts)
    }

    /// Switch to the favorites tab and print the grid
    fn show_favorites(&self) {
        self.favorites_view.open();
        println!("=== Favorites ===");
        if let Some(text) = self.favorites_view.empty_text() {
            println!("{}", text);
        }
        for entry in self.favorites_view.entries() {
            println!("[{}] {} {}", entry.avatar, entry.name, entry.phone);
        }
        println!();
    }

    /// Call a listed contact and wait until the call screen closes
    async fn call(&self, phone: &str, hang_up_after: Option<Duration>) -> Result<()> {
        if self.contacts.contacts().is_empty() {
            self.contacts
                .load_contacts()
                .await
                .context("Failed to load contacts")?;
        }

        let params = self
            .contacts
            .select_contact(phone)
            .with_context(|| format!("Cannot call {}", phone))?;
        let session = CallSession::start(params, self.call_context.clone(), self.config.call.timings());

        println!(
            "\n{}\n{}",
            session.params().callee_name,
            session.params().callee_number
        );
        println!("  {}", session.status_text());
        let status = tokio::spawn(print_call_status(session.subscribe(), session.status_text()));

        let hang_up = async {
            match hang_up_after {
                Some(after) => tokio::time::sleep(after).await,
                None => {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        warn!("Cannot listen for Ctrl-C: {}", e);
                        std::future::pending::<()>().await;
                    }
                }
            }
        };

        tokio::select! {
            _ = session.finished() => {}
            _ = hang_up => {
                if let Err(e) = session.end_call() {
                    warn!("Cannot hang up: {}", e);
                }
                session.finished().await;
            }
        }

        if let Err(e) = status.await {
            warn!("Call status printer failed: {}", e);
        }
        Ok(())
    }

    /// List, favorite, profile, theme and a short call
    async fn demo(&self) -> Result<()> {
        let contacts = self.list_contacts(false).await?;
        let first = contacts.first().context("Contact list is empty")?;

        self.show_favorites();
        self.navigator.pop_to_root();

        self.contacts.toggle_favorite(first);
        self.show_favorites();
        let favorite = self.favorites_view.open_profile(&first.phone)?;
        print_profile(&favorite);
        self.navigator.pop_to_root();

        if let Some(other) = contacts.get(1) {
            let profile = self.contacts.open_profile(&other.phone)?;
            print_profile(&profile);
            self.navigator.pop_to_root();
        }

        let variant = self.theme.toggle();
        println!(
            "\nTheme: {} (background {}, text {})",
            variant.as_str(),
            self.theme.theme().background,
            self.theme.theme().text
        );

        self.call(&first.phone, Some(Duration::from_secs(3))).await?;

        self.contacts.sync_favorites();
        println!(
            "\nBack on the {} screen (stack depth {}), {} favorite(s)",
            self.navigator.current().as_str(),
            self.navigator.depth(),
            self.favorites.len()
        );
        Ok(())
    }
}

fn contact_source(config: &ContactsConfig) -> Result<Arc<dyn ContactSource>> {
    match &config.source_path {
        Some(path) => {
            info!("Reading contacts from {}", path.display());
            Ok(Arc::new(
                JsonFileContactSource::new(path).with_page_size(config.page_size),
            ))
        }
        None => {
            let page = ContactPage::parse(SAMPLE_CONTACTS).context("Invalid sample contacts")?;
            let contacts = page.results.into_iter().take(config.page_size).collect();
            Ok(Arc::new(StaticContactSource::new(contacts)))
        }
    }
}

fn print_profile(profile: &Contact) {
    println!("=== Profile ===");
    println!("{}", profile.display_name());
    println!("Phone: {}", profile.phone);
    if let Some(cell) = &profile.cell {
        println!("Cell:  {}", cell);
    }
    if let Some(email) = &profile.email {
        println!("Email: {}", email);
    }
    println!();
}

/// Print each new status line of a call until it leaves the call screen
async fn print_call_status(mut events: broadcast::Receiver<CallEvent>, initial: String) {
    let mut last = initial;

    loop {
        let status = match events.recv().await {
            Ok(CallEvent::PhaseChanged { to, .. }) => to.status_text(0),
            Ok(CallEvent::Tick(seconds)) => cosmic_dialer_core::format_duration(seconds),
            Ok(CallEvent::ReturnedToContacts) | Err(RecvError::Closed) => break,
            Err(RecvError::Lagged(_)) => continue,
        };

        if status != last {
            println!("  {}", status);
            last = status;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    diagnostics::init_logging(&cli).context("Failed to initialize logging")?;

    let config = Config::load().context("Failed to load configuration")?;
    info!("Configuration loaded from {}", config.config_path().display());

    let command = cli.command.clone().unwrap_or(Command::Demo);
    if command == Command::DumpConfig {
        println!("# {}", config.config_path().display());
        println!(
            "{}",
            toml::to_string_pretty(&config).context("Failed to serialize config")?
        );
        return Ok(());
    }

    let dialer = Dialer::new(config)?;

    match command {
        Command::Contacts { refresh } => {
            dialer.list_contacts(false).await?;
            if refresh {
                dialer.list_contacts(true).await?;
            }
        }
        Command::Call {
            phone,
            hang_up_after,
        } => {
            dialer
                .call(&phone, hang_up_after.map(Duration::from_secs))
                .await?
        }
        Command::Demo => dialer.demo().await?,
        Command::DumpConfig => {}
    }

    Ok(())
}
