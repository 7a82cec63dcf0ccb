use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use client_core::{FavoritesStore, HttpCharacterApi, PageController, PageError};
use shared::{domain::CharacterId, error::ClientException};
use storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod view;

use config::{load_settings, normalize_database_url, Settings};

#[derive(Parser, Debug)]
#[command(about = "Browse characters and manage local favorites")]
struct Cli {
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long)]
    database_url: Option<String>,
    #[arg(long)]
    timeout_seconds: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a page of characters; page 1 when no page is given.
    Page {
        #[arg(allow_hyphen_values = true)]
        page: Option<String>,
    },
    #[command(subcommand)]
    Favorites(FavoritesCommand),
}

#[derive(Subcommand, Debug)]
enum FavoritesCommand {
    List,
    /// Toggle a character found on the given page.
    Toggle {
        #[arg(long)]
        page: String,
        #[arg(long)]
        id: i64,
    },
    Remove { id: i64 },
}

struct App {
    controller: PageController,
    favorites: FavoritesStore,
}

impl App {
    async fn open(settings: &Settings) -> Result<Self> {
        let api = HttpCharacterApi::with_timeout(&settings.api_base_url, settings.request_timeout)?;
        let storage = Storage::new(&normalize_database_url(&settings.database_url)).await?;
        storage.health_check().await?;

        let favorites = FavoritesStore::with_key(Arc::new(storage), settings.favorites_key.clone());
        favorites.load().await.map_err(favorites_exception)?;

        Ok(Self {
            controller: PageController::new(Arc::new(api)),
            favorites,
        })
    }

    async fn show_page(&self, page: Option<&str>) -> Result<()> {
        let state = match page {
            None => self.controller.load_initial().await,
            Some(raw) => self.go_to(raw).await,
        }
        .map_err(page_exception)?;

        for line in view::page_lines(&state, &self.favorites) {
            println!("{line}");
        }
        Ok(())
    }

    async fn go_to(&self, raw: &str) -> Result<client_core::PageState, PageError> {
        // Bounds are only known after a first page has been seen.
        let requested = raw.trim().parse::<i64>().ok();
        if requested.is_some_and(|page| page > 1) {
            self.controller.load_initial().await?;
        }
        self.controller.go_to_page_input(raw).await
    }

    async fn toggle(&self, raw_page: &str, id: i64) -> Result<()> {
        let state = self.go_to(raw_page).await.map_err(page_exception)?;
        let character = state
            .items
            .iter()
            .find(|c| c.id == CharacterId(id))
            .ok_or_else(|| anyhow!("character {id} is not on page {}", state.page_number))?;

        let updated = self
            .favorites
            .toggle(character)
            .await
            .map_err(favorites_exception)?;
        let now = if self.favorites.is_favorite(character) {
            "saved"
        } else {
            "removed"
        };
        println!("{} {now}; {} favorites", character.name, updated.len());
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<()> {
        let updated = self
            .favorites
            .remove(CharacterId(id))
            .await
            .map_err(favorites_exception)?;
        for line in view::favorites_lines(&updated) {
            println!("{line}");
        }
        Ok(())
    }
}

fn page_exception(err: PageError) -> anyhow::Error {
    let client_error = err.to_client_error();
    ClientException::new(client_error.code, client_error.message).into()
}

fn favorites_exception(err: client_core::FavoritesError) -> anyhow::Error {
    let client_error = err.to_client_error();
    ClientException::new(client_error.code, client_error.message).into()
}

fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(v) = &cli.api_base_url {
        settings.api_base_url = v.clone();
    }
    if let Some(v) = &cli.database_url {
        settings.database_url = v.clone();
    }
    if let Some(v) = cli.timeout_seconds {
        settings.request_timeout = Duration::from_secs(v);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    apply_cli_overrides(&mut settings, &cli);
    info!(api = %settings.api_base_url, database = %settings.database_url, "starting");

    let app = App::open(&settings).await?;
    match &cli.command {
        Command::Page { page } => app.show_page(page.as_deref()).await?,
        Command::Favorites(FavoritesCommand::List) => {
            for line in view::favorites_lines(&app.favorites.favorites()) {
                println!("{line}");
            }
        }
        Command::Favorites(FavoritesCommand::Toggle { page, id }) => app.toggle(page, *id).await?,
        Command::Favorites(FavoritesCommand::Remove { id }) => app.remove(*id).await?,
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
