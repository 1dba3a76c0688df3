use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::{load_settings, load_settings_from, ClientSettings},
    load_paper_payload, FilterFlags, Gesture, HttpTransport, PaperInteractionController,
    PreferenceStore, SortColumn, SortDirection, ViewCoordinator,
};
use shared::{
    domain::{CsrfToken, FontSize, PaperId, SectionKey},
    error::{Notice, NoticeException},
};
use storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod surface;

use surface::TerminalSurface;

#[derive(Parser, Debug)]
#[command(about = "Paper discussion queue client")]
struct Cli {
    /// Settings file; defaults to ./coffee.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prints the listing with filters and ordering applied.
    List {
        #[arg(long)]
        payload: PathBuf,
        #[arg(long)]
        local_only: bool,
        #[arg(long)]
        voted_only: bool,
        #[arg(long)]
        sort_by: Option<String>,
        #[arg(long, default_value = "asc")]
        order: String,
    },
    /// Toggles the current user's vote on a paper.
    Vote {
        #[arg(long)]
        payload: PathBuf,
        #[arg(long)]
        paper_id: String,
        #[arg(long)]
        csrf_token: String,
    },
    /// Toggles the current user's reservation on a paper.
    Reserve {
        #[arg(long)]
        payload: PathBuf,
        #[arg(long)]
        paper_id: String,
        #[arg(long)]
        csrf_token: String,
    },
    Prefs {
        #[command(subcommand)]
        command: PrefsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PrefsCommand {
    Show,
    Set {
        /// local, voted or other
        #[arg(long, requires = "visible")]
        section: Option<String>,
        #[arg(long)]
        visible: Option<bool>,
        /// small, medium or large
        #[arg(long)]
        font_size: Option<String>,
    },
}

fn parse_section(raw: &str) -> Result<SectionKey> {
    SectionKey::ALL
        .into_iter()
        .find(|section| section.as_str().eq_ignore_ascii_case(raw))
        .ok_or_else(|| anyhow!("unknown section '{raw}', expected local, voted or other"))
}

fn parse_font_size(raw: &str) -> Result<FontSize> {
    let raw = raw.to_ascii_lowercase();
    FontSize::from_control_id(&raw)
        .or_else(|| FontSize::from_control_id(&format!("font-size-{raw}")))
        .ok_or_else(|| anyhow!("unknown font size '{raw}', expected small, medium or large"))
}

async fn open_preferences(settings: &ClientSettings) -> Result<PreferenceStore> {
    let storage = Storage::new(&settings.preferences_database_url)
        .await
        .context("failed to open preference storage")?;
    Ok(PreferenceStore::from_settings(Arc::new(storage), settings))
}

async fn coordinator(
    settings: &ClientSettings,
    payload: &Path,
    csrf_token: CsrfToken,
) -> Result<ViewCoordinator<TerminalSurface>> {
    let papers = load_paper_payload(payload)?;
    info!("coffee: loaded payload papers={} path={}", papers.len(), payload.display());

    let transport = HttpTransport::new(&settings.server_url)?;
    let controller = Arc::new(PaperInteractionController::from_settings(
        Arc::new(transport),
        csrf_token,
        papers,
        settings,
    ));
    let preferences = open_preferences(settings).await?;

    let mut view = ViewCoordinator::new(controller, preferences, TerminalSurface::default());
    view.start().await;
    Ok(view)
}

async fn run_interaction(
    settings: &ClientSettings,
    payload: &Path,
    csrf_token: String,
    gesture: Gesture,
) -> Result<()> {
    let mut view = coordinator(settings, payload, CsrfToken::new(csrf_token)).await?;
    let outcome = view.handle(gesture).await?;

    view.surface().print_notices();
    if let Some(outcome) = outcome.filter(|outcome| !outcome.is_applied()) {
        let notice = outcome.notice().unwrap_or_else(Notice::transport_failure);
        return Err(NoticeException::from(notice).into());
    }

    let papers = view.controller().papers().await;
    view.surface().print_listing(&papers);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => load_settings_from(path),
        None => load_settings(),
    };

    match cli.command {
        Command::List {
            payload,
            local_only,
            voted_only,
            sort_by,
            order,
        } => {
            // Listing never posts, so no token is needed.
            let mut view = coordinator(&settings, &payload, CsrfToken::new("")).await?;
            if let Some(column) = sort_by {
                let column: SortColumn = column.parse()?;
                let direction: SortDirection = order.parse()?;
                view.handle(Gesture::SortRequested { column, direction })
                    .await?;
            }
            let flags = FilterFlags {
                local_only,
                voted_only,
            };
            if !flags.is_empty() {
                view.handle(Gesture::FiltersChanged(flags)).await?;
            }

            let papers = view.controller().papers().await;
            view.surface().print_listing(&papers);
        }
        Command::Vote {
            payload,
            paper_id,
            csrf_token,
        } => {
            run_interaction(
                &settings,
                &payload,
                csrf_token,
                Gesture::VoteClicked(PaperId::new(paper_id)),
            )
            .await?;
        }
        Command::Reserve {
            payload,
            paper_id,
            csrf_token,
        } => {
            run_interaction(
                &settings,
                &payload,
                csrf_token,
                Gesture::ReserveClicked(PaperId::new(paper_id)),
            )
            .await?;
        }
        Command::Prefs { command } => {
            let store = open_preferences(&settings).await?;
            let mut prefs = store.load().await.unwrap_or_default();
            if let PrefsCommand::Set {
                section,
                visible,
                font_size,
            } = command
            {
                if let (Some(section), Some(visible)) = (section, visible) {
                    prefs.set_section_visible(parse_section(&section)?, visible);
                }
                if let Some(size) = font_size {
                    prefs.font_size = parse_font_size(&size)?;
                }
                store.save(&prefs).await?;
                info!("coffee: saved preferences key={}", store.key());
            }
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
