//! `annuaire` — terminal UI for the card directory.
//!
//! # Usage
//!
//! ```
//! annuaire --url https://api.example.org --token <TOKEN> \
//!   --user-id u-1 --user-name "Alice Martin" --user-category individual
//! annuaire --config ~/.config/annuaire/config.toml
//! ```
//!
//! Without a token the directory is browsable read-only: no personal-card
//! merge, no rolodex.

mod app;
mod ui;

use std::{io, time::Duration};

use annuaire_client::HttpDirectory;
use annuaire_core::{
  card::OwnerCategory,
  session::{CurrentUser, Session},
};
use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
  },
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "annuaire", about = "Terminal UI for the card directory")]
struct Args {
  /// Path to a TOML config file (url, token, user identity).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the directory API.
  #[arg(long, env = "ANNUAIRE_URL")]
  url: Option<String>,

  /// Bearer token; omit to browse unauthenticated.
  #[arg(long, env = "ANNUAIRE_TOKEN")]
  token: Option<String>,

  /// Current user's identifier, used for ownership annotation.
  #[arg(long, env = "ANNUAIRE_USER_ID")]
  user_id: Option<String>,

  /// Current user's display name, stamped on merged personal cards.
  #[arg(long, env = "ANNUAIRE_USER_NAME")]
  user_name: Option<String>,

  /// Current user's category: institution, school or individual.
  #[arg(long, env = "ANNUAIRE_USER_CATEGORY")]
  user_category: Option<String>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:           String,
  #[serde(default)]
  token:         String,
  #[serde(default)]
  user_id:       String,
  #[serde(default)]
  user_name:     String,
  #[serde(default)]
  user_category: String,
}

fn parse_category(s: &str) -> OwnerCategory {
  match s.trim().to_lowercase().as_str() {
    "institution" => OwnerCategory::Institution,
    "school" => OwnerCategory::School,
    "individual" => OwnerCategory::Individual,
    _ => OwnerCategory::Other,
  }
}

/// CLI flag, else nonempty config-file value, else `None`.
fn pick(flag: Option<String>, file_value: &str) -> Option<String> {
  flag.or_else(|| {
    (!file_value.is_empty()).then(|| file_value.to_owned())
  })
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // Logs go to stderr; default to warnings so the alternate screen stays
  // clean unless the user opts in via RUST_LOG.
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = pick(args.url, &file_cfg.url)
    .unwrap_or_else(|| "http://localhost:8080".to_string());
  let token = pick(args.token, &file_cfg.token);
  let user = CurrentUser {
    id:       pick(args.user_id, &file_cfg.user_id).unwrap_or_default(),
    name:     pick(args.user_name, &file_cfg.user_name).unwrap_or_default(),
    category: parse_category(
      &pick(args.user_category, &file_cfg.user_category)
        .unwrap_or_default(),
    ),
  };

  let session = Session::new(token, user);
  let source = HttpDirectory::new(base_url)
    .context("failed to build HTTP client")?;
  let mut app = App::new(source, session);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen)
    .context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Initial load. A hard failure leaves an empty list and an error in the
  // status bar; the interface stays up either way.
  app.load_directory().await;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(evt) = maybe_event {
      match evt {
        Event::Key(key) => {
          let cont = app.handle_key(key).await?;
          if !cont {
            break;
          }
        }
        Event::Resize(_, _) => {
          // Terminal will redraw on next iteration.
        }
        _ => {}
      }
    }
  }

  Ok(())
}
