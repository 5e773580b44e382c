//! Quizpilot CLI
//!
//! Take quizzes, browse creators and show the landing screen from a terminal.

use clap::{Parser, Subcommand};
use quizpilot::autosave::{AutoSave, FileStore};
use quizpilot::config::{ensure_home, resolve_home};
use quizpilot::tui::{LandingApp, QuizApp, SearchApp};
use quizpilot::{LandingPage, QuizPage, QuizpilotConfig, SearchController, ServerClient};
use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Quizpilot - terminal client for the quiz site
#[derive(Parser, Debug)]
#[command(name = "quizpilot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Home directory for config, logs and auto-saved answers
    #[arg(long)]
    home: Option<PathBuf>,

    /// Base URL of the quiz server
    #[arg(long)]
    server: Option<String>,

    /// Verbose output: debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Take a quiz described by a page document
    Take {
        /// Path to the quiz page JSON
        page: PathBuf,
    },
    /// Search quiz creators and open the filtered listing
    Search {
        /// Listing path the creator filter is applied to
        #[arg(long, default_value = "/quizzes/")]
        path: String,

        /// Read queries line by line from stdin instead of the TUI
        #[arg(long)]
        plain: bool,

        /// Quiet period before a lookup, overriding the config file
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
    /// Show the animated landing screen
    Landing {
        /// Path to a landing page JSON; built-in content when omitted
        page: Option<PathBuf>,
    },
    /// Drop the auto-saved answers of a form
    ClearAutosave {
        /// Form id, e.g. quiz-form-7
        form_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let home = match &cli.home {
        Some(home) => home.clone(),
        None => resolve_home()?,
    };
    ensure_home(&home)?;

    let mut config = QuizpilotConfig::load(home)?;
    if let Some(server) = &cli.server {
        config = config.with_server_url(server)?;
    }
    if let Command::Search {
        debounce_ms: Some(ms),
        ..
    } = &cli.command
    {
        config = config.with_search_debounce(Duration::from_millis(*ms));
    }
    let verbose = cli.verbose || config.verbose;
    let config = config.with_verbose(verbose);

    let plain = matches!(
        cli.command,
        Command::Search { plain: true, .. } | Command::ClearAutosave { .. }
    );
    init_tracing(&config, plain)?;
    info!("Server: {}", config.server_url);

    match cli.command {
        Command::Take { page } => run_take(&config, page).await,
        Command::Search {
            path, plain: true, ..
        } => run_search_plain(&config, &path).await,
        Command::Search {
            path, plain: false, ..
        } => run_search_tui(&config, path).await,
        Command::Landing { page } => run_landing(page).await,
        Command::ClearAutosave { form_id } => {
            let store = FileStore::open(config.autosave_dir())?;
            let mut autosave = AutoSave::new(form_id, store);
            autosave.clear()?;
            println!("Cleared {}", autosave.key());
            Ok(())
        }
    }
}

/// Plain modes log to stderr; the terminal UI owns the screen, so
/// everything else logs to a file under the home directory.
fn init_tracing(config: &QuizpilotConfig, plain: bool) -> anyhow::Result<()> {
    let default = if config.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    if plain {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_file())?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

async fn run_take(config: &QuizpilotConfig, page: PathBuf) -> anyhow::Result<()> {
    let page = QuizPage::load(&page)?;
    info!("Taking quiz {} ({})", page.quiz_id, page.title);

    let results = {
        let mut app = QuizApp::new(config, page)?;
        app.run().await?
    };

    if let Some(url) = results {
        println!("Submitted. Results: {url}");
    }
    Ok(())
}

async fn run_search_tui(config: &QuizpilotConfig, path: String) -> anyhow::Result<()> {
    let client = ServerClient::new(config);
    let base = client.base_url().clone();
    let controller = SearchController::from_config(Arc::new(client), config);

    let destination = {
        let mut app = SearchApp::new(controller, base, path)?;
        app.run().await?
    };

    if let Some(url) = destination {
        println!("{url}");
    }
    Ok(())
}

/// Each stdin line is the field's full value. EOF presses enter.
async fn run_search_plain(config: &QuizpilotConfig, path: &str) -> anyhow::Result<()> {
    let client = ServerClient::new(config);
    let base = client.base_url().clone();
    let mut controller = SearchController::from_config(Arc::new(client), config);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        controller.on_input(&line);

        while controller.is_busy() {
            match controller.next_event().await {
                Some(event) => {
                    controller.handle(event);
                }
                None => break,
            }
        }

        let panel = controller.panel();
        if panel.visible {
            for creator in &panel.items {
                writeln!(stdout, "  {}", creator.username)?;
            }
        } else {
            debug!("No results for {:?}", line);
        }
        stdout.flush()?;
    }

    let url = controller.on_enter(path).resolve(&base)?;
    writeln!(stdout, "{url}")?;
    Ok(())
}

async fn run_landing(page: Option<PathBuf>) -> anyhow::Result<()> {
    let page = match page {
        Some(path) => LandingPage::load(&path)?,
        None => LandingPage::default(),
    };
    let mut app = LandingApp::new(page)?;
    app.run().await?;
    Ok(())
}
