use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

use viselitsa::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, FileConfigStore},
    game::Game,
    history::History,
    preferences::Preferences,
    runtime::{AppEvent, AppEventSource, CrosstermEventSource, Runner},
    session::Mode,
    store::{shared, MemoryStore, SharedStore, SqliteStore},
    theme::{ThemeId, THEMES},
    ui::{self, history_table::leaderboard_text},
    word_source::{DirectoryWords, EmbeddedWords, WordSource},
};

const INPUT_POLL_MS: u64 = 100;
const LOG_ENV: &str = "VISELITSA_LOG";

/// hangman in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Hangman in the terminal with themed Russian word lists. Normal mode gives you one word against a one-minute clock; rating mode chains words for five minutes and keeps a scored history."
)]
pub struct Cli {
    /// theme to start right away, skipping the menu
    #[clap(short = 't', long, value_enum)]
    theme: Option<ThemeId>,

    /// game mode; also remembered as the default for next time
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// directory with <theme>_theme.txt word lists to use instead of the built-in ones
    #[clap(long, value_name = "DIR")]
    wordbank: Option<PathBuf>,

    /// config file to read instead of the one in the platform config directory
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// location of the history and preferences database
    #[clap(long, value_name = "FILE")]
    store: Option<PathBuf>,

    /// print the rating history and exit
    #[clap(long)]
    history: bool,

    /// write the rating history as CSV and exit
    #[clap(long, value_name = "CSV")]
    export_history: Option<PathBuf>,

    /// seed for word and hint selection
    #[clap(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let config = load_config(&cli);
    let store = open_store(config.resolved_store_path());
    let history = History::new(store.clone());

    if cli.history || cli.export_history.is_some() {
        return print_history(&cli, &history);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = build_app(&cli, &config, store, history);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(INPUT_POLL_MS),
    );
    let res = start_tui(&mut terminal, &mut app, &mut runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    res
}

/// Log to a file in the state dir, and only when asked to; the TUI owns the terminal
fn init_logging() {
    if std::env::var_os(LOG_ENV).is_none() {
        return;
    }
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, "info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

fn load_config(cli: &Cli) -> Config {
    cli.config
        .as_ref()
        .map(FileConfigStore::new)
        .unwrap_or_default()
        .load()
        .merged(cli.wordbank.clone(), cli.store.clone())
}

fn open_store(path: Option<PathBuf>) -> SharedStore {
    let Some(path) = path else {
        log::warn!("no state directory; history will not be saved");
        return shared(MemoryStore::new());
    };
    match SqliteStore::open(&path) {
        Ok(store) => shared(store),
        Err(e) => {
            log::warn!(
                "could not open store {}: {e}; history will not be saved",
                path.display()
            );
            shared(MemoryStore::new())
        }
    }
}

fn word_source(config: &Config) -> Box<dyn WordSource> {
    match &config.wordbank_dir {
        Some(dir) => Box::new(DirectoryWords::new(dir)),
        None => Box::new(EmbeddedWords),
    }
}

fn build_app(cli: &Cli, config: &Config, store: SharedStore, history: History) -> App {
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let game = Game::new(word_source(config), Box::new(history.clone()), Box::new(rng));
    let mut app = App::new(game, history, Preferences::new(store));

    if let Some(mode) = cli.mode {
        app.set_mode(mode);
    }
    if let Some(id) = cli.theme {
        if let Some(idx) = THEMES.iter().position(|t| t.id == id) {
            app.selected_theme = idx;
            app.start(THEMES[idx], Instant::now());
        }
    }
    app
}

fn print_history(cli: &Cli, history: &History) -> Result<(), Box<dyn Error>> {
    if let Some(path) = &cli.export_history {
        let count = history.export_csv(path)?;
        println!("exported {count} rounds to {}", path.display());
    }
    if cli.history {
        print!("{}", leaderboard_text(&history.leaderboard()));
    }
    Ok(())
}

fn start_tui<B: Backend, E: AppEventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<E>,
) -> Result<(), Box<dyn Error>> {
    if let Some(at) = app.take_round_start() {
        runner.restart_clock(at);
    }
    terminal.draw(|f| ui::draw(app, f))?;

    while !app.should_quit {
        let event = runner.step(Instant::now());
        if event == AppEvent::Resize {
            terminal.clear()?;
        }
        app.on_event(event, Instant::now());
        if let Some(at) = app.take_round_start() {
            runner.restart_clock(at);
        }
        terminal.draw(|f| ui::draw(app, f))?;
    }

    Ok(())
}
