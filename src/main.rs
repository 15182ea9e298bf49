mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keyrace::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    error::TextFetchError,
    generator::WordListProvider,
    logging,
    provider::{QuoteProvider, StaticText, TextProvider},
    runtime::{ChannelEventSource, Runner, TypingEvent, TICK_INTERVAL},
    session::Tracker,
    settings::{Mode, Settings, TimeLimit, WordCount},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

/// typing speed trainer with live wpm, accuracy and streaks
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A typing speed trainer for the terminal. Type a random quote (or your own text) against the clock and watch wpm, accuracy and your streak update with every keystroke."
)]
pub struct Cli {
    /// session mode
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// time limit in seconds: 15, 30, 60 or 120
    #[clap(short = 't', long = "time")]
    time_limit: Option<TimeLimit>,

    /// number of words for offline text: 10, 25, 50 or 100
    #[clap(short = 'w', long = "words")]
    word_count: Option<WordCount>,

    /// custom text to type (selects custom mode unless --mode is given)
    #[clap(short = 'p', long = "text")]
    custom_text: Option<String>,

    /// language tag
    #[clap(short = 'l', long)]
    language: Option<String>,

    /// include capital letters in offline text [default: true]
    #[clap(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    caps: Option<bool>,

    /// include punctuation in offline text [default: true]
    #[clap(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    punctuation: Option<bool>,

    /// include numbers in offline text
    #[clap(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    numbers: Option<bool>,

    /// include special characters in offline text
    #[clap(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    special: Option<bool>,

    /// generate text from the built-in word list instead of fetching a quote
    #[clap(long)]
    offline: bool,

    /// quote service url
    #[clap(long)]
    endpoint: Option<String>,

    /// store the resulting settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line options over the stored config
    fn apply(&self, mut config: Config) -> Config {
        let settings = &mut config.settings;

        if let Some(text) = &self.custom_text {
            settings.custom_text = Some(text.clone());
            settings.mode = Mode::Custom;
        }
        if let Some(mode) = self.mode {
            settings.mode = mode;
        }
        if let Some(time_limit) = self.time_limit {
            settings.time_limit = Some(time_limit);
        }
        if let Some(word_count) = self.word_count {
            settings.word_count = Some(word_count);
        }
        if let Some(language) = &self.language {
            settings.language = language.clone();
        }
        if let Some(caps) = self.caps {
            settings.include_caps = caps;
        }
        if let Some(punctuation) = self.punctuation {
            settings.include_punctuation = punctuation;
        }
        if let Some(numbers) = self.numbers {
            settings.include_numbers = numbers;
        }
        if let Some(special) = self.special {
            settings.include_special_chars = special;
        }

        config.offline |= self.offline;
        if let Some(endpoint) = &self.endpoint {
            config.quote_endpoint = endpoint.clone();
        }
        config
    }
}

/// Pick the text source for the configured mode
fn build_provider(config: &Config) -> Result<Box<dyn TextProvider>, TextFetchError> {
    let settings = &config.settings;

    if settings.mode == Mode::Custom {
        if let Some(text) = settings.custom_text.as_ref().filter(|t| !t.trim().is_empty()) {
            return Ok(Box::new(StaticText::new(text.clone())));
        }
    }

    if config.offline {
        return Ok(Box::new(WordListProvider::from_settings(settings)));
    }

    Ok(Box::new(QuoteProvider::new(
        config.quote_endpoint.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Ready,
    Loading,
    Typing,
    Results,
}

pub struct App {
    pub settings: Settings,
    pub tracker: Tracker<Box<dyn TextProvider>>,
    pub state: AppState,
}

impl App {
    pub fn new(settings: Settings, provider: Box<dyn TextProvider>) -> Self {
        Self {
            settings,
            tracker: Tracker::new(provider),
            state: AppState::Ready,
        }
    }

    pub fn start(&mut self) {
        self.tracker.start(&self.settings);
        self.state = AppState::Typing;
        self.sync_state();
    }

    pub fn on_key(&mut self, c: char) {
        self.tracker.on_key(c);
        self.sync_state();
    }

    pub fn on_tick(&mut self) {
        self.tracker.tick();
        self.sync_state();
    }

    pub fn stop(&mut self) {
        self.tracker.stop();
        self.sync_state();
    }

    fn sync_state(&mut self) {
        if self.state == AppState::Typing && !self.tracker.is_running() {
            self.state = AppState::Results;
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Start,
    Quit,
}

fn handle_key(app: &mut App, key: KeyEvent) -> KeyOutcome {
    // ctrl+c to quit
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyOutcome::Quit;
    }

    match (app.state, key.code) {
        (_, KeyCode::Esc) => KeyOutcome::Quit,
        (AppState::Typing, KeyCode::Tab) => {
            app.stop();
            KeyOutcome::Continue
        }
        (AppState::Typing, KeyCode::Char(c)) => {
            app.on_key(c);
            KeyOutcome::Continue
        }
        (AppState::Ready | AppState::Results, KeyCode::Enter) => KeyOutcome::Start,
        (AppState::Ready | AppState::Results, KeyCode::Char('q')) => KeyOutcome::Quit,
        _ => KeyOutcome::Continue,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Err(e) = logging::init(&AppDirs::log_file()) {
        eprintln!("keyrace: logging disabled: {e}");
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
    }

    let provider = build_provider(&config)?;
    let mut app = App::new(config.settings, provider);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(ChannelEventSource::terminal(), TICK_INTERVAL);

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            TypingEvent::Tick => {
                if app.state == AppState::Typing {
                    app.on_tick();
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            TypingEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            TypingEvent::Key(key) => {
                match handle_key(app, key) {
                    KeyOutcome::Quit => break,
                    KeyOutcome::Start => {
                        app.state = AppState::Loading;
                        terminal.draw(|f| ui(app, f))?;
                        app.start();
                        // keys pressed while the text was loading belong to no session
                        runner.discard_pending();
                        runner.restart_ticks();
                    }
                    KeyOutcome::Continue => {}
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}
