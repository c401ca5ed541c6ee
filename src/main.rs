mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::{Path, PathBuf},
    time::Duration,
};
use time_humanize::HumanTime;

use kakitori::{
    config::{ConfigStore, FileConfigStore},
    feedback::TerminalBell,
    progress::{ProgressDb, PromptSummary},
    prompt::{Deck, PracticePrompt, Script, Tier},
    runtime::{CrosstermEventSource, FixedTicker, Runner, TrainerEvent},
    session::{ConfigError, Outcome, PracticeSession, ScoringPolicy, SessionConfig},
    strokes::{classify, StrokeError, StrokeSample},
};

const TICK_RATE_MS: u64 = 100;
const TICKS_PER_SECOND: u64 = 1000 / TICK_RATE_MS;

/// terminal trainer for japanese writing practice
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal trainer for Japanese writing practice: tiered kana and vocabulary quizzes, mouse-drawn stroke checking, per-prompt countdowns, and historical progress tracking."
)]
pub struct Cli {
    /// deck to practice from
    #[clap(short = 'd', long, value_enum, default_value_t = SupportedDeck::Hiragana)]
    deck: SupportedDeck,

    /// number of correct answers that completes a session
    #[clap(short = 't', long)]
    target_score: Option<u32>,

    /// seconds allowed per prompt before it counts as a miss
    #[clap(short = 's', long)]
    seconds_per_prompt: Option<u32>,

    /// only practice prompts from one difficulty tier
    #[clap(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    tier: Option<u8>,

    /// only practice prompts in one script (useful for the phrases deck)
    #[clap(long, value_enum)]
    script: Option<SupportedScript>,

    /// require the full stroke drawing before a typed answer can score
    #[clap(long)]
    require_drawing: bool,

    /// print practice history and exit
    #[clap(long)]
    progress: bool,

    /// export practice history as csv and exit
    #[clap(long, value_name = "PATH")]
    export: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum SupportedDeck {
    Hiragana,
    Katakana,
    Phrases,
}

impl SupportedDeck {
    fn as_deck(&self) -> Deck {
        Deck::new(self.to_string().to_lowercase())
    }
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum SupportedScript {
    Hiragana,
    Katakana,
}

impl From<SupportedScript> for Script {
    fn from(s: SupportedScript) -> Self {
        match s {
            SupportedScript::Hiragana => Script::Hiragana,
            SupportedScript::Katakana => Script::Katakana,
        }
    }
}

fn tier_from(n: u8) -> Tier {
    match n {
        1 => Tier::Tier1,
        2 => Tier::Tier2,
        _ => Tier::Tier3,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Practicing,
    Results,
    Progress,
}

#[derive(Debug)]
pub struct App {
    pub pool: Vec<PracticePrompt>,
    pub session_config: SessionConfig,
    pub session: PracticeSession,
    pub state: AppState,
    pub input: String,
    pub status: String,
    pub current_stroke: StrokeSample,
    pub summaries: Vec<PromptSummary>,
}

impl App {
    /// Production constructor: wires the sqlite progress sink and terminal
    /// bell into the session.
    pub fn new(pool: Vec<PracticePrompt>, config: SessionConfig) -> Result<Self, ConfigError> {
        let session = Self::attach_sinks(PracticeSession::start(pool.clone(), config.clone())?);
        Ok(Self::with_session(pool, config, session))
    }

    /// Sink-less constructor for tests and headless use.
    pub fn from_parts(
        pool: Vec<PracticePrompt>,
        config: SessionConfig,
    ) -> Result<Self, ConfigError> {
        let session = PracticeSession::start(pool.clone(), config.clone())?;
        Ok(Self::with_session(pool, config, session))
    }

    fn with_session(
        pool: Vec<PracticePrompt>,
        config: SessionConfig,
        session: PracticeSession,
    ) -> Self {
        Self {
            pool,
            session_config: config,
            session,
            state: AppState::Practicing,
            input: String::new(),
            status: String::new(),
            current_stroke: StrokeSample::default(),
            summaries: Vec::new(),
        }
    }

    fn attach_sinks(mut session: PracticeSession) -> PracticeSession {
        if let Ok(db) = ProgressDb::new() {
            session = session.with_progress(Box::new(db));
        }
        session.with_feedback(Box::new(TerminalBell))
    }

    /// Start a fresh session with the same pool and settings.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        let session =
            PracticeSession::start(self.pool.clone(), self.session_config.clone())?;
        self.session = Self::attach_sinks(session);
        self.state = AppState::Practicing;
        self.input.clear();
        self.status.clear();
        self.current_stroke.clear();
        Ok(())
    }

    pub fn submit_input(&mut self) {
        let answer = std::mem::take(&mut self.input);
        if let Some(outcome) = self.session.submit_typed_answer(&answer) {
            self.status = match outcome {
                Outcome::Correct => "correct".to_string(),
                Outcome::Incorrect => "incorrect".to_string(),
            };
        }
        self.current_stroke.clear();
        if self.session.session_complete {
            self.state = AppState::Results;
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if self.state != AppState::Practicing {
            return;
        }
        let (x, y) = (mouse.column as f64, mouse.row as f64);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.current_stroke.clear();
                self.current_stroke.push(x, y);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if !self.current_stroke.is_empty() {
                    self.current_stroke.push(x, y);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if !self.current_stroke.is_empty() {
                    self.current_stroke.push(x, y);
                    self.finish_stroke();
                }
            }
            _ => {}
        }
    }

    fn finish_stroke(&mut self) {
        let sample = std::mem::take(&mut self.current_stroke);
        let Some(expected) = self.session.expected_stroke() else {
            return;
        };
        match classify(&sample, expected) {
            Ok(verdict) => {
                self.session.submit_stroke(verdict);
                self.status = verdict.message.to_string();
            }
            // too-short gesture: dropped, no penalty
            Err(StrokeError::InsufficientInput) => {}
        }
    }

    pub fn show_progress(&mut self) {
        self.summaries = ProgressDb::new()
            .and_then(|db| db.prompt_summaries())
            .unwrap_or_default();
        self.state = AppState::Progress;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.progress {
        return print_progress();
    }
    if let Some(path) = &cli.export {
        return export_progress(path);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    config.deck = cli.deck.to_string().to_lowercase();
    if let Some(target) = cli.target_score {
        config.target_score = target;
    }
    if let Some(secs) = cli.seconds_per_prompt {
        config.seconds_per_prompt = Some(secs);
    }
    if cli.require_drawing {
        config.require_drawing = true;
    }
    let _ = store.save(&config);

    let deck = cli.deck.as_deck();
    let pool = deck.filtered(cli.script.map(Script::from), cli.tier.map(tier_from));

    let session_config = SessionConfig {
        target_score: config.target_score,
        time_limit_secs: config.seconds_per_prompt,
        scoring: if config.require_drawing {
            ScoringPolicy::RequireDrawing
        } else {
            ScoringPolicy::TypedOnly
        },
    };

    let mut app = match App::new(pool, session_config) {
        Ok(app) => app,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, e.to_string()).exit();
        }
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let mut ticks: u64 = 0;

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            TrainerEvent::Tick => {
                ticks += 1;
                // session countdown runs on whole seconds
                if ticks % TICKS_PER_SECOND == 0 && app.state == AppState::Practicing {
                    app.session.tick();
                }
            }
            TrainerEvent::Resize => {}
            TrainerEvent::Mouse(mouse) => app.on_mouse(mouse),
            TrainerEvent::Key(key) => {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break;
                }
                match app.state {
                    AppState::Practicing => match key.code {
                        KeyCode::Esc => break,
                        KeyCode::Enter => app.submit_input(),
                        KeyCode::Backspace => {
                            app.input.pop();
                        }
                        KeyCode::Char(c) => app.input.push(c),
                        _ => {}
                    },
                    AppState::Results => match key.code {
                        KeyCode::Esc => break,
                        KeyCode::Char('r') => app.reset()?,
                        KeyCode::Char('p') => app.show_progress(),
                        _ => {}
                    },
                    AppState::Progress => match key.code {
                        KeyCode::Esc => break,
                        KeyCode::Char('r') => app.reset()?,
                        _ => {}
                    },
                }
            }
        }

        if app.state == AppState::Practicing && app.session.session_complete {
            app.state = AppState::Results;
        }
    }

    Ok(())
}

fn print_progress() -> Result<(), Box<dyn Error>> {
    let db = ProgressDb::new()?;
    let summaries = db.prompt_summaries()?;

    if summaries.is_empty() {
        println!("no practice history yet");
        return Ok(());
    }

    println!(
        "{:<12} {:>8} {:>8} {:>9}   last practiced",
        "prompt", "attempts", "misses", "miss rate"
    );
    for s in &summaries {
        let since = (chrono::Local::now() - s.last_seen).num_seconds();
        println!(
            "{:<12} {:>8} {:>8} {:>8.1}%   {}",
            s.prompt,
            s.attempts,
            s.misses,
            s.miss_rate,
            HumanTime::from(-since)
        );
    }

    Ok(())
}

fn export_progress(path: &Path) -> Result<(), Box<dyn Error>> {
    let db = ProgressDb::new()?;
    let rows = db.export_csv(path)?;
    println!("exported {} prompts to {}", rows, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_pool() -> Vec<PracticePrompt> {
        vec![PracticePrompt {
            native: "あ".to_string(),
            romaji: Some("a".to_string()),
            meaning: "a sound".to_string(),
            script: Script::Hiragana,
            tier: Tier::Tier1,
        }]
    }

    #[test]
    fn test_supported_deck_names_match_bundled_files() {
        for deck in [
            SupportedDeck::Hiragana,
            SupportedDeck::Katakana,
            SupportedDeck::Phrases,
        ] {
            // panics if the bundled json is missing
            let loaded = deck.as_deck();
            assert!(!loaded.prompts.is_empty());
        }
    }

    #[test]
    fn test_tier_from_maps_all_values() {
        assert_eq!(tier_from(1), Tier::Tier1);
        assert_eq!(tier_from(2), Tier::Tier2);
        assert_eq!(tier_from(3), Tier::Tier3);
    }

    #[test]
    fn test_app_starts_practicing() {
        let config = SessionConfig {
            target_score: 1,
            ..SessionConfig::default()
        };
        let app = App::from_parts(test_pool(), config).unwrap();

        assert_eq!(app.state, AppState::Practicing);
        assert!(app.input.is_empty());
        assert!(app.current_stroke.is_empty());
    }

    #[test]
    fn test_submit_input_moves_to_results_on_completion() {
        let config = SessionConfig {
            target_score: 1,
            ..SessionConfig::default()
        };
        let mut app = App::from_parts(test_pool(), config).unwrap();

        app.input.push('a');
        app.submit_input();

        assert_eq!(app.state, AppState::Results);
        assert_eq!(app.status, "correct");
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_reset_returns_to_practicing() {
        let config = SessionConfig {
            target_score: 1,
            ..SessionConfig::default()
        };
        let mut app = App::from_parts(test_pool(), config).unwrap();
        app.input.push('a');
        app.submit_input();
        assert_eq!(app.state, AppState::Results);

        app.reset().unwrap();

        assert_eq!(app.state, AppState::Practicing);
        assert_eq!(app.session.score, 0);
        assert_eq!(app.session.attempts, 0);
    }

    #[test]
    fn test_mouse_drag_accumulates_a_stroke() {
        let mut app = App::from_parts(test_pool(), SessionConfig::default()).unwrap();

        let event = |kind| MouseEvent {
            kind,
            column: 10,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };

        app.on_mouse(event(MouseEventKind::Down(MouseButton::Left)));
        app.on_mouse(event(MouseEventKind::Drag(MouseButton::Left)));
        assert_eq!(app.current_stroke.points.len(), 2);

        // releasing classifies and clears the in-progress stroke
        app.on_mouse(event(MouseEventKind::Up(MouseButton::Left)));
        assert!(app.current_stroke.is_empty());
    }

    #[test]
    fn test_drag_without_press_is_ignored() {
        let mut app = App::from_parts(test_pool(), SessionConfig::default()).unwrap();

        app.on_mouse(MouseEvent {
            kind: MouseEventKind::Drag(MouseButton::Left),
            column: 3,
            row: 3,
            modifiers: KeyModifiers::NONE,
        });

        assert!(app.current_stroke.is_empty());
    }
}
