use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

use crate::game::{Game, GameEvent};
use crate::history::{History, RoundSummary};
use crate::keyboard::letter_for_key;
use crate::preferences::Preferences;
use crate::runtime::AppEvent;
use crate::scoring::TIME_BONUS_SECS;
use crate::session::Mode;
use crate::theme::{Theme, THEMES};

/// How long a bonus label stays on screen
pub const FLASH_DURATION: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Menu,
    History,
    Game,
}

/// A transient label such as "+5 сек"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub text: String,
    pub expires_at: Instant,
}

impl Flash {
    fn new(text: String, now: Instant) -> Self {
        Self {
            text,
            expires_at: now + FLASH_DURATION,
        }
    }
}

/// UI controller: maps input onto the game and keeps presentation-only state
pub struct App {
    pub state: AppState,
    pub game: Game,
    pub history: History,
    pub preferences: Preferences,
    pub mode: Mode,
    pub selected_theme: usize,
    pub history_rows: Vec<RoundSummary>,
    pub history_scroll: usize,
    /// Error shown on the menu, e.g. a word list that failed to load
    pub message: Option<String>,
    pub time_flash: Option<Flash>,
    pub score_flash: Option<Flash>,
    pub should_quit: bool,
    round_started: Option<Instant>,
}

impl App {
    pub fn new(game: Game, history: History, preferences: Preferences) -> Self {
        let mode = preferences.mode();
        Self {
            state: AppState::Menu,
            game,
            history,
            preferences,
            mode,
            selected_theme: 0,
            history_rows: Vec::new(),
            history_scroll: 0,
            message: None,
            time_flash: None,
            score_flash: None,
            should_quit: false,
            round_started: None,
        }
    }

    pub fn selected(&self) -> Theme {
        THEMES[self.selected_theme.min(THEMES.len() - 1)]
    }

    /// Change the mode and persist it as the player's preference
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        if let Err(e) = self.preferences.set_mode(mode) {
            log::warn!("could not save mode preference: {e}");
        }
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// Start a session on `theme`. A load failure keeps the menu up with the error.
    pub fn start(&mut self, theme: Theme, now: Instant) -> bool {
        self.set_mode(self.mode);
        match self.game.start_session(theme, self.mode) {
            Ok(()) => {
                self.enter_game(now);
                true
            }
            Err(e) => {
                log::warn!("could not start {}: {e}", theme.id);
                self.message = Some(format!("Не удалось загрузить слова: {e}"));
                self.state = AppState::Menu;
                false
            }
        }
    }

    /// Play the same theme and mode again. A load failure drops back to the menu with the error.
    pub fn replay(&mut self, now: Instant) {
        match self.game.reset_game() {
            Ok(()) => self.enter_game(now),
            Err(e) => {
                log::warn!("could not restart: {e}");
                self.back_to_menu();
                self.message = Some(format!("Не удалось загрузить слова: {e}"));
            }
        }
    }

    pub fn back_to_menu(&mut self) {
        self.game.end_session();
        self.time_flash = None;
        self.score_flash = None;
        self.state = AppState::Menu;
    }

    pub fn show_history(&mut self) {
        self.history_rows = self.history.leaderboard();
        self.history_scroll = 0;
        self.state = AppState::History;
    }

    fn enter_game(&mut self, now: Instant) {
        self.message = None;
        self.time_flash = None;
        self.score_flash = None;
        self.round_started = Some(now);
        self.state = AppState::Game;
    }

    /// When a round started since the last call; the game clock restarts from there
    pub fn take_round_start(&mut self) -> Option<Instant> {
        self.round_started.take()
    }

    pub fn on_event(&mut self, event: AppEvent, now: Instant) {
        match event {
            AppEvent::Key(key) => self.on_key(key, now),
            AppEvent::Seconds(seconds) => self.on_seconds(seconds, now),
            AppEvent::Resize | AppEvent::Idle => {}
        }
        self.expire_flashes(now);
    }

    /// Advance a running round by whole seconds
    pub fn on_seconds(&mut self, seconds: u32, now: Instant) {
        if self.state != AppState::Game {
            return;
        }
        for _ in 0..seconds {
            if !self.game.is_playing() {
                break;
            }
            let events = self.game.tick();
            self.apply_events(events, now);
        }
    }

    pub fn expire_flashes(&mut self, now: Instant) {
        if self.time_flash.as_ref().is_some_and(|f| now >= f.expires_at) {
            self.time_flash = None;
        }
        if self.score_flash.as_ref().is_some_and(|f| now >= f.expires_at) {
            self.score_flash = None;
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.state {
            AppState::Menu => self.on_menu_key(key, now),
            AppState::History => self.on_history_key(key),
            AppState::Game => self.on_game_key(key, now),
        }
    }

    fn on_menu_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Up => {
                self.selected_theme = self.selected_theme.saturating_sub(1);
            }
            KeyCode::Down => {
                self.selected_theme = (self.selected_theme + 1).min(THEMES.len() - 1);
            }
            KeyCode::Enter => {
                self.start(self.selected(), now);
            }
            KeyCode::Tab => self.toggle_mode(),
            KeyCode::Char(c @ '1'..='5') => {
                self.selected_theme = c as usize - '1' as usize;
                self.start(self.selected(), now);
            }
            KeyCode::Char('h') => self.show_history(),
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn on_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') | KeyCode::Char('h') => {
                self.state = AppState::Menu;
            }
            KeyCode::Up => {
                self.history_scroll = self.history_scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.history_scroll + 1 < self.history_rows.len() {
                    self.history_scroll += 1;
                }
            }
            _ => {}
        }
    }

    fn on_game_key(&mut self, key: KeyEvent, now: Instant) {
        if self.game.is_playing() {
            match key.code {
                KeyCode::Esc => self.back_to_menu(),
                KeyCode::Tab => {
                    let events = self.game.use_hint();
                    self.apply_events(events, now);
                }
                KeyCode::Char(c) => {
                    if let Some(letter) = letter_for_key(c) {
                        let events = self.game.guess_letter(letter);
                        self.apply_events(events, now);
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Enter | KeyCode::Char('r') => self.replay(now),
            KeyCode::Esc | KeyCode::Char('m') => self.back_to_menu(),
            _ => {}
        }
    }

    fn apply_events(&mut self, events: Vec<GameEvent>, now: Instant) {
        for event in events {
            match event {
                GameEvent::TimeBonus { .. } => {
                    self.time_flash = Some(Flash::new(format!("+{TIME_BONUS_SECS} сек"), now));
                }
                GameEvent::WordCompleted { points, .. } => {
                    self.score_flash = Some(Flash::new(format!("+{points} очков"), now));
                }
                GameEvent::Won | GameEvent::Lost(_) => {
                    self.time_flash = None;
                }
                _ => {}
            }
        }
    }
}
