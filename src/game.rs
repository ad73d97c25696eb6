use chrono::Utc;
use rand::seq::SliceRandom;
use rand::RngCore;

use crate::history::{HistoryRecorder, RoundSummary};
use crate::scoring::{
    hint_available, hint_cost, time_bonus, word_completion_points, NORMAL_TIME_CAP,
};
use crate::session::{
    GameStatus, LossReason, Mode, Session, SessionConfig, SessionState, MAX_MISTAKES,
};
use crate::theme::Theme;
use crate::word_source::{LoadError, WordSource};

/// Notifications produced by game operations, in the order they happened
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Hit(char),
    Miss(char),
    /// Normal mode: a correct letter bought extra seconds (possibly zero at the cap)
    TimeBonus { added: u32 },
    HintRevealed(char),
    /// Rating mode: a word was finished and the next one loaded
    WordCompleted { word: String, points: u32 },
    Won,
    Lost(LossReason),
    RoundRecorded(RoundSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Won,
    Lost(LossReason),
}

/// The hangman state machine.
///
/// Owns its collaborators: where words come from, where finished rating rounds go, and
/// the one random source used for both word and hint selection. Until a session has been
/// started successfully every operation is a no-op.
pub struct Game {
    words: Box<dyn WordSource>,
    recorder: Box<dyn HistoryRecorder>,
    rng: Box<dyn RngCore>,
    session: Option<Session>,
    last_summary: Option<RoundSummary>,
}

impl Game {
    pub fn new(
        words: Box<dyn WordSource>,
        recorder: Box<dyn HistoryRecorder>,
        rng: Box<dyn RngCore>,
    ) -> Self {
        Self {
            words,
            recorder,
            rng,
            session: None,
            last_summary: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.session.as_ref().map(|s| &s.config)
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.session.as_ref().map(|s| &s.state)
    }

    pub fn status(&self) -> Option<GameStatus> {
        self.state().map(|s| s.status)
    }

    pub fn has_started(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.status() == Some(GameStatus::Playing)
    }

    pub fn has_finished(&self) -> bool {
        matches!(self.status(), Some(GameStatus::Won | GameStatus::Lost))
    }

    /// Summary of the most recent finished rating round of this session
    pub fn last_summary(&self) -> Option<&RoundSummary> {
        self.last_summary.as_ref()
    }

    pub fn hint_available(&self) -> bool {
        match self.session.as_ref() {
            Some(s) => {
                s.state.is_playing()
                    && hint_available(s.config.mode, s.state.score, s.state.hint_used)
            }
            None => false,
        }
    }

    /// Begin a fresh session. The word is loaded first; on failure nothing changes.
    pub fn start_session(&mut self, theme: Theme, mode: Mode) -> Result<(), LoadError> {
        let word = self.words.select_word(&theme, &mut *self.rng)?;
        log::debug!("starting {mode} session on {} ({} letters)", theme.id, word.chars().count());

        self.session = Some(Session {
            config: SessionConfig { theme, mode },
            state: SessionState::new(&word, mode),
        });
        self.last_summary = None;
        Ok(())
    }

    /// Replay with the current theme and mode; no-op before any session
    pub fn reset_game(&mut self) -> Result<(), LoadError> {
        let Some(theme) = self.config().map(|c| c.theme) else {
            return Ok(());
        };
        let word = self.words.select_word(&theme, &mut *self.rng)?;
        if let Some(session) = self.session.as_mut() {
            session.state.restart(&word);
        }
        self.last_summary = None;
        Ok(())
    }

    /// Drop the current session, e.g. when the player leaves for the menu
    pub fn end_session(&mut self) {
        self.session = None;
    }

    pub fn guess_letter(&mut self, letter: char) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let Some(session) = self.session.as_mut() else {
            return events;
        };
        let state = &mut session.state;
        if !state.is_playing() || !letter.is_alphabetic() {
            return events;
        }

        let letter = normalize(letter);
        if !state.used_letters.insert(letter) {
            return events;
        }

        if state.contains(letter) {
            events.push(GameEvent::Hit(letter));
            if session.config.mode == Mode::Normal {
                let added = state
                    .timer
                    .add_capped(time_bonus(state.timer.time_left()), NORMAL_TIME_CAP);
                events.push(GameEvent::TimeBonus { added });
            }
        } else {
            state.mistakes += 1;
            events.push(GameEvent::Miss(letter));
        }

        self.evaluate(&mut events);
        events
    }

    pub fn use_hint(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let Some(session) = self.session.as_mut() else {
            return events;
        };
        let mode = session.config.mode;
        let state = &mut session.state;
        if !state.is_playing() || !hint_available(mode, state.score, state.hint_used) {
            return events;
        }

        let hidden = state.hidden_positions();
        let Some(&pos) = hidden.choose(&mut *self.rng) else {
            return events;
        };
        let letter = state.word[pos];
        state.used_letters.insert(letter);
        state.hint_used = true;
        state.score = state.score.saturating_sub(hint_cost(mode));
        events.push(GameEvent::HintRevealed(letter));

        self.evaluate(&mut events);
        events
    }

    /// One second of the session clock
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let Some(session) = self.session.as_mut() else {
            return events;
        };
        if !session.state.is_playing() {
            return events;
        }
        session.state.timer.tick();
        self.evaluate(&mut events);
        events
    }

    // Win is checked before loss, and a loss on the same pass wins out. In rating mode the
    // mistake counter is already reset by then, so a finished word always continues.
    fn evaluate(&mut self, events: &mut Vec<GameEvent>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let theme = session.config.theme;
        let state = &mut session.state;
        if !state.is_playing() {
            return;
        }

        let mut pending_win = false;
        if state.is_solved() {
            match session.config.mode {
                Mode::Rating => {
                    let points = word_completion_points(state.timer.time_left());
                    let solved = state.word_string();
                    state.score += points;
                    match self.words.select_word(&theme, &mut *self.rng) {
                        Ok(next) => {
                            state.words_guessed += 1;
                            state.next_word(&next);
                            events.push(GameEvent::WordCompleted {
                                word: solved,
                                points,
                            });
                        }
                        Err(e) => {
                            log::warn!("no next word for {}: {e}", theme.id);
                            pending_win = true;
                        }
                    }
                }
                Mode::Normal => pending_win = true,
            }
        }

        let outcome = if state.mistakes >= MAX_MISTAKES {
            Some(Outcome::Lost(LossReason::Mistakes))
        } else if pending_win {
            Some(Outcome::Won)
        } else if state.timer.is_expired() {
            Some(Outcome::Lost(LossReason::TimeUp))
        } else {
            None
        };

        if let Some(outcome) = outcome {
            self.finish(outcome, events);
        }
    }

    fn finish(&mut self, outcome: Outcome, events: &mut Vec<GameEvent>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let state = &mut session.state;
        state.timer.stop();
        match outcome {
            Outcome::Won => {
                state.status = GameStatus::Won;
                events.push(GameEvent::Won);
            }
            Outcome::Lost(reason) => {
                state.status = GameStatus::Lost;
                state.loss_reason = Some(reason);
                events.push(GameEvent::Lost(reason));
            }
        }
        log::debug!(
            "{} round over: {:?}, score {}",
            session.config.mode,
            state.status,
            state.score
        );

        if session.config.mode != Mode::Rating {
            return;
        }

        let is_winner = state.status == GameStatus::Won;
        // the winning word has not been counted yet
        let words_guessed = if is_winner {
            state.words_guessed + 1
        } else {
            state.words_guessed
        };
        let summary = RoundSummary::new(
            session.config.theme.name,
            state.score,
            state.hint_used,
            words_guessed,
            is_winner,
            Utc::now(),
        );
        if let Err(e) = self.recorder.record(&summary) {
            log::warn!("failed to record round: {e}");
        }
        events.push(GameEvent::RoundRecorded(summary.clone()));
        self.last_summary = Some(summary);
    }
}

fn normalize(letter: char) -> char {
    letter.to_uppercase().next().unwrap_or(letter)
}
