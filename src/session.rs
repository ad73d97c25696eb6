use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::theme::Theme;
use crate::timer::Countdown;

/// Mistakes allowed on a word before the round is lost
pub const MAX_MISTAKES: u32 = 6;

/// Ruleset of a session
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// One word, one minute, one hint
    #[default]
    Normal,
    /// Five minutes of consecutive words for points
    Rating,
}

impl Mode {
    /// Seconds on the clock when a session starts
    pub fn base_duration(self) -> u32 {
        match self {
            Mode::Normal => 60,
            Mode::Rating => 5 * 60,
        }
    }

    pub fn toggled(self) -> Mode {
        match self {
            Mode::Normal => Mode::Rating,
            Mode::Rating => Mode::Normal,
        }
    }

    /// Parse the persisted form (`"normal"` / `"rating"`)
    pub fn from_pref(value: &str) -> Option<Mode> {
        match value.trim() {
            "normal" => Some(Mode::Normal),
            "rating" => Some(Mode::Rating),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "Обычный",
            Mode::Rating => "Рейтинг",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LossReason {
    Mistakes,
    TimeUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub theme: Theme,
    pub mode: Mode,
}

/// Mutable state of the current round
#[derive(Debug, Clone)]
pub struct SessionState {
    pub word: Vec<char>,
    pub used_letters: HashSet<char>,
    pub mistakes: u32,
    pub status: GameStatus,
    pub loss_reason: Option<LossReason>,
    pub timer: Countdown,
    // Rating mode
    pub score: u32,
    pub words_guessed: u32,
    pub hint_used: bool,
}

impl SessionState {
    pub fn new(word: &str, mode: Mode) -> Self {
        Self {
            word: word.chars().collect(),
            used_letters: HashSet::new(),
            mistakes: 0,
            status: GameStatus::Playing,
            loss_reason: None,
            timer: Countdown::new(mode.base_duration()),
            score: 0,
            words_guessed: 0,
            hint_used: false,
        }
    }

    pub fn word_string(&self) -> String {
        self.word.iter().collect()
    }

    pub fn contains(&self, letter: char) -> bool {
        self.word.contains(&letter)
    }

    /// Every non-space character has been guessed
    pub fn is_solved(&self) -> bool {
        self.word
            .iter()
            .all(|c| *c == ' ' || self.used_letters.contains(c))
    }

    /// Positions whose character is still hidden (spaces are never hidden)
    pub fn hidden_positions(&self) -> Vec<usize> {
        self.word
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != ' ' && !self.used_letters.contains(c))
            .map(|(i, _)| i)
            .collect()
    }

    /// The word as shown to the player: unguessed letters become `*` while playing
    pub fn masked_word(&self) -> String {
        self.word
            .iter()
            .map(|c| {
                if *c == ' '
                    || self.used_letters.contains(c)
                    || self.status != GameStatus::Playing
                {
                    *c
                } else {
                    '*'
                }
            })
            .collect()
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Load the next word of a rating round, keeping score and clock
    pub fn next_word(&mut self, word: &str) {
        self.word = word.chars().collect();
        self.used_letters.clear();
        self.mistakes = 0;
        self.hint_used = false;
    }

    /// Replay from scratch on `word`: clears the round and restarts the clock at its base
    pub fn restart(&mut self, word: &str) {
        self.next_word(word);
        self.status = GameStatus::Playing;
        self.loss_reason = None;
        self.score = 0;
        self.words_guessed = 0;
        self.timer.restart();
    }
}

/// A started session: fixed settings plus the current round
#[derive(Debug, Clone)]
pub struct Session {
    pub config: SessionConfig,
    pub state: SessionState,
}
