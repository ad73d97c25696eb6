use crate::session::Mode;

/// Points for completing a word in rating mode, before the time bonus
pub const WORD_POINTS: u32 = 10;
/// Score deducted for a hint in rating mode
pub const HINT_COST: u32 = 5;
/// Seconds added for a correct letter in normal mode
pub const TIME_BONUS_SECS: u32 = 5;
/// Normal mode never holds more than this many seconds
pub const NORMAL_TIME_CAP: u32 = 60;

pub fn hint_available(mode: Mode, score: u32, hint_used: bool) -> bool {
    match mode {
        Mode::Normal => !hint_used,
        Mode::Rating => !hint_used && score >= HINT_COST,
    }
}

pub fn hint_cost(mode: Mode) -> u32 {
    match mode {
        Mode::Normal => 0,
        Mode::Rating => HINT_COST,
    }
}

/// Award for a finished word: base points plus one per full minute left
pub fn word_completion_points(time_left: u32) -> u32 {
    WORD_POINTS + time_left / 60
}

/// Seconds a correct normal-mode letter adds without passing the cap
pub fn time_bonus(time_left: u32) -> u32 {
    TIME_BONUS_SECS.min(NORMAL_TIME_CAP.saturating_sub(time_left))
}
