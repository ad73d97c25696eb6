use assert_matches::assert_matches;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

use viselitsa::game::{Game, GameEvent};
use viselitsa::history::{History, HistoryRecorder, RoundSummary};
use viselitsa::preferences::Preferences;
use viselitsa::session::{GameStatus, LossReason, Mode};
use viselitsa::store::{shared, MemoryStore, SharedStore, SqliteStore};
use viselitsa::theme::{Theme, ThemeId, THEMES};
use viselitsa::word_source::{EmbeddedWords, QueuedWords, WordSource};

fn queued_game(words: &[&str], store: SharedStore) -> Game {
    Game::new(
        Box::new(QueuedWords::new(words.iter().copied())),
        Box::new(History::new(store)),
        Box::new(StdRng::seed_from_u64(42)),
    )
}

fn start(words: &[&str], mode: Mode) -> (Game, SharedStore) {
    let store = shared(MemoryStore::new());
    let mut game = queued_game(words, store.clone());
    game.start_session(Theme::by_id(ThemeId::Animals), mode)
        .unwrap();
    (game, store)
}

#[test]
fn normal_cat_round_is_won_in_three_guesses() {
    let (mut game, _) = start(&["кот"], Mode::Normal);

    game.guess_letter('К');
    let state = game.state().unwrap();
    assert_eq!(state.used_letters.len(), 1);
    assert_eq!(state.mistakes, 0);
    assert_eq!(state.timer.time_left(), 60);

    game.guess_letter('О');
    assert_eq!(game.state().unwrap().used_letters.len(), 2);

    let events = game.guess_letter('Т');
    assert_eq!(events.last(), Some(&GameEvent::Won));
    assert_eq!(game.status(), Some(GameStatus::Won));
}

#[test]
fn normal_cheese_round_is_lost_after_six_misses() {
    let (mut game, _) = start(&["СЫР"], Mode::Normal);
    for c in "ЖЗИЙКЛ".chars() {
        game.guess_letter(c);
    }
    let state = game.state().unwrap();
    assert_eq!(state.mistakes, 6);
    assert_eq!(state.status, GameStatus::Lost);
    assert_eq!(state.loss_reason, Some(LossReason::Mistakes));
}

#[test]
fn finished_round_ignores_further_input() {
    let (mut game, _) = start(&["СЫР"], Mode::Rating);
    for c in "ЖЗИЙКЛ".chars() {
        game.guess_letter(c);
    }
    let before = game.state().unwrap().clone();
    for c in "СЫРМН".chars() {
        assert!(game.guess_letter(c).is_empty());
    }
    assert!(game.use_hint().is_empty());
    let after = game.state().unwrap();
    assert_eq!(after.used_letters, before.used_letters);
    assert_eq!(after.mistakes, before.mistakes);
    assert_eq!(after.score, before.score);
}

#[test]
fn normal_time_never_exceeds_the_cap_or_goes_negative() {
    let (mut game, _) = start(&["ПАРОВОЗ"], Mode::Normal);
    for c in "ПАР".chars() {
        game.guess_letter(c);
        assert!(game.state().unwrap().timer.time_left() <= 60);
    }
    for _ in 0..200 {
        game.tick();
    }
    assert_eq!(game.state().unwrap().timer.time_left(), 0);
    assert_eq!(game.state().unwrap().loss_reason, Some(LossReason::TimeUp));
}

#[test]
fn rating_house_round_scores_and_continues() {
    let (mut game, _) = start(&["ДОМ", "КОТ"], Mode::Rating);
    for _ in 0..175 {
        game.tick();
    }
    for c in "ДОМ".chars() {
        game.guess_letter(c);
    }
    let state = game.state().unwrap();
    assert_eq!(state.score, 12);
    assert_eq!(state.words_guessed, 1);
    assert_eq!(state.word_string(), "КОТ");
    assert!(state.used_letters.is_empty());
    assert_eq!(state.mistakes, 0);
    assert_eq!(state.status, GameStatus::Playing);
}

#[test]
fn rating_hint_spends_earned_points_once_per_word() {
    let (mut game, _) = start(&["ДОМ", "ПИНГВИН", "КОТ"], Mode::Rating);
    // a hint costs points the round does not have yet
    assert!(game.use_hint().is_empty());
    assert!(!game.state().unwrap().hint_used);

    for c in "ДОМ".chars() {
        game.guess_letter(c);
    }
    assert_eq!(game.state().unwrap().score, 15);

    let events = game.use_hint();
    assert_matches!(events.as_slice(), [GameEvent::HintRevealed(c)] if "ПИНГВИН".contains(*c));
    assert!(game.use_hint().is_empty());
    let state = game.state().unwrap();
    assert_eq!(state.score, 10);
    assert!(state.hint_used);
    assert_eq!(state.used_letters.len(), 1);
}

#[test]
fn every_embedded_word_is_winnable_by_its_letters() {
    let source = EmbeddedWords;
    for theme in THEMES {
        let words = source.load(&theme).unwrap();
        assert!(!words.is_empty(), "{} has no words", theme.id);

        for word in words {
            let upper = word.to_uppercase();
            let store = shared(MemoryStore::new());
            let mut game = queued_game(&[upper.as_str()], store);
            game.start_session(theme, Mode::Normal).unwrap();
            for c in upper.chars().filter(|c| *c != ' ').unique() {
                game.guess_letter(c);
            }
            assert_eq!(game.status(), Some(GameStatus::Won), "{upper}");
        }
    }
}

#[test]
fn history_and_mode_survive_reopening_the_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state").join("store.db");

    {
        let store = shared(SqliteStore::open(&path).unwrap());
        Preferences::new(store.clone()).set_mode(Mode::Rating).unwrap();
        let mut game = queued_game(&["СЫР"], store);
        game.start_session(Theme::by_id(ThemeId::Countries), Mode::Rating)
            .unwrap();
        for c in "ЖЗИЙКЛ".chars() {
            game.guess_letter(c);
        }
    }

    let store = shared(SqliteStore::open(&path).unwrap());
    assert_eq!(Preferences::new(store.clone()).mode(), Mode::Rating);
    let entries = History::new(store).entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].theme, "Страны");
    assert!(!entries[0].is_winner);
}

#[test]
fn malformed_history_restarts_on_next_record() {
    let store = shared(MemoryStore::new());
    store
        .borrow_mut()
        .set("hangman_games", "{not json")
        .unwrap();
    let mut history = History::new(store);
    assert!(history.entries().is_empty());

    history
        .record(&RoundSummary::new("Цветы", 5, false, 1, true, chrono::Utc::now()))
        .unwrap();
    assert_eq!(history.entries().len(), 1);
}
