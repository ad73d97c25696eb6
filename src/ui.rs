pub mod gallows;
pub mod history_table;
pub mod screen;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    app::App,
    keyboard::ROWS,
    scoring::{HINT_COST, NORMAL_TIME_CAP, TIME_BONUS_SECS, WORD_POINTS},
    session::{GameStatus, LossReason, Mode, SessionState, MAX_MISTAKES},
    theme::THEMES,
    timer::format_time,
    ui::gallows::{gallows, gallows_lines, gallows_width},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const LOW_TIME_SECS: u32 = 10;

/// Draw whatever the current app state calls for
pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(&app.state).render(app, f);
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Rect of `width` columns horizontally centered in `area`
fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

pub fn render_menu(app: &App, f: &mut Frame) {
    let constraints = [
        Constraint::Length(1), // title
        Constraint::Length(1),
        Constraint::Length(THEMES.len() as u16),
        Constraint::Length(1),
        Constraint::Length(1), // mode
        Constraint::Length(2), // rules
        Constraint::Length(2), // message
        Constraint::Min(0),
        Constraint::Length(1), // help
    ];

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(constraints.as_slice())
        .split(f.area());

    let title = Paragraph::new(Span::styled(
        "В И С Е Л И Ц А",
        bold().fg(Color::Yellow),
    ))
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let themes: Vec<Line> = THEMES
        .iter()
        .enumerate()
        .map(|(i, theme)| {
            let label = format!("{}. {}", i + 1, theme.name);
            if i == app.selected_theme {
                Line::from(Span::styled(
                    format!("> {label}"),
                    bold().fg(Color::Green),
                ))
            } else {
                Line::from(Span::raw(format!("  {label}")))
            }
        })
        .collect();
    let width = themes.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
    f.render_widget(Paragraph::new(themes), centered(chunks[2], width));

    let mode = Paragraph::new(Line::from(vec![
        Span::raw("Режим: "),
        Span::styled(app.mode.label(), bold()),
        Span::styled("  [Tab]", dim()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(mode, chunks[4]);

    let rules: Vec<Line> = mode_rules(app.mode).into_iter().map(Line::from).collect();
    f.render_widget(
        Paragraph::new(rules).style(dim()).alignment(Alignment::Center),
        chunks[5],
    );

    if let Some(message) = &app.message {
        let message = Paragraph::new(Span::styled(message.as_str(), Style::default().fg(Color::Red)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(message, chunks[6]);
    }

    let help = Paragraph::new("↑/↓ выбор  Enter играть  h история  q выход")
        .style(dim())
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[8]);
}

/// Two-line summary of the selected mode's clock, scoring and hint
fn mode_rules(mode: Mode) -> [String; 2] {
    let time = format_time(mode.base_duration());
    match mode {
        Mode::Normal => [
            format!(
                "Одно слово за {time}, +{TIME_BONUS_SECS} сек за угаданную букву (до {})",
                format_time(NORMAL_TIME_CAP)
            ),
            format!("Одна бесплатная подсказка, {MAX_MISTAKES} ошибок означают поражение"),
        ],
        Mode::Rating => [
            format!("Слова подряд за {time}: {WORD_POINTS} очков + 1 за каждую оставшуюся минуту"),
            format!("Подсказка: одна на слово за {HINT_COST} очков, {MAX_MISTAKES} ошибок завершают игру"),
        ],
    }
}

/// Masked word with a gap between letters and a wider one between words
fn spaced_word(state: &SessionState) -> String {
    state
        .masked_word()
        .chars()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn keyboard_lines(state: &SessionState) -> Vec<Line<'static>> {
    ROWS.iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|&c| {
                    let style = if !state.used_letters.contains(&c) {
                        bold()
                    } else if state.contains(c) {
                        bold().fg(Color::Green)
                    } else {
                        dim().fg(Color::Red)
                    };
                    Span::styled(format!("{c} "), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn status_line(app: &App, state: &SessionState, mode: Mode) -> Line<'static> {
    let time_left = state.timer.time_left();
    let time_style = if time_left <= LOW_TIME_SECS {
        bold().fg(Color::Red)
    } else {
        bold()
    };

    let mut spans = vec![
        Span::raw("Время: "),
        Span::styled(format_time(time_left), time_style),
    ];
    if let Some(flash) = &app.time_flash {
        spans.push(Span::styled(
            format!(" {}", flash.text),
            Style::default().fg(Color::Green),
        ));
    }

    if mode == Mode::Rating {
        spans.push(Span::raw("   Очки: "));
        spans.push(Span::styled(state.score.to_string(), bold()));
        if let Some(flash) = &app.score_flash {
            spans.push(Span::styled(
                format!(" {}", flash.text),
                Style::default().fg(Color::Yellow),
            ));
        }
        spans.push(Span::raw(format!("   Слов: {}", state.words_guessed)));
    }
    Line::from(spans)
}

fn result_lines(app: &App, state: &SessionState) -> Vec<Line<'static>> {
    let headline = match (state.status, state.loss_reason) {
        (GameStatus::Won, _) => Span::styled("Победа!", bold().fg(Color::Green)),
        (_, Some(LossReason::TimeUp)) => Span::styled("Время вышло", bold().fg(Color::Red)),
        _ => Span::styled("Поражение", bold().fg(Color::Red)),
    };

    let mut lines = vec![
        Line::from(headline),
        Line::from(format!("Слово: {}", state.word_string())),
    ];
    if let Some(summary) = app.game.last_summary() {
        lines.push(Line::from(format!(
            "Итог: {} очков, угадано слов: {}",
            summary.score, summary.words_guessed
        )));
    }
    lines
}

fn help_line(app: &App, mode: Mode) -> Line<'static> {
    if !app.game.is_playing() {
        return Line::from(Span::styled("r/Enter заново  m/Esc меню", dim()));
    }

    let hint = match mode {
        Mode::Normal => "Tab подсказка".to_string(),
        Mode::Rating => format!("Tab подсказка (-{HINT_COST} очков)"),
    };
    let hint_style = if app.game.hint_available() {
        Style::default()
    } else {
        dim().add_modifier(Modifier::CROSSED_OUT)
    };
    Line::from(vec![
        Span::styled(hint, hint_style),
        Span::styled("  Esc меню", dim()),
    ])
}

pub fn render_game(app: &App, f: &mut Frame) {
    let (Some(config), Some(state)) = (app.game.config(), app.game.state()) else {
        return;
    };

    let figure = gallows_lines(state.mistakes);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(1), // theme and mode
                Constraint::Length(1), // clock and score
                Constraint::Length(1),
                Constraint::Length(figure.len() as u16),
                Constraint::Length(1),
                Constraint::Length(1), // word
                Constraint::Length(1), // mistakes
                Constraint::Length(1),
                Constraint::Length(ROWS.len() as u16), // keyboard or result
                Constraint::Min(0),
                Constraint::Length(1), // help
            ]
            .as_ref(),
        )
        .split(f.area());

    let header = Paragraph::new(Line::from(vec![
        Span::raw("Тема: "),
        Span::styled(config.theme.name, bold()),
        Span::raw("   Режим: "),
        Span::styled(config.mode.label(), bold()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    f.render_widget(
        Paragraph::new(status_line(app, state, config.mode)).alignment(Alignment::Center),
        chunks[1],
    );

    f.render_widget(
        Paragraph::new(gallows(state.mistakes)),
        centered(chunks[3], gallows_width(&figure)),
    );

    let word_style = match state.status {
        GameStatus::Playing => bold(),
        GameStatus::Won => bold().fg(Color::Green),
        GameStatus::Lost => bold().fg(Color::Red),
    };
    f.render_widget(
        Paragraph::new(Span::styled(spaced_word(state), word_style)).alignment(Alignment::Center),
        chunks[5],
    );

    f.render_widget(
        Paragraph::new(format!("Ошибки: {}/{MAX_MISTAKES}", state.mistakes))
            .style(dim())
            .alignment(Alignment::Center),
        chunks[6],
    );

    let bottom = if state.is_playing() {
        keyboard_lines(state)
    } else {
        result_lines(app, state)
    };
    f.render_widget(Paragraph::new(bottom).alignment(Alignment::Center), chunks[8]);

    f.render_widget(
        Paragraph::new(help_line(app, config.mode)).alignment(Alignment::Center),
        chunks[10],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::game::Game;
    use crate::history::{History, HistoryRecorder, RoundSummary};
    use crate::preferences::Preferences;
    use crate::store::{shared, MemoryStore};
    use crate::word_source::QueuedWords;
    use chrono::Utc;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    fn create_test_app(words: &[&str]) -> App {
        let store = shared(MemoryStore::new());
        let history = History::new(store.clone());
        let game = Game::new(
            Box::new(QueuedWords::new(words.iter().copied())),
            Box::new(history.clone()),
            Box::new(StdRng::seed_from_u64(3)),
        );
        App::new(game, history, Preferences::new(store))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE), Instant::now());
    }

    fn rendered(app: &App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_menu_lists_themes_and_mode() {
        let app = create_test_app(&["КОТ"]);
        let content = rendered(&app);
        assert!(content.contains("В И С Е Л И Ц А"));
        assert!(content.contains("> 1. Животные"));
        assert!(content.contains("5. Транспорт"));
        assert!(content.contains("Режим: Обычный"));
    }

    #[test]
    fn test_menu_explains_the_selected_mode() {
        let mut app = create_test_app(&["КОТ"]);
        let content = rendered(&app);
        assert!(content.contains("Одно слово за 1:00, +5 сек за угаданную букву (до 1:00)"));
        assert!(content.contains("Одна бесплатная подсказка, 6 ошибок означают поражение"));

        press(&mut app, KeyCode::Tab);
        let content = rendered(&app);
        assert!(content.contains("Слова подряд за 5:00: 10 очков + 1 за каждую оставшуюся минуту"));
        assert!(content.contains("Подсказка: одна на слово за 5 очков"));
        assert!(!content.contains("Одно слово за"));
    }

    #[test]
    fn test_menu_shows_load_error() {
        let mut app = create_test_app(&[]);
        press(&mut app, KeyCode::Enter);
        assert!(rendered(&app).contains("Не удалось загрузить слова"));
    }

    #[test]
    fn test_game_in_progress() {
        let mut app = create_test_app(&["СЫР"]);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('р'));
        press(&mut app, KeyCode::Char('а'));

        let content = rendered(&app);
        assert!(content.contains("Тема: Животные"));
        assert!(content.contains("* * Р"));
        assert!(content.contains("Ошибки: 1/6"));
        assert!(content.contains("Время: 1:00 +5 сек"));
        assert!(content.contains("  |   O"));
        assert!(content.contains("Й Ц У К Е Н"));
        assert!(content.contains("Tab подсказка"));
    }

    #[test]
    fn test_game_lost_reveals_word() {
        let mut app = create_test_app(&["СЫР"]);
        press(&mut app, KeyCode::Enter);
        for c in "абвгде".chars() {
            press(&mut app, KeyCode::Char(c));
        }

        let content = rendered(&app);
        assert!(content.contains("Поражение"));
        assert!(content.contains("Слово: СЫР"));
        assert!(content.contains("  |  / \\"));
        assert!(content.contains("r/Enter заново"));
        assert!(!content.contains("Й Ц У К Е Н"));
    }

    #[test]
    fn test_rating_game_shows_score() {
        let mut app = create_test_app(&["ДОМ", "КОТ"]);
        app.mode = Mode::Rating;
        press(&mut app, KeyCode::Enter);
        for c in "дом".chars() {
            press(&mut app, KeyCode::Char(c));
        }

        let content = rendered(&app);
        assert!(content.contains("Режим: Рейтинг"));
        assert!(content.contains("Очки: 15 +15 очков"));
        assert!(content.contains("Слов: 1"));
        assert!(content.contains("Tab подсказка (-5 очков)"));
        assert!(content.contains("* * *"));
    }

    #[test]
    fn test_history_screen() {
        let mut app = create_test_app(&["КОТ"]);
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.state, AppState::History);
        assert!(rendered(&app).contains("Рейтинговых игр пока нет"));

        let mut history = app.history.clone();
        history
            .record(&RoundSummary::new("Цветы", 42, true, 3, false, Utc::now()))
            .unwrap();
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('h'));
        let content = rendered(&app);
        assert!(content.contains("Цветы"));
        assert!(content.contains("42"));
        assert!(content.contains("поражение"));
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let mut app = create_test_app(&["НОВАЯ ЗЕЛАНДИЯ"]);
        press(&mut app, KeyCode::Enter);
        let backend = TestBackend::new(20, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(&app, f)).unwrap();
        app.state = AppState::Menu;
        terminal.draw(|f| draw(&app, f)).unwrap();
    }
}
