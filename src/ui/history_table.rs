use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{app::App, history::RoundSummary};

const HEADERS: [&str; 7] = ["#", "Тема", "Очки", "Слов", "Подсказки", "Итог", "Дата"];

fn outcome_label(summary: &RoundSummary) -> &'static str {
    if summary.is_winner {
        "победа"
    } else {
        "поражение"
    }
}

fn date_label(summary: &RoundSummary) -> String {
    summary.timestamp.format("%Y-%m-%d %H:%M").to_string()
}

/// Pure presenter for one leaderboard row
pub fn present_row(rank: usize, summary: &RoundSummary) -> Row<'static> {
    let outcome_style = if summary.is_winner {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    };

    Row::new(vec![
        Cell::from(rank.to_string()),
        Cell::from(summary.theme.clone()),
        Cell::from(summary.score.to_string()).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(summary.words_guessed.to_string()),
        Cell::from(summary.hints_used.to_string()),
        Cell::from(outcome_label(summary)).style(outcome_style),
        Cell::from(date_label(summary)),
    ])
}

pub fn render_history(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    if app.history_rows.is_empty() {
        let empty = Paragraph::new("Рейтинговых игр пока нет")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("История"));
        f.render_widget(empty, chunks[0]);
    } else {
        let header = Row::new(HEADERS.to_vec())
            .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED));
        let rows = app
            .history_rows
            .iter()
            .enumerate()
            .skip(app.history_scroll)
            .map(|(i, s)| present_row(i + 1, s));

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Length(14),
                Constraint::Length(6),
                Constraint::Length(6),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Min(16),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("История"));
        f.render_widget(table, chunks[0]);
    }

    let help = Paragraph::new("↑/↓ прокрутка  Esc назад")
        .style(Style::default().add_modifier(Modifier::DIM))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[1]);
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(fill))
}

/// Leaderboard as plain text columns, for printing outside the TUI
pub fn leaderboard_text(rows: &[RoundSummary]) -> String {
    if rows.is_empty() {
        return "Рейтинговых игр пока нет\n".to_string();
    }

    let table: Vec<[String; 7]> = rows
        .iter()
        .enumerate()
        .map(|(i, s)| {
            [
                (i + 1).to_string(),
                s.theme.clone(),
                s.score.to_string(),
                s.words_guessed.to_string(),
                s.hints_used.to_string(),
                outcome_label(s).to_string(),
                date_label(s),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.width());
    for row in &table {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.width());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths.iter())
        .map(|(h, w)| pad(h, *w))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');
    for row in &table {
        let cells: Vec<String> = row
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| pad(c, *w))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}
