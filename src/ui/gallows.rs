use ratatui::text::Line;
use unicode_width::UnicodeWidthStr;

use crate::session::MAX_MISTAKES;

/// ASCII gallows with one body part per mistake: head, body, arms, legs
pub fn gallows_lines(mistakes: u32) -> Vec<String> {
    let m = mistakes.min(MAX_MISTAKES);
    let part = |n: u32, c: char| if m >= n { c } else { ' ' };

    let lines = vec![
        "  +---+".to_string(),
        "  |   |".to_string(),
        format!("  |   {}", part(1, 'O')),
        format!("  |  {}{}{}", part(3, '/'), part(2, '|'), part(4, '\\')),
        format!("  |  {} {}", part(5, '/'), part(6, '\\')),
        "  |".to_string(),
        "=====".to_string(),
    ];
    lines
        .into_iter()
        .map(|l| l.trim_end().to_string())
        .collect()
}

/// Display width of the widest line, for centering the block
pub fn gallows_width(lines: &[String]) -> u16 {
    lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16
}

pub fn gallows(mistakes: u32) -> Vec<Line<'static>> {
    gallows_lines(mistakes).into_iter().map(Line::from).collect()
}
