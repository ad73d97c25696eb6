/// On-screen keyboard rows (ЙЦУКЕН layout)
pub const ROWS: [&[char]; 3] = [
    &['Й', 'Ц', 'У', 'К', 'Е', 'Н', 'Г', 'Ш', 'Щ', 'З', 'Х', 'Ъ'],
    &['Ф', 'Ы', 'В', 'А', 'П', 'Р', 'О', 'Л', 'Д', 'Ж', 'Э'],
    &['Я', 'Ч', 'С', 'М', 'И', 'Т', 'Ь', 'Б', 'Ю'],
];

// Latin keys sitting where the Cyrillic letters of ROWS are on a standard keyboard
const LATIN_ROWS: [&[char]; 3] = [
    &['q', 'w', 'e', 'r', 't', 'y', 'u', 'i', 'o', 'p', '[', ']'],
    &['a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l', ';', '\''],
    &['z', 'x', 'c', 'v', 'b', 'n', 'm', ',', '.'],
];

pub fn is_game_letter(c: char) -> bool {
    ROWS.iter().any(|row| row.contains(&c))
}

/// Map a typed key to a game letter: Cyrillic keys directly, Latin keys by position
pub fn letter_for_key(c: char) -> Option<char> {
    let upper = c.to_uppercase().next().unwrap_or(c);
    if is_game_letter(upper) {
        return Some(upper);
    }

    let lower = c.to_ascii_lowercase();
    ROWS.iter()
        .zip(LATIN_ROWS.iter())
        .find_map(|(cyr, lat)| lat.iter().position(|k| *k == lower).map(|i| cyr[i]))
}
