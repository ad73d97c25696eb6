use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Identifier of one of the built-in word categories
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThemeId {
    Animals,
    Countries,
    Flowers,
    Professions,
    Transport,
}

/// A category of words backed by its own word list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub id: ThemeId,
    pub name: &'static str,
    pub file_name: &'static str,
}

pub const THEMES: [Theme; 5] = [
    Theme {
        id: ThemeId::Animals,
        name: "Животные",
        file_name: "animals_theme.txt",
    },
    Theme {
        id: ThemeId::Countries,
        name: "Страны",
        file_name: "countries_theme.txt",
    },
    Theme {
        id: ThemeId::Flowers,
        name: "Цветы",
        file_name: "flowers_theme.txt",
    },
    Theme {
        id: ThemeId::Professions,
        name: "Профессии",
        file_name: "professions_theme.txt",
    },
    Theme {
        id: ThemeId::Transport,
        name: "Транспорт",
        file_name: "transport_theme.txt",
    },
];

impl Theme {
    pub fn by_id(id: ThemeId) -> Theme {
        // THEMES holds exactly one entry per ThemeId variant
        THEMES
            .iter()
            .copied()
            .find(|t| t.id == id)
            .unwrap_or(THEMES[0])
    }
}

impl From<ThemeId> for Theme {
    fn from(id: ThemeId) -> Self {
        Theme::by_id(id)
    }
}
