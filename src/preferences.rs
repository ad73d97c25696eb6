use crate::session::Mode;
use crate::store::{SharedStore, StoreError};

pub const MODE_KEY: &str = "hangman_game_mode";

/// Player preferences persisted between runs
#[derive(Clone)]
pub struct Preferences {
    store: SharedStore,
}

impl Preferences {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Last used mode, `Normal` when nothing usable is stored
    pub fn mode(&self) -> Mode {
        match self.store.borrow().get(MODE_KEY) {
            Ok(Some(value)) => Mode::from_pref(&value).unwrap_or_else(|| {
                log::warn!("unknown stored mode {value:?}, using normal");
                Mode::Normal
            }),
            Ok(None) => Mode::Normal,
            Err(e) => {
                log::warn!("could not read mode preference: {e}");
                Mode::Normal
            }
        }
    }

    pub fn set_mode(&self, mode: Mode) -> Result<(), StoreError> {
        self.store.borrow_mut().set(MODE_KEY, &mode.to_string())
    }
}
