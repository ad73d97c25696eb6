// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod game;
pub mod history;
pub mod keyboard;
pub mod preferences;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod store;
pub mod theme;
pub mod timer;
pub mod ui;
pub mod word_source;
