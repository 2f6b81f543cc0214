// Crate root library declaration and module exports.
rust_i18n::i18n!("locales", fallback = "en");

pub mod cli;
pub mod config;
pub mod context;
pub mod help;
pub mod i18n;
pub mod library;
pub mod logging;
pub mod model;
pub mod search;
pub mod storage;
pub mod viewer;

#[cfg(feature = "tui")]
pub mod tui;

// --- MOBILE SUPPORT ---
#[cfg(feature = "mobile")]
pub mod mobile;

#[cfg(feature = "mobile")]
uniffi::setup_scaffolding!();
