//! Language codes, names and aliases used across the arf CLI.
//!
//! Build a [`LanguageTable`] once and pass it to whatever needs it.

mod data;
pub mod error;
pub mod options;
pub mod table;

pub use data::Language;
pub use error::LanguageError;
pub use options::{language_superset, option_block, render_options};
pub use table::{LanguageTable, Resolution};
