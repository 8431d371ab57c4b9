//! arf library - command implementations and the building blocks they share
//!
//! Exposed as a library so the commands can be exercised from tests.

pub mod commands;
pub mod common;
pub mod errors;
pub mod interrupt;
pub mod prompt;
pub mod scaffold;
pub mod setup_page;
pub mod splice;
pub mod templates;

pub use common::GlobalOpts;
