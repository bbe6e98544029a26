//! Hosts that feed activities to the bot

pub mod console;

pub use console::ConsoleAdapter;
