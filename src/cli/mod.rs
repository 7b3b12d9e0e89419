//! CLI module
//!
//! Command-line interface for fetching collections.
//!
//! # Commands
//!
//! - `board` - Pins on boards
//! - `boards` - Boards of accounts
//! - `board-related` - Content recommended for boards
//! - `pin-related` - Pins related to pins
//! - `search-pins` - Pin search
//! - `search-boards` - Board search
//! - `pin` - Full detail of single pins

mod commands;
mod runner;

pub use commands::{Cli, Commands, ItemShape};
pub use runner::{CollectionReport, Runner};
