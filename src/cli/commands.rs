//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fetch Pinterest collections and write them as JSON
#[derive(Parser, Debug)]
#[command(name = "pinfeed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output directory, one `<id>.json` per collection
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Collections fetched at once
    #[arg(short = 'j', long, global = true)]
    pub concurrency: Option<usize>,

    /// Cookie string (`k=v; k2=v2`)
    #[arg(long, global = true)]
    pub cookie: Option<String>,

    /// File holding a cookie string
    #[arg(long, global = true)]
    pub cookie_file: Option<PathBuf>,

    /// Stop a collection after this many pages
    #[arg(long, global = true)]
    pub max_pages: Option<usize>,

    /// Write raw items instead of summaries
    #[arg(long, global = true)]
    pub raw: bool,

    /// Indent written JSON
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Pins on one or more boards
    Board {
        /// Board ids
        #[arg(required = true)]
        board_ids: Vec<String>,

        /// Only pins in this section
        #[arg(long)]
        section: Option<String>,

        /// Items per page
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Boards of one or more accounts
    Boards {
        /// Usernames
        #[arg(required = true)]
        usernames: Vec<String>,

        /// Items per page
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Content recommended for boards
    BoardRelated {
        /// Board ids
        #[arg(required = true)]
        board_ids: Vec<String>,
    },

    /// Pins related to pins
    PinRelated {
        /// Pin ids
        #[arg(required = true)]
        pin_ids: Vec<String>,

        /// Use the GraphQL cursor endpoint
        #[arg(long)]
        cursor: bool,

        /// Items per page (1-50)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Pins matching search queries
    SearchPins {
        /// Queries
        #[arg(required = true)]
        queries: Vec<String>,

        /// Items per page
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Boards matching search queries
    SearchBoards {
        /// Queries
        #[arg(required = true)]
        queries: Vec<String>,
    },

    /// Full detail of single pins, scraped from their pages
    Pin {
        /// Pin ids
        #[arg(required = true)]
        pin_ids: Vec<String>,
    },
}

/// What one written file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemShape {
    Pins,
    Boards,
    /// One pin object rather than an array
    PinDetail,
}

impl Commands {
    /// Collection ids named on the command line
    pub fn ids(&self) -> &[String] {
        match self {
            Self::Board { board_ids, .. } | Self::BoardRelated { board_ids } => board_ids,
            Self::Boards { usernames, .. } => usernames,
            Self::PinRelated { pin_ids, .. } | Self::Pin { pin_ids } => pin_ids,
            Self::SearchPins { queries, .. } | Self::SearchBoards { queries } => queries,
        }
    }

    /// Shape of the items each id produces
    pub fn shape(&self) -> ItemShape {
        match self {
            Self::Boards { .. } | Self::SearchBoards { .. } => ItemShape::Boards,
            Self::Pin { .. } => ItemShape::PinDetail,
            Self::Board { .. }
            | Self::BoardRelated { .. }
            | Self::PinRelated { .. }
            | Self::SearchPins { .. } => ItemShape::Pins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_board_with_globals() {
        let cli = Cli::try_parse_from([
            "pinfeed",
            "board",
            "111",
            "222",
            "--section",
            "9",
            "-o",
            "out",
            "-j",
            "3",
            "--raw",
        ])
        .unwrap();

        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert_eq!(cli.concurrency, Some(3));
        assert!(cli.raw);
        assert_eq!(
            cli.command,
            Commands::Board {
                board_ids: vec!["111".to_string(), "222".to_string()],
                section: Some("9".to_string()),
                page_size: None,
            }
        );
        assert_eq!(cli.command.ids(), ["111", "222"]);
        assert_eq!(cli.command.shape(), ItemShape::Pins);
    }

    #[test]
    fn test_parse_pin_related_cursor() {
        let cli = Cli::try_parse_from([
            "pinfeed",
            "pin-related",
            "42",
            "--cursor",
            "--page-size",
            "10",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Commands::PinRelated {
                pin_ids: vec!["42".to_string()],
                cursor: true,
                page_size: Some(10),
            }
        );
    }

    #[test]
    fn test_parse_search_boards() {
        let cli = Cli::try_parse_from(["pinfeed", "search-boards", "oil painting"]).unwrap();
        assert_eq!(cli.command.ids(), ["oil painting"]);
        assert_eq!(cli.command.shape(), ItemShape::Boards);
    }

    #[test]
    fn test_parse_pin_detail() {
        let cli = Cli::try_parse_from(["pinfeed", "pin", "4503", "4504"]).unwrap();
        assert_eq!(cli.command.ids(), ["4503", "4504"]);
        assert_eq!(cli.command.shape(), ItemShape::PinDetail);
    }

    #[test]
    fn test_ids_required() {
        assert!(Cli::try_parse_from(["pinfeed", "boards"]).is_err());
    }
}
