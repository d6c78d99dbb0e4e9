// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Global flags (timeout, user agent, log format) can also be set through
// environment variables, which is handy in scripts and CI.
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use og_preview::config::DEFAULT_TIMEOUT_SECS;

#[derive(Parser, Debug)]
#[command(
    name = "og-preview",
    version,
    about = "Build link previews from OpenGraph metadata",
    long_about = "og-preview reads the OpenGraph tags of a web page, turns them into a typed link preview \
                  (article, tweet, ...) and can download and validate preview images."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// Flags shared by every subcommand
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "OG_PREVIEW_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// User-Agent header to send (defaults to og-preview/<version>)
    #[arg(long, global = true, env = "OG_PREVIEW_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Write logs as JSON lines instead of human-readable text
    #[arg(long, global = true)]
    pub log_json: bool,
}

// Options shared by the two preview-building subcommands
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Character offset of the link in the message it came from
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Also try the Foursquare and Instagram preview types
    #[arg(long)]
    pub site_specific: bool,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a page and build its link preview
    ///
    /// Example: og-preview preview https://www.theverge.com/some-article
    Preview {
        /// Page URL (http or https)
        url: String,

        #[command(flatten)]
        options: PreviewArgs,
    },

    /// Build a link preview from markup saved in a local file
    ///
    /// Example: og-preview scan head.html --url https://twitter.com/x/status/1
    Scan {
        /// File containing the page markup
        file: PathBuf,

        /// URL the markup was fetched from
        #[arg(long)]
        url: String,

        #[command(flatten)]
        options: PreviewArgs,
    },

    /// Download images concurrently and check their content type
    ///
    /// Example: og-preview images https://example.com/a.png https://example.com/b.jpg
    Images {
        /// Image URLs
        #[arg(required = true)]
        urls: Vec<String>,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_preview_with_offset() {
        let cli = Cli::parse_from(["og-preview", "preview", "https://example.com", "--offset", "12", "--json"]);
        match cli.command {
            Commands::Preview { url, options } => {
                assert_eq!(url, "https://example.com");
                assert_eq!(options.offset, 12);
                assert!(options.json);
                assert!(!options.site_specific);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_images_requires_urls() {
        assert!(Cli::try_parse_from(["og-preview", "images"]).is_err());
    }
}
