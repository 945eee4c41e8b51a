//! Runtime configuration.
//!
//! Flags are parsed once at startup into [`FeedConfig`]; the controller,
//! worker, and UI only ever consume the typed struct; nothing re-reads
//! arguments or environment variables after this point.

use anyhow::{bail, Result};
use chrono::Local;
use clap::Parser;

use crate::source::query::{self, build_variables, FeedKind, FeedVariables};

/// Environment variable holding the bearer token when `--token` is absent.
pub const TOKEN_ENV: &str = "CAMPUSFEED_TOKEN";

/// How cards are laid out.  The list variant is a single full-width column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DisplayVariant {
    Grid,
    List,
}

/// Color theme for the card grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Theme {
    Dark,
    Light,
}

/// Command-line surface.
#[derive(Debug, Parser)]
#[command(name = "campusfeed", version, about = "Browse a university's news and events feeds in the terminal")]
pub struct Cli {
    /// GraphQL endpoint URL.
    #[arg(long)]
    pub url: String,

    /// Bearer token; falls back to the CAMPUSFEED_TOKEN environment variable.
    #[arg(long)]
    pub token: Option<String>,

    /// Which feed to browse.
    #[arg(long, value_enum, default_value = "news")]
    pub feed: FeedKind,

    /// Category filters, comma-separated (e.g. "research,campus-life").
    #[arg(long)]
    pub categories: Option<String>,

    /// Match entries related to any listed category instead of all of them.
    #[arg(long)]
    pub union: bool,

    /// Entry ids to exclude, comma-separated.
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<u64>,

    /// Rows of cards per page.
    #[arg(long, default_value_t = 5)]
    pub rows: usize,

    /// Grid columns.  Page size becomes columns x rows.
    #[arg(long)]
    pub columns: Option<usize>,

    /// Show everything the first page returns and never offer "load more".
    #[arg(long)]
    pub no_lazy_load: bool,

    /// Display variant.
    #[arg(long, value_enum, default_value = "grid")]
    pub display: DisplayVariant,

    /// Color theme.
    #[arg(long, value_enum, default_value = "dark")]
    pub theme: Theme,

    /// Earliest date to include (events feed); defaults to today.
    #[arg(long)]
    pub start_date: Option<String>,

    /// Link offered on the no-results screen; defaults to the endpoint's
    /// site root.
    #[arg(long)]
    pub site_url: Option<String>,
}

/// Fully-resolved configuration, consumed by the rest of the program.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub url: String,
    pub token: String,
    pub kind: FeedKind,
    /// Filter portion of the query variables, shared by every request.
    pub variables: FeedVariables,
    pub rows: usize,
    pub columns: Option<usize>,
    pub lazy_load: bool,
    pub display: DisplayVariant,
    pub theme: Theme,
    /// Canonical site linked from the no-results interface.
    pub site_url: String,
}

impl FeedConfig {
    /// Resolve parsed flags into the typed config.
    ///
    /// The token may still be empty here; the source constructor owns that
    /// check so the failure happens in exactly one place.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        if cli.rows == 0 {
            bail!("--rows must be at least 1");
        }
        if cli.columns == Some(0) {
            bail!("--columns must be at least 1");
        }

        let token = cli
            .token
            .or_else(|| std::env::var(TOKEN_ENV).ok())
            .unwrap_or_default();

        // The events feed is forward-looking by default.
        let start_date = cli.start_date.or_else(|| {
            (cli.feed == FeedKind::Events).then(|| Local::now().format("%Y-%m-%d").to_string())
        });

        let variables = build_variables(
            cli.categories.as_deref(),
            cli.union,
            &cli.exclude,
            start_date.as_deref(),
        );

        let site_url = cli.site_url.unwrap_or_else(|| site_root(&cli.url));

        Ok(Self {
            url: cli.url,
            token,
            kind: cli.feed,
            variables,
            rows: cli.rows,
            columns: cli.columns,
            lazy_load: !cli.no_lazy_load,
            display: cli.display,
            theme: cli.theme,
            site_url,
        })
    }

    /// Entries requested per fetch.
    pub fn page_limit(&self) -> usize {
        query::page_limit(self.rows, self.columns)
    }

    /// Columns the card grid actually renders with.
    pub fn grid_columns(&self) -> usize {
        match self.display {
            DisplayVariant::List => 1,
            DisplayVariant::Grid => self.columns.unwrap_or(1),
        }
    }
}

/// Scheme-and-host prefix of a URL, used as the fallback site link.
fn site_root(url: &str) -> String {
    match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            match rest.find('/') {
                Some(path_start) => url[..scheme_end + 3 + path_start].to_string(),
                None => url.to_string(),
            }
        }
        None => url.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
