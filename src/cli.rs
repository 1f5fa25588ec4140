use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::error::ScoutError;
use crate::index;
use crate::output;
use crate::pattern::MatchMode;
use crate::progress;
use crate::search::{self, SearchOptions};
use crate::store::ScanStore;

#[derive(Parser)]
#[command(name = "filescout")]
#[command(version)]
#[command(about = "Index folder trees and find which folders contain a file")]
#[command(long_about = "Filescout indexes a folder tree into a local database, then answers \
    which folders contain a file matching a wildcard pattern and which do not.\n\n\
    Examples:\n  \
    filescout index ~/Documents              # Build or rebuild the index\n  \
    filescout search ~/Documents '*.pdf'     # Folders with and without PDFs\n  \
    filescout search ~/Documents report --substring\n  \
    filescout status                         # List every indexed root")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database file to use instead of the platform default
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Suppress all output except errors
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build or rebuild the index for a folder tree
    #[command(visible_alias = "i")]
    Index {
        /// Root path to index
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Output the scan summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search an indexed tree for folders containing a matching file
    #[command(visible_alias = "s")]
    Search {
        /// Root path of a previously indexed tree
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Search term; `*` and `?` wildcards are supported
        #[arg(value_name = "TERM")]
        term: String,

        /// Match the term anywhere in the file name instead of the whole name
        #[arg(long)]
        substring: bool,

        /// Only match files with this extension (e.g. pdf)
        #[arg(long, value_name = "EXT")]
        ext: Option<String>,

        /// Output the full result set as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show stored scan details for one root, or list every indexed root
    Status {
        /// Root path to report on (all roots when omitted)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let Cli { command, db, quiet } = self;

        let mut store = match &db {
            Some(path) => ScanStore::open_at(path),
            None => ScanStore::open(),
        }
        .context("failed to open the scan database")?;

        match command {
            Commands::Index { path, json } => {
                let spinner = if !quiet && !json {
                    Some(progress::create_spinner(&format!(
                        "Indexing {}...",
                        path.display()
                    )))
                } else {
                    None
                };
                let summary = index::reindex(&mut store, &path);
                if let Some(sp) = spinner {
                    progress::finish_and_clear(&sp);
                }
                let summary = summary?;

                if json {
                    output::print_json(&summary)?;
                } else if !quiet {
                    output::print_reindex_summary(&summary);
                }
            }

            Commands::Search {
                path,
                term,
                substring,
                ext,
                json,
            } => {
                let options = SearchOptions {
                    mode: if substring {
                        MatchMode::Substring
                    } else {
                        MatchMode::WholeName
                    },
                    extension: ext,
                };
                let stats = search::search_with_options(&store, &path, &term, &options)?;

                if json {
                    output::print_json(&stats)?;
                } else if !quiet {
                    output::print_search_results(&stats, &term);
                }
            }

            Commands::Status { path } => match path {
                Some(path) => {
                    let key = path
                        .canonicalize()
                        .unwrap_or_else(|_| path.clone());
                    let scan = store
                        .find_scan_by_root(&key.to_string_lossy())?
                        .ok_or(ScoutError::NoSuchScan(path))?;
                    if !quiet {
                        output::print_scan_status(&scan);
                    }
                }
                None => {
                    let scans = store.list_scans()?;
                    if !quiet {
                        output::print_scan_list(&scans);
                    }
                }
            },
        }

        Ok(())
    }
}
