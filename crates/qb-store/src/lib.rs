//! # qb-store
//!
//! Quote persistence for Quotebook: one pretty-printed JSON file per quote,
//! named after its submission time (`2006-01-02_15-04-05.json`).
//!
//! There is no locking. Two quotes submitted within the same second share a
//! file name and the later one wins.
//!
//! ```no_run
//! use qb_store::QuoteStore;
//!
//! let store = QuoteStore::open("quotes").expect("open store");
//! for quote in store.list().expect("list quotes") {
//!     println!("{}: {}", quote.who_said_the_silly_thing, quote.what_silly_thing_did_they_say);
//! }
//! ```

mod error;

pub use error::StoreError;

use std::fs;
use std::path::{Path, PathBuf};

use qb_core::Quote;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// File name format for stored quotes.
pub const FILE_NAME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

const EXTENSION: &str = "json";

/// A directory of quote files.
#[derive(Debug, Clone)]
pub struct QuoteStore {
    dir: PathBuf,
}

impl QuoteStore {
    /// Open the store at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::io(&dir, source))?;
        tracing::debug!(dir = %dir.display(), "opened quote store");
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a quote is stored under.
    #[must_use]
    pub fn path_for(&self, quote: &Quote) -> PathBuf {
        self.dir
            .join(quote.time.format(FILE_NAME_FORMAT).to_string())
            .with_extension(EXTENSION)
    }

    /// Write `quote` to its file, replacing any quote from the same second.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialize` or `StoreError::Io`.
    pub fn save(&self, quote: &Quote) -> Result<PathBuf, StoreError> {
        let mut json = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut json, PrettyFormatter::with_indent(b"    "));
        quote.serialize(&mut serializer)?;
        json.push(b'\n');

        let path = self.path_for(quote);
        fs::write(&path, json).map_err(|source| StoreError::io(&path, source))?;
        tracing::info!(path = %path.display(), "saved quote");
        Ok(path)
    }

    /// Every stored quote, newest first.
    ///
    /// Only regular `*.json` files are read; anything else in the directory is
    /// ignored. A file that does not parse is an error, not skipped.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory or a file cannot be read and
    /// `StoreError::Corrupt` if a file is not a valid quote.
    pub fn list(&self) -> Result<Vec<Quote>, StoreError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| StoreError::io(&self.dir, source))?;

        let mut quotes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::io(&self.dir, source))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            let file_type = entry
                .file_type()
                .map_err(|source| StoreError::io(&path, source))?;
            if !file_type.is_file() {
                continue;
            }
            let quote = read_quote(&path)?;
            quotes.push((quote, entry.file_name()));
        }

        quotes.sort_by(|(a, a_name), (b, b_name)| b.time.cmp(&a.time).then_with(|| a_name.cmp(b_name)));
        tracing::debug!(count = quotes.len(), "listed quotes");
        Ok(quotes.into_iter().map(|(quote, _)| quote).collect())
    }
}

fn read_quote(path: &Path) -> Result<Quote, StoreError> {
    let raw = fs::read(path).map_err(|source| StoreError::io(path, source))?;
    serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}
