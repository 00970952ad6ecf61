//! Contact Sources
//!
//! A [`ContactSource`] produces one page of contacts per fetch. The core never
//! retries; callers that want a retry policy wrap the source themselves.
//!
//! ## Implementations
//!
//! - [`StaticContactSource`]: fixed in-memory list
//! - [`JsonFileContactSource`]: random-user page stored as JSON on disk

use crate::{Contact, DialerError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default number of contacts requested per page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Opaque, paginated supplier of contact records
#[async_trait]
pub trait ContactSource: Send + Sync {
    /// Fetch one page of contacts
    ///
    /// Fails with [`DialerError::Fetch`] when the contact list is unavailable.
    async fn fetch(&self) -> Result<Vec<Contact>>;
}

/// Page of contacts in the random-user response shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactPage {
    pub results: Vec<Contact>,
}

impl ContactPage {
    /// Parse a page from raw JSON
    ///
    /// Malformed pages are reported as fetch failures, so the contact list shows
    /// its error state rather than a partial list.
    pub fn parse(data: &str) -> Result<Self> {
        serde_json::from_str(data)
            .map_err(|e| DialerError::fetch(format!("malformed contact page: {}", e)))
    }
}

/// Contact source backed by a fixed list
#[derive(Debug, Clone, Default)]
pub struct StaticContactSource {
    contacts: Vec<Contact>,
}

impl StaticContactSource {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }

    /// Build a source from an embedded JSON page
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(Self::new(ContactPage::parse(data)?.results))
    }
}

#[async_trait]
impl ContactSource for StaticContactSource {
    async fn fetch(&self) -> Result<Vec<Contact>> {
        debug!("Serving {} static contacts", self.contacts.len());
        Ok(self.contacts.clone())
    }
}

/// Contact source that reads a JSON page from disk on every fetch
#[derive(Debug, Clone)]
pub struct JsonFileContactSource {
    path: PathBuf,
    page_size: usize,
}

impl JsonFileContactSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Limit the number of records returned per fetch
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ContactSource for JsonFileContactSource {
    async fn fetch(&self) -> Result<Vec<Contact>> {
        let data = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DialerError::fetch(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        let mut page = ContactPage::parse(&data)?;
        page.results.truncate(self.page_size);

        info!(
            "Fetched {} contacts from {}",
            page.results.len(),
            self.path.display()
        );
        Ok(page.results)
    }
}
