//! The content side of the timeline: which items exist on which date, and
//! which item is the site's front page.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::TrackerError;
use crate::prelude::*;

/// Identifier of one tracked content item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl From<&str> for ContentId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl ContentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What the tracker knows about one content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedItem {
    /// Storage-format date the item belongs to
    pub date: String,
    pub published: bool,
}

/// Everything the tracker knows, indexed both ways.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedContent {
    /// Storage-format date -> items on that date
    pub dates: BTreeMap<String, Vec<ContentId>>,
    pub items: HashMap<ContentId, TrackedItem>,
}

impl TrackedContent {
    /// Whether any item listed under `date` is published.
    ///
    /// # Errors
    /// Returns `TrackerError::UnknownItem` if the date lists an item with no record.
    pub fn has_published(&self, date: &str, ids: &[ContentId]) -> Result<bool, TrackerError> {
        for id in ids {
            let item = self.items.get(id).ok_or_else(|| TrackerError::UnknownItem {
                date: date.to_owned(),
                id: id.to_string(),
            })?;
            if item.published {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// The external source of "which content exists on which date".
pub trait ContentTracker {
    /// # Errors
    /// Returns a `TrackerError` if the source cannot be read.
    fn tracked_content(&self) -> Result<TrackedContent, TrackerError>;
}

/// A tracker that can be told about content changes.
pub trait TrackContent: ContentTracker {
    /// Records `id` under `date`, moving it if it was tracked elsewhere.
    ///
    /// # Errors
    /// Returns a `TrackerError` if the source cannot be written.
    fn track(&self, id: ContentId, date: &str, published: bool) -> Result<(), TrackerError>;

    /// Forgets `id`. Untracking an unknown id is not an error.
    ///
    /// # Errors
    /// Returns a `TrackerError` if the source cannot be written.
    fn untrack(&self, id: &ContentId) -> Result<(), TrackerError>;
}

/// A [`TrackContent`] held in process memory. Counts full scans so callers
/// can see whether a cache was hit.
#[derive(Debug, Default)]
pub struct MemoryTracker {
    content: Mutex<TrackedContent>,
    scans: AtomicUsize,
}

impl MemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `tracked_content` has been called
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }

    fn lock(&self) -> Result<MutexGuard<'_, TrackedContent>, TrackerError> {
        self.content
            .lock()
            .map_err(|e| TrackerError::Backend(e.to_string()))
    }
}

impl From<TrackedContent> for MemoryTracker {
    fn from(content: TrackedContent) -> Self {
        Self {
            content: Mutex::new(content),
            scans: AtomicUsize::new(0),
        }
    }
}

fn remove_from_dates(content: &mut TrackedContent, id: &ContentId) {
    let Some(previous) = content.items.remove(id) else {
        return;
    };
    if let Some(ids) = content.dates.get_mut(&previous.date) {
        ids.retain(|other| other != id);
        if ids.is_empty() {
            content.dates.remove(&previous.date);
        }
    }
}

impl ContentTracker for MemoryTracker {
    fn tracked_content(&self) -> Result<TrackedContent, TrackerError> {
        self.scans.fetch_add(1, Ordering::Relaxed);
        Ok(self.lock()?.clone())
    }
}

impl TrackContent for MemoryTracker {
    fn track(&self, id: ContentId, date: &str, published: bool) -> Result<(), TrackerError> {
        let mut content = self.lock()?;

        remove_from_dates(&mut content, &id);
        content
            .dates
            .entry(date.to_owned())
            .or_default()
            .push(id.clone());
        content.items.insert(
            id,
            TrackedItem {
                date: date.to_owned(),
                published,
            },
        );
        Ok(())
    }

    fn untrack(&self, id: &ContentId) -> Result<(), TrackerError> {
        let mut content = self.lock()?;
        remove_from_dates(&mut content, id);
        Ok(())
    }
}

/// What the site's designated front page is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontPage {
    /// A tracked content item, with its date if it has one
    Content { id: ContentId, date: Option<String> },
    /// Something other than tracked content (a listing, a custom route...)
    Other,
}

/// The external "main page" collaborator.
pub trait MainPage {
    fn front_page(&self) -> FrontPage;
}

/// A [`MainPage`] that always reports the same front page.
#[derive(Debug, Clone)]
pub struct StaticMainPage(pub FrontPage);

impl MainPage for StaticMainPage {
    fn front_page(&self) -> FrontPage {
        self.0.clone()
    }
}
