use std::collections::BTreeMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::content::{ContentTracker, TrackedContent};
use crate::store::{self, StateStore};
use crate::{Result, TimelineConfig, TimelineDate, TimelineError};

/// The dates that have content, in chronological order, deduplicated.
///
/// `published` is always a subset of `all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinedDatesSnapshot {
    /// Dates with any content, published or not
    pub all: Vec<String>,
    /// Dates with at least one published item
    pub published: Vec<String>,
}

impl DefinedDatesSnapshot {
    /// Builds both lists from a tracker scan.
    ///
    /// Dates are parsed and ordered as calendar dates, so a source that keys
    /// dates in any order still yields chronological lists.
    ///
    /// # Errors
    /// Returns `TimelineError::InvalidArgument` for a date key that is not a
    /// storage-format date, or `TimelineError::Tracker` if a date lists an
    /// item the tracker has no record of.
    pub fn from_content(content: &TrackedContent) -> Result<Self> {
        let mut dates: BTreeMap<TimelineDate, bool> = BTreeMap::new();

        for (date, ids) in &content.dates {
            let parsed = TimelineDate::parse(date).map_err(|e| TimelineError::invalid_argument(date, e))?;
            let published = content.has_published(date, ids)?;
            *dates.entry(parsed).or_default() |= published;
        }

        Ok(Self {
            all: dates.keys().map(TimelineDate::to_storage).collect(),
            published: dates
                .iter()
                .filter(|&(_, published)| *published)
                .map(|(date, _)| date.to_storage())
                .collect(),
        })
    }

    pub fn list(&self, include_unpublished: bool) -> &[String] {
        if include_unpublished {
            &self.all
        } else {
            &self.published
        }
    }
}

/// The defined-dates cache for one unit of work.
///
/// Lookups go in-process cache, then persistent state, then a full tracker
/// scan; each tier fills the one above it.
pub struct DefinedDates<'a> {
    tracker: &'a dyn ContentTracker,
    state: &'a dyn StateStore,
    key: String,
    cache: Option<DefinedDatesSnapshot>,
}

impl<'a> DefinedDates<'a> {
    pub fn new(tracker: &'a dyn ContentTracker, state: &'a dyn StateStore, config: &TimelineConfig) -> Self {
        Self {
            tracker,
            state,
            key: config.defined_dates_key.clone(),
            cache: None,
        }
    }

    /// Rescans the tracker and overwrites both the persistent and in-process
    /// caches. Run this whenever tracked content changes.
    ///
    /// # Errors
    /// Propagates tracker and store failures.
    pub fn find(&mut self) -> Result<()> {
        self.cache = Some(self.rebuild()?);
        Ok(())
    }

    /// The defined dates, including unpublished-only dates if asked.
    ///
    /// # Errors
    /// Propagates tracker and store failures from whichever tier is reached.
    pub fn get(&mut self, include_unpublished: bool) -> Result<&[String]> {
        Ok(self.snapshot()?.list(include_unpublished))
    }

    /// The chronologically first defined date.
    ///
    /// # Errors
    /// Returns `TimelineError::Empty` if there are no defined dates.
    pub fn first(&mut self, include_unpublished: bool) -> Result<String> {
        self.get(include_unpublished)?
            .first()
            .cloned()
            .ok_or(TimelineError::Empty {
                first: true,
                include_unpublished,
            })
    }

    /// The chronologically last defined date.
    ///
    /// # Errors
    /// Returns `TimelineError::Empty` if there are no defined dates.
    pub fn last(&mut self, include_unpublished: bool) -> Result<String> {
        self.get(include_unpublished)?
            .last()
            .cloned()
            .ok_or(TimelineError::Empty {
                first: false,
                include_unpublished,
            })
    }

    fn snapshot(&mut self) -> Result<&DefinedDatesSnapshot> {
        let snapshot = match self.cache.take() {
            Some(snapshot) => snapshot,
            None => match store::load(self.state, &self.key)? {
                Some(snapshot) => {
                    debug!("defined dates loaded from state key {}", self.key);
                    snapshot
                },
                None => {
                    debug!("no defined dates under state key {}, scanning content", self.key);
                    self.rebuild()?
                },
            },
        };
        Ok(self.cache.insert(snapshot))
    }

    fn rebuild(&self) -> Result<DefinedDatesSnapshot> {
        let content = self.tracker.tracked_content()?;
        let snapshot = DefinedDatesSnapshot::from_content(&content)?;

        store::save(self.state, &self.key, &snapshot)?;
        info!(
            "defined dates rebuilt: {} dates, {} published",
            snapshot.all.len(),
            snapshot.published.len()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{MemoryTracker, TrackContent};
    use crate::store::MemoryStateStore;
    use crate::test_utils::{sample_tracker, strings};
    use serde_json::json;

    #[test]
    fn test_find_builds_both_lists() {
        let tracker = sample_tracker();
        let state = MemoryStateStore::new();
        let config = TimelineConfig::default();
        let mut dates = DefinedDates::new(&tracker, &state, &config);

        dates.find().unwrap();

        let stored = state.get(&config.defined_dates_key).unwrap();
        assert_eq!(
            stored,
            Some(json!({
                "all": ["2049-09-28", "2049-09-29"],
                "published": ["2049-09-29"],
            }))
        );
        assert_eq!(dates.get(true).unwrap(), strings(&["2049-09-28", "2049-09-29"]));
        assert_eq!(dates.get(false).unwrap(), strings(&["2049-09-29"]));
    }

    #[test]
    fn test_find_larger_fixture() {
        let tracker = MemoryTracker::new();
        for (id, date, published) in [
            ("1", "2049-09-28", false),
            ("2", "2049-09-28", false),
            ("3", "2049-09-29", true),
            ("4", "2049-09-29", true),
            ("5", "2049-09-30", true),
            ("6", "2049-09-30", true),
            ("7", "2049-09-30", true),
            ("8", "2049-10-01", true),
            ("9", "2049-10-01", false),
            ("10", "2049-10-02", false),
            ("11", "2049-10-02", true),
        ] {
            tracker.track(id.into(), date, published).unwrap();
        }
        let state = MemoryStateStore::new();
        let config = TimelineConfig::default();
        let mut dates = DefinedDates::new(&tracker, &state, &config);
        dates.find().unwrap();

        assert_eq!(
            dates.get(true).unwrap(),
            strings(&["2049-09-28", "2049-09-29", "2049-09-30", "2049-10-01", "2049-10-02"])
        );
        assert_eq!(
            dates.get(false).unwrap(),
            strings(&["2049-09-29", "2049-09-30", "2049-10-01", "2049-10-02"])
        );
    }

    #[test]
    fn test_first_and_last() {
        let tracker = sample_tracker();
        let state = MemoryStateStore::new();
        let config = TimelineConfig::default();
        let mut dates = DefinedDates::new(&tracker, &state, &config);

        assert_eq!(dates.first(false).unwrap(), "2049-09-29");
        assert_eq!(dates.first(true).unwrap(), "2049-09-28");
        assert_eq!(dates.last(true).unwrap(), "2049-09-29");
        assert_eq!(dates.last(false).unwrap(), "2049-09-29");
    }

    #[test]
    fn test_first_and_last_empty() {
        let tracker = MemoryTracker::new();
        tracker.track("1".into(), "2049-09-28", false).unwrap();
        let state = MemoryStateStore::new();
        let config = TimelineConfig::default();
        let mut dates = DefinedDates::new(&tracker, &state, &config);

        assert!(matches!(
            dates.first(false),
            Err(TimelineError::Empty { first: true, include_unpublished: false })
        ));
        assert!(matches!(
            dates.last(false),
            Err(TimelineError::Empty { first: false, include_unpublished: false })
        ));
        assert_eq!(dates.first(true).unwrap(), "2049-09-28");
    }

    #[test]
    fn test_get_scans_only_once_per_unit_of_work() {
        let tracker = sample_tracker();
        let state = MemoryStateStore::new();
        let config = TimelineConfig::default();
        let mut dates = DefinedDates::new(&tracker, &state, &config);

        dates.get(false).unwrap();
        dates.get(true).unwrap();
        dates.first(true).unwrap();
        assert_eq!(tracker.scan_count(), 1);
    }

    #[test]
    fn test_get_prefers_persistent_state_over_scanning() {
        let tracker = sample_tracker();
        let state = MemoryStateStore::new();
        let config = TimelineConfig::default();
        state
            .set(
                &config.defined_dates_key,
                json!({"all": ["2049-01-01"], "published": ["2049-01-01"]}),
            )
            .unwrap();

        let mut dates = DefinedDates::new(&tracker, &state, &config);
        assert_eq!(dates.get(false).unwrap(), strings(&["2049-01-01"]));
        assert_eq!(tracker.scan_count(), 0);
    }

    #[test]
    fn test_state_written_by_one_unit_of_work_serves_the_next() {
        let tracker = sample_tracker();
        let state = MemoryStateStore::new();
        let config = TimelineConfig::default();

        DefinedDates::new(&tracker, &state, &config).get(false).unwrap();
        let mut next = DefinedDates::new(&tracker, &state, &config);
        assert_eq!(next.get(true).unwrap(), strings(&["2049-09-28", "2049-09-29"]));
        assert_eq!(tracker.scan_count(), 1);
    }

    #[test]
    fn test_in_process_cache_outlives_state_changes() {
        let tracker = sample_tracker();
        let state = MemoryStateStore::new();
        let config = TimelineConfig::default();
        let mut dates = DefinedDates::new(&tracker, &state, &config);

        dates.get(false).unwrap();
        state.delete(&config.defined_dates_key).unwrap();
        assert_eq!(dates.get(false).unwrap(), strings(&["2049-09-29"]));
        assert_eq!(tracker.scan_count(), 1);
    }

    #[test]
    fn test_find_always_rescans() {
        let tracker = sample_tracker();
        let state = MemoryStateStore::new();
        let config = TimelineConfig::default();
        let mut dates = DefinedDates::new(&tracker, &state, &config);

        dates.get(false).unwrap();
        tracker.track("5".into(), "2049-10-01", true).unwrap();
        dates.find().unwrap();

        assert_eq!(tracker.scan_count(), 2);
        assert_eq!(dates.last(false).unwrap(), "2049-10-01");
    }

    #[test]
    fn test_snapshot_orders_chronologically_and_rejects_bad_keys() {
        let mut content = TrackedContent::default();
        for (date, id) in [("2050-01-01", "a"), ("2049-12-31", "b")] {
            content.dates.insert(date.to_owned(), vec![id.into()]);
            content.items.insert(
                id.into(),
                crate::content::TrackedItem {
                    date: date.to_owned(),
                    published: true,
                },
            );
        }
        let snapshot = DefinedDatesSnapshot::from_content(&content).unwrap();
        assert_eq!(snapshot.all, strings(&["2049-12-31", "2050-01-01"]));

        content.dates.insert("2049-02-30".to_owned(), vec![]);
        assert!(matches!(
            DefinedDatesSnapshot::from_content(&content),
            Err(TimelineError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_unknown_item_propagates() {
        let mut content = TrackedContent::default();
        content
            .dates
            .insert("2049-09-28".to_owned(), vec!["ghost".into()]);
        let tracker = MemoryTracker::from(content);
        let state = MemoryStateStore::new();
        let config = TimelineConfig::default();
        let mut dates = DefinedDates::new(&tracker, &state, &config);

        assert!(matches!(dates.find(), Err(TimelineError::Tracker(_))));
        assert!(state.get(&config.defined_dates_key).unwrap().is_none());
    }

    #[test]
    fn test_null_state_rescans() {
        let tracker = sample_tracker();
        let state = MemoryStateStore::new();
        let config = TimelineConfig::default();
        state.set(&config.defined_dates_key, json!(null)).unwrap();

        let mut dates = DefinedDates::new(&tracker, &state, &config);
        assert_eq!(dates.get(true).unwrap(), strings(&["2049-09-28", "2049-09-29"]));
        assert_eq!(tracker.scan_count(), 1);
        assert_eq!(
            state.get(&config.defined_dates_key).unwrap(),
            Some(json!({
                "all": ["2049-09-28", "2049-09-29"],
                "published": ["2049-09-29"],
            }))
        );
    }

    #[test]
    fn test_malformed_state_propagates() {
        let tracker = sample_tracker();
        let state = MemoryStateStore::new();
        let config = TimelineConfig::default();
        state.set(&config.defined_dates_key, json!("nope")).unwrap();

        let mut dates = DefinedDates::new(&tracker, &state, &config);
        assert!(matches!(dates.get(false), Err(TimelineError::Store(_))));
    }
}
