use crate::content::{ContentId, FrontPage, MemoryTracker, StaticMainPage, TrackContent};
use crate::store::{MemorySessionStore, MemoryStateStore, ResponseCommit};
use crate::{
    CurrentDate, DateRange, DateResolver, DefaultDate, DefinedDates, Timeline, TimelineConfig, TimelineDate,
};

pub(crate) fn date(s: &str) -> TimelineDate {
    TimelineDate::parse(s).unwrap()
}

pub(crate) fn range(start: &str, end: &str) -> DateRange {
    DateRange::new(date(start), date(end)).unwrap()
}

pub(crate) fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|&value| value.to_owned()).collect()
}

/// Items 1 and 2 on 2049-09-28, both unpublished; 3 and 4 on 2049-09-29,
/// both published.
pub(crate) fn sample_tracker() -> MemoryTracker {
    let tracker = MemoryTracker::new();
    for (id, day, published) in [
        ("1", "2049-09-28", false),
        ("2", "2049-09-28", false),
        ("3", "2049-09-29", true),
        ("4", "2049-09-29", true),
    ] {
        tracker.track(ContentId::from(id), day, published).unwrap();
    }
    tracker
}

pub(crate) fn front_page(date: Option<&str>) -> StaticMainPage {
    StaticMainPage(FrontPage::Content {
        id: ContentId::from("front"),
        date: date.map(str::to_owned),
    })
}

/// In-memory collaborators for building resolvers and timelines. Every
/// resolver built from one fixture shares its stores, like successive units
/// of work against the same site and visitor.
pub(crate) struct Fixture {
    pub tracker: MemoryTracker,
    pub state: MemoryStateStore,
    pub session: MemorySessionStore,
    pub output: ResponseCommit,
    pub main_page: StaticMainPage,
    pub config: TimelineConfig,
}

impl Fixture {
    /// The sample tracker, with a front page dated 2049-09-29 and nothing
    /// persisted yet.
    pub fn new() -> Self {
        Self::with_tracker(sample_tracker(), "2049-09-29")
    }

    /// A single unpublished item on 2049-09-28.
    pub fn unpublished_only() -> Self {
        let tracker = MemoryTracker::new();
        tracker.track(ContentId::from("1"), "2049-09-28", false).unwrap();
        Self::with_tracker(tracker, "2049-09-28")
    }

    fn with_tracker(tracker: MemoryTracker, front: &str) -> Self {
        Self {
            tracker,
            state: MemoryStateStore::new(),
            session: MemorySessionStore::new(),
            output: ResponseCommit::new(),
            main_page: front_page(Some(front)),
            config: TimelineConfig::default(),
        }
    }

    pub fn resolver(&self) -> DateResolver<'_> {
        DateResolver::new(
            DefinedDates::new(&self.tracker, &self.state, &self.config),
            DefaultDate::new(&self.state, &self.main_page, &self.config),
            CurrentDate::new(&self.session, &self.output, &self.config),
        )
    }

    pub fn timeline(&self) -> Timeline<'_> {
        Timeline::new(self.resolver(), &self.config)
    }
}
