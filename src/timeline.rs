use log::{debug, info};

use crate::content::{ContentId, TrackContent};
use crate::{
    DateFormat, DateRange, DateRef, DateResolver, Keyword, Result, TimelineConfig, TimelineDate, TimelineError,
};

/// A change to tracked content that invalidates the defined dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEvent {
    /// An item was created or updated
    Saved {
        id: ContentId,
        date: String,
        published: bool,
    },
    /// An item was deleted
    Deleted { id: ContentId },
}

/// The user-facing timeline API for one unit of work.
pub struct Timeline<'a> {
    resolver: DateResolver<'a>,
    first_label: String,
    last_label: String,
}

impl<'a> Timeline<'a> {
    pub fn new(resolver: DateResolver<'a>, config: &TimelineConfig) -> Self {
        Self {
            resolver,
            first_label: config.first_date_label.clone(),
            last_label: config.last_date_label.clone(),
        }
    }

    pub fn resolver(&mut self) -> &mut DateResolver<'a> {
        &mut self.resolver
    }

    /// See [`DateResolver::resolve`].
    ///
    /// # Errors
    /// Propagates resolution failures.
    pub fn resolve(&mut self, date: impl Into<DateRef>, include_unpublished: bool) -> Result<TimelineDate> {
        self.resolver.resolve(date, include_unpublished)
    }

    /// Formats a date reference for display.
    ///
    /// `first` and `last` render as their configured labels ("First date",
    /// "Last date") rather than as the dates they currently resolve to.
    ///
    /// # Errors
    /// Propagates resolution failures for every other reference.
    pub fn format_date(&mut self, date: impl Into<DateRef>, style: DateFormat) -> Result<String> {
        let date = date.into();
        match date.keyword() {
            Some(Keyword::First) => Ok(self.first_label.clone()),
            Some(Keyword::Last) => Ok(self.last_label.clone()),
            _ => Ok(self.resolve(date, false)?.format(style)),
        }
    }

    /// [`Self::format_date`] with the style given by keyword.
    ///
    /// # Errors
    /// Returns `TimelineError::UnsupportedFormat` for an unknown style, unless
    /// the reference is `first` or `last`.
    pub fn format_date_named(&mut self, date: impl Into<DateRef>, style: &str) -> Result<String> {
        let date = date.into();
        if date.keyword().is_some_and(Keyword::is_defined_date) {
            return self.format_date(date, DateFormat::default());
        }
        self.format_date(date, style.parse()?)
    }

    /// Whether `date` falls within `start..=end`. An empty `date` means "no
    /// constraint" and is always between.
    ///
    /// # Errors
    /// Propagates resolution failures, and `TimelineError::InvalidRange` if
    /// `start` resolves after `end`.
    pub fn is_date_between(
        &mut self,
        date: impl Into<DateRef>,
        start: impl Into<DateRef>,
        end: impl Into<DateRef>,
        include_unpublished: bool,
    ) -> Result<bool> {
        let date = date.into();
        if date.is_empty() {
            return Ok(true);
        }

        let date = self.resolve(date, include_unpublished)?;
        let range = self.range(start, end, include_unpublished)?;
        Ok(range.overlaps_date(&date))
    }

    /// Whether `start1..=end1` and `start2..=end2` share at least one day.
    ///
    /// # Errors
    /// Propagates resolution failures, and `TimelineError::InvalidRange` if
    /// either range is reversed.
    pub fn do_ranges_overlap(
        &mut self,
        start1: impl Into<DateRef>,
        end1: impl Into<DateRef>,
        start2: impl Into<DateRef>,
        end2: impl Into<DateRef>,
        include_unpublished: bool,
    ) -> Result<bool> {
        let first = self.range(start1, end1, include_unpublished)?;
        let second = self.range(start2, end2, include_unpublished)?;
        Ok(first.overlaps_with_range(&second))
    }

    /// Resolves both endpoints and builds a range from them.
    ///
    /// # Errors
    /// Propagates resolution failures and `TimelineError::InvalidRange`.
    pub fn range(
        &mut self,
        start: impl Into<DateRef>,
        end: impl Into<DateRef>,
        include_unpublished: bool,
    ) -> Result<DateRange> {
        let start = self.resolve(start, include_unpublished)?;
        let end = self.resolve(end, include_unpublished)?;
        Ok(DateRange::new(start, end)?)
    }

    /// Records a content change with the tracker and rebuilds the defined dates.
    ///
    /// # Errors
    /// Returns `TimelineError::InvalidArgument` for a saved item whose date is
    /// not a storage-format date; tracker and store failures propagate.
    pub fn content_changed(&mut self, tracker: &dyn TrackContent, event: ContentEvent) -> Result<()> {
        match event {
            ContentEvent::Saved { id, date, published } => {
                let date = TimelineDate::parse(&date).map_err(|e| TimelineError::invalid_argument(&date, e))?;
                debug!("tracking content {id} on {date}");
                tracker.track(id, &date.to_storage(), published)?;
            },
            ContentEvent::Deleted { id } => {
                debug!("untracking content {id}");
                tracker.untrack(&id)?;
            },
        }
        self.resolver.defined_dates().find()
    }

    /// The site's front page changed; its date becomes the default date.
    /// `None` (the new front page has no date) leaves the default alone.
    ///
    /// # Errors
    /// Returns `TimelineError::InvalidArgument` for a malformed date, or a
    /// store failure.
    pub fn front_page_changed(&mut self, date: Option<&str>) -> Result<()> {
        let Some(date) = date else {
            return Ok(());
        };
        info!("front page changed, default date is now {date}");
        self.resolver.default_date().set(date)
    }

    /// The visitor is viewing a content item; its date becomes the current
    /// date. `None` (the item has no date) leaves the current date alone.
    ///
    /// # Errors
    /// Returns `TimelineError::InvalidArgument` for a malformed date.
    pub fn content_viewed(&mut self, date: Option<&str>) -> Result<()> {
        match date {
            Some(date) => self.resolver.current_date().set(date),
            None => Ok(()),
        }
    }

    /// The key rendered output varies by: the current date in storage format.
    ///
    /// # Errors
    /// Propagates current-date resolution failures.
    pub fn cache_context(&mut self) -> Result<String> {
        self.format_date(Keyword::Current, DateFormat::Storage)
    }
}
