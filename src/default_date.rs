use log::{debug, info};

use crate::content::{FrontPage, MainPage};
use crate::store::{self, StateStore};
use crate::{InferenceError, Result, TimelineConfig, TimelineDate, TimelineError};

/// The site-wide fallback date for one unit of work.
///
/// When nothing is persisted, the date is inferred from the front page's
/// content item and persisted for later units of work.
pub struct DefaultDate<'a> {
    state: &'a dyn StateStore,
    main_page: &'a dyn MainPage,
    key: String,
    cache: Option<TimelineDate>,
}

impl<'a> DefaultDate<'a> {
    pub fn new(state: &'a dyn StateStore, main_page: &'a dyn MainPage, config: &TimelineConfig) -> Self {
        Self {
            state,
            main_page,
            key: config.default_date_key.clone(),
            cache: None,
        }
    }

    /// Validates `date`, persists it in storage format and caches it.
    ///
    /// # Errors
    /// Returns `TimelineError::InvalidArgument` if `date` is not a storage-format
    /// date, or a store failure.
    pub fn set(&mut self, date: &str) -> Result<()> {
        let parsed = TimelineDate::parse(date).map_err(|e| TimelineError::invalid_argument(date, e))?;

        store::save(self.state, &self.key, &parsed.to_storage())?;
        self.cache = Some(parsed);
        Ok(())
    }

    /// The default date.
    ///
    /// # Errors
    /// Returns `TimelineError::Inference` if nothing is persisted and the front
    /// page is not date-bearing content; store failures and malformed persisted
    /// values propagate.
    pub fn get(&mut self) -> Result<TimelineDate> {
        if let Some(date) = self.cache {
            return Ok(date);
        }

        let persisted: Option<String> = store::load(self.state, &self.key)?;
        if let Some(date) = persisted.filter(|date| !date.is_empty()) {
            debug!("default date {date} loaded from state key {}", self.key);
            let parsed = TimelineDate::parse(&date).map_err(|e| TimelineError::invalid_argument(&date, e))?;
            self.cache = Some(parsed);
            return Ok(parsed);
        }

        let date = self.infer()?;
        info!("default date inferred from the front page: {date}");
        self.set(&date)?;
        self.get()
    }

    fn infer(&self) -> Result<String, InferenceError> {
        match self.main_page.front_page() {
            FrontPage::Content { date: Some(date), .. } => Ok(date),
            FrontPage::Content { date: None, .. } => Err(InferenceError::MissingDate),
            FrontPage::Other => Err(InferenceError::NotContent),
        }
    }
}
