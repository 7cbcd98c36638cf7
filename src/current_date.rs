use log::debug;

use crate::store::{OutputPhase, SessionStore};
use crate::{DefaultDate, Result, TimelineConfig, TimelineDate, TimelineError};

/// The visitor's active date for one unit of work.
///
/// Session reads and writes only happen while the response is uncommitted;
/// after that the in-process value is still updated but the session is left
/// alone.
pub struct CurrentDate<'a> {
    session: &'a dyn SessionStore,
    output: &'a dyn OutputPhase,
    key: String,
    cache: Option<TimelineDate>,
}

impl<'a> CurrentDate<'a> {
    pub fn new(session: &'a dyn SessionStore, output: &'a dyn OutputPhase, config: &TimelineConfig) -> Self {
        Self {
            session,
            output,
            key: config.current_date_session_key.clone(),
            cache: None,
        }
    }

    /// Validates `date`, caches it and writes it to the session if the
    /// response has not been committed yet.
    ///
    /// # Errors
    /// Returns `TimelineError::InvalidArgument` if `date` is not a storage-format date.
    pub fn set(&mut self, date: &str) -> Result<()> {
        let parsed = TimelineDate::parse(date).map_err(|e| TimelineError::invalid_argument(date, e))?;
        self.cache = Some(parsed);

        if self.output.is_committed() {
            debug!("response already committed, not writing current date {parsed} to the session");
        } else {
            self.session.set(&self.key, parsed.to_storage());
        }
        Ok(())
    }

    /// The current date: the session value if there is one, otherwise the
    /// default date.
    ///
    /// # Errors
    /// Propagates the default date's failure when it has to fall back to it,
    /// or `TimelineError::InvalidArgument` for a malformed session value.
    pub fn get(&mut self, default: &mut DefaultDate<'_>) -> Result<TimelineDate> {
        if let Some(date) = self.cache {
            return Ok(date);
        }

        let date = match self.read_session() {
            Some(date) => date,
            None => default.get()?.to_storage(),
        };
        self.set(&date)?;
        self.get(default)
    }

    fn read_session(&self) -> Option<String> {
        if self.output.is_committed() || !self.session.has(&self.key) {
            return None;
        }
        self.session.get(&self.key)
    }
}
