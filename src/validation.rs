//! Checks that a dated entity's range does not overlap any of its siblings.

use log::debug;

use crate::content::ContentId;
use crate::{DateFormat, DateRange, KEYWORD_FIRST, KEYWORD_LAST, Result, Timeline};

/// Something that occupies a span of the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedEntity {
    pub id: ContentId,
    pub label: String,
    /// Start token; `None` means from the first date
    pub start: Option<String>,
    /// End token; `None` means until the last date
    pub end: Option<String>,
}

impl DatedEntity {
    pub fn start_token(&self) -> &str {
        self.start.as_deref().unwrap_or(KEYWORD_FIRST)
    }

    pub fn end_token(&self) -> &str {
        self.end.as_deref().unwrap_or(KEYWORD_LAST)
    }
}

/// A reason an entity's range is not acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The range shares at least one day with another entity's
    Overlap {
        id: ContentId,
        label: String,
        start: String,
        end: String,
    },
    /// A range could not be resolved at all
    Invalid { id: ContentId, message: String },
}

impl Timeline<'_> {
    /// Compares `entity` with every other entity and reports each overlap.
    ///
    /// Unpublished dates count. An entry in `others` with the same id as
    /// `entity` is skipped. If `entity`'s own range is invalid that is the only
    /// violation reported.
    ///
    /// # Errors
    /// Only formatting an overlapping entity's dates can fail; resolution
    /// failures are reported as [`Violation::Invalid`].
    pub fn validate_non_overlapping(&mut self, entity: &DatedEntity, others: &[DatedEntity]) -> Result<Vec<Violation>> {
        let own = match self.entity_range(entity) {
            Ok(range) => range,
            Err(e) => {
                return Ok(vec![Violation::Invalid {
                    id: entity.id.clone(),
                    message: e.to_string(),
                }]);
            },
        };

        let mut violations = Vec::new();
        for other in others.iter().filter(|other| other.id != entity.id) {
            let range = match self.entity_range(other) {
                Ok(range) => range,
                Err(e) => {
                    violations.push(Violation::Invalid {
                        id: other.id.clone(),
                        message: e.to_string(),
                    });
                    continue;
                },
            };
            if !own.overlaps_with_range(&range) {
                continue;
            }

            debug!("{} ({own}) overlaps {} ({range})", entity.id, other.id);
            violations.push(Violation::Overlap {
                id: other.id.clone(),
                label: other.label.clone(),
                start: self.format_date(other.start_token(), DateFormat::Short)?,
                end: self.format_date(other.end_token(), DateFormat::Short)?,
            });
        }
        Ok(violations)
    }

    fn entity_range(&mut self, entity: &DatedEntity) -> Result<DateRange> {
        self.range(entity.start_token(), entity.end_token(), true)
    }
}
