use crate::{ParseError, RangeError};

pub type Result<T, E = TimelineError> = std::result::Result<T, E>;

/// Every failure this crate surfaces. None of them are retried or recovered
/// from internally; each is the terminal result of the call that produced it.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// A date or token string is neither a keyword nor a valid storage date.
    #[error("Cannot resolve {token:?} to a date: {source}")]
    InvalidArgument {
        token: String,
        #[source]
        source: ParseError,
    },

    /// A formatting style keyword is not `storage`, `html`, `long` or `short`.
    #[error("Unsupported date format {0:?}: must be one of \"storage\", \"html\", \"long\", or \"short\"")]
    UnsupportedFormat(String),

    #[error(transparent)]
    InvalidRange(#[from] RangeError),

    /// First/last was requested from an empty defined-dates list.
    #[error("Cannot get the {} date because no {} dates are available", end_name(.first), list_name(.include_unpublished))]
    Empty { first: bool, include_unpublished: bool },

    /// No default date is persisted and none could be inferred.
    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error("Invalid timeline config: {0}")]
    Config(#[source] serde_json::Error),
}

impl TimelineError {
    pub(crate) fn invalid_argument(token: &str, source: ParseError) -> Self {
        Self::InvalidArgument {
            token: token.to_owned(),
            source,
        }
    }
}

const fn end_name(first: &bool) -> &'static str {
    if *first { "first" } else { "last" }
}

const fn list_name(include_unpublished: &bool) -> &'static str {
    if *include_unpublished { "defined" } else { "published" }
}

/// Why a default date could not be read from the front page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    #[error("The configured front page is not a tracked content item")]
    NotContent,

    #[error("Could not read the default date from the front page content item")]
    MissingDate,
}

/// Failure reported by a persistent state store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("State store backend error: {0}")]
    Backend(String),

    /// A stored value did not have the shape this crate wrote.
    #[error("Malformed value under state key {key:?}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not encode value for state key {key:?}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure reported by the content-tracking source.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Content tracker backend error: {0}")]
    Backend(String),

    /// A date lists an item the tracker has no record of.
    #[error("Date {date} lists untracked content item {id}")]
    UnknownItem { date: String, id: String },
}
